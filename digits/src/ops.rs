//! Plain (non-modular) digit-sequence operations.

use core::cmp::Ordering;

use crate::{Digit, DIGIT_BITS};

/// Computes `a + b + carry`, returning the result along with the new carry.
#[inline(always)]
pub(crate) const fn adc(a: Digit, b: Digit, carry: Digit) -> (Digit, Digit) {
    let ret = (a as u128) + (b as u128) + (carry as u128);
    (ret as Digit, (ret >> DIGIT_BITS) as Digit)
}

/// Computes `a - (b + borrow)`, returning the result along with the new borrow (0 or 1).
#[inline(always)]
pub(crate) const fn sbb(a: Digit, b: Digit, borrow: Digit) -> (Digit, Digit) {
    let ret = (a as u128).wrapping_sub((b as u128) + (borrow as u128));
    (ret as Digit, ((ret >> DIGIT_BITS) as Digit) & 1)
}

/// Computes `a + (b * c) + carry`, returning the result along with the new carry.
#[inline(always)]
pub(crate) const fn mac(a: Digit, b: Digit, c: Digit, carry: Digit) -> (Digit, Digit) {
    let ret = (a as u128) + (b as u128) * (c as u128) + (carry as u128);
    (ret as Digit, (ret >> DIGIT_BITS) as Digit)
}

/// `out = a + b`, returning the carry out of the top digit.
///
/// All three slices must have the same width.
pub fn add(a: &[Digit], b: &[Digit], out: &mut [Digit]) -> Digit {
    debug_assert_eq!(a.len(), b.len());
    debug_assert_eq!(a.len(), out.len());
    let mut carry = 0;
    for ((o, &x), &y) in out.iter_mut().zip(a).zip(b) {
        let (sum, c) = adc(x, y, carry);
        *o = sum;
        carry = c;
    }
    carry
}

/// `a += b`, returning the carry out of the top digit.
pub fn add_assign(a: &mut [Digit], b: &[Digit]) -> Digit {
    debug_assert_eq!(a.len(), b.len());
    let mut carry = 0;
    for (x, &y) in a.iter_mut().zip(b) {
        let (sum, c) = adc(*x, y, carry);
        *x = sum;
        carry = c;
    }
    carry
}

/// `out = a - b`, returning the borrow out of the top digit.
pub fn sub(a: &[Digit], b: &[Digit], out: &mut [Digit]) -> Digit {
    debug_assert_eq!(a.len(), b.len());
    debug_assert_eq!(a.len(), out.len());
    let mut borrow = 0;
    for ((o, &x), &y) in out.iter_mut().zip(a).zip(b) {
        let (diff, bw) = sbb(x, y, borrow);
        *o = diff;
        borrow = bw;
    }
    borrow
}

/// `a -= b`, returning the borrow out of the top digit.
pub fn sub_assign(a: &mut [Digit], b: &[Digit]) -> Digit {
    debug_assert_eq!(a.len(), b.len());
    let mut borrow = 0;
    for (x, &y) in a.iter_mut().zip(b) {
        let (diff, bw) = sbb(*x, y, borrow);
        *x = diff;
        borrow = bw;
    }
    borrow
}

/// Compares two values of possibly different widths.
pub fn compare(a: &[Digit], b: &[Digit]) -> Ordering {
    let len = a.len().max(b.len());
    for i in (0..len).rev() {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        match x.cmp(&y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

#[inline]
pub fn is_zero(a: &[Digit]) -> bool {
    a.iter().all(|&d| d == 0)
}

#[inline]
pub fn is_even(a: &[Digit]) -> bool {
    a.first().map_or(true, |&d| d & 1 == 0)
}

/// Number of significant bits in `a`.
pub fn bit_length(a: &[Digit]) -> usize {
    match a.iter().rposition(|&d| d != 0) {
        Some(top) => top * DIGIT_BITS + (DIGIT_BITS - a[top].leading_zeros() as usize),
        None => 0,
    }
}

/// Shifts `a` right in place by `bits`, which must be below [`DIGIT_BITS`].
pub fn shift_right(a: &mut [Digit], bits: u32) {
    debug_assert!((bits as usize) < DIGIT_BITS);
    if bits == 0 {
        return;
    }
    let n = a.len();
    for i in 0..n {
        let high = if i + 1 < n {
            a[i + 1] << (DIGIT_BITS as u32 - bits)
        } else {
            0
        };
        a[i] = (a[i] >> bits) | high;
    }
}

/// Returns `value` as a sequence of `width` digits (at least one).
pub fn from_u64(value: u64, width: usize) -> Vec<Digit> {
    let mut digits = vec![0; width.max(1)];
    digits[0] = value;
    digits
}

/// `a += small`, propagating the carry through the whole width.
pub(crate) fn add_small(a: &mut [Digit], small: Digit) -> Digit {
    let mut carry = small;
    for d in a.iter_mut() {
        if carry == 0 {
            break;
        }
        let (sum, c) = adc(*d, carry, 0);
        *d = sum;
        carry = c;
    }
    carry
}

/// `a -= small`, propagating the borrow through the whole width.
pub(crate) fn sub_small(a: &mut [Digit], small: Digit) -> Digit {
    let mut borrow = small;
    for d in a.iter_mut() {
        if borrow == 0 {
            break;
        }
        let (diff, bw) = sbb(*d, borrow, 0);
        *d = diff;
        borrow = bw;
    }
    borrow
}
