//! Modular arithmetic on reduced digit sequences.
//!
//! Unless stated otherwise the operands must already be reduced and share the
//! width of the modulus.

use core::cmp::Ordering;

use crate::convert::{from_biguint, to_biguint};
use crate::ops::{add, add_assign, compare, is_even, is_zero, shift_right, sub, sub_assign};
use crate::{Digit, DigitsError, DIGIT_BITS};

/// `out = (a + b) mod m`.
pub fn mod_add(a: &[Digit], b: &[Digit], m: &[Digit], out: &mut [Digit]) {
    let carry = add(a, b, out);
    if carry != 0 || compare(out, m) != Ordering::Less {
        sub_assign(out, m);
    }
}

/// `a = (a + b) mod m`.
pub fn mod_add_assign(a: &mut [Digit], b: &[Digit], m: &[Digit]) {
    let carry = add_assign(a, b);
    if carry != 0 || compare(a, m) != Ordering::Less {
        sub_assign(a, m);
    }
}

/// `out = (a - b) mod m`.
pub fn mod_sub(a: &[Digit], b: &[Digit], m: &[Digit], out: &mut [Digit]) {
    if sub(a, b, out) != 0 {
        add_assign(out, m);
    }
}

/// `a = (a - b) mod m`.
pub fn mod_sub_assign(a: &mut [Digit], b: &[Digit], m: &[Digit]) {
    if sub_assign(a, b) != 0 {
        add_assign(a, m);
    }
}

/// `out = -a mod m`. Zero maps to zero.
pub fn mod_negate(a: &[Digit], m: &[Digit], out: &mut [Digit]) {
    if is_zero(a) {
        out.fill(0);
    } else {
        sub(m, a, out);
    }
}

/// `out = a / 2 mod m` for odd `m`.
pub fn mod_halve(a: &[Digit], m: &[Digit], out: &mut [Digit]) {
    if is_even(a) {
        out.copy_from_slice(a);
        shift_right(out, 1);
    } else {
        let carry = add(a, m, out);
        halve_with_carry(out, carry);
    }
}

/// `a = a / 2 mod m` for odd `m`.
pub fn mod_halve_assign(a: &mut [Digit], m: &[Digit]) {
    if is_even(a) {
        shift_right(a, 1);
    } else {
        let carry = add_assign(a, m);
        halve_with_carry(a, carry);
    }
}

fn halve_with_carry(a: &mut [Digit], carry: Digit) {
    shift_right(a, 1);
    if let Some(top) = a.last_mut() {
        *top |= carry << (DIGIT_BITS - 1);
    }
}

/// Reduces an arbitrary-width `a` modulo `m`. The result has the width of `m`.
pub fn reduce(a: &[Digit], m: &[Digit]) -> Result<Vec<Digit>, DigitsError> {
    if is_zero(m) {
        return Err(DigitsError::ZeroModulus);
    }
    from_biguint(&(to_biguint(a) % to_biguint(m)), m.len())
}

/// `out = a^-1 mod m`.
pub fn mod_inverse(a: &[Digit], m: &[Digit], out: &mut [Digit]) -> Result<(), DigitsError> {
    if is_zero(m) {
        return Err(DigitsError::ZeroModulus);
    }
    let inverse = to_biguint(a)
        .modinv(&to_biguint(m))
        .ok_or(DigitsError::NotInvertible)?;
    out.copy_from_slice(&from_biguint(&inverse, out.len())?);
    Ok(())
}
