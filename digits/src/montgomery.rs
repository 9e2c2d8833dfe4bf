//! Montgomery multiplication modulo an odd modulus of up to [`MAX_DIGITS`] digits.

use core::cmp::Ordering;

use num_bigint::BigUint;

use crate::convert::{from_biguint, to_biguint};
use crate::ops::{adc, compare, from_u64, is_even, mac, sub_assign};
use crate::{Digit, DigitsError, DIGIT_BITS, MAX_DIGITS};

/// Montgomery context for an odd modulus `m` with `R = 2^(64 * width)`.
///
/// Holds the precomputed constants `-m^-1 mod 2^64`, `R mod m`, `R^2 mod m`
/// and `R^3 mod m`. A multiplication of `aR` and `bR` yields `abR`, which is
/// the form the curve formulas keep their coordinates in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MontgomeryMultiplier {
    modulus: Vec<Digit>,
    m_prime: Digit,
    one: Vec<Digit>,
    r: Vec<Digit>,
    r_squared: Vec<Digit>,
    r_cubed: Vec<Digit>,
}

impl MontgomeryMultiplier {
    pub fn new(modulus: &[Digit]) -> Result<Self, DigitsError> {
        let width = modulus.len();
        if width == 0 || width > MAX_DIGITS {
            return Err(DigitsError::WidthOutOfRange(width));
        }
        if is_even(modulus) {
            return Err(DigitsError::EvenModulus);
        }

        let m = to_biguint(modulus);
        let r = (BigUint::from(1u32) << (DIGIT_BITS * width)) % &m;
        let r_squared = (&r * &r) % &m;
        let r_cubed = (&r_squared * &r) % &m;

        Ok(Self {
            modulus: modulus.to_vec(),
            m_prime: neg_inverse(modulus[0]),
            one: from_u64(1, width),
            r: from_biguint(&r, width)?,
            r_squared: from_biguint(&r_squared, width)?,
            r_cubed: from_biguint(&r_cubed, width)?,
        })
    }

    pub fn modulus(&self) -> &[Digit] {
        &self.modulus
    }

    pub fn width(&self) -> usize {
        self.modulus.len()
    }

    /// `R mod m`, the Montgomery form of one.
    pub fn montgomery_one(&self) -> &[Digit] {
        &self.r
    }

    pub fn r_squared(&self) -> &[Digit] {
        &self.r_squared
    }

    /// `R^3 mod m`. Multiplying a standard-form inverse of `aR` by this
    /// constant yields the Montgomery form of `a^-1`.
    pub fn r_cubed(&self) -> &[Digit] {
        &self.r_cubed
    }

    /// `out = a * b * R^-1 mod m`. Inputs must be reduced.
    pub fn montgomery_multiply(&self, a: &[Digit], b: &[Digit], out: &mut [Digit]) {
        let t = self.product(a, b);
        out.copy_from_slice(&t[..self.width()]);
    }

    /// `a = a * b * R^-1 mod m`.
    pub fn multiply_assign(&self, a: &mut [Digit], b: &[Digit]) {
        let t = self.product(a, b);
        a.copy_from_slice(&t[..self.width()]);
    }

    /// `a = a^2 * R^-1 mod m`.
    pub fn square_assign(&self, a: &mut [Digit]) {
        let t = self.product(a, a);
        a.copy_from_slice(&t[..self.width()]);
    }

    /// Maps a reduced standard-form value `a` to `aR mod m`.
    pub fn convert_to_montgomery_form(&self, a: &mut [Digit]) {
        let t = self.product(a, &self.r_squared);
        a.copy_from_slice(&t[..self.width()]);
    }

    /// Maps `aR mod m` back to `a`.
    pub fn convert_to_standard_form(&self, a: &mut [Digit]) {
        let t = self.product(a, &self.one);
        a.copy_from_slice(&t[..self.width()]);
    }

    /// `out = base^exponent mod m`, in standard form.
    ///
    /// `base` must be reduced; `exponent` may have any width.
    pub fn mod_exp(&self, base: &[Digit], exponent: &[Digit], out: &mut [Digit]) {
        let mut b = base.to_vec();
        self.convert_to_montgomery_form(&mut b);
        let mut acc = self.r.clone();
        for i in (0..exponent.len() * DIGIT_BITS).rev() {
            self.square_assign(&mut acc);
            if (exponent[i / DIGIT_BITS] >> (i % DIGIT_BITS)) & 1 == 1 {
                self.multiply_assign(&mut acc, &b);
            }
        }
        self.convert_to_standard_form(&mut acc);
        out.copy_from_slice(&acc);
    }

    /// Coarsely integrated operand scanning (CIOS) Montgomery product.
    ///
    /// The result lives in the low `width` digits of the returned buffer.
    fn product(&self, a: &[Digit], b: &[Digit]) -> [Digit; MAX_DIGITS + 2] {
        let n = self.width();
        let m = &self.modulus;
        debug_assert_eq!(a.len(), n);
        debug_assert_eq!(b.len(), n);

        let mut t = [0 as Digit; MAX_DIGITS + 2];
        for &ai in a {
            let mut carry = 0;
            for j in 0..n {
                let (lo, hi) = mac(t[j], ai, b[j], carry);
                t[j] = lo;
                carry = hi;
            }
            let (lo, hi) = adc(t[n], carry, 0);
            t[n] = lo;
            t[n + 1] = hi;

            let u = t[0].wrapping_mul(self.m_prime);
            let (_, mut carry) = mac(t[0], u, m[0], 0);
            for j in 1..n {
                let (lo, hi) = mac(t[j], u, m[j], carry);
                t[j - 1] = lo;
                carry = hi;
            }
            let (lo, hi) = adc(t[n], carry, 0);
            t[n - 1] = lo;
            t[n] = t[n + 1] + hi;
        }

        if t[n] != 0 || compare(&t[..n], m) != Ordering::Less {
            sub_assign(&mut t[..n], m);
        }
        t[n] = 0;
        t
    }
}

/// `-m0^-1 mod 2^64` for odd `m0`, by Newton iteration.
fn neg_inverse(m0: Digit) -> Digit {
    let mut inv: Digit = 1;
    for _ in 0..6 {
        inv = inv.wrapping_mul(2u64.wrapping_sub(m0.wrapping_mul(inv)));
    }
    inv.wrapping_neg()
}
