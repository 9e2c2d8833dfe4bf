//! Prime-field helpers shared by the curve formulas.

use ecfp_digits::{
    mod_add, mod_add_assign, mod_halve, mod_inverse, mod_negate, mod_sub, mod_sub_assign, Digit,
    MontgomeryMultiplier,
};

use crate::CurveError;

/// Arithmetic modulo the curve prime. Products and inverses work on
/// Montgomery-form operands; sums and differences are domain agnostic.
#[derive(Clone, Debug)]
pub(crate) struct PrimeField {
    multiplier: MontgomeryMultiplier,
}

impl PrimeField {
    pub(crate) fn new(p: &[Digit]) -> Result<Self, CurveError> {
        Ok(Self {
            multiplier: MontgomeryMultiplier::new(p)?,
        })
    }

    #[inline]
    pub(crate) fn width(&self) -> usize {
        self.multiplier.width()
    }

    #[inline]
    pub(crate) fn modulus(&self) -> &[Digit] {
        self.multiplier.modulus()
    }

    #[inline]
    pub(crate) fn montgomery_one(&self) -> &[Digit] {
        self.multiplier.montgomery_one()
    }

    #[inline]
    pub(crate) fn mul(&self, a: &[Digit], b: &[Digit], out: &mut [Digit]) {
        self.multiplier.montgomery_multiply(a, b, out);
    }

    #[inline]
    pub(crate) fn mul_assign(&self, a: &mut [Digit], b: &[Digit]) {
        self.multiplier.multiply_assign(a, b);
    }

    #[inline]
    pub(crate) fn square(&self, a: &[Digit], out: &mut [Digit]) {
        self.multiplier.montgomery_multiply(a, a, out);
    }

    #[inline]
    pub(crate) fn add(&self, a: &[Digit], b: &[Digit], out: &mut [Digit]) {
        mod_add(a, b, self.modulus(), out);
    }

    #[inline]
    pub(crate) fn add_assign(&self, a: &mut [Digit], b: &[Digit]) {
        mod_add_assign(a, b, self.modulus());
    }

    #[inline]
    pub(crate) fn sub(&self, a: &[Digit], b: &[Digit], out: &mut [Digit]) {
        mod_sub(a, b, self.modulus(), out);
    }

    #[inline]
    pub(crate) fn sub_assign(&self, a: &mut [Digit], b: &[Digit]) {
        mod_sub_assign(a, b, self.modulus());
    }

    #[inline]
    pub(crate) fn negate(&self, a: &[Digit], out: &mut [Digit]) {
        mod_negate(a, self.modulus(), out);
    }

    #[inline]
    pub(crate) fn halve(&self, a: &[Digit], out: &mut [Digit]) {
        mod_halve(a, self.modulus(), out);
    }

    pub(crate) fn to_montgomery(&self, a: &mut [Digit]) {
        self.multiplier.convert_to_montgomery_form(a);
    }

    pub(crate) fn to_standard(&self, a: &mut [Digit]) {
        self.multiplier.convert_to_standard_form(a);
    }

    /// Inverts a Montgomery-form `aR`, writing `a^-1 R`.
    ///
    /// The plain inverse of `aR` is `a^-1 R^-1`; one Montgomery product with
    /// `R^3` lifts it back into the domain.
    pub(crate) fn invert(&self, a: &[Digit], out: &mut [Digit]) -> Result<(), CurveError> {
        mod_inverse(a, self.modulus(), out)?;
        self.multiplier.multiply_assign(out, self.multiplier.r_cubed());
        Ok(())
    }
}

/// Temporaries for the point formulas, allocated once per operator.
#[derive(Clone, Debug)]
pub(crate) struct Scratch {
    pub(crate) t0: Vec<Digit>,
    pub(crate) t1: Vec<Digit>,
    pub(crate) t2: Vec<Digit>,
    pub(crate) t3: Vec<Digit>,
    pub(crate) t4: Vec<Digit>,
    pub(crate) t5: Vec<Digit>,
    pub(crate) t6: Vec<Digit>,
    pub(crate) t7: Vec<Digit>,
}

impl Scratch {
    pub(crate) fn new(width: usize) -> Self {
        Self {
            t0: vec![0; width],
            t1: vec![0; width],
            t2: vec![0; width],
            t3: vec![0; width],
            t4: vec![0; width],
            t5: vec![0; width],
            t6: vec![0; width],
            t7: vec![0; width],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invert_in_montgomery_domain() {
        // 2^64 - 59
        let field = PrimeField::new(&[0xffff_ffff_ffff_ffc5]).unwrap();
        let mut a = vec![12345];
        field.to_montgomery(&mut a);
        let mut inv = vec![0];
        field.invert(&a, &mut inv).unwrap();
        let mut product = vec![0];
        field.mul(&a, &inv, &mut product);
        assert_eq!(product, field.montgomery_one());
    }

    #[test]
    fn test_halve_then_add_twice() {
        let field = PrimeField::new(&[23]).unwrap();
        let mut half = vec![0];
        field.halve(&[7], &mut half);
        let mut back = vec![0];
        field.add(&half, &half, &mut back);
        assert_eq!(back, vec![7]);
        assert_eq!(half, vec![15]);
    }

    #[test]
    fn test_invert_zero_fails() {
        let field = PrimeField::new(&[23]).unwrap();
        let mut out = vec![0];
        assert!(field.invert(&[0], &mut out).is_err());
    }
}
