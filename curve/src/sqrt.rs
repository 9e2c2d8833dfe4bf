//! Square roots and Jacobi symbols modulo an odd prime.

use core::cmp::Ordering;
use std::mem;

use ecfp_digits::{
    add_assign, compare, from_u64, is_even, is_zero, reduce, shift_right, Digit,
    MontgomeryMultiplier,
};

use crate::CurveError;

/// Solves `x^2 = a (mod p)` for an odd modulus `p`.
///
/// Only `p = 3 mod 4` is supported, where a root is `a^((p + 1) / 4)`. All
/// built-in curves have such a prime.
#[derive(Clone, Debug)]
pub struct ModularSquareRootSolver {
    multiplier: MontgomeryMultiplier,
    /// `(p + 1) / 4` when `p = 3 mod 4`.
    exponent: Option<Vec<Digit>>,
}

impl ModularSquareRootSolver {
    pub fn new(modulus: &[Digit]) -> Result<Self, CurveError> {
        let multiplier = MontgomeryMultiplier::new(modulus)?;
        let exponent = (modulus[0] & 3 == 3).then(|| {
            let mut e = modulus.to_vec();
            e.push(0);
            let one = from_u64(1, e.len());
            add_assign(&mut e, &one);
            shift_right(&mut e, 2);
            e
        });
        Ok(Self {
            multiplier,
            exponent,
        })
    }

    pub fn modulus(&self) -> &[Digit] {
        self.multiplier.modulus()
    }

    /// A square root of `a`, or `None` when `a` is a non-residue.
    ///
    /// `a` may have any width; it is reduced first. Which of the two roots
    /// is returned is unspecified.
    pub fn square_root(&self, a: &[Digit]) -> Result<Option<Vec<Digit>>, CurveError> {
        let exponent = self
            .exponent
            .as_ref()
            .ok_or(CurveError::UnsupportedSquareRoot)?;
        let a = reduce(a, self.modulus())?;

        let mut root = vec![0; a.len()];
        self.multiplier.mod_exp(&a, exponent, &mut root);

        let mut check = root.clone();
        self.multiplier.convert_to_montgomery_form(&mut check);
        self.multiplier.square_assign(&mut check);
        self.multiplier.convert_to_standard_form(&mut check);
        Ok((check == a).then_some(root))
    }

    /// The Jacobi symbol `(a / p)`: 1 for nonzero residues, -1 for
    /// non-residues and 0 when `p` divides `a`.
    pub fn jacobi_symbol(&self, a: &[Digit]) -> Result<i32, CurveError> {
        let mut a = reduce(a, self.modulus())?;
        let mut n = self.modulus().to_vec();
        let mut t = 1;

        while !is_zero(&a) {
            while is_even(&a) {
                shift_right(&mut a, 1);
                if matches!(n[0] & 7, 3 | 5) {
                    t = -t;
                }
            }
            mem::swap(&mut a, &mut n);
            if a[0] & 3 == 3 && n[0] & 3 == 3 {
                t = -t;
            }
            a = reduce(&a, &n)?;
        }

        Ok(if compare(&n, &[1]) == Ordering::Equal { t } else { 0 })
    }
}
