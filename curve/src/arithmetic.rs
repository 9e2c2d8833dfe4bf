//! Jacobian point formulas in the Montgomery domain.
//!
//! Accumulators are Jacobian, addends affine. Each operation has an
//! in-place `_assign` form; the two-operand form copies the accumulator into
//! `out` first, so `out` may hold anything beforehand.

use ecfp_digits::{is_zero, Digit};

use crate::operator::CurveOperator;
use crate::point::{CoordinateSystem, Coordinates, CurvePoint, Domain};
use crate::CurveError;

enum MixedSum {
    Finite,
    Infinity,
    /// The addend equals the accumulator; the sum needs the doubling formula.
    Doubling,
}

fn jacobian_parts(
    point: &mut CurvePoint,
) -> Result<(&mut [Digit], &mut [Digit], &mut [Digit]), CurveError> {
    match &mut point.coordinates {
        Coordinates::Jacobian { x, y, z } => {
            Ok((x.as_mut_slice(), y.as_mut_slice(), z.as_mut_slice()))
        }
        Coordinates::Affine { .. } => Err(CurveError::Internal("expected Jacobian coordinates")),
    }
}

impl CurveOperator {
    /// `out = 2 * point` for a Jacobian Montgomery-form point.
    pub fn double(&mut self, point: &CurvePoint, out: &mut CurvePoint) -> Result<(), CurveError> {
        self.check(point, "double", CoordinateSystem::Jacobian, Domain::Montgomery)?;
        point.copy_into(out)?;
        self.double_assign(out)
    }

    pub fn double_assign(&mut self, point: &mut CurvePoint) -> Result<(), CurveError> {
        self.check(point, "double", CoordinateSystem::Jacobian, Domain::Montgomery)?;
        if point.infinity {
            return Ok(());
        }
        let a_zero = self.uses_a_zero();
        let (x, y, z) = jacobian_parts(point)?;
        if a_zero {
            self.double_a_zero(x, y, z);
        } else {
            self.double_a_minus_three(x, y, z);
        }
        Ok(())
    }

    /// Doubling for `a = -3`, with `M = 3(X - Z^2)(X + Z^2)` halved up front.
    fn double_a_minus_three(&mut self, x: &mut [Digit], y: &mut [Digit], z: &mut [Digit]) {
        let Self { field: f, scratch: s, .. } = self;

        f.square(z, &mut s.t4);
        f.square(y, &mut s.t3);
        f.add(x, &s.t4, &mut s.t1);
        f.sub(x, &s.t4, &mut s.t2);
        f.add(&s.t2, &s.t2, &mut s.t0);
        f.add_assign(&mut s.t0, &s.t2);
        f.mul(x, &s.t3, &mut s.t5);
        f.mul(&s.t1, &s.t0, &mut s.t4);
        f.square(&s.t3, &mut s.t0);
        f.halve(&s.t4, &mut s.t1);
        f.square(&s.t1, &mut s.t3);

        Self::double_tail(f, s, x, y, z);
    }

    /// Doubling for `a = 0`, with `M = 3X^2` halved up front.
    fn double_a_zero(&mut self, x: &mut [Digit], y: &mut [Digit], z: &mut [Digit]) {
        let Self { field: f, scratch: s, .. } = self;

        f.square(y, &mut s.t3);
        f.square(x, &mut s.t4);
        f.add(&s.t4, &s.t4, &mut s.t0);
        f.add_assign(&mut s.t4, &s.t0);
        f.mul(x, &s.t3, &mut s.t5);
        f.square(&s.t3, &mut s.t0);
        f.halve(&s.t4, &mut s.t1);
        f.square(&s.t1, &mut s.t3);

        Self::double_tail(f, s, x, y, z);
    }

    /// Shared end of both doublings. Expects `t0 = Y^4`, `t1 = M / 2`,
    /// `t3 = (M / 2)^2` and `t5 = X Y^2`.
    fn double_tail(
        f: &crate::field::PrimeField,
        s: &mut crate::field::Scratch,
        x: &mut [Digit],
        y: &mut [Digit],
        z: &mut [Digit],
    ) {
        f.mul(y, z, &mut s.t2);
        z.copy_from_slice(&s.t2);
        f.sub(&s.t3, &s.t5, x);
        f.sub_assign(x, &s.t5);
        f.sub(&s.t5, x, &mut s.t3);
        f.mul(&s.t1, &s.t3, &mut s.t5);
        f.sub(&s.t5, &s.t0, y);
    }

    /// `out = jacobian + affine`.
    pub fn mixed_add(
        &mut self,
        jacobian: &CurvePoint,
        affine: &CurvePoint,
        out: &mut CurvePoint,
    ) -> Result<(), CurveError> {
        self.check(jacobian, "mixed_add", CoordinateSystem::Jacobian, Domain::Montgomery)?;
        jacobian.copy_into(out)?;
        self.mixed_add_assign(out, affine)
    }

    /// `accumulator += affine`, falling back to doubling when the operands
    /// are equal and producing infinity when they are opposite.
    pub fn mixed_add_assign(
        &mut self,
        accumulator: &mut CurvePoint,
        affine: &CurvePoint,
    ) -> Result<(), CurveError> {
        self.check(accumulator, "mixed_add", CoordinateSystem::Jacobian, Domain::Montgomery)?;
        self.check(affine, "mixed_add", CoordinateSystem::Affine, Domain::Montgomery)?;

        if accumulator.infinity {
            affine.copy_into(accumulator)?;
            return self.convert_to_jacobian_form(accumulator);
        }
        if affine.infinity {
            return Ok(());
        }

        let (x, y, z) = jacobian_parts(accumulator)?;
        match self.mixed_sum(x, y, z, affine.x(), affine.y()) {
            MixedSum::Finite => Ok(()),
            MixedSum::Infinity => {
                accumulator.infinity = true;
                Ok(())
            }
            MixedSum::Doubling => {
                affine.copy_into(accumulator)?;
                self.convert_to_jacobian_form(accumulator)?;
                self.double_assign(accumulator)
            }
        }
    }

    fn mixed_sum(
        &mut self,
        x: &mut [Digit],
        y: &mut [Digit],
        z: &mut [Digit],
        x2: &[Digit],
        y2: &[Digit],
    ) -> MixedSum {
        let Self { field: f, scratch: s, .. } = self;

        f.square(z, &mut s.t1);
        f.mul(&s.t1, z, &mut s.t2);
        f.mul(&s.t1, x2, &mut s.t3);
        f.mul(&s.t2, y2, &mut s.t4);
        f.sub(&s.t3, x, &mut s.t1);
        f.sub(&s.t4, y, &mut s.t2);

        if is_zero(&s.t1) {
            return if is_zero(&s.t2) {
                MixedSum::Doubling
            } else {
                MixedSum::Infinity
            };
        }

        f.mul_assign(z, &s.t1);
        f.square(&s.t1, &mut s.t3);
        f.mul(&s.t3, &s.t1, &mut s.t4);
        f.mul(&s.t3, x, &mut s.t5);
        f.add(&s.t5, &s.t5, &mut s.t1);
        f.square(&s.t2, x);
        f.sub_assign(x, &s.t1);
        f.sub_assign(x, &s.t4);
        f.sub(&s.t5, x, &mut s.t3);
        f.mul(&s.t2, &s.t3, &mut s.t5);
        f.mul(y, &s.t4, &mut s.t6);
        f.sub(&s.t5, &s.t6, y);
        MixedSum::Finite
    }

    /// `out = 2 * jacobian + affine`.
    pub fn mixed_double_add(
        &mut self,
        jacobian: &CurvePoint,
        affine: &CurvePoint,
        out: &mut CurvePoint,
    ) -> Result<(), CurveError> {
        self.check(
            jacobian,
            "mixed_double_add",
            CoordinateSystem::Jacobian,
            Domain::Montgomery,
        )?;
        jacobian.copy_into(out)?;
        self.mixed_double_add_assign(out, affine)
    }

    /// `accumulator = 2 * accumulator + affine` in one pass, computing
    /// `(J + A) + J` with shared intermediates.
    ///
    /// The formula does not handle `A = ±J`; that input is reported as
    /// [`CurveError::Internal`] and leaves the accumulator unspecified.
    pub fn mixed_double_add_assign(
        &mut self,
        accumulator: &mut CurvePoint,
        affine: &CurvePoint,
    ) -> Result<(), CurveError> {
        self.check(
            accumulator,
            "mixed_double_add",
            CoordinateSystem::Jacobian,
            Domain::Montgomery,
        )?;
        self.check(affine, "mixed_double_add", CoordinateSystem::Affine, Domain::Montgomery)?;

        if accumulator.infinity {
            affine.copy_into(accumulator)?;
            return self.convert_to_jacobian_form(accumulator);
        }
        if affine.infinity {
            return self.double_assign(accumulator);
        }

        let (x, y, z) = jacobian_parts(accumulator)?;
        if !self.double_sum(x, y, z, affine.x(), affine.y())? {
            accumulator.infinity = true;
        }
        Ok(())
    }

    /// Returns `Ok(false)` when `2J + A` is the point at infinity.
    fn double_sum(
        &mut self,
        x: &mut [Digit],
        y: &mut [Digit],
        z: &mut [Digit],
        x2: &[Digit],
        y2: &[Digit],
    ) -> Result<bool, CurveError> {
        let Self { field: f, scratch: s, .. } = self;

        f.square(z, &mut s.t5);
        f.mul(z, &s.t5, &mut s.t6);
        f.mul(x2, &s.t5, &mut s.t4);
        f.mul(y2, &s.t6, &mut s.t5);
        f.sub(&s.t4, x, &mut s.t1);
        f.sub(&s.t5, y, &mut s.t2);
        if is_zero(&s.t1) {
            return Err(CurveError::Internal(
                "mixed_double_add operands share an x-coordinate",
            ));
        }

        f.square(&s.t2, &mut s.t4);
        f.square(&s.t1, &mut s.t6);
        f.mul(&s.t6, x, &mut s.t5);
        f.mul(&s.t1, &s.t6, &mut s.t0);
        f.sub(&s.t4, &s.t5, &mut s.t3);
        f.sub_assign(&mut s.t3, &s.t5);
        f.mul(z, &s.t1, &mut s.t4);
        f.sub_assign(&mut s.t3, &s.t5);
        f.mul(&s.t0, y, &mut s.t6);
        f.sub_assign(&mut s.t3, &s.t0);
        f.add(&s.t6, &s.t6, &mut s.t1);

        // J + A has the x-coordinate of J, so J + A = -J.
        if is_zero(&s.t3) {
            return Ok(false);
        }

        f.mul(&s.t4, &s.t3, z);
        f.mul(&s.t2, &s.t3, &mut s.t4);
        f.square(&s.t3, &mut s.t0);
        f.add_assign(&mut s.t1, &s.t4);
        f.mul(&s.t0, &s.t5, &mut s.t4);
        f.square(&s.t1, &mut s.t7);
        f.mul(&s.t0, &s.t3, &mut s.t5);
        f.sub(&s.t7, &s.t4, x);
        f.sub_assign(x, &s.t4);
        f.sub_assign(x, &s.t5);
        f.sub(x, &s.t4, &mut s.t3);
        f.mul(&s.t5, &s.t6, &mut s.t0);
        f.mul(&s.t1, &s.t3, &mut s.t4);
        f.sub(&s.t4, &s.t0, y);
        Ok(true)
    }
}
