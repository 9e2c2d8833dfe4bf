//! Group-level API over affine, standard-form points.
//!
//! [`EcGroup`] hides coordinate systems and Montgomery form: every element it
//! accepts or returns is an affine point in standard form, and conversions
//! to the operator's working representation happen internally.

use core::cmp::Ordering;
use std::sync::Arc;

use ecfp_digits::{compare, from_be_bytes, is_zero, mod_negate, reduce, Digit, DIGIT_BITS};
use log::{trace, warn};

use crate::point::{CoordinateSystem, CurvePoint, Domain};
use crate::{CurveDescriptor, CurveError, CurveOperator, ModularSquareRootSolver};

/// Candidates tried by [`EcGroup::derive_point`] before giving up.
pub const MAX_DERIVATION_ATTEMPTS: u32 = 256;

/// An abelian group written multiplicatively.
pub trait Group {
    type Element;

    fn identity(&self) -> Self::Element;
    fn is_identity(&self, element: &Self::Element) -> bool;
    fn generator(&self) -> Self::Element;

    /// Parses an element from its canonical byte encoding.
    fn element_from_bytes(&self, bytes: &[u8]) -> Result<Self::Element, CurveError>;

    /// The group operation.
    fn multiply(
        &mut self,
        a: &Self::Element,
        b: &Self::Element,
    ) -> Result<Self::Element, CurveError>;

    /// `element` raised to `scalar`.
    fn scalar_mul(
        &mut self,
        element: &Self::Element,
        scalar: &[Digit],
    ) -> Result<Self::Element, CurveError>;

    fn multi_scalar_mul<S: AsRef<[Digit]>>(
        &mut self,
        elements: &[Self::Element],
        scalars: &[S],
    ) -> Result<Self::Element, CurveError> {
        if elements.len() != scalars.len() {
            return Err(CurveError::LengthMismatch {
                bases: elements.len(),
                scalars: scalars.len(),
            });
        }

        let mut result = self.identity();
        for (element, scalar) in elements.iter().zip(scalars) {
            let term = self.scalar_mul(element, scalar.as_ref())?;
            result = self.multiply(&result, &term)?;
        }
        Ok(result)
    }
}

/// The group of points on one curve.
pub struct EcGroup {
    curve: Arc<CurveDescriptor>,
    operator: CurveOperator,
}

impl EcGroup {
    pub fn new(curve: &Arc<CurveDescriptor>) -> Result<Self, CurveError> {
        Ok(Self {
            curve: Arc::clone(curve),
            operator: CurveOperator::new(curve)?,
        })
    }

    pub fn curve(&self) -> &Arc<CurveDescriptor> {
        &self.curve
    }

    pub fn operator(&mut self) -> &mut CurveOperator {
        &mut self.operator
    }

    /// Builds a point from big-endian coordinates, rejecting points that are
    /// not on the curve.
    pub fn create_point(&self, x: &[u8], y: &[u8]) -> Result<CurvePoint, CurveError> {
        let width = self.curve.width();
        let point = CurvePoint::new_affine(
            &self.curve,
            from_be_bytes(x, width)?,
            from_be_bytes(y, width)?,
        )?;
        if !self.operator.is_on_curve(&point)? {
            return Err(CurveError::NotOnCurve);
        }
        Ok(point)
    }

    /// Deterministically maps a seed to a curve point by try-and-increment.
    ///
    /// `candidate(counter)` supplies big-endian bytes for attempt `counter`,
    /// typically a hash of a seed and the counter. The bytes are reduced
    /// modulo `p` and taken as `x`; the first `x` with `x^3 + ax + b` a
    /// square wins, paired with the smaller of its two roots.
    pub fn derive_point<F>(&mut self, mut candidate: F) -> Result<CurvePoint, CurveError>
    where
        F: FnMut(u32) -> Vec<u8>,
    {
        let p = self.curve.p().to_vec();
        let solver = ModularSquareRootSolver::new(&p)?;

        for counter in 0..MAX_DERIVATION_ATTEMPTS {
            let bytes = candidate(counter);
            let digits = from_be_bytes(&bytes, bytes.len().div_ceil(DIGIT_BITS / 8).max(1))?;
            let x = reduce(&digits, &p)?;
            let rhs = self.operator.evaluate_curve_equation(&x);

            let root = if is_zero(&rhs) {
                Some(rhs)
            } else {
                solver.square_root(&rhs)?
            };
            let Some(y) = root else {
                continue;
            };

            let mut negated = vec![0; p.len()];
            mod_negate(&y, &p, &mut negated);
            let y = if compare(&negated, &y) == Ordering::Less {
                negated
            } else {
                y
            };
            trace!("derived curve point after {} candidates", counter + 1);
            return CurvePoint::new_affine(&self.curve, x, y);
        }

        warn!(
            "no point derived on {} after {} candidates",
            self.curve.name().unwrap_or("custom curve"),
            MAX_DERIVATION_ATTEMPTS
        );
        Err(CurveError::DerivationExhausted(MAX_DERIVATION_ATTEMPTS))
    }

    /// Brings `point` into the requested representation, in place.
    fn normalize(
        &mut self,
        point: &mut CurvePoint,
        system: CoordinateSystem,
        domain: Domain,
    ) -> Result<(), CurveError> {
        match (point.coordinate_system(), system) {
            (CoordinateSystem::Jacobian, CoordinateSystem::Affine) => {
                self.operator.convert_to_affine_form(point)?
            }
            (CoordinateSystem::Affine, CoordinateSystem::Jacobian) => {
                self.operator.convert_to_jacobian_form(point)?
            }
            _ => {}
        }
        match (point.domain(), domain) {
            (Domain::Standard, Domain::Montgomery) => {
                self.operator.convert_to_montgomery_form(point)?
            }
            (Domain::Montgomery, Domain::Standard) => {
                self.operator.convert_to_standard_form(point)?
            }
            _ => {}
        }
        Ok(())
    }
}

impl Group for EcGroup {
    type Element = CurvePoint;

    fn identity(&self) -> CurvePoint {
        self.curve.create_point_at_infinity()
    }

    fn is_identity(&self, element: &CurvePoint) -> bool {
        element.is_infinity()
    }

    fn generator(&self) -> CurvePoint {
        self.curve.generator()
    }

    fn element_from_bytes(&self, bytes: &[u8]) -> Result<CurvePoint, CurveError> {
        self.curve.decode_point(bytes)
    }

    fn multiply(&mut self, a: &CurvePoint, b: &CurvePoint) -> Result<CurvePoint, CurveError> {
        let mut accumulator = a.clone();
        let mut addend = b.clone();
        self.normalize(&mut accumulator, CoordinateSystem::Jacobian, Domain::Montgomery)?;
        self.normalize(&mut addend, CoordinateSystem::Affine, Domain::Montgomery)?;
        self.operator.mixed_add_assign(&mut accumulator, &addend)?;
        self.normalize(&mut accumulator, CoordinateSystem::Affine, Domain::Standard)?;
        Ok(accumulator)
    }

    fn scalar_mul(
        &mut self,
        element: &CurvePoint,
        scalar: &[Digit],
    ) -> Result<CurvePoint, CurveError> {
        let mut base = element.clone();
        self.normalize(&mut base, CoordinateSystem::Affine, Domain::Montgomery)?;
        let mut result = self.operator.jacobian_infinity();
        self.operator.scalar_multiply(scalar, &base, &mut result)?;
        self.normalize(&mut result, CoordinateSystem::Affine, Domain::Standard)?;
        Ok(result)
    }
}
