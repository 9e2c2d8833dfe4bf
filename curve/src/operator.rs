//! The curve operator: point arithmetic bound to one curve.
//!
//! Points passed to an operator must belong to its curve and be in the
//! coordinate system and domain each operation documents. Every check
//! happens before any output is written.

use std::mem;
use std::sync::Arc;

use ecfp_digits::{compare, from_u64, Digit, DIGIT_BITS};
use log::debug;

use crate::field::{PrimeField, Scratch};
use crate::point::{CoordinateSystem, Coordinates, CurvePoint, Domain};
use crate::{CoefficientKind, CurveDescriptor, CurveError};

/// Arithmetic engine for points on one curve.
///
/// Holds the field helpers, the curve coefficients in Montgomery form and a
/// set of scratch buffers, so no operation allocates field elements on the
/// hot path. An operator is not meant to be shared between threads; create
/// one per worker instead.
pub struct CurveOperator {
    pub(crate) curve: Arc<CurveDescriptor>,
    pub(crate) field: PrimeField,
    pub(crate) montgomery_a: Vec<Digit>,
    pub(crate) montgomery_b: Vec<Digit>,
    pub(crate) scratch: Scratch,
}

impl CurveOperator {
    pub fn new(curve: &Arc<CurveDescriptor>) -> Result<Self, CurveError> {
        let field = PrimeField::new(curve.p())?;
        let mut montgomery_a = curve.a().to_vec();
        let mut montgomery_b = curve.b().to_vec();
        field.to_montgomery(&mut montgomery_a);
        field.to_montgomery(&mut montgomery_b);
        debug!(
            "curve operator for {} ({} digits, window {})",
            curve.name().unwrap_or("custom curve"),
            curve.width(),
            window_width(curve.width())
        );
        Ok(Self {
            curve: Arc::clone(curve),
            scratch: Scratch::new(field.width()),
            field,
            montgomery_a,
            montgomery_b,
        })
    }

    pub fn curve(&self) -> &Arc<CurveDescriptor> {
        &self.curve
    }

    /// NAF window used by [`CurveOperator::scalar_multiply`]: 5 for fields
    /// of at most 256 bits, 6 above.
    pub fn window_width(&self) -> u32 {
        window_width(self.field.width())
    }

    /// A Jacobian, Montgomery-form point at infinity for this curve.
    pub fn jacobian_infinity(&self) -> CurvePoint {
        CurvePoint::zeroed(
            &self.curve,
            CoordinateSystem::Jacobian,
            Domain::Montgomery,
            true,
        )
    }

    pub(crate) fn check(
        &self,
        point: &CurvePoint,
        operation: &'static str,
        system: CoordinateSystem,
        domain: Domain,
    ) -> Result<(), CurveError> {
        self.check_curve(point)?;
        if point.coordinate_system() != system {
            return Err(CurveError::WrongCoordinates {
                operation,
                expected: system,
            });
        }
        if point.domain != domain {
            return Err(CurveError::WrongDomain {
                operation,
                expected: domain,
            });
        }
        Ok(())
    }

    pub(crate) fn check_curve(&self, point: &CurvePoint) -> Result<(), CurveError> {
        if CurveDescriptor::same_curve(&self.curve, &point.curve) {
            Ok(())
        } else {
            Err(CurveError::CurveMismatch)
        }
    }

    /// `out = -point`. Keeps the representation and domain of `point`.
    pub fn negate(&self, point: &CurvePoint, out: &mut CurvePoint) -> Result<(), CurveError> {
        self.check_curve(point)?;
        point.copy_into(out)?;
        if !point.infinity {
            self.field.negate(point.y(), out.y_mut());
        }
        Ok(())
    }

    /// Maps every coordinate of a standard-form point to `aR mod p`.
    pub fn convert_to_montgomery_form(&self, point: &mut CurvePoint) -> Result<(), CurveError> {
        self.check_curve(point)?;
        if point.domain == Domain::Montgomery {
            return Err(CurveError::AlreadyInDomain(Domain::Montgomery));
        }
        self.map_coordinates(point, |field, c| field.to_montgomery(c));
        point.domain = Domain::Montgomery;
        Ok(())
    }

    pub fn convert_to_standard_form(&self, point: &mut CurvePoint) -> Result<(), CurveError> {
        self.check_curve(point)?;
        if point.domain == Domain::Standard {
            return Err(CurveError::AlreadyInDomain(Domain::Standard));
        }
        self.map_coordinates(point, |field, c| field.to_standard(c));
        point.domain = Domain::Standard;
        Ok(())
    }

    fn map_coordinates(&self, point: &mut CurvePoint, f: impl Fn(&PrimeField, &mut [Digit])) {
        if point.infinity {
            return;
        }
        match &mut point.coordinates {
            Coordinates::Affine { x, y } => {
                f(&self.field, x);
                f(&self.field, y);
            }
            Coordinates::Jacobian { x, y, z } => {
                f(&self.field, x);
                f(&self.field, y);
                f(&self.field, z);
            }
        }
    }

    /// Lifts an affine point to Jacobian coordinates with `Z = 1` in the
    /// point's current domain.
    pub fn convert_to_jacobian_form(&self, point: &mut CurvePoint) -> Result<(), CurveError> {
        self.check_curve(point)?;
        let z = match point.domain {
            Domain::Montgomery => self.field.montgomery_one().to_vec(),
            Domain::Standard => from_u64(1, self.field.width()),
        };
        point.coordinates = match &mut point.coordinates {
            Coordinates::Affine { x, y } => Coordinates::Jacobian {
                x: mem::take(x),
                y: mem::take(y),
                z,
            },
            Coordinates::Jacobian { .. } => {
                return Err(CurveError::AlreadyInCoordinates(CoordinateSystem::Jacobian))
            }
        };
        Ok(())
    }

    /// Projects a Jacobian point to affine `(X / Z^2, Y / Z^3)`.
    ///
    /// The point at infinity only drops its `Z` coordinate.
    pub fn convert_to_affine_form(&mut self, point: &mut CurvePoint) -> Result<(), CurveError> {
        self.check_curve(point)?;
        if point.is_affine() {
            return Err(CurveError::AlreadyInCoordinates(CoordinateSystem::Affine));
        }
        if !point.infinity && point.domain == Domain::Standard {
            self.convert_to_montgomery_form(point)?;
            self.convert_to_affine_form(point)?;
            return self.convert_to_standard_form(point);
        }

        let Self { field, scratch: s, .. } = self;
        point.coordinates = match &mut point.coordinates {
            Coordinates::Jacobian { x, y, z } => {
                if !point.infinity {
                    field.invert(z, &mut s.t2)?;
                    field.square(&s.t2, &mut s.t0);
                    field.mul_assign(x, &s.t0);
                    field.mul_assign(y, &s.t0);
                    field.mul_assign(y, &s.t2);
                }
                Coordinates::Affine {
                    x: mem::take(x),
                    y: mem::take(y),
                }
            }
            Coordinates::Affine { .. } => {
                return Err(CurveError::AlreadyInCoordinates(CoordinateSystem::Affine))
            }
        };
        Ok(())
    }

    /// `out = x^3 + ax + b` for a Montgomery-form `x`.
    pub(crate) fn curve_equation(&self, x: &[Digit], out: &mut [Digit]) {
        self.field.square(x, out);
        self.field.add_assign(out, &self.montgomery_a);
        self.field.mul_assign(out, x);
        self.field.add_assign(out, &self.montgomery_b);
    }

    /// `x^3 + ax + b` for a standard-form `x`, in standard form.
    pub(crate) fn evaluate_curve_equation(&self, x: &[Digit]) -> Vec<Digit> {
        let mut xm = x.to_vec();
        self.field.to_montgomery(&mut xm);
        let mut rhs = vec![0; self.field.width()];
        self.curve_equation(&xm, &mut rhs);
        self.field.to_standard(&mut rhs);
        rhs
    }

    /// Whether an affine point satisfies `y^2 = x^3 + ax + b`. The point at
    /// infinity is always on the curve.
    pub fn is_on_curve(&self, point: &CurvePoint) -> Result<bool, CurveError> {
        self.check(point, "is_on_curve", CoordinateSystem::Affine, point.domain)?;
        if point.infinity {
            return Ok(true);
        }
        let p = self.field.modulus();
        if compare(point.x(), p).is_ge() || compare(point.y(), p).is_ge() {
            return Ok(false);
        }

        let width = self.field.width();
        let (mut x, mut y) = (point.x().to_vec(), point.y().to_vec());
        if point.domain == Domain::Standard {
            self.field.to_montgomery(&mut x);
            self.field.to_montgomery(&mut y);
        }
        let mut lhs = vec![0; width];
        let mut rhs = vec![0; width];
        self.field.square(&y, &mut lhs);
        self.curve_equation(&x, &mut rhs);
        Ok(lhs == rhs)
    }

    pub(crate) fn uses_a_zero(&self) -> bool {
        self.curve.kind() == CoefficientKind::Zero
    }
}

fn window_width(width: usize) -> u32 {
    if width * DIGIT_BITS <= 256 {
        5
    } else {
        6
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NamedCurve;

    fn setup(named: NamedCurve) -> (Arc<CurveDescriptor>, CurveOperator) {
        let curve = named.descriptor().unwrap();
        let operator = CurveOperator::new(&curve).unwrap();
        (curve, operator)
    }

    #[test]
    fn test_window_width() {
        assert_eq!(setup(NamedCurve::P256).1.window_width(), 5);
        assert_eq!(setup(NamedCurve::Bn254).1.window_width(), 5);
        assert_eq!(setup(NamedCurve::P384).1.window_width(), 6);
        assert_eq!(setup(NamedCurve::P521).1.window_width(), 6);
    }

    #[test]
    fn test_generators_are_on_curve() {
        for named in NamedCurve::ALL {
            let (curve, mut operator) = setup(named);
            let mut g = curve.generator();
            assert!(operator.is_on_curve(&g).unwrap(), "{named}");
            operator.convert_to_montgomery_form(&mut g).unwrap();
            assert!(operator.is_on_curve(&g).unwrap(), "{named}");

            operator.convert_to_jacobian_form(&mut g).unwrap();
            assert!(operator.is_on_curve(&g).is_err());
            operator.convert_to_affine_form(&mut g).unwrap();
            operator.convert_to_standard_form(&mut g).unwrap();
            assert_eq!(g, curve.generator());
        }
    }

    #[test]
    fn test_off_curve_point_detected() {
        let (curve, operator) = setup(NamedCurve::P256);
        let mut g = curve.generator();
        g.y_mut()[0] ^= 1;
        assert!(!operator.is_on_curve(&g).unwrap());
    }

    #[test]
    fn test_conversions_reject_target_state() {
        let (curve, mut operator) = setup(NamedCurve::P256);
        let mut g = curve.generator();
        assert_eq!(
            operator.convert_to_standard_form(&mut g),
            Err(CurveError::AlreadyInDomain(Domain::Standard))
        );
        assert_eq!(
            operator.convert_to_affine_form(&mut g),
            Err(CurveError::AlreadyInCoordinates(CoordinateSystem::Affine))
        );
        operator.convert_to_jacobian_form(&mut g).unwrap();
        assert_eq!(g.z(), Some(&[1, 0, 0, 0][..]));
        assert_eq!(
            operator.convert_to_jacobian_form(&mut g),
            Err(CurveError::AlreadyInCoordinates(CoordinateSystem::Jacobian))
        );
        operator.convert_to_montgomery_form(&mut g).unwrap();
        assert_eq!(
            operator.convert_to_montgomery_form(&mut g),
            Err(CurveError::AlreadyInDomain(Domain::Montgomery))
        );
    }

    #[test]
    fn test_standard_jacobian_to_affine() {
        let (curve, mut operator) = setup(NamedCurve::P256);
        let g = curve.generator();
        // (x * 4, y * 8, 2) is the same point as (x, y, 1)
        let field = &operator.field;
        let double = |a: &[Digit]| {
            let mut out = vec![0; 4];
            field.add(a, a, &mut out);
            out
        };
        let x = double(&double(g.x()));
        let y = double(&double(&double(g.y())));
        let two = from_u64(2, 4);
        let mut point = CurvePoint::from_parts(
            &curve,
            Coordinates::Jacobian { x, y, z: two },
            Domain::Standard,
            false,
        )
        .unwrap();
        operator.convert_to_affine_form(&mut point).unwrap();
        assert_eq!(point, g);
    }

    #[test]
    fn test_negate() {
        let (curve, operator) = setup(NamedCurve::P256);
        let g = curve.generator();
        let mut neg = curve.allocate_point_storage();
        operator.negate(&g, &mut neg).unwrap();
        assert_eq!(neg.x(), g.x());
        let mut sum = vec![0; 4];
        ecfp_digits::add(neg.y(), g.y(), &mut sum);
        assert_eq!(sum, curve.p());
        assert!(operator.is_on_curve(&neg).unwrap());

        let mut again = curve.allocate_point_storage();
        operator.negate(&neg, &mut again).unwrap();
        assert_eq!(again, g);

        let infinity = curve.create_point_at_infinity();
        operator.negate(&infinity, &mut again).unwrap();
        assert!(again.is_infinity());
    }

    #[test]
    fn test_negate_keeps_zero_y() {
        let (curve, operator) = setup(NamedCurve::P256);
        let point =
            CurvePoint::new_affine(&curve, curve.generator_x().to_vec(), vec![0; 4]).unwrap();
        let mut neg = curve.allocate_point_storage();
        operator.negate(&point, &mut neg).unwrap();
        assert_eq!(neg.y(), &[0, 0, 0, 0]);
    }

    #[test]
    fn test_foreign_curve_rejected() {
        let (_, operator) = setup(NamedCurve::P256);
        let other = NamedCurve::P384.descriptor().unwrap();
        let mut g = other.generator();
        assert_eq!(operator.is_on_curve(&g), Err(CurveError::CurveMismatch));
        assert_eq!(
            operator.convert_to_montgomery_form(&mut g),
            Err(CurveError::CurveMismatch)
        );
        let mut out = other.allocate_point_storage();
        assert_eq!(operator.negate(&g, &mut out), Err(CurveError::CurveMismatch));
        assert_eq!(g, other.generator());
    }
}
