//! Short Weierstrass curve parameters `y^2 = x^3 + ax + b` over a prime field.

use core::cmp::Ordering;
use std::sync::Arc;

use ecfp_digits::{compare, from_u64, is_even, is_zero, sub, to_be_bytes, Digit, DigitsError};
use log::debug;

use crate::point::{CoordinateSystem, CurvePoint, Domain};
use crate::CurveError;

/// Shape of the `a` coefficient, which selects the doubling formula.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CoefficientKind {
    /// `a = p - 3`, as on the NIST curves.
    MinusThree,
    /// `a = 0`, as on BN254.
    Zero,
}

/// Immutable description of a prime-field curve.
///
/// All parameters are stored in standard form with the width of `p`.
/// Descriptors are shared behind an [`Arc`]; every point holds one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurveDescriptor {
    name: Option<String>,
    p: Vec<Digit>,
    a: Vec<Digit>,
    b: Vec<Digit>,
    order: Vec<Digit>,
    generator_x: Vec<Digit>,
    generator_y: Vec<Digit>,
    kind: CoefficientKind,
    byte_len: usize,
}

impl CurveDescriptor {
    /// Validates and assembles a curve from its parameters.
    ///
    /// Fails when `p` is empty or even, when a parameter is wider or narrower
    /// than `p`, or when `a` is neither `0` nor `p - 3`.
    pub fn new(
        p: Vec<Digit>,
        a: Vec<Digit>,
        b: Vec<Digit>,
        order: Vec<Digit>,
        generator_x: Vec<Digit>,
        generator_y: Vec<Digit>,
    ) -> Result<Self, CurveError> {
        let width = p.len();
        if width == 0 {
            return Err(DigitsError::WidthOutOfRange(0).into());
        }
        if is_even(&p) {
            return Err(DigitsError::EvenModulus.into());
        }
        for (parameter, value) in [
            ("a", &a),
            ("b", &b),
            ("order", &order),
            ("generator_x", &generator_x),
            ("generator_y", &generator_y),
        ] {
            if value.len() != width {
                return Err(CurveError::ParameterWidth {
                    parameter,
                    expected: width,
                    actual: value.len(),
                });
            }
        }

        let kind = if is_zero(&a) {
            CoefficientKind::Zero
        } else {
            let mut minus_three = vec![0; width];
            let borrow = sub(&p, &from_u64(3, width), &mut minus_three);
            if borrow != 0 || compare(&a, &minus_three) != Ordering::Equal {
                return Err(CurveError::UnsupportedCoefficient);
            }
            CoefficientKind::MinusThree
        };

        let byte_len = to_be_bytes(&p).len();
        debug!("curve descriptor: {} digit field, {:?} coefficient", width, kind);
        Ok(Self {
            name: None,
            p,
            a,
            b,
            order,
            generator_x,
            generator_y,
            kind,
            byte_len,
        })
    }

    /// Builds a curve with `a = p - 3`.
    pub fn with_a_minus_three(
        p: Vec<Digit>,
        b: Vec<Digit>,
        order: Vec<Digit>,
        generator_x: Vec<Digit>,
        generator_y: Vec<Digit>,
    ) -> Result<Self, CurveError> {
        let mut a = vec![0; p.len()];
        if sub(&p, &from_u64(3, p.len()), &mut a) != 0 {
            return Err(CurveError::UnsupportedCoefficient);
        }
        Self::new(p, a, b, order, generator_x, generator_y)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn p(&self) -> &[Digit] {
        &self.p
    }

    pub fn a(&self) -> &[Digit] {
        &self.a
    }

    pub fn b(&self) -> &[Digit] {
        &self.b
    }

    pub fn order(&self) -> &[Digit] {
        &self.order
    }

    pub fn generator_x(&self) -> &[Digit] {
        &self.generator_x
    }

    pub fn generator_y(&self) -> &[Digit] {
        &self.generator_y
    }

    pub fn kind(&self) -> CoefficientKind {
        self.kind
    }

    /// Number of digits in every field element.
    pub fn width(&self) -> usize {
        self.p.len()
    }

    /// Length of `p` in bytes, and of each coordinate in the SEC1 encoding.
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    /// The base point as an affine, standard-form point.
    pub fn generator(self: &Arc<Self>) -> CurvePoint {
        CurvePoint {
            curve: Arc::clone(self),
            coordinates: crate::Coordinates::Affine {
                x: self.generator_x.clone(),
                y: self.generator_y.clone(),
            },
            domain: Domain::Standard,
            infinity: false,
        }
    }

    /// The identity, as an affine standard-form point flagged as infinity.
    pub fn create_point_at_infinity(self: &Arc<Self>) -> CurvePoint {
        CurvePoint::zeroed(self, CoordinateSystem::Affine, Domain::Standard, true)
    }

    /// Zeroed finite affine point to be overwritten by an operation.
    pub fn allocate_point_storage(self: &Arc<Self>) -> CurvePoint {
        CurvePoint::zeroed(self, CoordinateSystem::Affine, Domain::Standard, false)
    }

    /// Decodes a SEC1 point on this curve.
    pub fn decode_point(self: &Arc<Self>, encoded: &[u8]) -> Result<CurvePoint, CurveError> {
        crate::encoding::decode_point(encoded, self)
    }

    /// Both handles refer to the same curve, by identity or by value.
    pub(crate) fn same_curve(a: &Arc<Self>, b: &Arc<Self>) -> bool {
        Arc::ptr_eq(a, b) || a == b
    }
}
