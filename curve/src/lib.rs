//! Elliptic-curve arithmetic over prime fields.
//!
//! The crate implements short Weierstrass curves `y^2 = x^3 + ax + b` with
//! `a = -3` (NIST P-256, P-384, P-521) or `a = 0` (BN254). A
//! [`CurveOperator`] performs the point arithmetic on Jacobian accumulators
//! and affine addends kept in Montgomery form, including windowed-NAF scalar
//! multiplication over a co-Z precomputed table. [`EcGroup`] wraps the
//! operator behind a group interface on affine standard-form points, and
//! the `encoding` module reads and writes SEC1 uncompressed points.
//!
//! Multi-precision arithmetic lives in the `ecfp-digits` crate.

mod arithmetic;
mod curve;
pub mod encoding;
mod error;
mod field;
mod group;
mod named;
mod operator;
mod params;
mod point;
mod precompute;
mod random;
mod scalar;
mod sqrt;

#[cfg(test)]
mod tests;

pub use curve::{CoefficientKind, CurveDescriptor};
pub use ecfp_digits::Digit;
pub use error::CurveError;
pub use group::{EcGroup, Group, MAX_DERIVATION_ATTEMPTS};
pub use named::NamedCurve;
pub use operator::CurveOperator;
pub use params::CurveParams;
pub use point::{CoordinateSystem, Coordinates, CurvePoint, Domain};
pub use random::RandomScalar;
pub use sqrt::ModularSquareRootSolver;
