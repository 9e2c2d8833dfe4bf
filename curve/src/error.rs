use ecfp_digits::DigitsError;
use thiserror::Error;

use crate::point::{CoordinateSystem, Domain};

/// Errors raised by curve construction, point arithmetic and encoding.
///
/// Precondition violations (wrong coordinate system, wrong domain, foreign
/// curve) are reported before any operand is touched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    #[error(transparent)]
    Digits(#[from] DigitsError),

    /// A curve parameter does not have the width of the field prime.
    #[error("curve parameter `{parameter}` has {actual} digits, the field needs {expected}")]
    ParameterWidth {
        parameter: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Only curves with `a = 0` or `a = p - 3` have doubling formulas.
    #[error("coefficient a must be 0 or p - 3")]
    UnsupportedCoefficient,

    #[error("{operation} requires a point in {expected} coordinates")]
    WrongCoordinates {
        operation: &'static str,
        expected: CoordinateSystem,
    },

    #[error("{operation} requires a point in {expected} form")]
    WrongDomain {
        operation: &'static str,
        expected: Domain,
    },

    #[error("point is already in {0} coordinates")]
    AlreadyInCoordinates(CoordinateSystem),

    #[error("point is already in {0} form")]
    AlreadyInDomain(Domain),

    #[error("{0} does not accept the point at infinity")]
    InfinityNotAllowed(&'static str),

    /// An operand was created for a different curve than the operator's.
    #[error("points belong to different curves")]
    CurveMismatch,

    #[error("scalar must be smaller than the group order")]
    ScalarOutOfRange,

    #[error("precomputation window must be at least 4, got {0}")]
    WindowTooSmall(u32),

    #[error("encoded point is empty")]
    EmptyEncoding,

    /// Anything other than the `0x00` infinity byte or an uncompressed
    /// `0x04 || X || Y` string of the right length.
    #[error("unsupported point encoding (tag {tag:#04x}, {length} bytes)")]
    UnsupportedEncoding { tag: u8, length: usize },

    #[error("coordinate is {actual} bytes long, the field allows {expected}")]
    CoordinateTooLong { expected: usize, actual: usize },

    #[error("coordinate is not reduced modulo p")]
    CoordinateOutOfRange,

    #[error("point does not satisfy the curve equation")]
    NotOnCurve,

    #[error("square roots are only implemented for p = 3 mod 4")]
    UnsupportedSquareRoot,

    #[error("got {bases} bases but {scalars} scalars")]
    LengthMismatch { bases: usize, scalars: usize },

    #[error("no curve point found after {0} candidates")]
    DerivationExhausted(u32),

    #[error("invalid base64 curve data: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid hex curve parameter: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("embedded curve data holds {actual} bytes, expected {expected}")]
    CurveDataLength { expected: usize, actual: usize },

    #[error("unknown curve `{0}`")]
    UnknownCurve(String),

    /// A postcondition of the arithmetic failed. Indicates a bug or inputs
    /// outside a formula's domain.
    #[error("internal consistency check failed: {0}")]
    Internal(&'static str),
}
