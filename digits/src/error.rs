use thiserror::Error;

/// Errors raised by digit-sequence arithmetic.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum DigitsError {
    /// Montgomery arithmetic and the square-root solver need an odd modulus.
    #[error("modulus must be odd")]
    EvenModulus,

    /// Reduction and inversion are undefined for a zero modulus.
    #[error("modulus must not be zero")]
    ZeroModulus,

    /// The modulus is empty or wider than [`crate::MAX_DIGITS`].
    #[error("modulus width of {0} digits is outside 1..=16")]
    WidthOutOfRange(usize),

    /// A value does not fit into the requested number of digits.
    #[error("value needs {needed} digits but only {width} are available")]
    TooWide { needed: usize, width: usize },

    /// The element shares a factor with the modulus.
    #[error("element is not invertible modulo the given modulus")]
    NotInvertible,

    /// A decimal literal contained something other than ASCII digits.
    #[error("invalid decimal literal")]
    InvalidDecimal,

    /// NAF windows must be between 2 and 16 bits wide.
    #[error("NAF window width must be in 2..=16, got {0}")]
    InvalidWindow(u32),
}
