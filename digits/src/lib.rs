//! Fixed-width digit sequences for prime-field elliptic-curve arithmetic.
//!
//! Values are little-endian slices of [`Digit`]s. Field elements always have
//! the width of their modulus, and every operation that produces one writes
//! into a caller-owned buffer, so the curve engine can run its formulas over
//! a fixed set of scratch buffers without allocating.
//!
//! The crate provides the plain digit operations, modular add/sub/halve,
//! modular inversion, a [`MontgomeryMultiplier`] and width-`w` NAF recoding.

mod convert;
mod error;
mod modular;
mod montgomery;
mod naf;
mod ops;

pub use convert::{from_be_bytes, from_biguint, from_decimal, to_be_bytes, to_biguint};
pub use error::DigitsError;
pub use modular::{
    mod_add, mod_add_assign, mod_halve, mod_halve_assign, mod_inverse, mod_negate, mod_sub,
    mod_sub_assign, reduce,
};
pub use montgomery::MontgomeryMultiplier;
pub use naf::compute_naf;
pub use ops::{
    add, add_assign, bit_length, compare, from_u64, is_even, is_zero, shift_right, sub,
    sub_assign,
};

/// A single digit of a multi-precision integer.
pub type Digit = u64;

/// Number of bits in a [`Digit`].
pub const DIGIT_BITS: usize = 64;

/// Widest modulus, in digits, the Montgomery multiplier accepts (1024 bits).
pub const MAX_DIGITS: usize = 16;
