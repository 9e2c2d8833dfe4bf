//! Conversions between digit sequences, big-endian bytes, decimal literals
//! and [`BigUint`].

use num_bigint::BigUint;

use crate::{Digit, DigitsError};

/// Reads a big-endian byte string into `width` digits.
///
/// Leading zero bytes are ignored, so a 66-byte P-521 coordinate fits into
/// nine digits.
pub fn from_be_bytes(bytes: &[u8], width: usize) -> Result<Vec<Digit>, DigitsError> {
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    let significant = &bytes[start..];
    let needed = significant.len().div_ceil(8);
    if needed > width {
        return Err(DigitsError::TooWide { needed, width });
    }

    let mut digits = vec![0; width];
    for (digit, chunk) in digits.iter_mut().zip(significant.rchunks(8)) {
        let mut buf = [0u8; 8];
        buf[8 - chunk.len()..].copy_from_slice(chunk);
        *digit = Digit::from_be_bytes(buf);
    }
    Ok(digits)
}

/// Minimal big-endian encoding of `digits`. Zero encodes as a single `0x00`.
pub fn to_be_bytes(digits: &[Digit]) -> Vec<u8> {
    let mut bytes: Vec<u8> = digits.iter().rev().flat_map(|d| d.to_be_bytes()).collect();
    let leading = bytes.iter().take_while(|&&b| b == 0).count();
    bytes.drain(..leading.min(bytes.len().saturating_sub(1)));
    bytes
}

pub fn to_biguint(digits: &[Digit]) -> BigUint {
    let bytes: Vec<u8> = digits.iter().flat_map(|d| d.to_le_bytes()).collect();
    BigUint::from_bytes_le(&bytes)
}

pub fn from_biguint(value: &BigUint, width: usize) -> Result<Vec<Digit>, DigitsError> {
    let mut digits = value.to_u64_digits();
    if digits.len() > width {
        return Err(DigitsError::TooWide {
            needed: digits.len(),
            width,
        });
    }
    digits.resize(width, 0);
    Ok(digits)
}

/// Parses an unsigned decimal literal into `width` digits.
pub fn from_decimal(literal: &str, width: usize) -> Result<Vec<Digit>, DigitsError> {
    let value = BigUint::parse_bytes(literal.as_bytes(), 10).ok_or(DigitsError::InvalidDecimal)?;
    from_biguint(&value, width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_be_bytes_layout() {
        let digits = from_be_bytes(&[0x01, 0, 0, 0, 0, 0, 0, 0, 0x02], 2).unwrap();
        assert_eq!(digits, vec![2, 1]);
        assert_eq!(to_be_bytes(&digits), vec![0x01, 0, 0, 0, 0, 0, 0, 0, 0x02]);
    }

    #[test]
    fn test_be_bytes_ignores_leading_zeros() {
        let mut bytes = vec![0u8; 66];
        bytes[65] = 7;
        assert_eq!(from_be_bytes(&bytes, 9).unwrap(), {
            let mut expected = vec![0; 9];
            expected[0] = 7;
            expected
        });
    }

    #[test]
    fn test_be_bytes_too_wide() {
        let bytes = [0xffu8; 17];
        assert_eq!(
            from_be_bytes(&bytes, 2),
            Err(DigitsError::TooWide { needed: 3, width: 2 })
        );
    }

    #[test]
    fn test_zero_encodes_as_single_byte() {
        assert_eq!(to_be_bytes(&[0, 0, 0]), vec![0]);
    }

    #[test]
    fn test_decimal_parsing() {
        assert_eq!(
            from_decimal("18446744073709551616", 2).unwrap(),
            vec![0, 1]
        );
        assert_eq!(from_decimal("12x", 2), Err(DigitsError::InvalidDecimal));
    }

    #[test]
    fn test_biguint_conversion() {
        let digits = vec![0xdead_beef, 0x1234, 0];
        let value = to_biguint(&digits);
        assert_eq!(from_biguint(&value, 3).unwrap(), digits);
        assert!(from_biguint(&value, 1).is_err());
    }
}
