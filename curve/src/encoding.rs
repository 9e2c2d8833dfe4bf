//! SEC1 point encoding: `0x00` for infinity, `0x04 || X || Y` otherwise.
//!
//! Each coordinate is left-padded to the byte length of `p`. Compressed and
//! hybrid encodings are not supported.

use core::cmp::Ordering;
use std::sync::Arc;

use ecfp_digits::{compare, from_be_bytes, to_be_bytes};

use crate::point::{CoordinateSystem, CurvePoint, Domain};
use crate::{CurveDescriptor, CurveError};

const TAG_INFINITY: u8 = 0x00;
const TAG_UNCOMPRESSED: u8 = 0x04;

/// Encodes an affine, standard-form point.
pub fn encode_point(point: &CurvePoint) -> Result<Vec<u8>, CurveError> {
    if !point.is_affine() {
        return Err(CurveError::WrongCoordinates {
            operation: "encode_point",
            expected: CoordinateSystem::Affine,
        });
    }
    if point.domain() != Domain::Standard {
        return Err(CurveError::WrongDomain {
            operation: "encode_point",
            expected: Domain::Standard,
        });
    }
    if point.is_infinity() {
        return Ok(vec![TAG_INFINITY]);
    }

    let len = point.curve().byte_len();
    let mut out = vec![0u8; 1 + 2 * len];
    out[0] = TAG_UNCOMPRESSED;
    for (slot, coordinate) in out[1..]
        .chunks_exact_mut(len)
        .zip([point.x(), point.y()])
    {
        let bytes = to_be_bytes(coordinate);
        if bytes.len() > len {
            return Err(CurveError::CoordinateTooLong {
                expected: len,
                actual: bytes.len(),
            });
        }
        slot[len - bytes.len()..].copy_from_slice(&bytes);
    }
    Ok(out)
}

/// Decodes a point on `curve` into an affine, standard-form point.
///
/// Coordinates must be reduced modulo `p`. Membership in the curve is not
/// checked; use [`crate::CurveOperator::is_on_curve`] for that.
pub fn decode_point(
    encoded: &[u8],
    curve: &Arc<CurveDescriptor>,
) -> Result<CurvePoint, CurveError> {
    let len = curve.byte_len();
    match encoded {
        [] => Err(CurveError::EmptyEncoding),
        [TAG_INFINITY] => Ok(curve.create_point_at_infinity()),
        [TAG_UNCOMPRESSED, body @ ..] if body.len() == 2 * len => {
            let (x, y) = body.split_at(len);
            let x = from_be_bytes(x, curve.width())?;
            let y = from_be_bytes(y, curve.width())?;
            let p = curve.p();
            if compare(&x, p) != Ordering::Less || compare(&y, p) != Ordering::Less {
                return Err(CurveError::CoordinateOutOfRange);
            }
            CurvePoint::new_affine(curve, x, y)
        }
        [tag, ..] => Err(CurveError::UnsupportedEncoding {
            tag: *tag,
            length: encoded.len(),
        }),
    }
}
