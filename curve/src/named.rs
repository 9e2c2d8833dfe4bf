//! Built-in curves: NIST P-256, P-384, P-521 and BN254.
//!
//! The NIST parameters are stored as one base64 string per curve holding
//! five big-endian blocks of `byte_len` bytes each: `p`, `b`, `order`,
//! `generator_x` and `generator_y`. Their `a` coefficient is `p - 3`.

use core::fmt;
use core::str::FromStr;
use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use ecfp_digits::{from_be_bytes, from_decimal, Digit, DIGIT_BITS};
use log::debug;

use crate::{CurveDescriptor, CurveError};

const P256_DATA: &str = "/////wAAAAEAAAAAAAAAAAAAAAD///////////////9axjXYqjqT57PrvVV2mIa8ZR0GsMxTsPY7zjw+J9JgS/////8AAAAA//////////+85vqtpxeehPO5ysL8YyVRaxfR8uEsQkf4vOblY6RA8ncDfYEt6zOg9KE5RdiYwpZP40Li/hp/m47n60p8D54WK84zV2sxXs7LtkBoN79R9Q==";

const P384_DATA: &str = "//////////////////////////////////////////7/////AAAAAAAAAAD/////szEvp+I+5+SYjgVr4/gtGRgdnG7+gUESAxQIj1ATh1rGVjmNii7RnSqFyO3T7Crv////////////////////////////////x2NNgfQ3Ld9YGg2ySLCneuzsGWrMxSlzqofKIr6LBTeOscce8yCtdG4dO2KLp5uYWfdB4IJUKjhVAvJdv1UpbDpUXjhydgq3NhfeSpYmLG9dnpi/kpLcKfj0Hb0omhR86doxE7XwuMAKYLHOHX6BnXpDHXyQ6g5f";

const P521_DATA: &str = "Af//////////////////////////////////////////////////////////////////////////////////////AFGVPrlhjhyaH5KaIaC2hUDuotpyW5mzFfO4tImRjvEJ4VYZOVHsfpN7FlLAvTuxvwc1c9+IPSw08e9FH9RrUD8AAf//////////////////////////////////////////+lGGh4O/L5Zrf8wBSPcJpdA7tcm4iZxHrrtvtx6ROGQJAMaFjga3BATpzZ4+y2YjlbRCnGSBOQU/tSH4KK9ga009uqFLXnfv51ko/h3BJ6L/qN4zSLPBhWpCm/l+fjHC5b1mARg5KWp4mjvABFyKX7QsfRvZmPVESVebRGgXr70XJz5mLJfucple9CZAxVC5AT+tB2E1PHCGonLCQIi+lHaf0WZQ";

const BN254_P: &str =
    "16798108731015832284940804142231733909889187121439069848933715426072753864723";
const BN254_ORDER: &str =
    "16798108731015832284940804142231733909759579603404752749028378864165570215949";

/// Curves known by name.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NamedCurve {
    P256,
    P384,
    P521,
    Bn254,
}

impl NamedCurve {
    pub const ALL: [NamedCurve; 4] = [
        NamedCurve::P256,
        NamedCurve::P384,
        NamedCurve::P521,
        NamedCurve::Bn254,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NamedCurve::P256 => "P-256",
            NamedCurve::P384 => "P-384",
            NamedCurve::P521 => "P-521",
            NamedCurve::Bn254 => "BN254",
        }
    }

    /// Decodes the embedded parameters into a fresh descriptor.
    pub fn descriptor(self) -> Result<Arc<CurveDescriptor>, CurveError> {
        let curve = match self {
            NamedCurve::P256 => unpack_nist(P256_DATA, 32)?,
            NamedCurve::P384 => unpack_nist(P384_DATA, 48)?,
            NamedCurve::P521 => unpack_nist(P521_DATA, 66)?,
            NamedCurve::Bn254 => bn254()?,
        };
        debug!("loaded named curve {}", self);
        Ok(Arc::new(curve.with_name(self.name())))
    }
}

impl fmt::Display for NamedCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NamedCurve {
    type Err = CurveError;

    /// Accepts the canonical names as well as `p256`, `secp256r1` and friends.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "p256" | "secp256r1" | "prime256v1" => Ok(NamedCurve::P256),
            "p384" | "secp384r1" => Ok(NamedCurve::P384),
            "p521" | "secp521r1" => Ok(NamedCurve::P521),
            "bn254" | "bn256" => Ok(NamedCurve::Bn254),
            _ => Err(CurveError::UnknownCurve(s.to_string())),
        }
    }
}

impl CurveDescriptor {
    pub fn p256() -> Result<Arc<Self>, CurveError> {
        NamedCurve::P256.descriptor()
    }

    pub fn p384() -> Result<Arc<Self>, CurveError> {
        NamedCurve::P384.descriptor()
    }

    pub fn p521() -> Result<Arc<Self>, CurveError> {
        NamedCurve::P521.descriptor()
    }

    pub fn bn254() -> Result<Arc<Self>, CurveError> {
        NamedCurve::Bn254.descriptor()
    }
}

fn unpack_nist(data: &str, byte_len: usize) -> Result<CurveDescriptor, CurveError> {
    let bytes = STANDARD.decode(data)?;
    if bytes.len() != 5 * byte_len {
        return Err(CurveError::CurveDataLength {
            expected: 5 * byte_len,
            actual: bytes.len(),
        });
    }
    let width = byte_len.div_ceil(DIGIT_BITS / 8);
    let blocks = bytes
        .chunks_exact(byte_len)
        .map(|block| from_be_bytes(block, width))
        .collect::<Result<Vec<Vec<Digit>>, _>>()?;
    let [p, b, order, gx, gy]: [Vec<Digit>; 5] =
        blocks.try_into().map_err(|_| CurveError::CurveDataLength {
            expected: 5 * byte_len,
            actual: bytes.len(),
        })?;
    CurveDescriptor::with_a_minus_three(p, b, order, gx, gy)
}

/// BN254 with `a = 0`, `b = 2` and generator `(p - 1, 1)`.
fn bn254() -> Result<CurveDescriptor, CurveError> {
    let width = 4;
    let p = from_decimal(BN254_P, width)?;
    let order = from_decimal(BN254_ORDER, width)?;
    let mut gx = p.clone();
    gx[0] -= 1;
    CurveDescriptor::new(
        p,
        vec![0; width],
        ecfp_digits::from_u64(2, width),
        order,
        gx,
        ecfp_digits::from_u64(1, width),
    )
}
