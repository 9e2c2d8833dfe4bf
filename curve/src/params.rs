//! Serializable curve parameters for loading custom curves from configuration.

use std::sync::Arc;

use ecfp_digits::{from_be_bytes, to_be_bytes, Digit, DIGIT_BITS};
use serde::{Deserialize, Serialize};

use crate::{CurveDescriptor, CurveError};

/// Curve parameters as big-endian hex strings (an optional `0x` prefix is
/// allowed). The field width is taken from the byte length of `p`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveParams {
    #[serde(default)]
    pub name: Option<String>,
    pub p: String,
    pub a: String,
    pub b: String,
    pub order: String,
    pub generator_x: String,
    pub generator_y: String,
}

impl CurveParams {
    pub fn from_descriptor(curve: &CurveDescriptor) -> Self {
        Self {
            name: curve.name().map(str::to_string),
            p: hex::encode(to_be_bytes(curve.p())),
            a: hex::encode(to_be_bytes(curve.a())),
            b: hex::encode(to_be_bytes(curve.b())),
            order: hex::encode(to_be_bytes(curve.order())),
            generator_x: hex::encode(to_be_bytes(curve.generator_x())),
            generator_y: hex::encode(to_be_bytes(curve.generator_y())),
        }
    }
}

fn parse_hex(value: &str, width: usize) -> Result<Vec<Digit>, CurveError> {
    let bytes = hex::decode(value.strip_prefix("0x").unwrap_or(value))?;
    Ok(from_be_bytes(&bytes, width)?)
}

impl CurveDescriptor {
    pub fn from_params(params: &CurveParams) -> Result<Arc<Self>, CurveError> {
        let p_bytes = hex::decode(params.p.strip_prefix("0x").unwrap_or(&params.p))?;
        let significant = p_bytes.iter().skip_while(|&&b| b == 0).count();
        let width = significant.div_ceil(DIGIT_BITS / 8);

        let curve = CurveDescriptor::new(
            from_be_bytes(&p_bytes, width)?,
            parse_hex(&params.a, width)?,
            parse_hex(&params.b, width)?,
            parse_hex(&params.order, width)?,
            parse_hex(&params.generator_x, width)?,
            parse_hex(&params.generator_y, width)?,
        )?;
        Ok(Arc::new(match &params.name {
            Some(name) => curve.with_name(name.as_str()),
            None => curve,
        }))
    }
}
