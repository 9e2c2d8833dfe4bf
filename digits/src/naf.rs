use crate::ops::{add_small, is_zero, shift_right, sub_small};
use crate::{Digit, DigitsError};

/// Width-`w` non-adjacent form of `k`, least significant digit first.
///
/// Every nonzero digit is odd with `|d| < 2^(w-1)`, any `w` consecutive
/// digits hold at most one nonzero entry and `sum(d_i * 2^i) == k`. The
/// sequence is at most one digit longer than the bit length of `k`, and the
/// last digit is nonzero unless `k` is zero (in which case it is empty).
pub fn compute_naf(k: &[Digit], w: u32) -> Result<Vec<i32>, DigitsError> {
    if !(2..=16).contains(&w) {
        return Err(DigitsError::InvalidWindow(w));
    }
    let modulus = 1i64 << w;
    let half = 1i64 << (w - 1);
    let mask = (1u64 << w) - 1;

    // One spare digit absorbs the carry from negative digits.
    let mut k = k.to_vec();
    k.push(0);

    let mut naf = Vec::with_capacity(k.len() * crate::DIGIT_BITS);
    while !is_zero(&k) {
        let digit = if k[0] & 1 == 1 {
            let mut d = (k[0] & mask) as i64;
            if d >= half {
                d -= modulus;
            }
            if d > 0 {
                sub_small(&mut k, d as Digit);
            } else {
                add_small(&mut k, d.unsigned_abs());
            }
            d as i32
        } else {
            0
        };
        naf.push(digit);
        shift_right(&mut k, 1);
    }
    Ok(naf)
}
