use core::cmp::Ordering;

use ecfp_digits::{bit_length, compare, is_zero, Digit, DIGIT_BITS};
use rand::Rng;

use crate::CurveDescriptor;

/// Helper trait for sampling scalars of a curve group.
pub trait RandomScalar {
    /// A scalar drawn uniformly from `[1, order)`.
    fn random_scalar<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Digit>;
}

impl RandomScalar for CurveDescriptor {
    fn random_scalar<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Digit> {
        let order = self.order();
        let bits = bit_length(order);
        loop {
            let mut k: Vec<Digit> = (0..order.len()).map(|_| rng.random::<Digit>()).collect();
            for (i, digit) in k.iter_mut().enumerate() {
                let low = i * DIGIT_BITS;
                if low >= bits {
                    *digit = 0;
                } else if bits - low < DIGIT_BITS {
                    *digit &= (1 << (bits - low)) - 1;
                }
            }
            if !is_zero(&k) && compare(&k, order) == Ordering::Less {
                return k;
            }
        }
    }
}
