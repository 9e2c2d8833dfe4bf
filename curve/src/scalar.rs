use core::cmp::Ordering;

use ecfp_digits::{compare, compute_naf, is_zero, Digit};

use crate::operator::CurveOperator;
use crate::point::{CoordinateSystem, CurvePoint, Domain};
use crate::CurveError;

impl CurveOperator {
    /// `out = k * point`, as a Jacobian Montgomery-form point.
    ///
    /// `point` must be affine and in Montgomery form unless it is the point
    /// at infinity. For a finite point `k` must be below the group order;
    /// `k = 0` or an infinite point yields infinity. Uses a width-`w` NAF
    /// of `k` over a table of odd multiples, folding each nonzero digit into
    /// the preceding doubling.
    pub fn scalar_multiply(
        &mut self,
        k: &[Digit],
        point: &CurvePoint,
        out: &mut CurvePoint,
    ) -> Result<(), CurveError> {
        if point.infinity {
            self.check_curve(point)?;
        } else {
            self.check(point, "scalar_multiply", CoordinateSystem::Affine, Domain::Montgomery)?;
            if compare(k, self.curve.order()) != Ordering::Less {
                return Err(CurveError::ScalarOutOfRange);
            }
        }
        *out = self.jacobian_infinity();
        if point.infinity || is_zero(k) {
            return Ok(());
        }

        let w = self.window_width();
        let naf = compute_naf(k, w)?;
        let table = self.generate_precomputation_table(w, point)?;
        let mut negated = self.curve.allocate_point_storage();

        for &digit in naf.iter().rev() {
            match digit.cmp(&0) {
                Ordering::Equal => self.double_assign(out)?,
                Ordering::Greater => {
                    self.mixed_double_add_assign(out, &table[(digit >> 1) as usize])?
                }
                Ordering::Less => {
                    self.negate(&table[(-digit >> 1) as usize], &mut negated)?;
                    self.mixed_double_add_assign(out, &negated)?;
                }
            }
        }
        Ok(())
    }
}
