//! Odd-multiple tables for windowed scalar multiplication.
//!
//! The table `[P, 3P, 5P, ..., (2^(w-1) - 1)P]` is built with co-Z
//! additions: every entry is kept on one shared `Z`, so a single field
//! inversion at the end normalizes all of them to affine.

use std::sync::Arc;

use ecfp_digits::Digit;
use log::trace;

use crate::operator::CurveOperator;
use crate::point::{CoordinateSystem, Coordinates, CurvePoint, Domain};
use crate::CurveError;

/// Borrows `items[read]` shared and `items[write]` exclusively.
fn split_pair<T>(items: &mut [T], read: usize, write: usize) -> (&T, &mut T) {
    debug_assert_ne!(read, write);
    if read < write {
        let (low, high) = items.split_at_mut(write);
        (&low[read], &mut high[0])
    } else {
        let (low, high) = items.split_at_mut(read);
        (&high[0], &mut low[write])
    }
}

impl CurveOperator {
    /// Returns `2^(w-2)` affine Montgomery-form points where entry `i` is
    /// `(2i + 1) * point`.
    ///
    /// `point` must be finite, affine and in Montgomery form; `w` must be at
    /// least 4.
    pub fn generate_precomputation_table(
        &mut self,
        w: u32,
        point: &CurvePoint,
    ) -> Result<Vec<CurvePoint>, CurveError> {
        if w < 4 {
            return Err(CurveError::WindowTooSmall(w));
        }
        self.check(
            point,
            "generate_precomputation_table",
            CoordinateSystem::Affine,
            Domain::Montgomery,
        )?;
        if point.infinity {
            return Err(CurveError::InfinityNotAllowed("generate_precomputation_table"));
        }

        let size = 1usize << (w - 2);
        let width = self.field.width();
        let mut xs: Vec<Vec<Digit>> = vec![vec![0; width]; size];
        let mut ys: Vec<Vec<Digit>> = vec![vec![0; width]; size];
        let mut d: Vec<Vec<Digit>> = vec![vec![0; width]; size - 2];
        let mut e: Vec<Vec<Digit>> = vec![vec![0; width]; size - 2];
        xs[0].copy_from_slice(point.x());
        ys[0].copy_from_slice(point.y());

        let a_zero = self.uses_a_zero();
        let Self {
            field: f,
            scratch: s,
            montgomery_a,
            ..
        } = self;
        // s.t7 holds the common Z throughout.

        // 2P = (T[1].x, T[1].y) and P = (T[2].x, T[2].y) on Z = y.
        f.square(&xs[0], &mut s.t1);
        f.square(&ys[0], &mut s.t3);
        f.add(&s.t1, &s.t1, &mut s.t2);
        f.add_assign(&mut s.t1, &s.t2);
        if !a_zero {
            f.add_assign(&mut s.t1, montgomery_a);
        }
        f.halve(&s.t1, &mut s.t0);
        s.t1.copy_from_slice(&s.t0);
        {
            let (px, x2) = split_pair(&mut xs, 0, 2);
            f.mul(&s.t3, px, x2);
        }
        f.square(&s.t3, &mut ys[2]);
        s.t7.copy_from_slice(&ys[0]);
        f.square(&s.t1, &mut xs[1]);
        {
            let (x2, x1) = split_pair(&mut xs, 2, 1);
            f.sub_assign(x1, x2);
            f.sub_assign(x1, x2);
        }
        f.sub(&xs[2], &xs[1], &mut s.t2);
        f.mul(&s.t1, &s.t2, &mut s.t0);
        {
            let (y2, y1) = split_pair(&mut ys, 2, 1);
            f.sub(&s.t0, y2, y1);
        }

        // 3P = 2P + P, keeping 2P on the new Z in T[2].
        f.sub(&xs[2], &xs[1], &mut s.t1);
        f.sub(&ys[2], &ys[1], &mut s.t2);
        f.mul_assign(&mut s.t7, &s.t1);
        f.square(&s.t1, &mut d[0]);
        f.square(&s.t2, &mut s.t3);
        {
            let (x1, x2) = split_pair(&mut xs, 1, 2);
            f.mul(&d[0], x1, x2);
        }
        f.sub_assign(&mut s.t3, &xs[2]);
        f.sub_assign(&mut s.t3, &xs[2]);
        f.mul_assign(&mut d[0], &s.t1);
        f.sub(&s.t3, &d[0], &mut xs[1]);
        f.sub(&xs[2], &xs[1], &mut s.t1);
        f.mul(&s.t1, &s.t2, &mut s.t0);
        {
            let (y1, y2) = split_pair(&mut ys, 1, 2);
            f.mul(y1, &d[0], y2);
        }
        {
            let (y2, y1) = split_pair(&mut ys, 2, 1);
            f.sub(&s.t0, y2, y1);
        }

        // T[k] = T[j] + 2P for the remaining odd multiples. T[l] carries 2P
        // forward, and d[i], e[i] record the Z-scaling applied at each step.
        for i in 0..size - 3 {
            let (j, k, l) = (i + 1, i + 2, i + 3);
            f.sub(&xs[j], &xs[k], &mut s.t1);
            f.sub(&ys[j], &ys[k], &mut s.t2);
            f.mul_assign(&mut s.t7, &s.t1);
            f.square(&s.t1, &mut d[i]);
            f.square(&s.t2, &mut s.t3);
            {
                let (xk, xl) = split_pair(&mut xs, k, l);
                f.mul(&d[i], xk, xl);
            }
            f.sub_assign(&mut s.t3, &xs[l]);
            f.sub_assign(&mut s.t3, &xs[l]);
            f.mul(&d[i], &s.t1, &mut e[i]);
            f.sub(&s.t3, &e[i], &mut xs[k]);
            f.sub(&xs[l], &xs[k], &mut s.t0);
            f.mul(&s.t0, &s.t2, &mut s.t1);
            {
                let (yk, yl) = split_pair(&mut ys, k, l);
                f.mul(yk, &e[i], yl);
            }
            {
                let (yl, yk) = split_pair(&mut ys, l, k);
                f.sub(&s.t1, yl, yk);
            }
        }

        let i = size - 3;
        let (j, k) = (i + 1, i + 2);
        f.sub(&xs[j], &xs[k], &mut s.t1);
        f.sub(&ys[j], &ys[k], &mut s.t2);
        f.mul_assign(&mut s.t7, &s.t1);
        f.square(&s.t1, &mut d[i]);
        f.square(&s.t2, &mut s.t3);
        f.mul(&d[i], &s.t1, &mut e[i]);
        f.mul(&d[i], &xs[k], &mut s.t1);
        f.sub_assign(&mut s.t3, &s.t1);
        f.sub_assign(&mut s.t3, &s.t1);
        f.sub(&s.t3, &e[i], &mut xs[k]);
        f.sub(&s.t1, &xs[k], &mut s.t0);
        f.mul(&s.t0, &s.t2, &mut s.t1);
        f.mul(&ys[k], &e[i], &mut s.t3);
        f.sub(&s.t1, &s.t3, &mut ys[k]);

        // One inversion normalizes the last entry; walking d and e backwards
        // recovers the scaling of every earlier one.
        f.invert(&s.t7, &mut s.t6)?;
        f.square(&s.t6, &mut s.t1);
        f.mul(&s.t1, &s.t6, &mut s.t2);
        f.mul_assign(&mut xs[k], &s.t1);
        f.mul_assign(&mut ys[k], &s.t2);
        for i in (0..size - 2).rev() {
            f.mul_assign(&mut s.t1, &d[i]);
            f.mul_assign(&mut s.t2, &e[i]);
            f.mul_assign(&mut xs[i + 1], &s.t1);
            f.mul_assign(&mut ys[i + 1], &s.t2);
        }

        let curve = Arc::clone(&self.curve);
        let table: Vec<CurvePoint> = xs
            .into_iter()
            .zip(ys)
            .map(|(x, y)| CurvePoint {
                curve: Arc::clone(&curve),
                coordinates: Coordinates::Affine { x, y },
                domain: Domain::Montgomery,
                infinity: false,
            })
            .collect();
        if table
            .iter()
            .any(|entry| !entry.is_affine() || entry.domain != Domain::Montgomery)
        {
            return Err(CurveError::Internal(
                "precomputed multiple is not an affine Montgomery-form point",
            ));
        }
        trace!("precomputed {} odd multiples (w = {})", size, w);
        Ok(table)
    }
}
