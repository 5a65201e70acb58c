// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! One-dimensional marginal distributions and their inverses.
//!
//! The separable warp never works with the full two-dimensional
//! distribution directly: it collapses it onto each axis, builds a
//! cumulative distribution per axis, and then walks the CDF backwards
//! to find out which source strip each output strip should sample.
//! All of the floating-point sharp edges live here, so this module is
//! paranoid about drift: the tail of every CDF is pinned to exactly
//! 1.0, and flat runs never divide by near-zero.

use crate::cq;

/// Below this, a CDF segment is considered flat and the inverse
/// lookup snaps to the segment's start instead of interpolating.
pub const FLAT_RUN_EPSILON: f64 = 1e-8;

/// A monotonic, non-decreasing cumulative distribution over one axis,
/// with its last element pinned to exactly 1.0.
#[derive(Debug, Clone)]
pub struct MarginalCdf {
    cdf: Vec<f64>,
}

impl MarginalCdf {
    /// Accumulate a PMF into a CDF.  The PMF is renormalized
    /// defensively against drift; an axis with no mass at all falls
    /// back to the uniform ramp, which degrades the inversion to an
    /// identity mapping.
    pub fn from_pmf(pmf: &[f64]) -> Self {
        let mut cdf = Vec::with_capacity(pmf.len());
        let mut running = 0.0;
        for &p in pmf {
            running += p.max(0.0);
            cdf.push(running);
        }
        if running > FLAT_RUN_EPSILON {
            for c in cdf.iter_mut() {
                *c /= running;
            }
        } else {
            let n = cdf.len() as f64;
            for (k, c) in cdf.iter_mut().enumerate() {
                *c = (k as f64 + 1.0) / n;
            }
        }
        // Pin the tail: the binary search relies on the last element
        // being a true upper bound for v = 1.
        if let Some(last) = cdf.last_mut() {
            *last = 1.0;
        }
        MarginalCdf { cdf }
    }

    pub fn len(&self) -> usize {
        self.cdf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cdf.is_empty()
    }

    /// The piecewise-linear inverse lookup.  Given `v` in [0, 1],
    /// find the smallest index whose cumulative mass reaches `v` and
    /// interpolate a fractional position inside that cell.  Returns a
    /// continuous coordinate in [0, len - 1], non-decreasing in `v`.
    pub fn invert(&self, v: f64) -> f64 {
        if self.cdf.is_empty() {
            return 0.0;
        }
        let mut lo = 0;
        let mut hi = self.cdf.len() - 1;
        while lo < hi {
            let mid = (lo + hi) / 2;
            if v > self.cdf[mid] {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        if lo == 0 {
            return 0.0;
        }
        let prev = self.cdf[lo - 1];
        let cur = self.cdf[lo];
        let f = cq!(
            cur - prev > FLAT_RUN_EPSILON,
            (v - prev) / (cur - prev),
            0.0
        );
        (lo - 1) as f64 + f
    }
}
