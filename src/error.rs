// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The error taxonomy for the warping pipeline.
//!
//! Only shape problems are errors.  Numeric degeneracies (zero-sum
//! densities, flat CDF runs, one-pixel axes) are recovered internally
//! with documented fallbacks and never surface here.

use failure::Fail;

/// Everything that can go wrong before the math even starts.  All of
/// these are caller mistakes: the pipeline itself never produces a
/// partial result.
#[derive(Debug, Fail, PartialEq)]
pub enum WarpError {
    /// The backing vector for a field does not hold exactly
    /// width x height cells.
    #[fail(
        display = "field holds {} cells, expected {}x{} = {}",
        actual,
        width,
        height,
        expected
    )]
    InvalidDimensions {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// The uniform per-pixel baseline must be non-negative.
    #[fail(display = "baseline must be non-negative, got {}", _0)]
    InvalidBaseline(f64),

    /// The density and the source image must agree on their shape.
    #[fail(
        display = "density is {}x{} but the source image is {}x{}",
        density_width, density_height, image_width, image_height
    )]
    DimensionMismatch {
        density_width: u32,
        density_height: u32,
        image_width: u32,
        image_height: u32,
    },
}
