// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turn accumulated attention into a probability distribution.
//!
//! Every cell starts at a uniform baseline mass and gains whatever
//! weight the brush deposited on it.  The boost transform reshapes
//! the *ratio* of deposited weight to baseline, which is what lets a
//! caller decide how strongly hot regions should dominate: squaring
//! the ratio sharpens the contrast, the square root softens it.

use crate::cq;
use crate::error::WarpError;
use crate::field::{ImportanceField, ProbabilityField};

/// How the baseline-relative attention ratio is reshaped before the
/// field is normalized.  A closed set: a new curve means a new
/// variant, not a new magic string.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TransformMode {
    /// The ratio as-is.
    Identity,
    /// Ratio squared: hot regions dominate harder.
    Square,
    /// Ratio cubed: hotter still.
    Cube,
    /// Square root of the ratio: a gentler gradient.
    Sqrt,
}

impl TransformMode {
    fn boost(self, ratio: f64) -> f64 {
        match self {
            TransformMode::Identity => ratio,
            TransformMode::Square => ratio * ratio,
            TransformMode::Cube => ratio * ratio * ratio,
            // The ratio is non-negative when the weights honor their
            // contract, but a hostile field must not poison the whole
            // sum with a NaN.
            TransformMode::Sqrt => cq!(ratio < 0.0, 0.0, ratio.sqrt()),
        }
    }
}

/// Build a normalized probability field from accumulated attention.
///
/// Each cell's mass is `baseline * (1 + boost(weight / baseline))`,
/// which reduces to `baseline + weight` under the identity transform.
/// With a zero baseline there is no reference mass to express the
/// boost against, so the raw weights are normalized directly.  The
/// result always sums to one: a field with no mass at all degrades to
/// the uniform distribution instead of dividing by zero.
pub fn build_density(
    importance: &ImportanceField,
    baseline: f64,
    transform: TransformMode,
) -> Result<ProbabilityField, WarpError> {
    if baseline < 0.0 {
        return Err(WarpError::InvalidBaseline(baseline));
    }

    let mut mass = Vec::with_capacity(importance.cells().len());
    for &weight in importance.cells() {
        let m = if baseline > 0.0 {
            let ratio = weight / baseline;
            baseline * (1.0 + transform.boost(ratio))
        } else {
            weight
        };
        // Negative or non-finite cells would corrupt the CDFs
        // downstream; clamp them out here.
        mass.push(cq!(m.is_finite() && m > 0.0, m, 0.0));
    }

    Ok(ProbabilityField::from_mass(
        importance.width,
        importance.height,
        mass,
    ))
}
