// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Rasterize attention strokes into an importance field.
//!
//! A stamp is a circular Gaussian-falloff splat: sigma tracks the
//! radius, and the splat is cut off hard at the radius so a stamp
//! never touches cells outside its circle.  A stroke is a chain of
//! stamps laid down between two points, with the stroke's strength
//! split evenly across them so a fast drag deposits the same mass as
//! a slow one.

use crate::field::ImportanceField;

/// Deposit one Gaussian splat centered at (cx, cy), in continuous
/// field coordinates.  Out-of-bounds portions are clipped.
pub fn stamp(field: &mut ImportanceField, cx: f64, cy: f64, radius: f64, strength: f64) {
    if radius <= 0.0 || strength <= 0.0 {
        return;
    }
    let two_sigma2 = 2.0 * radius * radius;
    let (width, height) = (i64::from(field.width), i64::from(field.height));
    let reach = radius.ceil() as i64;
    for dy in -reach..=reach {
        let y = (cy + dy as f64).round() as i64;
        if y < 0 || y >= height {
            continue;
        }
        for dx in -reach..=reach {
            let x = (cx + dx as f64).round() as i64;
            if x < 0 || x >= width {
                continue;
            }
            let dist2 = (dx * dx + dy * dy) as f64;
            if dist2 > radius * radius {
                continue;
            }
            let weight = (-dist2 / two_sigma2).exp();
            *field.get_pt_mut(x as u32, y as u32) += strength * weight;
        }
    }
}

/// Lay a chain of stamps from one point to another.  Stamp spacing is
/// a sixty-fourth of the brush diameter, dense enough that the chain
/// reads as a continuous line.
pub fn stroke(
    field: &mut ImportanceField,
    from: (f64, f64),
    to: (f64, f64),
    radius: f64,
    strength: f64,
) {
    let (x0, y0) = from;
    let (x1, y1) = to;
    let (dx, dy) = (x1 - x0, y1 - y0);
    let dist = dx.hypot(dy);
    let spacing = radius / 32.0;
    if dist <= 0.0 || spacing <= 0.0 {
        stamp(field, x1, y1, radius, strength);
        return;
    }
    let total = dist / spacing;
    let steps = total.ceil().max(1.0);
    let per_dot = strength * total / steps;
    for s in 1..=steps as u32 {
        let t = f64::from(s) / steps;
        stamp(field, x0 + t * dx, y0 + t * dy, radius, per_dot);
    }
}
