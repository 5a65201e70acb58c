// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Render an importance field as a jet-colormap image, for eyeballing
//! where the attention actually landed before committing to a warp.

use crate::cq;
use crate::field::ImportanceField;
use crate::warper::clampf;
use image::{ImageBuffer, Rgba, RgbaImage};
use itertools::iproduct;

// The classic jet gradient, blue through red, on a [0, 1] input.
fn jet(v: f64) -> [u8; 3] {
    let four_v = 4.0 * v;
    let channel = |a: f64, b: f64| (clampf(a.min(b), 0.0, 1.0) * 255.0).round() as u8;
    [
        channel(four_v - 1.5, -four_v + 4.5),
        channel(four_v - 0.5, -four_v + 3.5),
        channel(four_v + 0.5, -four_v + 2.5),
    ]
}

/// Render the field against its baseline.  Cells at the baseline come
/// out cold and nearly transparent; the gradient saturates at either
/// four times the baseline or the hottest cell, whichever is larger,
/// so a single heavy stroke does not wash out the rest of the map.
pub fn render_heatmap(field: &ImportanceField, baseline: f64) -> RgbaImage {
    let (width, height) = (field.width, field.height);
    let mut hottest = 0.0f64;
    for &w in field.cells() {
        let p = baseline + w;
        if p > hottest {
            hottest = p;
        }
    }
    let hot_ref = (4.0 * baseline).max(hottest);
    let denom = cq!(hot_ref - baseline > 0.0, hot_ref - baseline, 1e-6);

    let mut out = ImageBuffer::new(width, height);
    for (y, x) in iproduct!(0..height, 0..width) {
        let v = clampf(field[(x, y)] / denom, 0.0, 1.0);
        let [r, g, b] = jet(v);
        let a = 60 + (v * 150.0).round() as u8;
        out.put_pixel(x, y, Rgba { data: [r, g, b, a] });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hottest_cell_saturates_the_gradient() {
        let field = ImportanceField::from_raw(2, 1, vec![0.0, 1000.0]).unwrap();
        let map = render_heatmap(&field, 250.0);
        // Cold end of jet is half-blue and nearly transparent.
        assert_eq!(map.get_pixel(0, 0).data, [0, 0, 128, 60]);
        // Hot end is half-red and mostly opaque.
        assert_eq!(map.get_pixel(1, 0).data, [128, 0, 0, 210]);
    }

    #[test]
    fn empty_field_with_zero_baseline_stays_finite() {
        let field = ImportanceField::new(3, 3);
        let map = render_heatmap(&field, 0.0);
        for pixel in map.pixels() {
            assert_eq!(pixel.data, [0, 0, 128, 60]);
        }
    }
}
