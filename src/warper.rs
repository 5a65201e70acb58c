// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The separable warp itself.
//!
//! Given a source image and a probability field of the same shape,
//! collapse the field onto each axis, invert the per-axis CDFs to map
//! the uniform output grid back to source coordinates, and bilinearly
//! resample the source at those coordinates.  Output strips near
//! high-probability regions sample the source densely (stretching
//! them); low-probability regions get compressed.  The mapping is
//! monotone per axis, so strip order is preserved and the image never
//! folds over itself.

use crate::cq;
use crate::error::WarpError;
use crate::field::ProbabilityField;
use crate::marginal::MarginalCdf;
use image::{GenericImageView, ImageBuffer, Pixel, Primitive};
use itertools::iproduct;
use num_traits::NumCast;

pub(crate) fn clampf(v: f64, lo: f64, hi: f64) -> f64 {
    cq!(v < lo, lo, cq!(v > hi, hi, v))
}

// Collapse the 2-D distribution onto each axis.  Each marginal sums
// to whatever the field sums to; the CDF constructor renormalizes.
fn marginalize(density: &ProbabilityField) -> (Vec<f64>, Vec<f64>) {
    let (width, height) = (density.width(), density.height());
    let mut pmf_x = vec![0.0; width as usize];
    let mut pmf_y = vec![0.0; height as usize];
    for (y, x) in iproduct!(0..height, 0..width) {
        let p = density[(x, y)];
        pmf_x[x as usize] += p;
        pmf_y[y as usize] += p;
    }
    (pmf_x, pmf_y)
}

// The normalized position of an output strip along its axis, with
// the 0.5 midpoint convention for one-pixel axes.
fn normalized(t: u32, extent: u32) -> f64 {
    cq!(extent <= 1, 0.5, <f64 as From<u32>>::from(t) / <f64 as From<u32>>::from(extent - 1))
}

// The standard four-corner bilinear blend, clamped to the image
// bounds.  Every channel of the result is a convex combination of
// source channels, so it can never leave the source's range.
fn sample_bilinear<I, P, S>(image: &I, xs: f64, ys: f64) -> P
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    let (width, height) = image.dimensions();
    let xs = clampf(xs, 0.0, <f64 as From<u32>>::from(width - 1));
    let ys = clampf(ys, 0.0, <f64 as From<u32>>::from(height - 1));
    let (x0, y0) = (xs.floor() as u32, ys.floor() as u32);
    let x1 = cq!(x0 + 1 > width - 1, width - 1, x0 + 1);
    let y1 = cq!(y0 + 1 > height - 1, height - 1, y0 + 1);
    let (dx, dy) = (xs - <f64 as From<u32>>::from(x0), ys - <f64 as From<u32>>::from(y0));

    let channels = |x: u32, y: u32| -> Vec<f64> {
        image
            .get_pixel(x, y)
            .channels()
            .iter()
            .map(|c| NumCast::from(*c).unwrap())
            .collect()
    };
    let (c00, c10, c01, c11) = (
        channels(x0, y0),
        channels(x1, y0),
        channels(x0, y1),
        channels(x1, y1),
    );

    let mut blended: Vec<S> = Vec::with_capacity(c00.len());
    for k in 0..c00.len() {
        let top = c00[k] * (1.0 - dx) + c10[k] * dx;
        let bottom = c01[k] * (1.0 - dx) + c11[k] * dx;
        let v = top * (1.0 - dy) + bottom * dy;
        blended.push(NumCast::from(v.round()).unwrap());
    }
    *P::from_slice(&blended)
}

fn check_shapes<I, P, S>(image: &I, density: &ProbabilityField) -> Result<(), WarpError>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    let (width, height) = image.dimensions();
    if density.width() != width || density.height() != height {
        return Err(WarpError::DimensionMismatch {
            density_width: density.width(),
            density_height: density.height(),
            image_width: width,
            image_height: height,
        });
    }
    Ok(())
}

/// Warp an image under a probability field of the same shape.
///
/// The output has identical dimensions to the source and is always a
/// freshly allocated buffer.  Degenerate densities (an axis with no
/// mass at all) degrade to the uniform mapping rather than erroring;
/// the only failure mode is a shape disagreement.
pub fn warp<I, P, S>(
    image: &I,
    density: &ProbabilityField,
) -> Result<ImageBuffer<P, Vec<S>>, WarpError>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    check_shapes(image, density)?;
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Ok(ImageBuffer::new(width, height));
    }

    let (pmf_x, pmf_y) = marginalize(density);
    let cdf_x = MarginalCdf::from_pmf(&pmf_x);
    let cdf_y = MarginalCdf::from_pmf(&pmf_y);

    let mut out = ImageBuffer::new(width, height);
    for ty in 0..height {
        let ys = cdf_y.invert(normalized(ty, height));
        for tx in 0..width {
            let xs = cdf_x.invert(normalized(tx, width));
            out.put_pixel(tx, ty, sample_bilinear(image, xs, ys));
        }
    }
    Ok(out)
}

// Every output row is write-disjoint from every other, so the
// resample pass splits into per-thread row bands with no locks: each
// band is a chunks_mut window onto the flat output buffer.
#[cfg(feature = "threaded")]
pub fn warp_threaded<I, P, S>(
    image: &I,
    density: &ProbabilityField,
) -> Result<ImageBuffer<P, Vec<S>>, WarpError>
where
    I: GenericImageView<Pixel = P> + Sync,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + Send + Sync + 'static,
{
    check_shapes(image, density)?;
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Ok(ImageBuffer::new(width, height));
    }

    let (pmf_x, pmf_y) = marginalize(density);
    let cdf_x = MarginalCdf::from_pmf(&pmf_x);
    let cdf_y = MarginalCdf::from_pmf(&pmf_y);

    let samples = image.get_pixel(0, 0).channels().len();
    let row_len = width as usize * samples;
    let mut data = vec![S::zero(); row_len * height as usize];
    let bands = num_cpus::get().max(1);
    let rows_per_band = (height as usize + bands - 1) / bands;

    crossbeam::thread::scope(|scope| {
        for (band, chunk) in data.chunks_mut(row_len * rows_per_band).enumerate() {
            let (cdf_x, cdf_y) = (&cdf_x, &cdf_y);
            scope.spawn(move |_| {
                for (offset, row) in chunk.chunks_mut(row_len).enumerate() {
                    let ty = (band * rows_per_band + offset) as u32;
                    let ys = cdf_y.invert(normalized(ty, height));
                    for tx in 0..width {
                        let xs = cdf_x.invert(normalized(tx, width));
                        let pixel: P = sample_bilinear(image, xs, ys);
                        let o = tx as usize * samples;
                        row[o..o + samples].copy_from_slice(pixel.channels());
                    }
                }
            });
        }
    })
    .unwrap();

    Ok(ImageBuffer::from_raw(width, height, data).unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::density::{build_density, TransformMode};
    use crate::field::ImportanceField;
    use image::{ImageBuffer, Rgba, RgbaImage};

    fn quad() -> RgbaImage {
        let mut image = ImageBuffer::new(2, 2);
        image.put_pixel(0, 0, Rgba { data: [255, 0, 0, 255] });
        image.put_pixel(1, 0, Rgba { data: [0, 255, 0, 255] });
        image.put_pixel(0, 1, Rgba { data: [0, 0, 255, 255] });
        image.put_pixel(1, 1, Rgba { data: [255, 255, 0, 255] });
        image
    }

    #[test]
    fn uniform_density_is_the_exact_identity_on_a_quad() {
        // With two cells per axis, the inverse CDF lands every output
        // pixel exactly on its own source pixel, so the resample must
        // be bit-exact.
        let image = quad();
        let warped = warp(&image, &ProbabilityField::uniform(2, 2)).unwrap();
        assert_eq!(warped.dimensions(), (2, 2));
        for (x, y, pixel) in image.enumerate_pixels() {
            assert_eq!(warped.get_pixel(x, y), pixel);
        }
    }

    #[test]
    fn flat_image_survives_a_concentrated_density() {
        let image: RgbaImage = ImageBuffer::from_pixel(4, 4, Rgba { data: [255, 0, 0, 255] });
        let mut weights = vec![0.0; 16];
        weights[0] = 100.0;
        let importance = ImportanceField::from_raw(4, 4, weights).unwrap();
        let density = build_density(&importance, 1.0, TransformMode::Identity).unwrap();
        let warped = warp(&image, &density).unwrap();
        assert_eq!(warped.dimensions(), (4, 4));
        // Every output pixel is a convex combination of identical
        // pixels; no channel may drift.
        for pixel in warped.pixels() {
            assert_eq!(pixel.data, [255, 0, 0, 255]);
        }
    }

    #[test]
    fn concentrated_density_stretches_the_origin() {
        let mut weights = vec![0.0; 16];
        weights[0] = 100.0;
        let importance = ImportanceField::from_raw(4, 4, weights).unwrap();
        let density = build_density(&importance, 1.0, TransformMode::Identity).unwrap();

        let (pmf_x, _) = marginalize(&density);
        let cdf_x = MarginalCdf::from_pmf(&pmf_x);
        // The origin maps to the origin...
        assert_eq!(cdf_x.invert(0.0), 0.0);
        // ...and a third of the way across the output still samples
        // inside the first source column: the hot corner is
        // stretched.
        assert!(cdf_x.invert(1.0 / 3.0) < 1.0);
    }

    #[test]
    fn output_shape_always_matches_the_source() {
        let image: RgbaImage = ImageBuffer::from_pixel(5, 3, Rgba { data: [9, 9, 9, 255] });
        let weights: Vec<f64> = (0..15).map(<f64 as From<i32>>::from).collect();
        let importance = ImportanceField::from_raw(5, 3, weights).unwrap();
        let density = build_density(&importance, 10.0, TransformMode::Square).unwrap();
        let warped = warp(&image, &density).unwrap();
        assert_eq!(warped.dimensions(), (5, 3));
    }

    #[test]
    fn mismatched_shapes_are_rejected() {
        let image = quad();
        let result = warp(&image, &ProbabilityField::uniform(3, 3));
        assert_eq!(
            result.unwrap_err(),
            WarpError::DimensionMismatch {
                density_width: 3,
                density_height: 3,
                image_width: 2,
                image_height: 2,
            }
        );
    }

    #[test]
    fn one_pixel_wide_axis_uses_the_midpoint() {
        let image: RgbaImage = ImageBuffer::from_pixel(1, 4, Rgba { data: [7, 11, 13, 255] });
        let warped = warp(&image, &ProbabilityField::uniform(1, 4)).unwrap();
        assert_eq!(warped.dimensions(), (1, 4));
        for pixel in warped.pixels() {
            assert_eq!(pixel.data, [7, 11, 13, 255]);
        }
    }

    #[cfg(feature = "threaded")]
    #[test]
    fn threaded_warp_matches_the_single_threaded_one() {
        let image = quad();
        let weights: Vec<f64> = (0..4).map(<f64 as From<i32>>::from).collect();
        let importance = ImportanceField::from_raw(2, 2, weights).unwrap();
        let density = build_density(&importance, 5.0, TransformMode::Cube).unwrap();
        let serial = warp(&image, &density).unwrap();
        let parallel = warp_threaded(&image, &density).unwrap();
        assert_eq!(serial.into_raw(), parallel.into_raw());
    }
}
