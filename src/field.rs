// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Two-dimensional scalar fields.
//!
//! The warping pipeline passes exactly two kinds of field around: the
//! raw accumulated attention (one non-negative weight per pixel) and
//! the normalized probability mass derived from it.  Both live in the
//! same row-major layout as the image they describe.

use crate::cq;
use crate::error::WarpError;
use std::ops::{Index, IndexMut};

/// An addressable two-dimensional field.  The content type must
/// implement the Default trait.  This is the working representation
/// for the attention weights the brush accumulates, and for any other
/// per-pixel scalar the pipeline needs.
#[derive(Debug, Clone)]
pub struct Field2D<P: Default + Copy> {
    pub width: u32,
    pub height: u32,
    cells: Vec<P>,
}

impl<P: Default + Copy> Field2D<P> {
    /// A new field with every cell at the type's default.
    pub fn new(width: u32, height: u32) -> Self {
        Field2D {
            width,
            height,
            cells: vec![P::default(); width as usize * height as usize],
        }
    }

    /// Wrap an existing row-major vector.  The vector must hold
    /// exactly width x height cells.
    pub fn from_raw(width: u32, height: u32, cells: Vec<P>) -> Result<Self, WarpError> {
        let expected = width as usize * height as usize;
        if cells.len() != expected {
            return Err(WarpError::InvalidDimensions {
                width,
                height,
                expected,
                actual: cells.len(),
            });
        }
        Ok(Field2D {
            width,
            height,
            cells,
        })
    }

    // Absolutely, the number one name of this game is keep the index
    // math in a singular location and never, ever mess with it.  This
    // particular variant is the same one used in image.rs.
    fn get_index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    /// Get the value at a single pixel's address
    pub fn get_pt(&self, x: u32, y: u32) -> P {
        self.cells[self.get_index(x, y)]
    }

    /// Get a mutable reference to the value at a single pixel's address
    pub fn get_pt_mut(&mut self, x: u32, y: u32) -> &mut P {
        let index = self.get_index(x, y);
        &mut self.cells[index]
    }

    /// Set a value at a single pixel's address
    pub fn put_pt(&mut self, x: u32, y: u32, e: P) {
        *self.get_pt_mut(x, y) = e
    }

    /// The whole field as a row-major slice.
    pub fn cells(&self) -> &[P] {
        &self.cells
    }
}

impl<P: Default + Copy> Index<(u32, u32)> for Field2D<P> {
    type Output = P;

    /// A convenience addressing mode for getting values.
    fn index(&self, (x, y): (u32, u32)) -> &P {
        let index = self.get_index(x, y);
        &self.cells[index]
    }
}

impl<P: Default + Copy> IndexMut<(u32, u32)> for Field2D<P> {
    /// A convenience addressing mode for setting values.
    fn index_mut(&mut self, (x, y): (u32, u32)) -> &mut P {
        let index = self.get_index(x, y);
        &mut self.cells[index]
    }
}

/// Accumulated per-pixel attention.  The brush writes into this; the
/// density builder reads it.  Weights are non-negative by contract.
pub type ImportanceField = Field2D<f64>;

/// A discrete two-dimensional probability mass function over pixel
/// cells: non-negative, row-major, summing to one.  Construction is
/// restricted so the normalization invariant cannot be broken from
/// outside.
#[derive(Debug, Clone)]
pub struct ProbabilityField {
    width: u32,
    height: u32,
    mass: Vec<f64>,
}

impl ProbabilityField {
    /// The uniform distribution: every cell carries 1/(width*height).
    pub fn uniform(width: u32, height: u32) -> Self {
        let n = width as usize * height as usize;
        let cell = cq!(n == 0, 0.0, 1.0 / n as f64);
        ProbabilityField {
            width,
            height,
            mass: vec![cell; n],
        }
    }

    // Normalize raw non-negative mass in place.  A zero or non-finite
    // total cannot be divided through, so it degrades to the uniform
    // distribution rather than NaN.
    pub(crate) fn from_mass(width: u32, height: u32, mut mass: Vec<f64>) -> Self {
        debug_assert_eq!(mass.len(), width as usize * height as usize);
        let total: f64 = mass.iter().sum();
        if total > 0.0 && total.is_finite() {
            for m in mass.iter_mut() {
                *m /= total;
            }
            ProbabilityField {
                width,
                height,
                mass,
            }
        } else {
            ProbabilityField::uniform(width, height)
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The whole distribution as a row-major slice.
    pub fn cells(&self) -> &[f64] {
        &self.mass
    }
}

impl Index<(u32, u32)> for ProbabilityField {
    type Output = f64;

    fn index(&self, (x, y): (u32, u32)) -> &f64 {
        &self.mass[(y as usize) * (self.width as usize) + (x as usize)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_rejects_wrong_cell_counts() {
        let result = ImportanceField::from_raw(3, 2, vec![0.0; 5]);
        assert_eq!(
            result.unwrap_err(),
            WarpError::InvalidDimensions {
                width: 3,
                height: 2,
                expected: 6,
                actual: 5,
            }
        );
    }

    #[test]
    fn index_math_round_trips() {
        let mut field = ImportanceField::new(4, 3);
        field[(2, 1)] = 7.5;
        field.put_pt(3, 2, 1.25);
        assert_eq!(field.get_pt(2, 1), 7.5);
        assert_eq!(field[(3, 2)], 1.25);
        assert_eq!(field[(0, 0)], 0.0);
    }

    #[test]
    fn uniform_distribution_sums_to_one() {
        let density = ProbabilityField::uniform(5, 4);
        let total: f64 = density.cells().iter().sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert_eq!(density[(4, 3)], 1.0 / 20.0);
    }

    #[test]
    fn zero_mass_degrades_to_uniform() {
        let density = ProbabilityField::from_mass(2, 2, vec![0.0; 4]);
        for &m in density.cells() {
            assert_eq!(m, 0.25);
        }
    }
}
