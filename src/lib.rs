// #![deny(missing_docs)]

extern crate image;

mod ternary;

pub mod error;
pub use crate::error::WarpError;

pub mod field;
pub use crate::field::{Field2D, ImportanceField, ProbabilityField};

pub mod density;
pub use crate::density::{build_density, TransformMode};

pub mod marginal;
pub use crate::marginal::MarginalCdf;

pub mod warper;
pub use crate::warper::warp;
#[cfg(feature = "threaded")]
pub use crate::warper::warp_threaded;

pub mod brush;
pub use crate::brush::{stamp, stroke};

pub mod heatmap;
pub use crate::heatmap::render_heatmap;
