//! Conversion pipeline from a scalar grid to an encoded volume file.
//!
//! The stages run in this order for every grid:
//! - [`bounds`]: resolve the active index box and its world-space extents,
//! - [`sampler`]: resample the box densely, x fastest,
//! - [`normalize`]: optional min-max rescaling to \[0,1\],
//! - [`crate::codec`]: encode and write,
//!
//! with [`driver`] selecting grids from a container and naming the outputs.
pub mod bounds;
pub mod driver;
pub mod normalize;
pub mod sampler;

pub use bounds::{resolve_bounds, ResolvedBounds};
pub use driver::{
    convert_grid, output_path_for, ConversionDriver, ConversionReport, GridOutcome, GridSelection,
};
pub use normalize::{apply_normalization, normalize, value_range, ValueRange};
pub use sampler::{sample_dense, sample_grid};
