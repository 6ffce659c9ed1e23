#![forbid(unsafe_code)]
//! volconv: resample sparse scalar grids into dense `.vol` volume files.
//!
//! Modules:
//! - grid: the scalar grid capability trait, index boxes, transforms, sparse and dense grids
//! - container: named grid sources and the in-memory [`container::GridSet`]
//! - convert: bounds resolution, dense sampling, normalization and the batch driver
//! - codec: the binary `.vol` layout and its ASCII twin
//! - archive (feature `ron`): RON files holding named sparse grids
pub mod codec;
pub mod container;
pub mod convert;
pub mod error;
pub mod grid;
pub mod volume;

#[cfg(feature = "ron")]
pub mod archive;

/// Convenient re-exports for common types. Import with `use volconv::prelude::*;`.
pub mod prelude {
    #[cfg(feature = "ron")]
    pub use crate::archive::{GridArchive, GridRecord};
    pub use crate::codec::{
        decode_binary, decode_header, encode, encode_ascii, encode_binary, encode_to_vec,
        read_volume, write_volume, VolumeHeader,
    };
    pub use crate::container::{GridContainer, GridSet};
    pub use crate::convert::{
        apply_normalization, convert_grid, normalize, output_path_for, resolve_bounds,
        sample_dense, sample_grid, value_range, ConversionDriver, ConversionReport, GridOutcome,
        GridSelection, ResolvedBounds, ValueRange,
    };
    pub use crate::error::{Error, Result};
    pub use crate::grid::{DenseGrid, IndexBox, ScalarGrid, SparseGrid, Transform};
    pub use crate::volume::{EncodingOptions, SampleVolume, VolumeFormat};
}
