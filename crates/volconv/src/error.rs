//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! empty grids, degenerate value ranges, unsupported encodings, missing grids or containers, malformed
//! volume files, archive parsing and IO.
use std::path::PathBuf;

use glam::IVec3;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("grid has an empty active bounding box [{min}, {max})")]
    EmptyGrid { min: IVec3, max: IVec3 },

    #[error("cannot normalize a constant-valued volume (every sample is {value})")]
    DegenerateRange { value: f32 },

    #[error("unsupported output format '{0}' (expected 'binary' or 'ascii')")]
    UnsupportedFormat(String),

    #[error("grid '{name}' not found")]
    GridNotFound { name: String },

    #[error("'{}' contains no grids", .path.display())]
    EmptyContainer { path: PathBuf },

    #[error("invalid volume data: {0}")]
    InvalidVolume(String),

    #[error("grid archive error: {0}")]
    Archive(String),

    #[error("failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Attaches the output path to an IO error raised while writing a volume.
    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Write {
            path: path.into(),
            source,
        }
    }
}
