//! Dense sample volumes and encoding options.
use std::fmt;
use std::str::FromStr;

use glam::{IVec3, Vec3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Densely sampled scalar volume, x fastest, then y, then z.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleVolume {
    /// Sample counts along each axis.
    pub dims: IVec3,
    /// World position of the first sample.
    pub world_min: Vec3,
    /// World position of the last sample.
    pub world_max: Vec3,
    /// `dims.x * dims.y * dims.z` samples.
    pub values: Vec<f32>,
}

impl SampleVolume {
    /// Creates a volume, checking that `values` matches `dims`.
    pub fn new(dims: IVec3, world_min: Vec3, world_max: Vec3, values: Vec<f32>) -> Result<Self> {
        if dims.cmplt(IVec3::ZERO).any() {
            return Err(Error::InvalidVolume(format!("negative dimensions {dims}")));
        }
        let expected = sample_count(dims)
            .ok_or_else(|| Error::InvalidVolume(format!("dimensions {dims} are too large")))?;
        if values.len() != expected {
            return Err(Error::InvalidVolume(format!(
                "dimensions {dims} need {expected} samples, got {}",
                values.len()
            )));
        }
        Ok(Self {
            dims,
            world_min,
            world_max,
            values,
        })
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Position of `(x, y, z)` in [`SampleVolume::values`].
    #[inline]
    pub fn linear_index(&self, x: usize, y: usize, z: usize) -> usize {
        x + self.dims.x as usize * (y + self.dims.y as usize * z)
    }

    /// Sample at `(x, y, z)`, or `None` outside the volume.
    pub fn get(&self, x: usize, y: usize, z: usize) -> Option<f32> {
        let d = self.dims.as_uvec3();
        if x >= d.x as usize || y >= d.y as usize || z >= d.z as usize {
            return None;
        }
        self.values.get(self.linear_index(x, y, z)).copied()
    }
}

/// Product of the dimensions, zero when any axis is non-positive. `None` on overflow.
pub(crate) fn sample_count(dims: IVec3) -> Option<usize> {
    let d = dims.max(IVec3::ZERO);
    (d.x as usize)
        .checked_mul(d.y as usize)?
        .checked_mul(d.z as usize)
}

/// Output encoding.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VolumeFormat {
    /// Comma separated decimal text, no header.
    Ascii,
    /// Little-endian `.vol` layout with a 48 byte header.
    #[default]
    Binary,
}

impl VolumeFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            VolumeFormat::Ascii => "ascii",
            VolumeFormat::Binary => "binary",
        }
    }
}

impl FromStr for VolumeFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ascii" => Ok(VolumeFormat::Ascii),
            "binary" => Ok(VolumeFormat::Binary),
            other => Err(Error::UnsupportedFormat(other.to_owned())),
        }
    }
}

impl fmt::Display for VolumeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a sampled volume is post-processed and written.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EncodingOptions {
    /// Output encoding.
    pub format: VolumeFormat,
    /// Rescale samples to \[0,1\] before writing.
    pub normalize: bool,
}

impl EncodingOptions {
    /// Binary output without normalization.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the output format.
    pub fn with_format(mut self, format: VolumeFormat) -> Self {
        self.format = format;
        self
    }

    /// Enables or disables min-max normalization.
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }
}
