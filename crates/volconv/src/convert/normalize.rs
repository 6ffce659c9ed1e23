//! Min-max normalization of sampled volumes.
use tracing::info;

use crate::error::{Error, Result};
use crate::volume::SampleVolume;

/// Smallest and largest sample of a volume.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    /// Width of the range. Computed in `f64`, so it stays finite for any finite bounds.
    pub fn span(&self) -> f64 {
        self.max as f64 - self.min as f64
    }

    /// `true` when every sample has the same value.
    pub fn is_degenerate(&self) -> bool {
        self.max == self.min
    }
}

/// Computes the value range of `values`, ignoring NaN. `None` if nothing is left.
pub fn value_range(values: &[f32]) -> Option<ValueRange> {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| match acc {
            None => Some(ValueRange { min: v, max: v }),
            Some(r) => Some(ValueRange {
                min: r.min.min(v),
                max: r.max.max(v),
            }),
        })
}

/// Rescales `volume` in place so its smallest sample becomes `0.0` and its largest `1.0`.
///
/// A constant volume is rejected with [`Error::DegenerateRange`] and left untouched.
pub fn normalize(volume: &mut SampleVolume) -> Result<ValueRange> {
    let Some(range) = value_range(&volume.values) else {
        return Err(Error::InvalidVolume(
            "cannot normalize a volume without samples".into(),
        ));
    };
    if range.is_degenerate() {
        return Err(Error::DegenerateRange { value: range.min });
    }

    info!("Normalising grid with min={} max={}", range.min, range.max);

    let min = range.min as f64;
    let span = range.span();
    for v in volume.values.iter_mut() {
        *v = ((*v as f64 - min) / span) as f32;
    }
    Ok(range)
}

/// Optional normalization pass. Returns the range used, or `None` when disabled.
pub fn apply_normalization(volume: &mut SampleVolume, enabled: bool) -> Result<Option<ValueRange>> {
    if !enabled {
        return Ok(None);
    }
    normalize(volume).map(Some)
}
