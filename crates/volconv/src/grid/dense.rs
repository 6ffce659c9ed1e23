//! Dense scalar grid over an index box.
use glam::{DVec3, IVec3};

use super::{trilinear, IndexBox, ScalarGrid, Transform};
use crate::error::{Error, Result};

/// Scalar values stored for every voxel of a box, x fastest, then y, then z.
///
/// Every voxel inside the box counts as active. Lookups outside the box return the
/// background value.
#[derive(Clone, Debug)]
pub struct DenseGrid {
    bounds: IndexBox,
    background: f32,
    transform: Transform,
    data: Vec<f32>,
}

impl DenseGrid {
    /// Wraps existing values. `data.len()` must match the box volume.
    pub fn new(bounds: IndexBox, data: Vec<f32>) -> Result<Self> {
        if data.len() != bounds.volume() {
            return Err(Error::InvalidVolume(format!(
                "dense grid over {} voxels given {} values",
                bounds.volume(),
                data.len()
            )));
        }
        Ok(Self {
            bounds,
            background: 0.0,
            transform: Transform::IDENTITY,
            data,
        })
    }

    /// Fills the box by evaluating `f` at every voxel.
    pub fn from_fn(bounds: IndexBox, f: impl Fn(IVec3) -> f32) -> Self {
        let mut data = Vec::with_capacity(bounds.volume());
        for z in bounds.min.z..bounds.max.z {
            for y in bounds.min.y..bounds.max.y {
                for x in bounds.min.x..bounds.max.x {
                    data.push(f(IVec3::new(x, y, z)));
                }
            }
        }
        Self {
            bounds,
            background: 0.0,
            transform: Transform::IDENTITY,
            data,
        }
    }

    /// Sets the index-to-world transform.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Sets the value read outside the box.
    pub fn with_background(mut self, background: f32) -> Self {
        self.background = background;
        self
    }

    pub fn bounds(&self) -> IndexBox {
        self.bounds
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Value at `cell`, or the background outside the box.
    pub fn get(&self, cell: IVec3) -> f32 {
        if !self.bounds.contains(cell) {
            return self.background;
        }
        let d = self.bounds.dims();
        let l = cell - self.bounds.min;
        let i = l.x as usize + d.x as usize * (l.y as usize + d.y as usize * l.z as usize);
        self.data[i]
    }
}

impl ScalarGrid for DenseGrid {
    fn active_bounding_box(&self) -> IndexBox {
        self.bounds
    }

    fn index_to_world(&self, index: DVec3) -> DVec3 {
        self.transform.index_to_world(index)
    }

    fn sample_trilinear(&self, index: DVec3) -> f32 {
        trilinear(index, |c| self.get(c))
    }
}
