//! Hash-backed sparse scalar grid.
//!
//! Only active voxels are stored; every other index reads as the background value.
use std::collections::HashMap;

use glam::{DVec3, IVec3};

use super::{trilinear, IndexBox, ScalarGrid, Transform};

/// Sparse scalar field storing active voxels in a hash map.
#[derive(Clone, Debug, Default)]
pub struct SparseGrid {
    background: f32,
    transform: Transform,
    voxels: HashMap<IVec3, f32>,
    bounds: IndexBox,
}

impl SparseGrid {
    /// Creates an empty grid with the given background value and the identity transform.
    pub fn new(background: f32) -> Self {
        Self {
            background,
            ..Default::default()
        }
    }

    /// Sets the index-to-world transform.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Value returned for inactive voxels.
    pub fn background(&self) -> f32 {
        self.background
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Number of active voxels.
    pub fn active_voxel_count(&self) -> usize {
        self.voxels.len()
    }

    /// Activates `cell` with `value`, returning the previous value if it was already active.
    pub fn set(&mut self, cell: IVec3, value: f32) -> Option<f32> {
        self.bounds.include(cell);
        self.voxels.insert(cell, value)
    }

    /// Deactivates `cell`. The bounding box is recomputed only when a boundary voxel goes away.
    pub fn remove(&mut self, cell: IVec3) -> Option<f32> {
        let removed = self.voxels.remove(&cell)?;
        let on_boundary = cell.cmpeq(self.bounds.min).any()
            || (cell + IVec3::ONE).cmpeq(self.bounds.max).any();
        if on_boundary {
            self.bounds = self
                .voxels
                .keys()
                .fold(IndexBox::EMPTY, |mut b, &c| {
                    b.include(c);
                    b
                });
        }
        Some(removed)
    }

    /// Value at `cell`, falling back to the background for inactive voxels.
    pub fn get(&self, cell: IVec3) -> f32 {
        self.voxels.get(&cell).copied().unwrap_or(self.background)
    }

    pub fn is_active(&self, cell: IVec3) -> bool {
        self.voxels.contains_key(&cell)
    }

    /// Iterates active voxels in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (IVec3, f32)> + '_ {
        self.voxels.iter().map(|(c, v)| (*c, *v))
    }
}

impl Extend<(IVec3, f32)> for SparseGrid {
    fn extend<T: IntoIterator<Item = (IVec3, f32)>>(&mut self, iter: T) {
        for (cell, value) in iter {
            self.set(cell, value);
        }
    }
}

impl ScalarGrid for SparseGrid {
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
