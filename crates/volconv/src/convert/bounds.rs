//! Active bounding box resolution.
use glam::{IVec3, Vec3};
use tracing::debug;

use crate::error::{Error, Result};
use crate::grid::{IndexBox, ScalarGrid};

/// Active index box of a grid together with its world-space extents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedBounds {
    /// Half-open index box of active voxels.
    pub index_box: IndexBox,
    /// World position of the first voxel.
    pub world_min: Vec3,
    /// World position of the last included voxel, `max - (1, 1, 1)`.
    pub world_max: Vec3,
}

impl ResolvedBounds {
    /// Sample counts along each axis.
    pub fn dims(&self) -> IVec3 {
        self.index_box.dims()
    }
}

/// Resolves the active box of `grid`, failing with [`Error::EmptyGrid`] if it has no extent.
pub fn resolve_bounds<G: ScalarGrid + ?Sized>(grid: &G) -> Result<ResolvedBounds> {
    let index_box = grid.active_bounding_box();
    if index_box.is_empty() {
        return Err(Error::EmptyGrid {
            min: index_box.min,
            max: index_box.max,
        });
    }

    let world_min = grid.index_to_world(index_box.min.as_dvec3()).as_vec3();
    let world_max = grid
        .index_to_world((index_box.max - IVec3::ONE).as_dvec3())
        .as_vec3();

    debug!(
        "Resolved bounds [{}, {}) spanning {} to {}",
        index_box.min, index_box.max, world_min, world_max
    );

    Ok(ResolvedBounds {
        index_box,
        world_min,
        world_max,
    })
}
