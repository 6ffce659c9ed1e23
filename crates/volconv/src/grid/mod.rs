//! Scalar grid abstraction consumed by the conversion pipeline.
//!
//! The pipeline never touches a concrete storage engine. Anything that can answer three
//! questions satisfies [`ScalarGrid`]:
//! - which integer box encloses the active voxels ([`ScalarGrid::active_bounding_box`]),
//! - where an index-space point lies in world space ([`ScalarGrid::index_to_world`]),
//! - what the interpolated field value is at an index-space point ([`ScalarGrid::sample_trilinear`]).
//!
//! Two implementations ship with the crate: [`SparseGrid`], which stores only active voxels,
//! and [`DenseGrid`], a plain array over a box that is handy for tests and small inputs.
use glam::{DVec3, IVec3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod dense;
pub mod sparse;

pub use dense::DenseGrid;
pub use sparse::SparseGrid;

/// Capability set the converter needs from a sparse scalar field.
pub trait ScalarGrid {
    /// Box enclosing all active voxels, half-open on the max side.
    fn active_bounding_box(&self) -> IndexBox;

    /// Maps an index-space point to world space.
    fn index_to_world(&self, index: DVec3) -> DVec3;

    /// Samples the field at an index-space point with trilinear interpolation.
    fn sample_trilinear(&self, index: DVec3) -> f32;
}

impl<G: ScalarGrid + ?Sized> ScalarGrid for &G {
    fn active_bounding_box(&self) -> IndexBox {
        (**self).active_bounding_box()
    }

    fn index_to_world(&self, index: DVec3) -> DVec3 {
        (**self).index_to_world(index)
    }

    fn sample_trilinear(&self, index: DVec3) -> f32 {
        (**self).sample_trilinear(index)
    }
}

impl<G: ScalarGrid + ?Sized> ScalarGrid for Box<G> {
    fn active_bounding_box(&self) -> IndexBox {
        (**self).active_bounding_box()
    }

    fn index_to_world(&self, index: DVec3) -> DVec3 {
        (**self).index_to_world(index)
    }

    fn sample_trilinear(&self, index: DVec3) -> f32 {
        (**self).sample_trilinear(index)
    }
}

/// Axis-aligned box in index space. `min` is inclusive, `max` is exclusive.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IndexBox {
    pub min: IVec3,
    pub max: IVec3,
}

impl IndexBox {
    /// Box of zero size at the origin.
    pub const EMPTY: IndexBox = IndexBox {
        min: IVec3::ZERO,
        max: IVec3::ZERO,
    };

    pub fn new(min: IVec3, max: IVec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing the single voxel at `cell`.
    pub fn single(cell: IVec3) -> Self {
        Self {
            min: cell,
            max: cell + IVec3::ONE,
        }
    }

    /// Extent along each axis, clamped at zero.
    pub fn dims(&self) -> IVec3 {
        (self.max - self.min).max(IVec3::ZERO)
    }

    /// `true` when any axis has no extent.
    pub fn is_empty(&self) -> bool {
        self.min.cmpge(self.max).any()
    }

    /// Number of voxels covered by the box.
    pub fn volume(&self) -> usize {
        let d = self.dims();
        d.x as usize * d.y as usize * d.z as usize
    }

    pub fn contains(&self, cell: IVec3) -> bool {
        cell.cmpge(self.min).all() && cell.cmplt(self.max).all()
    }

    /// Grows the box so it also covers `cell`. An empty box becomes the single-voxel box.
    pub fn include(&mut self, cell: IVec3) {
        if self.is_empty() {
            *self = Self::single(cell);
        } else {
            self.min = self.min.min(cell);
            self.max = self.max.max(cell + IVec3::ONE);
        }
    }
}

impl Default for IndexBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Linear index-to-world transform: `world = translation + index * voxel_size`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// World-space size of one voxel along each axis.
    pub voxel_size: DVec3,
    /// World-space position of index `(0, 0, 0)`.
    pub translation: DVec3,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        voxel_size: DVec3::ONE,
        translation: DVec3::ZERO,
    };

    pub fn new(voxel_size: DVec3, translation: DVec3) -> Self {
        Self {
            voxel_size,
            translation,
        }
    }

    /// Uniform voxel size with no translation.
    pub fn uniform(voxel_size: f64) -> Self {
        Self::new(DVec3::splat(voxel_size), DVec3::ZERO)
    }

    /// Sets the translation.
    pub fn with_translation(mut self, translation: DVec3) -> Self {
        self.translation = translation;
        self
    }

    pub fn index_to_world(&self, index: DVec3) -> DVec3 {
        self.translation + index * self.voxel_size
    }

    pub fn world_to_index(&self, world: DVec3) -> DVec3 {
        (world - self.translation) / self.voxel_size
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Trilinear interpolation of a voxel lookup at a fractional index-space point.
///
/// At integer coordinates every blend weight except one is zero, so the result is
/// exactly the voxel value.
pub fn trilinear(p: DVec3, value_at: impl Fn(IVec3) -> f32) -> f32 {
    let base = p.floor();
    let t = p - base;
    let c = base.as_ivec3();

    if t == DVec3::ZERO {
        return value_at(c);
    }

    let (fx, fy, fz) = (t.x as f32, t.y as f32, t.z as f32);
    let lerp = |a: f32, b: f32, f: f32| a + (b - a) * f;

    let v000 = value_at(c);
    let v100 = value_at(c + IVec3::X);
    let v010 = value_at(c + IVec3::Y);
    let v110 = value_at(c + IVec3::new(1, 1, 0));
    let v001 = value_at(c + IVec3::Z);
    let v101 = value_at(c + IVec3::new(1, 0, 1));
    let v011 = value_at(c + IVec3::new(0, 1, 1));
    let v111 = value_at(c + IVec3::ONE);

    let v00 = lerp(v000, v100, fx);
    let v10 = lerp(v010, v110, fx);
    let v01 = lerp(v001, v101, fx);
    let v11 = lerp(v011, v111, fx);

    lerp(lerp(v00, v10, fy), lerp(v01, v11, fy), fz)
}
