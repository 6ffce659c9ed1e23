//! Dense resampling of a scalar grid over an index box.
use glam::{DVec3, Vec3};

use super::bounds::resolve_bounds;
use crate::error::Result;
use crate::grid::{IndexBox, ScalarGrid};
use crate::volume::SampleVolume;

/// Samples every voxel of `index_box`, z outermost and x innermost.
///
/// Values land in x-fastest order, so sample `(i, j, k)` ends up at
/// `i + dims.x * (j + dims.y * k)` relative to the box minimum. Coordinates are always
/// integers; the trilinear sampler degenerates to a voxel lookup. World extents are left
/// at zero, see [`sample_grid`] for the full stage.
pub fn sample_dense<G: ScalarGrid + ?Sized>(grid: &G, index_box: &IndexBox) -> SampleVolume {
    let dims = index_box.dims();
    let mut values = Vec::with_capacity(index_box.volume());

    if !index_box.is_empty() {
        for k in index_box.min.z..index_box.max.z {
            for j in index_box.min.y..index_box.max.y {
                for i in index_box.min.x..index_box.max.x {
                    let p = DVec3::new(i as f64, j as f64, k as f64);
                    values.push(grid.sample_trilinear(p));
                }
            }
        }
    }

    SampleVolume {
        dims,
        world_min: Vec3::ZERO,
        world_max: Vec3::ZERO,
        values,
    }
}

/// Resolves the active box of `grid` and samples it into a volume carrying its world extents.
pub fn sample_grid<G: ScalarGrid + ?Sized>(grid: &G) -> Result<SampleVolume> {
    let bounds = resolve_bounds(grid)?;
    let mut volume = sample_dense(grid, &bounds.index_box);
    volume.world_min = bounds.world_min;
    volume.world_max = bounds.world_max;
    Ok(volume)
}

#[cfg(test)]
mod tests {
    use glam::IVec3;

    use super::*;
    use crate::error::Error;
    use crate::grid::{DenseGrid, SparseGrid, Transform};

    fn encoded(c: IVec3) -> f32 {
        (c.x + 10 * c.y + 100 * c.z) as f32
    }

    #[test]
    fn dims_match_box_and_value_count() {
        let boxes = [
            IndexBox::new(IVec3::ZERO, IVec3::new(1, 1, 1)),
            IndexBox::new(IVec3::new(-3, 2, 0), IVec3::new(2, 4, 3)),
            IndexBox::new(IVec3::new(5, 5, 5), IVec3::new(6, 9, 7)),
        ];
        for b in boxes {
            let grid = DenseGrid::from_fn(b, encoded);
            let volume = sample_dense(&grid, &b);
            assert_eq!(volume.dims, b.max - b.min);
            let d = volume.dims;
            assert_eq!(volume.values.len(), (d.x * d.y * d.z) as usize);
        }
    }

    #[test]
    fn values_are_x_fastest() {
        let b = IndexBox::new(IVec3::new(1, 0, 0), IVec3::new(3, 3, 2));
        let grid = DenseGrid::from_fn(b, encoded);
        let volume = sample_dense(&grid, &b);

        assert_eq!(&volume.values[..4], &[1.0, 2.0, 11.0, 12.0]);
        for z in 0..2 {
            for y in 0..3 {
                for x in 0..2 {
                    let cell = b.min + IVec3::new(x as i32, y as i32, z as i32);
                    assert_eq!(volume.get(x, y, z), Some(encoded(cell)));
                }
            }
        }
    }

    #[test]
    fn empty_box_samples_nothing() {
        let grid = SparseGrid::new(1.0);
        let volume = sample_dense(&grid, &IndexBox::new(IVec3::ZERO, IVec3::new(3, 0, 3)));
        assert_eq!(volume.dims, IVec3::new(3, 0, 3));
        assert!(volume.is_empty());
    }

    #[test]
    fn sample_grid_fills_world_extents() {
        let mut grid = SparseGrid::new(0.0).with_transform(Transform::uniform(2.0));
        grid.set(IVec3::new(0, 0, 0), 1.0);
        grid.set(IVec3::new(1, 2, 0), 3.0);

        let volume = sample_grid(&grid).unwrap();
        assert_eq!(volume.dims, IVec3::new(2, 3, 1));
        assert_eq!(volume.world_min, Vec3::ZERO);
        assert_eq!(volume.world_max, Vec3::new(2.0, 4.0, 0.0));
        assert_eq!(volume.values, vec![1.0, 0.0, 0.0, 0.0, 0.0, 3.0]);
    }

    #[test]
    fn sample_grid_rejects_empty_grid() {
        let grid = SparseGrid::new(0.0);
        assert!(matches!(sample_grid(&grid), Err(Error::EmptyGrid { .. })));
    }
}
