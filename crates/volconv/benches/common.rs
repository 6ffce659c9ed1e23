use std::time::Duration;

use criterion::{Criterion, Throughput};
use glam::IVec3;
use volconv::grid::{IndexBox, SparseGrid, Transform};

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

/// Sparse ball of radius `size / 2` with a radial falloff, centred in a `size`³ box.
pub fn sparse_ball(size: i32) -> SparseGrid {
    let mut grid = SparseGrid::new(0.0).with_transform(Transform::uniform(0.1));
    let bounds = IndexBox::new(IVec3::ZERO, IVec3::splat(size));
    let c = (size as f32 - 1.0) * 0.5;
    let r = size as f32 * 0.5;
    for z in bounds.min.z..bounds.max.z {
        for y in bounds.min.y..bounds.max.y {
            for x in bounds.min.x..bounds.max.x {
                let d = ((x as f32 - c).powi(2) + (y as f32 - c).powi(2) + (z as f32 - c).powi(2))
                    .sqrt();
                if d <= r {
                    grid.set(IVec3::new(x, y, z), 1.0 - d / r);
                }
            }
        }
    }
    grid
}
