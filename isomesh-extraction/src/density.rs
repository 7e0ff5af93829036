//! Filling voxel grids from density functions
//!
//! The extraction core never looks inside a density function; it only
//! samples it once per lattice point here. [`TerrainDensity`] is the stock
//! field used by the demos: layered trigonometric noise over a ground bias
//! that is dense at the bottom of the grid and thins out towards the top.

use crate::parallel::{self, ParallelConfig};
use crate::voxel_grid::VoxelGrid;
use isomesh_core::DensityFunction;

/// Sample `density` at every lattice point of `grid`
pub fn populate<D>(grid: &mut VoxelGrid, density: &D, scale: f32)
where
    D: DensityFunction + Sync,
{
    populate_with(grid, density, scale, &ParallelConfig::default());
}

/// Sample `density` at every lattice point, one z-slab per task when
/// `config` allows parallelism.
///
/// The density function is pure, so the filled grid is identical whichever
/// path runs.
pub fn populate_with<D>(grid: &mut VoxelGrid, density: &D, scale: f32, config: &ParallelConfig)
where
    D: DensityFunction + Sync,
{
    let size = grid.size();
    let parallel = config.should_parallelize(grid.len());

    log::debug!(
        "populating {}³ grid (scale {}, parallel: {})",
        size,
        scale,
        parallel
    );

    parallel::fill_slabs(grid.values_mut(), size * size, parallel, |z, slab| {
        for (offset, value) in slab.iter_mut().enumerate() {
            let x = offset % size;
            let y = offset / size;
            *value = density.density(x as f32, y as f32, z as f32, scale);
        }
    });
}

impl VoxelGrid {
    /// Allocate a `size³` grid and fill it from `density`
    pub fn from_density<D>(size: usize, density: &D, scale: f32) -> Self
    where
        D: DensityFunction + Sync,
    {
        let mut grid = VoxelGrid::new(size);
        populate(&mut grid, density, scale);
        grid
    }
}

/// Three octaves of sin/cos noise, remapped to roughly `[0, 1]`
#[inline]
pub fn layered_noise(x: f32, y: f32, z: f32, scale: f32) -> f32 {
    let nx = x * scale;
    let ny = y * scale;
    let nz = z * scale;

    let octave = |f: f32| (nx * f).sin() * (ny * f).cos() * (nz * f).sin();

    (octave(1.0) + octave(2.0) * 0.5 + octave(4.0) * 0.25) * 0.5 + 0.5
}

/// Rolling terrain: noise averaged with a ground bias that falls from 1 at
/// `y = 0` to 0 at `y = grid_size`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainDensity {
    pub grid_size: usize,
}

impl TerrainDensity {
    pub fn new(grid_size: usize) -> Self {
        Self { grid_size }
    }

    fn ground_height(&self, y: f32) -> f32 {
        let size = self.grid_size.max(1) as f32;
        (size - y) / size
    }
}

impl DensityFunction for TerrainDensity {
    fn density(&self, x: f32, y: f32, z: f32, scale: f32) -> f32 {
        (layered_noise(x, y, z, scale) + self.ground_height(y)) * 0.5
    }
}
