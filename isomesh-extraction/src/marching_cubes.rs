//! Marching Cubes isosurface extraction
//!
//! Walks every cell of a [`VoxelGrid`], classifies its corners against the
//! surface level, looks up the cell's triangles and interpolates one vertex
//! per referenced edge. Output is a flat, non-indexed [`SurfaceMesh`].
//!
//! Cells are visited with x outermost, then y, then z, and the parallel path
//! reassembles its slabs in the same order, so identical inputs always give
//! a byte-identical vertex buffer.

use crate::cube::{classify, CubeSample};
use crate::interpolate::interpolate_edge;
use crate::parallel::{self, ParallelConfig};
use crate::tables::{triangulation, MAX_EDGES_PER_CELL};
use crate::voxel_grid::VoxelGrid;
use isomesh_core::{Error, GridCoord, Result, SurfaceMesh, FLOATS_PER_VERTEX};
use itertools::iproduct;
use serde::{Deserialize, Serialize};

/// Default surface level
pub const DEFAULT_SURFACE_LEVEL: f32 = 0.5;

/// Default voxel-to-world scale
pub const DEFAULT_VOXEL_SIZE: f32 = 0.5;

/// Cap on floats reserved up front. The 5-triangle bound is very loose for
/// real fields, and reserving it in full for large grids would allocate
/// gigabytes that are never touched.
pub const MAX_RESERVED_FLOATS: usize = 1 << 22;

/// Configuration for Marching Cubes extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Isosurface level; corners strictly above it are inside
    pub surface_level: f32,
    /// World-space edge length of one voxel
    pub voxel_size: f32,
    /// Parallel processing options
    pub parallel: ParallelConfig,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            surface_level: DEFAULT_SURFACE_LEVEL,
            voxel_size: DEFAULT_VOXEL_SIZE,
            parallel: ParallelConfig::default(),
        }
    }
}

impl ExtractionConfig {
    /// Configuration for a given level and voxel size
    pub fn new(surface_level: f32, voxel_size: f32) -> Self {
        Self {
            surface_level,
            voxel_size,
            ..Self::default()
        }
    }

    /// Set the surface level
    pub fn with_surface_level(mut self, surface_level: f32) -> Self {
        self.surface_level = surface_level;
        self
    }

    /// Set the voxel size
    pub fn with_voxel_size(mut self, voxel_size: f32) -> Self {
        self.voxel_size = voxel_size;
        self
    }

    /// Set parallel processing options
    pub fn with_parallel(mut self, parallel: ParallelConfig) -> Self {
        self.parallel = parallel;
        self
    }

    /// Check the configuration before handing it to a builder.
    ///
    /// Extraction itself accepts anything; this is for hosts that take
    /// parameters from users.
    pub fn validate(&self) -> Result<()> {
        if !self.surface_level.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "surface level must be finite, got {}",
                self.surface_level
            )));
        }

        if !(self.voxel_size.is_finite() && self.voxel_size > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "voxel size must be a positive finite number, got {}",
                self.voxel_size
            )));
        }

        Ok(())
    }
}

/// Number of cell origins along one axis of a grid
#[inline]
pub fn cells_per_axis(grid: &VoxelGrid) -> usize {
    grid.size().saturating_sub(1)
}

/// Floats to reserve for `cell_count` cells
#[inline]
pub fn reserved_floats(cell_count: usize) -> usize {
    cell_count
        .saturating_mul(MAX_EDGES_PER_CELL * FLOATS_PER_VERTEX)
        .min(MAX_RESERVED_FLOATS)
}

/// Floats to reserve for one x-slab of an `n`-cell-wide lattice.
///
/// All `n` slabs are alive together before concatenation, so they share a
/// single [`MAX_RESERVED_FLOATS`] budget.
#[inline]
pub fn slab_reserved_floats(n: usize) -> usize {
    reserved_floats(n.saturating_mul(n)).min(MAX_RESERVED_FLOATS / n.max(1))
}

/// Marching Cubes mesh builder
#[derive(Debug, Clone, Default)]
pub struct MeshBuilder {
    config: ExtractionConfig,
}

impl MeshBuilder {
    /// Create a new builder
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract the isosurface of `grid`.
    ///
    /// Never fails: grids smaller than 2 have no cells and give an empty mesh,
    /// and non-finite densities flow into the output unchecked.
    pub fn build(&self, grid: &VoxelGrid) -> SurfaceMesh {
        let n = cells_per_axis(grid);
        let cell_count = n * n * n;

        if cell_count == 0 {
            log::debug!("grid of size {} has no cells", grid.size());
            return SurfaceMesh::new();
        }

        let mesh = if self.config.parallel.should_parallelize(cell_count) {
            self.build_parallel(grid, n)
        } else {
            self.build_sequential(grid, n)
        };

        log::debug!(
            "extracted {} triangles from {} cells at level {}",
            mesh.triangle_count(),
            cell_count,
            self.config.surface_level
        );

        mesh
    }

    fn build_sequential(&self, grid: &VoxelGrid, n: usize) -> SurfaceMesh {
        let mut mesh = SurfaceMesh::with_capacity(reserved_floats(n * n * n));

        for (x, y, z) in iproduct!(0..n, 0..n, 0..n) {
            self.march_cell(grid, [x as i32, y as i32, z as i32], &mut mesh);
        }

        mesh
    }

    /// One task per x-slab, concatenated back in ascending x
    fn build_parallel(&self, grid: &VoxelGrid, n: usize) -> SurfaceMesh {
        let slabs = parallel::map_slabs_ordered(0..n, true, &self.config.parallel, |x| {
            self.march_slab(grid, x, n)
        });

        let total = slabs.iter().map(|slab| slab.positions().len()).sum();
        let mut mesh = SurfaceMesh::with_capacity(total);
        for mut slab in slabs {
            mesh.append(&mut slab);
        }

        mesh
    }

    fn march_slab(&self, grid: &VoxelGrid, x: usize, n: usize) -> SurfaceMesh {
        let mut slab = SurfaceMesh::with_capacity(slab_reserved_floats(n));

        for (y, z) in iproduct!(0..n, 0..n) {
            self.march_cell(grid, [x as i32, y as i32, z as i32], &mut slab);
        }

        slab
    }

    /// Emit the triangles of the cell at `origin` into `out`.
    ///
    /// Returns the number of triangles appended; trivial cells append
    /// nothing and interpolate nothing.
    pub fn march_cell(&self, grid: &VoxelGrid, origin: GridCoord, out: &mut SurfaceMesh) -> usize {
        let CubeSample { configuration, .. } = classify(grid, origin, self.config.surface_level);

        if configuration.is_trivial() {
            return 0;
        }

        let edges = triangulation(configuration);
        for &edge in edges {
            out.push_vertex(interpolate_edge(
                grid,
                origin,
                edge as usize,
                self.config.surface_level,
                self.config.voxel_size,
            ));
        }

        edges.len() / 3
    }
}

/// Convenience function for basic marching cubes
pub fn marching_cubes(grid: &VoxelGrid, surface_level: f32, voxel_size: f32) -> SurfaceMesh {
    MeshBuilder::new(ExtractionConfig::new(surface_level, voxel_size)).build(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::density::TerrainDensity;
    use isomesh_core::FLOATS_PER_TRIANGLE;

    fn sphere_grid(size: usize, radius: f32) -> VoxelGrid {
        let c = (size as f32 - 1.0) / 2.0;
        VoxelGrid::from_density(
            size,
            &|x: f32, y: f32, z: f32, _s: f32| {
                radius - ((x - c).powi(2) + (y - c).powi(2) + (z - c).powi(2)).sqrt()
            },
            1.0,
        )
    }

    #[test]
    fn test_extraction_config_default() {
        let config = ExtractionConfig::default();
        assert_eq!(config.surface_level, 0.5);
        assert_eq!(config.voxel_size, 0.5);
        assert!(!config.parallel.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_extraction_config_validation() {
        assert!(ExtractionConfig::new(0.0, 0.0).validate().is_err());
        assert!(ExtractionConfig::new(0.0, -1.0).validate().is_err());
        assert!(ExtractionConfig::new(0.0, f32::INFINITY).validate().is_err());
        assert!(ExtractionConfig::new(f32::NAN, 1.0).validate().is_err());
        assert!(ExtractionConfig::new(-3.0, 0.01).validate().is_ok());
    }

    #[test]
    fn test_marching_cubes_sphere() {
        let grid = sphere_grid(12, 3.5);
        let mesh = marching_cubes(&grid, 0.0, 1.0);

        assert!(!mesh.is_empty());
        assert_eq!(mesh.positions().len() % FLOATS_PER_TRIANGLE, 0);

        // every vertex sits close to the sphere surface
        let c = 5.5;
        for v in mesh.vertices() {
            let r = ((v.x - c).powi(2) + (v.y - c).powi(2) + (v.z - c).powi(2)).sqrt();
            assert!((r - 3.5).abs() < 0.5, "vertex at radius {}", r);
        }
    }

    #[test]
    fn test_trivial_cell_emits_nothing() {
        let grid = VoxelGrid::from_values(2, vec![1.0; 8]).unwrap();
        let builder = MeshBuilder::new(ExtractionConfig::new(0.5, 1.0));
        let mut out = SurfaceMesh::new();

        assert_eq!(builder.march_cell(&grid, [0, 0, 0], &mut out), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_single_corner_cell_emits_one_triangle() {
        let mut grid = VoxelGrid::new(2);
        grid.set(0, 0, 0, 1.0);
        let builder = MeshBuilder::new(ExtractionConfig::new(0.5, 1.0));
        let mut out = SurfaceMesh::new();

        assert_eq!(builder.march_cell(&grid, [0, 0, 0], &mut out), 1);
        // edges 0, 8, 3: midpoints along +x, +z and +y from the origin
        assert_eq!(out.positions(), &[0.5, 0.0, 0.0, 0.0, 0.0, 0.5, 0.0, 0.5, 0.0]);
    }

    #[test]
    fn test_small_grids_are_empty() {
        for size in 0..2 {
            let grid = VoxelGrid::from_values(size, vec![1.0; size * size * size]).unwrap();
            assert!(marching_cubes(&grid, 0.5, 1.0).is_empty());
        }
    }

    #[test]
    fn test_reserved_floats_is_capped() {
        assert_eq!(reserved_floats(0), 0);
        assert_eq!(reserved_floats(1), 45);
        assert_eq!(reserved_floats(usize::MAX), MAX_RESERVED_FLOATS);
    }

    #[test]
    fn test_slab_reservations_share_the_cap() {
        assert_eq!(slab_reserved_floats(0), 0);
        assert_eq!(slab_reserved_floats(1), 45);
        assert_eq!(slab_reserved_floats(4), 4 * 4 * 45);

        for n in [1, 16, 64, 129, 257, 1024, 100_000] {
            let total = slab_reserved_floats(n) * n;
            assert!(total <= MAX_RESERVED_FLOATS, "{} slabs reserve {} floats", n, total);
        }
    }

    #[test]
    fn test_sequential_build_reserves_capacity() {
        let grid = sphere_grid(6, 2.0);
        let mesh = MeshBuilder::new(ExtractionConfig::new(0.0, 1.0)).build(&grid);
        assert!(mesh.capacity() >= reserved_floats(5 * 5 * 5));
    }

    #[test]
    fn test_parallel_build_matches_sequential() {
        let grid = VoxelGrid::from_density(24, &TerrainDensity::new(24), 0.2);
        let sequential = MeshBuilder::new(ExtractionConfig::new(0.5, 0.5)).build(&grid);
        let parallel = MeshBuilder::new(
            ExtractionConfig::new(0.5, 0.5)
                .with_parallel(ParallelConfig::enabled().with_min_cells(0)),
        )
        .build(&grid);

        assert!(!sequential.is_empty());
        assert_eq!(sequential.as_bytes(), parallel.as_bytes());
    }
}
