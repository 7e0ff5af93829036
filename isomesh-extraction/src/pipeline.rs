//! Regenerate-and-publish pipeline for interactive hosts
//!
//! A host that re-extracts whenever a parameter changes (a slider moves, a
//! regenerate button is pressed) builds a fresh grid and mesh each time and
//! publishes the finished mesh through a [`MeshSlot`]. Readers only ever see
//! complete meshes: a publish swaps one `Arc` for another under a lock, and
//! a slower, older extraction can never overwrite a newer one.

use crate::density::populate_with;
use crate::marching_cubes::{
    ExtractionConfig, MeshBuilder, DEFAULT_SURFACE_LEVEL, DEFAULT_VOXEL_SIZE,
};
use crate::parallel::ParallelConfig;
use crate::voxel_grid::VoxelGrid;
use isomesh_core::{DensityFunction, Error, Result, SurfaceMesh};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

/// Default grid edge length in voxels
pub const DEFAULT_GRID_SIZE: usize = 16;

/// Default density function scale
pub const DEFAULT_SCALE: f32 = 0.1;

/// User-facing parameters of one extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainParams {
    /// Grid edge length in voxels
    pub grid_size: usize,
    /// Scale forwarded to the density function
    pub scale: f32,
    /// Isosurface level
    pub surface_level: f32,
    /// World-space edge length of one voxel
    pub voxel_size: f32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            scale: DEFAULT_SCALE,
            surface_level: DEFAULT_SURFACE_LEVEL,
            voxel_size: DEFAULT_VOXEL_SIZE,
        }
    }
}

impl TerrainParams {
    /// Extraction settings derived from these parameters
    pub fn extraction_config(&self, parallel: ParallelConfig) -> ExtractionConfig {
        ExtractionConfig::new(self.surface_level, self.voxel_size).with_parallel(parallel)
    }

    /// Reject parameters that cannot describe a meshable grid
    pub fn validate(&self) -> Result<()> {
        if self.grid_size < 2 {
            return Err(Error::InvalidConfig(format!(
                "grid size must be at least 2, got {}",
                self.grid_size
            )));
        }

        if !self.scale.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "scale must be finite, got {}",
                self.scale
            )));
        }

        self.extraction_config(ParallelConfig::default()).validate()
    }
}

/// Build a grid from `density` and extract its isosurface in one call
pub fn extract<D>(density: &D, params: &TerrainParams, parallel: &ParallelConfig) -> SurfaceMesh
where
    D: DensityFunction + Sync,
{
    let mut grid = VoxelGrid::new(params.grid_size);
    populate_with(&mut grid, density, params.scale, parallel);

    MeshBuilder::new(params.extraction_config(parallel.clone())).build(&grid)
}

#[derive(Debug)]
struct Published {
    generation: u64,
    mesh: Arc<SurfaceMesh>,
}

/// Holder of the most recently completed mesh
#[derive(Debug)]
pub struct MeshSlot {
    current: Mutex<Published>,
}

impl Default for MeshSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshSlot {
    /// Empty slot at generation 0
    pub fn new() -> Self {
        Self {
            current: Mutex::new(Published {
                generation: 0,
                mesh: Arc::new(SurfaceMesh::new()),
            }),
        }
    }

    /// Replace the visible mesh if `generation` is newer than what is shown.
    ///
    /// Returns whether the mesh was published.
    pub fn publish(&self, generation: u64, mesh: Arc<SurfaceMesh>) -> bool {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);

        if generation <= current.generation {
            log::debug!(
                "discarding stale mesh generation {} (showing {})",
                generation,
                current.generation
            );
            return false;
        }

        *current = Published { generation, mesh };
        true
    }

    /// The visible mesh
    pub fn current(&self) -> Arc<SurfaceMesh> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .mesh
            .clone()
    }

    /// Generation of the visible mesh (0 before the first publish)
    pub fn generation(&self) -> u64 {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .generation
    }
}

/// Result of one regeneration with metadata
#[derive(Debug, Clone)]
pub struct RegenerationResult {
    /// The extracted mesh
    pub mesh: Arc<SurfaceMesh>,
    /// Generation assigned to this extraction
    pub generation: u64,
    /// Whether the mesh became the visible one
    pub published: bool,
    /// Number of cells scanned
    pub cell_count: usize,
    /// Smallest and largest density in the grid
    pub density_range: Option<(f32, f32)>,
    /// Processing time in seconds
    pub processing_time: f32,
}

/// Density field plus publish slot, re-run on every parameter change
#[derive(Debug)]
pub struct TerrainPipeline<D> {
    density: D,
    parallel: ParallelConfig,
    slot: MeshSlot,
    next_generation: AtomicU64,
}

impl<D> TerrainPipeline<D>
where
    D: DensityFunction + Sync,
{
    /// Create a pipeline over a density field
    pub fn new(density: D) -> Self {
        Self {
            density,
            parallel: ParallelConfig::default(),
            slot: MeshSlot::new(),
            next_generation: AtomicU64::new(1),
        }
    }

    /// Set parallel processing options
    pub fn with_parallel(mut self, parallel: ParallelConfig) -> Self {
        self.parallel = parallel;
        self
    }

    /// Publish slot
    pub fn slot(&self) -> &MeshSlot {
        &self.slot
    }

    /// The visible mesh
    pub fn current_mesh(&self) -> Arc<SurfaceMesh> {
        self.slot.current()
    }

    /// Build a fresh grid, extract it and publish the result.
    ///
    /// The mesh only becomes visible once extraction has finished.
    pub fn regenerate(&self, params: &TerrainParams) -> Result<RegenerationResult> {
        params.validate()?;

        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let start = Instant::now();

        let mut grid = VoxelGrid::new(params.grid_size);
        populate_with(&mut grid, &self.density, params.scale, &self.parallel);
        let density_range = grid.min_max();

        let builder = MeshBuilder::new(params.extraction_config(self.parallel.clone()));
        let mesh = Arc::new(builder.build(&grid));
        drop(grid);

        let published = self.slot.publish(generation, Arc::clone(&mesh));
        let processing_time = start.elapsed().as_secs_f32();

        log::info!(
            "generation {}: {} vertices from {}³ grid in {:.3}s",
            generation,
            mesh.vertex_count(),
            params.grid_size,
            processing_time
        );

        let n = params.grid_size - 1;
        Ok(RegenerationResult {
            mesh,
            generation,
            published,
            cell_count: n * n * n,
            density_range,
            processing_time,
        })
    }
}
