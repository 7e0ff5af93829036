//! # isomesh Extraction
//!
//! Marching cubes isosurface extraction from dense voxel density fields.
//!
//! A [`VoxelGrid`] is filled once from a [`DensityFunction`](isomesh_core::DensityFunction),
//! then [`MeshBuilder`] scans every cell, classifies its corners against the
//! surface level, looks up the cell's triangles and interpolates their
//! vertices into a flat, non-indexed [`SurfaceMesh`](isomesh_core::SurfaceMesh).
//!
//! ```rust
//! use isomesh_extraction::{marching_cubes, TerrainDensity, VoxelGrid};
//!
//! let grid = VoxelGrid::from_density(16, &TerrainDensity::new(16), 0.1);
//! let mesh = marching_cubes(&grid, 0.5, 0.5);
//! assert_eq!(mesh.positions().len() % 9, 0);
//! ```

pub mod voxel_grid;
pub mod density;
pub mod cube;
pub mod tables;
pub mod interpolate;
pub mod marching_cubes;
pub mod parallel;
pub mod pipeline;

// Re-export commonly used items
pub use voxel_grid::*;
pub use density::*;
pub use cube::*;
pub use tables::*;
pub use interpolate::*;
pub use marching_cubes::*;
pub use parallel::{ParallelConfig, ThreadPoolConfig};
pub use pipeline::*;
