//! Dense cubic voxel storage
//!
//! A [`VoxelGrid`] holds `size³` densities in one contiguous arena. Reads
//! outside the grid return [`EMPTY_DENSITY`] so that cells touching the
//! boundary degrade gracefully instead of failing.

use isomesh_core::{Error, GridCoord, Result};

/// Density reported for any coordinate outside the grid
pub const EMPTY_DENSITY: f32 = 0.0;

/// Cubic grid of scalar densities
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelGrid {
    /// Edge length in voxels
    size: usize,
    /// Densities laid out as `x + y*size + z*size²`
    values: Vec<f32>,
}

impl VoxelGrid {
    /// Create a grid of `size³` voxels, all empty
    pub fn new(size: usize) -> Self {
        Self {
            size,
            values: vec![EMPTY_DENSITY; size * size * size],
        }
    }

    /// Wrap an existing density buffer laid out as `x + y*size + z*size²`
    pub fn from_values(size: usize, values: Vec<f32>) -> Result<Self> {
        let expected = size * size * size;
        if values.len() != expected {
            return Err(Error::InvalidData(format!(
                "Grid of size {} needs {} values, got {}",
                size,
                expected,
                values.len()
            )));
        }

        Ok(Self { size, values })
    }

    /// Edge length in voxels
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of voxels
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the grid holds no voxels at all
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Read-only view of the arena
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub(crate) fn values_mut(&mut self) -> &mut [f32] {
        &mut self.values
    }

    /// Linear offset of an in-bounds coordinate, `None` otherwise
    #[inline]
    pub fn index(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        let size = self.size;
        let in_range = |c: i32| c >= 0 && (c as usize) < size;

        if in_range(x) && in_range(y) && in_range(z) {
            Some(x as usize + y as usize * size + z as usize * size * size)
        } else {
            None
        }
    }

    /// Density at `(x, y, z)`, or [`EMPTY_DENSITY`] outside the grid
    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> f32 {
        self.index(x, y, z).map_or(EMPTY_DENSITY, |i| self.values[i])
    }

    /// Density at a lattice coordinate
    #[inline]
    pub fn get_at(&self, coord: GridCoord) -> f32 {
        self.get(coord[0], coord[1], coord[2])
    }

    /// Store a density; out-of-range writes are ignored
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, z: i32, value: f32) {
        if let Some(i) = self.index(x, y, z) {
            self.values[i] = value;
        }
    }

    /// Smallest and largest stored density, `None` for an empty grid.
    ///
    /// NaN entries are skipped by the comparisons.
    pub fn min_max(&self) -> Option<(f32, f32)> {
        let mut iter = self.values.iter().copied();
        let first = iter.next()?;

        Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}
