//! Unit cube geometry and per-cell classification
//!
//! Corner numbering runs counter-clockwise around the bottom face (z = 0)
//! and then the top face (z = 1). Edges 0-3 ring the bottom face, 4-7 the
//! top face and 8-11 are the vertical edges joining them.

use crate::voxel_grid::VoxelGrid;
use isomesh_core::GridCoord;

/// Lattice offsets of the 8 cube corners from the cell origin
pub const CORNER_OFFSETS: [GridCoord; 8] = [
    [0, 0, 0],
    [1, 0, 0],
    [1, 1, 0],
    [0, 1, 0],
    [0, 0, 1],
    [1, 0, 1],
    [1, 1, 1],
    [0, 1, 1],
];

/// Corner index pairs for each of the 12 cube edges
pub const EDGE_CORNERS: [[usize; 2]; 12] = [
    [0, 1],
    [1, 2],
    [2, 3],
    [3, 0], // bottom face edges
    [4, 5],
    [5, 6],
    [6, 7],
    [7, 4], // top face edges
    [0, 4],
    [1, 5],
    [2, 6],
    [3, 7], // vertical edges
];

/// Lattice coordinate of corner `corner` of the cell at `origin`
#[inline]
pub fn corner_coord(origin: GridCoord, corner: usize) -> GridCoord {
    let offset = CORNER_OFFSETS[corner];
    [
        origin[0] + offset[0],
        origin[1] + offset[1],
        origin[2] + offset[2],
    ]
}

/// 8-bit cube index: bit `i` is set when corner `i` lies above the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CubeConfiguration(pub u8);

impl CubeConfiguration {
    /// All corners at or below the surface
    pub const EMPTY: Self = Self(0);
    /// All corners above the surface
    pub const FULL: Self = Self(u8::MAX);

    /// Build the configuration from corner densities.
    ///
    /// Ties count as outside: a corner exactly at `surface_level` leaves its
    /// bit clear.
    #[inline]
    pub fn from_densities(densities: &[f32; 8], surface_level: f32) -> Self {
        let mut index = 0u8;
        for (i, &density) in densities.iter().enumerate() {
            if density > surface_level {
                index |= 1 << i;
            }
        }
        Self(index)
    }

    /// Whether corner `corner` is above the surface
    #[inline]
    pub fn is_set(self, corner: usize) -> bool {
        self.0 & (1 << corner) != 0
    }

    /// Whether the surface misses this cell entirely
    #[inline]
    pub fn is_trivial(self) -> bool {
        self == Self::EMPTY || self == Self::FULL
    }

    /// Whether the surface crosses edge `edge`
    #[inline]
    pub fn crosses_edge(self, edge: usize) -> bool {
        let [a, b] = EDGE_CORNERS[edge];
        self.is_set(a) != self.is_set(b)
    }

    /// Table index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Classification result for one cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubeSample {
    pub configuration: CubeConfiguration,
    /// Sampled density at each corner, in corner order
    pub densities: [f32; 8],
}

/// Sample the 8 corners of the cell at `origin` and classify them
#[inline]
pub fn classify(grid: &VoxelGrid, origin: GridCoord, surface_level: f32) -> CubeSample {
    let mut densities = [0.0f32; 8];
    for (corner, density) in densities.iter_mut().enumerate() {
        *density = grid.get_at(corner_coord(origin, corner));
    }

    CubeSample {
        configuration: CubeConfiguration::from_densities(&densities, surface_level),
        densities,
    }
}
