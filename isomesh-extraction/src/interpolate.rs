//! Surface crossing points on cube edges

use crate::cube::{corner_coord, EDGE_CORNERS};
use crate::voxel_grid::VoxelGrid;
use isomesh_core::{grid_to_world, GridCoord, Point3f};

/// Corner densities closer than this are treated as equal and the crossing
/// is placed at the edge midpoint.
pub const DEGENERATE_EPSILON: f32 = 0.001;

/// Interpolation parameter along an edge from density `v1` to `v2`.
///
/// Always within `[0, 1]` for finite inputs. Non-finite densities are not
/// checked: an infinite corner yields NaN.
#[inline]
pub fn interpolation_parameter(v1: f32, v2: f32, surface_level: f32) -> f32 {
    if (v1 - v2).abs() > DEGENERATE_EPSILON {
        ((surface_level - v1) / (v2 - v1)).clamp(0.0, 1.0)
    } else {
        0.5
    }
}

/// World-space point where the surface crosses `edge` of the cell at `origin`.
///
/// Corner densities are re-read from the grid so the result depends only on
/// the grid contents, never on caller-side caches.
#[inline]
pub fn interpolate_edge(
    grid: &VoxelGrid,
    origin: GridCoord,
    edge: usize,
    surface_level: f32,
    voxel_size: f32,
) -> Point3f {
    let [c1, c2] = EDGE_CORNERS[edge];
    let p1 = corner_coord(origin, c1);
    let p2 = corner_coord(origin, c2);

    let t = interpolation_parameter(grid.get_at(p1), grid.get_at(p2), surface_level);

    let w1 = grid_to_world(p1, voxel_size);
    let w2 = grid_to_world(p2, voxel_size);
    w1 + (w2 - w1) * t
}
