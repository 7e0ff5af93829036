//! Point types and related functionality

use nalgebra::{Point3, Vector3};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// Integer lattice coordinate of a voxel or cell origin.
///
/// Signed so that neighbourhood lookups can step below zero and hit the
/// out-of-range sentinel instead of wrapping.
pub type GridCoord = [i32; 3];

/// Axis-aligned bounds as `(min, max)`.
pub type Bounds3f = (Point3f, Point3f);

/// World-space position of a lattice coordinate under a uniform voxel scale.
#[inline]
pub fn grid_to_world(coord: GridCoord, voxel_size: f32) -> Point3f {
    Point3f::new(
        coord[0] as f32 * voxel_size,
        coord[1] as f32 * voxel_size,
        coord[2] as f32 * voxel_size,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_to_world_scales_each_axis() {
        let p = grid_to_world([1, 2, 3], 0.5);
        assert_eq!(p, Point3f::new(0.5, 1.0, 1.5));
    }

    #[test]
    fn test_grid_to_world_negative_coordinates() {
        let p = grid_to_world([-2, 0, 4], 2.0);
        assert_eq!(p, Point3f::new(-4.0, 0.0, 8.0));
    }
}
