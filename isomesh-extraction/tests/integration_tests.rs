//! Integration tests for isomesh-extraction
//!
//! These tests run whole extractions end to end and check the properties the
//! output buffer must hold regardless of the field: whole triangles, fixed
//! emission order, vertices on the expected planes and inside the grid.

use isomesh_core::{SurfaceMesh, FLOATS_PER_TRIANGLE};
use isomesh_extraction::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Grid filled from a seeded random field in `[0, 1)`
fn random_grid(size: usize, seed: u64) -> VoxelGrid {
    let mut rng = StdRng::seed_from_u64(seed);
    let values = (0..size * size * size).map(|_| rng.gen::<f32>()).collect();
    VoxelGrid::from_values(size, values).unwrap()
}

/// Dense below `y = 2`, empty above
fn slab_field(_x: f32, y: f32, _z: f32, _scale: f32) -> f32 {
    if y < 2.0 {
        1.0
    } else {
        0.0
    }
}

fn assert_whole_triangles(mesh: &SurfaceMesh) {
    assert_eq!(
        mesh.positions().len() % FLOATS_PER_TRIANGLE,
        0,
        "buffer of {} floats is not whole triangles",
        mesh.positions().len()
    );
}

#[test]
fn test_horizontal_slab_vertices_lie_on_one_plane() {
    let grid = VoxelGrid::from_density(4, &slab_field, 1.0);
    let mesh = marching_cubes(&grid, 0.5, 1.0);

    assert!(!mesh.is_empty());
    assert_whole_triangles(&mesh);
    for v in mesh.vertices() {
        assert_eq!(v.y, 1.5, "vertex {:?} is off the plane", v);
    }
}

#[test]
fn test_horizontal_slab_triangle_count() {
    // 3 x 3 cells straddle the plane, each contributes a quad
    let grid = VoxelGrid::from_density(4, &slab_field, 1.0);
    let mesh = marching_cubes(&grid, 0.5, 1.0);

    assert_eq!(mesh.triangle_count(), 3 * 3 * 2);
}

#[test]
fn test_voxel_size_scales_output() {
    let grid = VoxelGrid::from_density(4, &slab_field, 1.0);
    let unit = marching_cubes(&grid, 0.5, 1.0);
    let scaled = marching_cubes(&grid, 0.5, 0.25);

    assert_eq!(unit.vertex_count(), scaled.vertex_count());
    for (a, b) in unit.positions().iter().zip(scaled.positions()) {
        assert_eq!(a * 0.25, *b);
    }
}

#[test]
fn test_level_below_minimum_is_empty() {
    let grid = random_grid(8, 7);
    let mesh = marching_cubes(&grid, -0.5, 1.0);
    assert!(mesh.is_empty());
}

#[test]
fn test_level_above_maximum_is_empty() {
    let grid = random_grid(8, 7);
    let mesh = marching_cubes(&grid, 1.5, 1.0);
    assert!(mesh.is_empty());
}

#[test]
fn test_extraction_is_deterministic() {
    let grid = random_grid(10, 42);

    let first = marching_cubes(&grid, 0.5, 0.5);
    let second = marching_cubes(&grid, 0.5, 0.5);

    assert!(!first.is_empty());
    assert_eq!(first.as_bytes(), second.as_bytes());
}

#[test]
fn test_parallel_extraction_matches_sequential() {
    for seed in 0..4 {
        let grid = random_grid(17, seed);
        let sequential = MeshBuilder::new(ExtractionConfig::new(0.5, 1.0)).build(&grid);
        let parallel = MeshBuilder::new(
            ExtractionConfig::new(0.5, 1.0)
                .with_parallel(ParallelConfig::enabled().with_min_cells(0)),
        )
        .build(&grid);

        assert_eq!(sequential.as_bytes(), parallel.as_bytes(), "seed {}", seed);
    }
}

#[test]
fn test_size_two_grid_has_one_cell() {
    for seed in 0..64 {
        let grid = random_grid(2, seed);
        let mesh = marching_cubes(&grid, 0.5, 1.0);

        assert_whole_triangles(&mesh);
        assert!(mesh.triangle_count() <= MAX_TRIANGLES_PER_CELL);

        // the only cell's emission equals a direct march of origin (0,0,0)
        let builder = MeshBuilder::new(ExtractionConfig::new(0.5, 1.0));
        let mut direct = SurfaceMesh::new();
        builder.march_cell(&grid, [0, 0, 0], &mut direct);
        assert_eq!(mesh, direct);
    }
}

#[test]
fn test_every_configuration_in_a_single_cell() {
    for index in 0..=255u8 {
        let mut grid = VoxelGrid::new(2);
        for corner in 0..8 {
            if index & (1 << corner) != 0 {
                let [x, y, z] = CORNER_OFFSETS[corner];
                grid.set(x, y, z, 1.0);
            }
        }

        let mesh = marching_cubes(&grid, 0.5, 1.0);
        let expected = triangulation(CubeConfiguration(index)).len() / 3;

        assert_eq!(mesh.triangle_count(), expected, "configuration {}", index);
        // binary corners put every crossing at an edge midpoint
        for v in mesh.vertices() {
            let halves = [v.x, v.y, v.z].iter().filter(|&&c| c == 0.5).count();
            assert_eq!(halves, 1, "configuration {} vertex {:?}", index, v);
        }
    }
}

#[test]
fn test_vertices_stay_inside_grid_bounds() {
    let size = 12;
    let voxel_size = 0.75;
    let grid = random_grid(size, 3);
    let mesh = marching_cubes(&grid, 0.4, voxel_size);

    let max = (size - 1) as f32 * voxel_size;
    for v in mesh.vertices() {
        for c in [v.x, v.y, v.z] {
            assert!((0.0..=max).contains(&c), "coordinate {} outside [0, {}]", c, max);
        }
    }
}

#[test]
fn test_non_finite_densities_are_not_rejected() {
    let mut grid = VoxelGrid::new(3);
    grid.set(1, 1, 1, f32::INFINITY);

    let mesh = marching_cubes(&grid, 0.5, 1.0);

    assert!(!mesh.is_empty());
    assert!(mesh.positions().iter().any(|c| c.is_nan()));
}

#[test]
fn test_terrain_pipeline_end_to_end() {
    let pipeline = TerrainPipeline::new(TerrainDensity::new(16))
        .with_parallel(ParallelConfig::enabled().with_min_cells(0));
    let params = TerrainParams {
        grid_size: 16,
        scale: 0.3,
        surface_level: 0.5,
        voxel_size: 0.5,
    };

    let result = pipeline.regenerate(&params).unwrap();
    let (lo, hi) = result.density_range.unwrap();

    assert!(result.published);
    assert!(lo < 0.5 && hi > 0.5);
    assert!(!result.mesh.is_empty());
    assert_whole_triangles(&result.mesh);

    let sequential = extract(&TerrainDensity::new(16), &params, &ParallelConfig::default());
    assert_eq!(sequential.as_bytes(), result.mesh.as_bytes());
}
