//! Terrain meshing demo
//!
//! Samples the stock terrain field into a voxel grid, extracts its
//! isosurface and prints a summary of the resulting mesh. Run with
//! `RUST_LOG=debug` to see the extraction stages.

use anyhow::Result;
use clap::Parser;
use isomesh_extraction::parallel::{current_num_threads, init_thread_pool};
use isomesh_extraction::{
    ParallelConfig, TerrainDensity, TerrainParams, TerrainPipeline, ThreadPoolConfig,
    DEFAULT_GRID_SIZE, DEFAULT_SCALE, DEFAULT_SURFACE_LEVEL, DEFAULT_VOXEL_SIZE,
};

#[derive(Debug, Parser)]
#[command(name = "terrain_mesh", about = "Extract a marching cubes mesh from procedural terrain")]
struct Args {
    /// Grid edge length in voxels
    #[arg(long, default_value_t = DEFAULT_GRID_SIZE)]
    grid_size: usize,

    /// Noise scale
    #[arg(long, default_value_t = DEFAULT_SCALE)]
    scale: f32,

    /// Isosurface level
    #[arg(long, default_value_t = DEFAULT_SURFACE_LEVEL)]
    surface_level: f32,

    /// World-space edge length of one voxel
    #[arg(long, default_value_t = DEFAULT_VOXEL_SIZE)]
    voxel_size: f32,

    /// Populate and extract on the rayon thread pool
    #[arg(long)]
    parallel: bool,

    /// Worker threads for the parallel path (defaults to one per core)
    #[arg(long, requires = "parallel")]
    threads: Option<usize>,
}

fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .try_init();
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let params = TerrainParams {
        grid_size: args.grid_size,
        scale: args.scale,
        surface_level: args.surface_level,
        voxel_size: args.voxel_size,
    };
    params.validate()?;

    let parallel = ParallelConfig::default().with_enabled(args.parallel);
    if parallel.enabled {
        let mut pool = ThreadPoolConfig::default();
        if let Some(threads) = args.threads {
            pool = pool.with_threads(threads);
        }
        init_thread_pool(&pool)?;
        log::info!("using {} worker threads", current_num_threads());
    }

    println!("isomesh terrain demo");
    println!("====================");
    println!(
        "grid {}³, scale {}, surface level {}, voxel size {}",
        params.grid_size, params.scale, params.surface_level, params.voxel_size
    );

    let pipeline = TerrainPipeline::new(TerrainDensity::new(params.grid_size))
        .with_parallel(parallel);
    let result = pipeline.regenerate(&params)?;
    let mesh = &result.mesh;

    if let Some((lo, hi)) = result.density_range {
        println!("density range: [{:.4}, {:.4}]", lo, hi);
    }
    println!("cells scanned: {}", result.cell_count);
    println!("vertices: {}", mesh.vertex_count());
    println!("triangles: {}", mesh.triangle_count());
    println!("buffer size: {} bytes", mesh.as_bytes().len());

    match mesh.bounding_box() {
        Some((min, max)) => println!(
            "bounds: ({:.3}, {:.3}, {:.3}) .. ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        ),
        None => println!("bounds: empty mesh"),
    }
    println!("processing time: {:.3} ms", result.processing_time * 1000.0);

    Ok(())
}
