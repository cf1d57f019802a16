//! Offline driver for the worldgen pipeline: a manual-run tool and a
//! fixture generator for integration tests.

use anyhow::{Context, Result};
use clap::Parser;
use worldgen_core::GenerationParams;

#[derive(Parser, Debug)]
#[command(name = "worldgen-cli", about = "Offline world generation driver")]
struct Args {
    /// RNG seed for the run.
    #[arg(short, long, default_value_t = 42)]
    seed: u32,

    /// Grid width in cells.
    #[arg(long, default_value_t = 512)]
    width: u32,

    /// Grid height in cells.
    #[arg(long, default_value_t = 256)]
    height: u32,

    /// Number of tectonic plates.
    #[arg(long, default_value_t = 12)]
    plates: u32,

    /// Write the generated result as JSON to this path instead of printing
    /// a summary.
    #[arg(short, long)]
    output: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let params = GenerationParams {
        seed: args.seed,
        width: args.width,
        height: args.height,
        plate_count: args.plates,
        ..GenerationParams::default()
    };

    let result = worldgen_core::generate(params, None).context("world generation failed")?;

    match args.output {
        Some(path) => {
            let summary = Summary::from(&result);
            let json = serde_json::to_string_pretty(&summary).context("failed to serialize result")?;
            std::fs::write(&path, json).with_context(|| format!("failed to write {path}"))?;
            println!("wrote summary to {path}");
        }
        None => {
            println!(
                "generated {}x{} world: {} plates, {} preserved basins, {} river sources",
                result.width,
                result.height,
                result.kinematics.len(),
                result.preserved_basins.len(),
                result.river_sources.len(),
            );
        }
    }

    Ok(())
}

/// Lightweight JSON-serializable summary; the full grids are large and
/// not a stable on-disk format (spec §6.4: no file format is part of the
/// core contract), so only scalar and list fields are emitted here.
#[derive(serde::Serialize)]
struct Summary {
    width: u32,
    height: u32,
    plate_count: usize,
    preserved_basin_count: usize,
    river_source_count: usize,
    pre_filling_local_minima_count: usize,
}

impl From<&worldgen_core::WorldGenerationResult> for Summary {
    fn from(r: &worldgen_core::WorldGenerationResult) -> Self {
        Self {
            width: r.width,
            height: r.height,
            plate_count: r.kinematics.len(),
            preserved_basin_count: r.preserved_basins.len(),
            river_source_count: r.river_sources.len(),
            pre_filling_local_minima_count: r.pre_filling_local_minima.len(),
        }
    }
}
