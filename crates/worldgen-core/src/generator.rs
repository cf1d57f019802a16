//! Pipeline Orchestrator (C8): drives every component through the
//! one-way state machine described in spec §4.8.

use tracing::{info, info_span};

use crate::climate;
use crate::elevation;
use crate::error::ErrorKind;
use crate::ffi::{CancelToken, NativePlateDriver, PlateKinematics};
use crate::grid::Grid;
use crate::hydrology::{self, pit_filling::PreservedBasin};
use crate::params::GenerationParams;

/// One-way pipeline state, advanced exclusively by [`generate`]. Exists to
/// document the transition order; not exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Created,
    PlatesRunning,
    PlatesDone,
    ElevationPostProcessed,
    ClimateComputed,
    HydrologyComputed,
    Finalized,
}

/// Aggregate of every field named in spec §3, produced by exactly one
/// complete `generate` call. There is no partial result on error.
pub struct WorldGenerationResult {
    pub width: u32,
    pub height: u32,

    /// Post-processed `H` (after C2). Immutable from here on.
    pub heightmap: Grid<f32>,
    /// `H'`: the pit-filled copy hydrology is built on.
    pub filled_heightmap: Grid<f32>,

    pub plates: Grid<u32>,
    pub kinematics: Vec<PlateKinematics>,

    pub ocean_mask: Grid<bool>,
    pub sea_depth: Grid<f32>,

    pub temperature: Grid<f32>,
    pub precipitation_base: Grid<f32>,
    pub precipitation_rain_shadow: Grid<f32>,
    pub precipitation_final: Grid<f32>,

    pub flow_directions: Grid<i8>,
    pub flow_accumulation: Grid<f32>,
    pub river_sources: Vec<(usize, usize)>,
    pub preserved_basins: Vec<PreservedBasin>,

    /// Sinks present in the raw heightmap before pit filling, kept for
    /// visualization (spec §6.1).
    pub pre_filling_local_minima: Vec<(usize, usize)>,
}

/// Run the full world generation pipeline. Single-threaded from the
/// caller's perspective: runs to completion on the calling thread and does
/// not suspend (spec §5).
pub fn generate(
    params: GenerationParams,
    cancel: Option<&dyn CancelToken>,
) -> Result<WorldGenerationResult, ErrorKind> {
    let span = info_span!("generate", seed = params.seed, width = params.width, height = params.height);
    let _enter = span.enter();

    params.validate()?;
    let mut phase = Phase::Created;

    info!(?phase, "pipeline starting");
    phase = Phase::PlatesRunning;
    let plates_output = NativePlateDriver::run(&params, cancel)?;
    phase = Phase::PlatesDone;
    info!(?phase, plate_count = plates_output.kinematics.len(), "native plate-tectonics run complete");

    check_cancelled(cancel)?;

    let mut heightmap = plates_output.heightmap;
    elevation::add_noise(&mut heightmap, params.seed, params.noise_scale, params.noise_amplitude);
    elevation::place_oceans_at_borders(&mut heightmap, params.ocean_border_reduction);
    let ocean_mask = elevation::fill_ocean(&heightmap, params.sea_level);
    let sea_depth = elevation::compute_sea_depth(&heightmap, &ocean_mask, params.sea_level);
    phase = Phase::ElevationPostProcessed;
    info!(?phase, "elevation post-processing complete");

    check_cancelled(cancel)?;

    let climate_result = climate::run(&heightmap, &ocean_mask, &params);
    phase = Phase::ClimateComputed;
    info!(?phase, "climate stack complete");

    check_cancelled(cancel)?;

    let pre_filling_local_minima = find_pre_filling_sinks(&heightmap, &ocean_mask);
    let hydrology_result =
        hydrology::run(&heightmap, &ocean_mask, &climate_result.precipitation_final, &params)?;
    phase = Phase::HydrologyComputed;
    info!(
        ?phase,
        basins = hydrology_result.basins.len(),
        sources = hydrology_result.river_sources.len(),
        "hydrology complete"
    );

    phase = Phase::Finalized;
    info!(?phase, "pipeline finished");

    Ok(WorldGenerationResult {
        width: params.width,
        height: params.height,
        heightmap,
        filled_heightmap: hydrology_result.filled,
        plates: plates_output.plates,
        kinematics: plates_output.kinematics,
        ocean_mask,
        sea_depth,
        temperature: climate_result.temperature,
        precipitation_base: climate_result.precipitation_base,
        precipitation_rain_shadow: climate_result.precipitation_rain_shadow,
        precipitation_final: climate_result.precipitation_final,
        flow_directions: hydrology_result.flow_directions,
        flow_accumulation: hydrology_result.flow_accumulation,
        river_sources: hydrology_result.river_sources,
        preserved_basins: hydrology_result.basins,
        pre_filling_local_minima,
    })
}

fn check_cancelled(cancel: Option<&dyn CancelToken>) -> Result<(), ErrorKind> {
    if let Some(c) = cancel {
        if c.is_cancelled() {
            return Err(ErrorKind::cancelled("cancelled at a pipeline phase boundary"));
        }
    }
    Ok(())
}

/// Local minima in the raw (unfilled) heightmap: non-ocean cells with no
/// strictly-lower 4-connected neighbour. Computed purely for the
/// visualization-facing `pre_filling_local_minima` output; not consumed
/// downstream.
fn find_pre_filling_sinks(hf: &Grid<f32>, ocean: &Grid<bool>) -> Vec<(usize, usize)> {
    let width = hf.width();
    let height = hf.height();
    let mut sinks = Vec::new();

    for y in 0..height {
        for x in 0..width {
            if *ocean.get(x, y) {
                continue;
            }
            let here = *hf.get(x, y);
            let mut has_lower = false;
            for (dx, dy) in [(0i64, -1i64), (0, 1), (-1, 0), (1, 0), (-1, -1), (1, -1), (-1, 1), (1, 1)] {
                let nx = x as i64 + dx;
                let ny = y as i64 + dy;
                if !hf.in_bounds(nx, ny) {
                    continue;
                }
                if *hf.get(nx as usize, ny as usize) < here {
                    has_lower = true;
                    break;
                }
            }
            if !has_lower {
                sinks.push((x, y));
            }
        }
    }

    sinks
}
