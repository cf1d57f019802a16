//! HydrologyCore (C7): pit filling, flow routing, accumulation, and river
//! source identification, run on a filled copy of the elevation field
//! (spec §4.7).

pub mod flow_accumulation;
pub mod flow_directions;
pub mod pit_filling;
pub mod river_sources;

use tracing::debug;

use crate::error::ErrorKind;
use crate::grid::Grid;
use crate::params::GenerationParams;
use pit_filling::PreservedBasin;

pub struct HydrologyResult {
    /// `H'`: the filled heightmap. `H` (the geological surface) is left
    /// untouched by this module.
    pub filled: Grid<f32>,
    pub flow_directions: Grid<i8>,
    pub flow_accumulation: Grid<f32>,
    pub river_sources: Vec<(usize, usize)>,
    pub basins: Vec<PreservedBasin>,
}

/// Run the full hydrology pipeline against a read-only copy of `hf`.
pub fn run(
    hf: &Grid<f32>,
    ocean: &Grid<bool>,
    precipitation: &Grid<f32>,
    params: &GenerationParams,
) -> Result<HydrologyResult, ErrorKind> {
    debug!(phase = "pit_filling", "running priority-flood pit filling");
    let fill_result = pit_filling::fill(hf, ocean, params.min_basin_area, params.min_basin_depth);

    debug!(phase = "flow_directions", "computing steepest-descent flow directions");
    let flow_directions = flow_directions::compute(&fill_result.filled, ocean);

    validate_sinks(&flow_directions, ocean, &fill_result.basins)?;

    debug!(phase = "flow_accumulation", "computing cell-count flow accumulation");
    let uniform = Grid::new(hf.width(), hf.height(), 1.0f32);
    let flow_accumulation = flow_accumulation::compute(&flow_directions, &uniform);

    debug!(phase = "flow_accumulation_precip", "computing precipitation-weighted flow accumulation");
    let accum_precip = flow_accumulation::compute(&flow_directions, precipitation);

    debug!(phase = "river_sources", "identifying river sources");
    let river_sources = river_sources::find(&fill_result.filled, ocean, &accum_precip, params);

    Ok(HydrologyResult {
        filled: fill_result.filled,
        flow_directions,
        flow_accumulation,
        river_sources,
        basins: fill_result.basins,
    })
}

/// Spot-check the invariant that sinks occur only at ocean cells and at
/// basin low points (spec §4.7.2, §4.7.5). A violation is a programmer
/// error, not a recoverable condition.
fn validate_sinks(
    dirs: &Grid<i8>,
    ocean: &Grid<bool>,
    basins: &[PreservedBasin],
) -> Result<(), ErrorKind> {
    let mut basin_cells = std::collections::HashSet::new();
    for basin in basins {
        for &cell in &basin.cells {
            basin_cells.insert(cell);
        }
    }

    for (x, y, &dir) in dirs.iter_coords() {
        if dir != -1 {
            continue;
        }
        if *ocean.get(x, y) {
            continue;
        }
        if basin_cells.contains(&(x, y)) {
            continue;
        }
        return Err(ErrorKind::hydrology_invariant_violated(format!(
            "unexpected sink at ({x},{y}) outside ocean and preserved basins"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_produces_consistent_fields() {
        let width = 12;
        let height = 12;
        let mut hf = Grid::new(width, height, 0.6);
        for x in 0..width {
            hf.set(x, 0, 0.1);
        }
        let mut ocean = Grid::new(width, height, false);
        for x in 0..width {
            ocean.set(x, 0, true);
        }
        let precipitation = Grid::new(width, height, 0.5);
        let params = GenerationParams { width: width as u32, height: height as u32, ..GenerationParams::default() };
        let result = run(&hf, &ocean, &precipitation, &params).expect("hydrology should succeed");
        assert_eq!(result.filled.width(), width);
        assert_eq!(result.flow_accumulation.height(), height);
    }

    /// A single deep 3x3-centred pit surrounded by uniformly higher land,
    /// with no ocean anywhere, never gets a flow direction out.
    #[test]
    fn isolated_pit_on_all_land_grid_is_a_permanent_sink() {
        let mut hf = Grid::new(3, 3, 3.0f32);
        hf.set(1, 1, 1.0);
        let ocean = Grid::new(3, 3, false);
        let dirs = flow_directions::compute(&hf, &ocean);
        assert_eq!(*dirs.get(1, 1), -1);
        for (x, y, &d) in dirs.iter_coords() {
            if (x, y) != (1, 1) {
                assert_ne!(d, -1);
            }
        }
    }

    /// A diagonal downhill ramp on all-land drains every cell toward the
    /// lowest corner via the south-east direction.
    #[test]
    fn diagonal_slope_drains_toward_low_corner() {
        let mut hf = Grid::new(3, 3, 0.0f32);
        for y in 0..3usize {
            for x in 0..3usize {
                hf.set(x, y, 5.0 - x as f32 - y as f32);
            }
        }
        let ocean = Grid::new(3, 3, false);
        let dirs = flow_directions::compute(&hf, &ocean);
        assert_eq!(*dirs.get(1, 1), 3); // SE
        assert_eq!(*dirs.get(0, 0), 3); // SE
        assert_eq!(*dirs.get(2, 2), -1); // global minimum
    }

    /// A perfectly flat field with no ocean has no drainage at all: every
    /// cell is its own sink and accumulation equals the source term.
    #[test]
    fn flat_field_has_no_drainage() {
        let width = 4;
        let height = 4;
        let hf = Grid::new(width, height, 2.0f32);
        let ocean = Grid::new(width, height, false);
        let dirs = flow_directions::compute(&hf, &ocean);
        for &d in dirs.iter() {
            assert_eq!(d, -1);
        }
        let source = Grid::new(width, height, 1.0f32);
        let accum = flow_accumulation::compute(&dirs, &source);
        for &a in accum.iter() {
            assert_eq!(a, 1.0);
        }
    }
}
