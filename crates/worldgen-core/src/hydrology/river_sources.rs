//! River source identification by precipitation-weighted accumulation
//! percentile, deduplicated by Chebyshev spacing (spec §4.7.4).

use crate::grid::Grid;
use crate::params::GenerationParams;

/// Percentile (e.g. `0.98`) of `accum_precip` over land cells only.
fn land_percentile(accum_precip: &Grid<f32>, ocean: &Grid<bool>, percentile: f32) -> f32 {
    let mut values: Vec<f32> =
        accum_precip.iter_coords().filter(|&(x, y, _)| !*ocean.get(x, y)).map(|(_, _, &v)| v).collect();
    if values.is_empty() {
        return f32::INFINITY;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let idx = ((values.len() as f32 - 1.0) * percentile).round() as usize;
    values[idx.min(values.len() - 1)]
}

/// Enumerate accepted river sources in raster order, applying
/// first-come-first-served Chebyshev spacing.
pub fn find(
    filled: &Grid<f32>,
    ocean: &Grid<bool>,
    accum_precip: &Grid<f32>,
    params: &GenerationParams,
) -> Vec<(usize, usize)> {
    let width = filled.width();
    let height = filled.height();
    let threshold = land_percentile(accum_precip, ocean, params.river_source_percentile);
    let spacing = params.min_source_spacing as i64;

    let mut accepted: Vec<(usize, usize)> = Vec::new();
    for y in 0..height {
        for x in 0..width {
            if *ocean.get(x, y) {
                continue;
            }
            if *filled.get(x, y) < params.mountain_level {
                continue;
            }
            if *accum_precip.get(x, y) < threshold {
                continue;
            }

            let too_close = accepted.iter().any(|&(ax, ay)| {
                let dx = (ax as i64 - x as i64).abs();
                let dy = (ay as i64 - y as i64).abs();
                dx.max(dy) < spacing
            });
            if !too_close {
                accepted.push((x, y));
            }
        }
    }

    accepted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> GenerationParams {
        GenerationParams {
            width: 10,
            height: 10,
            mountain_level: 0.5,
            river_source_percentile: 0.9,
            min_source_spacing: 3,
            ..GenerationParams::default()
        }
    }

    #[test]
    fn low_elevation_cells_are_never_sources() {
        let width = 10;
        let height = 10;
        let filled = Grid::new(width, height, 0.2);
        let ocean = Grid::new(width, height, false);
        let accum = Grid::new(width, height, 100.0);
        let sources = find(&filled, &ocean, &accum, &params());
        assert!(sources.is_empty());
    }

    #[test]
    fn spacing_is_enforced_first_come_first_served() {
        let width = 10;
        let height = 10;
        let filled = Grid::new(width, height, 0.9);
        let ocean = Grid::new(width, height, false);
        let mut accum = Grid::new(width, height, 0.0);
        accum.set(0, 0, 100.0);
        accum.set(1, 0, 100.0); // within spacing of (0,0), rejected
        accum.set(9, 9, 100.0); // far away, accepted
        let mut p = params();
        p.river_source_percentile = 0.5;
        let sources = find(&filled, &ocean, &accum, &p);
        assert!(sources.contains(&(0, 0)));
        assert!(!sources.contains(&(1, 0)));
        assert!(sources.contains(&(9, 9)));
    }

    #[test]
    fn ocean_cells_are_never_sources() {
        let width = 6;
        let height = 6;
        let filled = Grid::new(width, height, 0.9);
        let mut ocean = Grid::new(width, height, false);
        ocean.set(2, 2, true);
        let mut accum = Grid::new(width, height, 0.0);
        accum.set(2, 2, 1000.0);
        let mut p = params();
        p.river_source_percentile = 0.1;
        let sources = find(&filled, &ocean, &accum, &p);
        assert!(!sources.contains(&(2, 2)));
    }
}
