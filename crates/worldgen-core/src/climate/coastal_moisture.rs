//! Coastal moisture enhancement from multi-source BFS distance to ocean
//! (spec §4.6).

use std::collections::VecDeque;

use crate::grid::Grid;

/// Multi-source BFS distance (in cells, 4-connected) to the nearest ocean
/// cell. Ocean cells have distance 0.
pub fn distance_to_ocean(ocean: &Grid<bool>) -> Grid<u32> {
    let width = ocean.width();
    let height = ocean.height();
    let mut dist = Grid::new(width, height, u32::MAX);
    let mut queue = VecDeque::new();

    for y in 0..height {
        for x in 0..width {
            if *ocean.get(x, y) {
                dist.set(x, y, 0);
                queue.push_back((x, y));
            }
        }
    }

    while let Some((x, y)) = queue.pop_front() {
        let d = *dist.get(x, y);
        for (dx, dy) in [(0i64, -1i64), (0, 1), (-1, 0), (1, 0)] {
            let nx = x as i64 + dx;
            let ny = y as i64 + dy;
            if !ocean.in_bounds(nx, ny) {
                continue;
            }
            let (nx, ny) = (nx as usize, ny as usize);
            if *dist.get(nx, ny) > d + 1 {
                dist.set(nx, ny, d + 1);
                queue.push_back((nx, ny));
            }
        }
    }

    dist
}

/// Apply coastal moisture enhancement to `p_rs`. Ocean cells pass through
/// unchanged; land cells gain rainfall that decays with distance from the
/// coast and with elevation.
pub fn apply(p_rs: &Grid<f32>, hf: &Grid<f32>, ocean: &Grid<bool>) -> Grid<f32> {
    let width = hf.width();
    let height = hf.height();
    let mut out = p_rs.clone();
    if width == 0 || height == 0 {
        return out;
    }

    let dist = distance_to_ocean(ocean);

    for y in 0..height {
        for x in 0..width {
            if *ocean.get(x, y) {
                continue;
            }
            let d = *dist.get(x, y) as f32;
            let bonus = 0.80 * (-d / 30.0).exp();
            let elev_factor = 1.0 - (*hf.get(x, y) * 0.02).min(1.0);
            let base = *p_rs.get(x, y);
            out.set(x, y, base * (1.0 + bonus * elev_factor));
        }
    }

    out
}
