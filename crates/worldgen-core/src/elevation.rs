//! Elevation post-processing: noise injection, border ocean shaping,
//! flood-fill ocean classification, sea-depth derivation (spec §4.2).

use std::collections::VecDeque;

use crate::grid::Grid;
use crate::noise::Fbm2D;

/// Salt XOR'd into `params.seed` so the elevation noise stream is
/// independent of every other phase's RNG stream (spec §9: per-phase
/// seeding, never one shared global RNG).
const NOISE_SALT: u32 = 0xE1E7_0001;

/// Add a coherent multi-octave noise field to `hf` in place, then clamp
/// every cell to `[0, 1]`. `amplitude = 0.0` is a no-op (spec §8 property
/// 13).
pub fn add_noise(hf: &mut Grid<f32>, seed: u32, scale: f32, amplitude: f32) {
    if amplitude == 0.0 {
        return;
    }
    let width = hf.width();
    let height = hf.height();
    let fbm = Fbm2D::new(seed ^ NOISE_SALT, 6);
    let freq = scale as f64 / width.max(height) as f64;

    for y in 0..height {
        for x in 0..width {
            let n = fbm.sample(x as f64 * freq, y as f64 * freq) as f32;
            let v = (*hf.get(x, y) + n * amplitude).clamp(0.0, 1.0);
            hf.set(x, y, v);
        }
    }
}

/// Force every outer-ring cell's elevation down to at most `reduction`
/// (spec §4.2 step 2). Interior cells are untouched. Idempotent (spec §8
/// property 14).
pub fn place_oceans_at_borders(hf: &mut Grid<f32>, reduction: f32) {
    let width = hf.width();
    let height = hf.height();
    if width == 0 || height == 0 {
        return;
    }
    for x in 0..width {
        for &y in &[0usize, height - 1] {
            let v = hf.get(x, y).min(reduction);
            hf.set(x, y, v);
        }
    }
    for y in 0..height {
        for &x in &[0usize, width - 1] {
            let v = hf.get(x, y).min(reduction);
            hf.set(x, y, v);
        }
    }
}

/// Flood-fill ocean classification (spec §4.2 step 3). A cell is ocean iff
/// reachable from the outer ring, 4-connected, through cells whose
/// elevation is strictly below `sea_level`. No wraparound (spec: no
/// toroidal topology); sub-sea-level pools not reachable from the border
/// are landlocked lakes, not ocean.
pub fn fill_ocean(hf: &Grid<f32>, sea_level: f32) -> Grid<bool> {
    let width = hf.width();
    let height = hf.height();
    let mut ocean = Grid::new(width, height, false);
    if width == 0 || height == 0 {
        return ocean;
    }

    let mut queue = VecDeque::new();
    let mut seed_border = |x: usize, y: usize, ocean: &mut Grid<bool>, queue: &mut VecDeque<(usize, usize)>| {
        if !*ocean.get(x, y) && *hf.get(x, y) < sea_level {
            ocean.set(x, y, true);
            queue.push_back((x, y));
        }
    };

    for x in 0..width {
        seed_border(x, 0, &mut ocean, &mut queue);
        seed_border(x, height - 1, &mut ocean, &mut queue);
    }
    for y in 0..height {
        seed_border(0, y, &mut ocean, &mut queue);
        seed_border(width - 1, y, &mut ocean, &mut queue);
    }

    while let Some((x, y)) = queue.pop_front() {
        for (dx, dy) in [(0i64, -1i64), (0, 1), (-1, 0), (1, 0)] {
            let nx = x as i64 + dx;
            let ny = y as i64 + dy;
            if nx < 0 || ny < 0 || nx as usize >= width || ny as usize >= height {
                continue;
            }
            let (nx, ny) = (nx as usize, ny as usize);
            if !*ocean.get(nx, ny) && *hf.get(nx, ny) < sea_level {
                ocean.set(nx, ny, true);
                queue.push_back((nx, ny));
            }
        }
    }

    ocean
}

/// Normalized sea depth in `[0, 1]`, zero on land, anti-aliased at the
/// shoreline (spec §4.2 step 4).
pub fn compute_sea_depth(hf: &Grid<f32>, ocean: &Grid<bool>, sea_level: f32) -> Grid<f32> {
    let width = hf.width();
    let height = hf.height();
    let mut depth = Grid::new(width, height, 0.0f32);

    let min_ocean_h = hf
        .iter_coords()
        .filter(|&(x, y, _)| *ocean.get(x, y))
        .map(|(_, _, &v)| v)
        .fold(f32::INFINITY, f32::min);

    let denom = sea_level - min_ocean_h;
    if !denom.is_finite() || denom <= f32::EPSILON {
        return depth;
    }

    for y in 0..height {
        for x in 0..width {
            if *ocean.get(x, y) {
                let d = (sea_level - *hf.get(x, y)) / denom;
                depth.set(x, y, d.clamp(0.0, 1.0));
            }
        }
    }

    // Single anti-aliasing pass at the shoreline: ocean cells adjacent to
    // land are pulled toward zero, weighted by the fraction of land
    // neighbours, so the coastline doesn't show a hard depth step.
    let mut smoothed = depth.clone();
    for y in 0..height {
        for x in 0..width {
            if !*ocean.get(x, y) {
                continue;
            }
            let mut land_neighbours = 0u32;
            let mut total_neighbours = 0u32;
            for (dx, dy) in [(0i64, -1i64), (0, 1), (-1, 0), (1, 0)] {
                let nx = x as i64 + dx;
                let ny = y as i64 + dy;
                if nx < 0 || ny < 0 || nx as usize >= width || ny as usize >= height {
                    continue;
                }
                total_neighbours += 1;
                if !*ocean.get(nx as usize, ny as usize) {
                    land_neighbours += 1;
                }
            }
            if land_neighbours > 0 && total_neighbours > 0 {
                let land_frac = land_neighbours as f32 / total_neighbours as f32;
                let original = *depth.get(x, y);
                smoothed.set(x, y, original * (1.0 - 0.5 * land_frac));
            }
        }
    }

    smoothed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(width: usize, height: usize, v: f32) -> Grid<f32> {
        Grid::new(width, height, v)
    }

    #[test]
    fn add_noise_zero_amplitude_is_noop() {
        let mut hf = uniform(8, 8, 0.4);
        let before = hf.clone();
        add_noise(&mut hf, 1, 6.0, 0.0);
        for (x, y, v) in hf.iter_coords() {
            assert_eq!(*v, *before.get(x, y));
        }
    }

    #[test]
    fn add_noise_deterministic() {
        let mut a = uniform(16, 16, 0.4);
        let mut b = uniform(16, 16, 0.4);
        add_noise(&mut a, 99, 6.0, 0.1);
        add_noise(&mut b, 99, 6.0, 0.1);
        assert_eq!(a.as_slice(), b.as_slice());
    }

    #[test]
    fn add_noise_clamps_to_unit_range() {
        let mut hf = uniform(16, 16, 0.95);
        add_noise(&mut hf, 5, 6.0, 0.5);
        for &v in hf.iter() {
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn place_oceans_at_borders_sets_ring_only() {
        let mut hf = uniform(5, 5, 0.9);
        place_oceans_at_borders(&mut hf, 0.2);
        for x in 0..5 {
            assert!(*hf.get(x, 0) <= 0.2);
            assert!(*hf.get(x, 4) <= 0.2);
        }
        for y in 0..5 {
            assert!(*hf.get(0, y) <= 0.2);
            assert!(*hf.get(4, y) <= 0.2);
        }
        assert_eq!(*hf.get(2, 2), 0.9);
    }

    #[test]
    fn place_oceans_at_borders_idempotent() {
        let mut once = uniform(6, 6, 0.9);
        place_oceans_at_borders(&mut once, 0.25);
        let mut twice = once.clone();
        place_oceans_at_borders(&mut twice, 0.25);
        assert_eq!(once.as_slice(), twice.as_slice());
    }

    /// S4: border at 0.3, interior at 0.9, sea_level 0.5.
    #[test]
    fn s4_border_ocean_ring() {
        let mut hf = uniform(5, 5, 0.9);
        for x in 0..5 {
            hf.set(x, 0, 0.3);
            hf.set(x, 4, 0.3);
        }
        for y in 0..5 {
            hf.set(0, y, 0.3);
            hf.set(4, y, 0.3);
        }
        let ocean = fill_ocean(&hf, 0.5);
        for x in 0..5 {
            assert!(*ocean.get(x, 0));
            assert!(*ocean.get(x, 4));
        }
        assert!(!*ocean.get(2, 2));

        let depth = compute_sea_depth(&hf, &ocean, 0.5);
        assert_eq!(*depth.get(2, 2), 0.0);
        assert!(*depth.get(0, 0) > 0.0);
    }

    /// S5: landlocked sub-sea-level pool at the centre of an all-high grid
    /// is not ocean.
    #[test]
    fn s5_landlocked_lake_is_not_ocean() {
        let mut hf = uniform(5, 5, 0.8);
        hf.set(2, 2, 0.3);
        let ocean = fill_ocean(&hf, 0.5);
        for &v in ocean.iter() {
            assert!(!v, "no cell should be classified as ocean");
        }
    }

    #[test]
    fn sea_depth_is_zero_on_land_and_bounded_on_ocean() {
        let mut hf = uniform(6, 6, 0.9);
        place_oceans_at_borders(&mut hf, 0.1);
        let ocean = fill_ocean(&hf, 0.5);
        let depth = compute_sea_depth(&hf, &ocean, 0.5);
        for (x, y, &d) in depth.iter_coords() {
            if *ocean.get(x, y) {
                assert!((0.0..=1.0).contains(&d));
            } else {
                assert_eq!(d, 0.0);
            }
        }
    }
}
