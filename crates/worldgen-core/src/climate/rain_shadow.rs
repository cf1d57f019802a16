//! Orographic rain-shadow blocking driven by prevailing winds (spec §4.5).

use super::wind::prevailing_wind;
use crate::grid::Grid;

/// Apply rain-shadow blocking to `p_base`. `ocean` marks cells exempt from
/// blocking (spec: ocean cells pass through unchanged).
pub fn apply(p_base: &Grid<f32>, hf: &Grid<f32>, ocean: &Grid<bool>, sea_level: f32) -> Grid<f32> {
    let width = hf.width();
    let height = hf.height();
    let mut out = p_base.clone();
    if width == 0 || height == 0 {
        return out;
    }

    let max_elevation = hf.max_value();
    let tau = 0.05 * (max_elevation - sea_level);
    let denom = (height.max(2) - 1) as f64;

    for y in 0..height {
        let phi = y as f64 / denom;
        let (wind_x, wind_y) = prevailing_wind(phi);
        // Upwind direction: the direction air arrives FROM.
        let (ux, uy) = (-wind_x, -wind_y);

        for x in 0..width {
            if *ocean.get(x, y) {
                continue;
            }

            let mut k = 0u32;
            let mut cx = x as i64;
            let mut cy = y as i64;
            for _ in 0..width.saturating_sub(1) {
                cx += ux;
                cy += uy;
                if !hf.in_bounds(cx, cy) {
                    break;
                }
                let elevation = *hf.get(cx as usize, cy as usize);
                if elevation - sea_level > tau {
                    k += 1;
                }
            }

            let beta = (0.05 * k as f32).min(0.80);
            let base = *p_base.get(x, y);
            out.set(x, y, base * (1.0 - beta));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ocean_cells_pass_through_unchanged() {
        let hf = Grid::new(8, 8, 0.3);
        let mut ocean = Grid::new(8, 8, false);
        ocean.set(4, 4, true);
        let p_base = Grid::new(8, 8, 0.6);
        let result = apply(&p_base, &hf, &ocean, 0.5);
        assert_eq!(*result.get(4, 4), 0.6);
    }

    #[test]
    fn mountain_range_upwind_reduces_downwind_precipitation() {
        // Westerlies band (phi in [1/3, 2/3]): wind blows east, upwind is west.
        let width = 16;
        let height = 16;
        let mut hf = Grid::new(width, height, 0.2);
        let y = height / 2;
        for x in 0..6 {
            hf.set(x, y, 0.95);
        }
        let ocean = Grid::new(width, height, false);
        let p_base = Grid::new(width, height, 0.8);
        let result = apply(&p_base, &hf, &ocean, 0.1);
        // A cell east of the range (downwind) should see blocking.
        assert!(*result.get(10, y) < *p_base.get(10, y));
    }

    #[test]
    fn blocking_factor_is_capped_at_eighty_percent() {
        let width = 64;
        let height = 16;
        let mut hf = Grid::new(width, height, 0.95);
        // Flat high plateau everywhere upwind: k will be large, beta saturates.
        for y in 0..height {
            hf.set(0, y, 0.95);
        }
        let ocean = Grid::new(width, height, false);
        let p_base = Grid::new(width, height, 1.0);
        let result = apply(&p_base, &hf, &ocean, 0.1);
        let y = height / 2;
        assert!(*result.get(width - 1, y) >= 0.2 - 1e-5);
    }

    /// Single mountain cell at mid-latitude under the Westerlies: the cell
    /// just downwind (east) sees mild blocking, the cell upwind (west) of
    /// the mountain is untouched.
    #[test]
    fn single_mountain_at_mid_latitude_under_westerlies() {
        let width = 4;
        let height = 5;
        let sea_level = 0.5;
        let mut hf = Grid::new(width, height, sea_level);
        hf.set(1, 2, 0.9);
        let ocean = Grid::new(width, height, false);
        let p_base = Grid::new(width, height, 1.0);
        let result = apply(&p_base, &hf, &ocean, sea_level);
        assert!((*result.get(3, 2) - 0.95).abs() < 1e-5);
        assert!((*result.get(0, 2) - 1.0).abs() < 1e-5);
    }
}
