//! Temperature field from latitude, axial tilt, coherent noise, and
//! altitude lapse rate (spec §4.3).

use crate::grid::Grid;
use crate::noise::{wrap_x_noise, Fbm2D};
use crate::params::GenerationParams;

const T_SALT: u32 = 0x7E4A_0002;

/// Floor multiplier applied at the maximum elevation above `mountain_level`.
const ALTITUDE_FLOOR: f32 = 0.033;

/// Piecewise-linear tent function through `(x0,0) -> (x1,1) -> (x2,0)`,
/// clamped to `[0, 1]` outside the three anchors.
fn tent(phi: f64, x0: f64, x1: f64, x2: f64) -> f64 {
    let v = if phi <= x0 {
        0.0
    } else if phi < x1 {
        (phi - x0) / (x1 - x0)
    } else if phi < x2 {
        1.0 - (phi - x1) / (x2 - x1)
    } else {
        0.0
    };
    v.clamp(0.0, 1.0)
}

/// Compute the normalized `[0, 1]` temperature field (spec §4.3).
pub fn compute(hf: &Grid<f32>, params: &GenerationParams) -> Grid<f32> {
    let width = hf.width();
    let height = hf.height();
    let mut t = Grid::new(width, height, 0.0f32);
    if width == 0 || height == 0 {
        return t;
    }

    let fbm = Fbm2D::new(params.seed ^ T_SALT, 8);
    let freq = 6.0 / width.max(height) as f64;
    let tilt = params.axial_tilt_normalized as f64;
    let max_elev = hf.max_value();
    let distance_sq = (params.distance_to_sun * params.distance_to_sun).max(f32::EPSILON);

    let denom = (height.max(2) - 1) as f64;
    for y in 0..height {
        let phi = y as f64 / denom;
        let latitude_factor = tent(phi, tilt - 0.5, tilt, tilt + 0.5);

        for x in 0..width {
            let noise = wrap_x_noise(&fbm, x, y, width, freq, freq);
            let base = ((latitude_factor * 12.0 + noise) / 13.0) as f32 / distance_sq;

            let elevation = *hf.get(x, y);
            let value = if elevation > params.mountain_level && max_elev > params.mountain_level {
                let t_alt = ((elevation - params.mountain_level) / (max_elev - params.mountain_level))
                    .clamp(0.0, 1.0);
                let altitude_factor = 1.0 - (1.0 - ALTITUDE_FLOOR) * t_alt;
                base * altitude_factor
            } else {
                base
            };
            t.set(x, y, value);
        }
    }

    t.normalize_unit();
    t
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> GenerationParams {
        GenerationParams { width: 32, height: 32, ..GenerationParams::default() }
    }

    #[test]
    fn temperature_is_normalized() {
        let hf = Grid::new(32, 32, 0.3);
        let t = compute(&hf, &params());
        assert!((t.min_value() - 0.0).abs() < 1e-6);
        assert!((t.max_value() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn temperature_is_deterministic() {
        let hf = Grid::new(32, 32, 0.3);
        let a = compute(&hf, &params());
        let b = compute(&hf, &params());
        assert_eq!(a.as_slice(), b.as_slice());
    }

    #[test]
    fn tent_function_peaks_at_center_anchor() {
        assert!((tent(0.5, 0.0, 0.5, 1.0) - 1.0).abs() < 1e-9);
        assert_eq!(tent(0.5, 0.0, 0.5, 1.0).max(0.0), tent(0.5, 0.0, 0.5, 1.0));
        assert_eq!(tent(-1.0, 0.0, 0.5, 1.0), 0.0);
        assert_eq!(tent(2.0, 0.0, 0.5, 1.0), 0.0);
    }

    #[test]
    fn high_elevation_cools_relative_to_lowland_at_same_latitude() {
        let mut p = params();
        p.mountain_level = 0.5;
        let mut hf = Grid::new(32, 32, 0.2);
        hf.set(16, 16, 0.95);
        let t = compute(&hf, &p);
        // Same row, compare the mountain cell against a flat neighbour.
        assert!(*t.get(16, 16) <= *t.get(15, 16) + 1e-6);
    }
}
