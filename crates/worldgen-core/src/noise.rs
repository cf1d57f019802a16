//! Coherent multi-octave noise shared by the elevation and climate stages.
//!
//! Octave summation follows the same gain/lacunarity fBm loop used
//! throughout this codebase's terrain generators: `gain = lacunarity^(-H)`,
//! amplitude decaying by `gain` and frequency growing by `lacunarity` each
//! octave.

use noise::{NoiseFn, Perlin};

/// A seedable multi-octave Perlin fBm sampler.
///
/// `sample` returns an unnormalized value, typically within roughly `[-1,
/// 1]` for a handful of octaves; callers normalize as needed.
pub struct Fbm2D {
    perlin: Perlin,
    octaves: u32,
    gain: f64,
    lacunarity: f64,
}

impl Fbm2D {
    pub fn new(seed: u32, octaves: u32) -> Self {
        Self { perlin: Perlin::new(seed), octaves, gain: 0.5, lacunarity: 2.0 }
    }

    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let mut value = 0.0f64;
        let mut amp = 1.0f64;
        let mut freq = 1.0f64;
        for _ in 0..self.octaves {
            value += amp * self.perlin.get([x * freq, y * freq]);
            amp *= self.gain;
            freq *= self.lacunarity;
        }
        value
    }
}

/// Width (in grid columns) of the seam-blending band used by
/// [`wrap_x_noise`]. Fixed fraction of the grid width, at least 2 columns.
fn seam_border(width: usize) -> usize {
    (width / 32).max(2).min(width.max(1) / 2)
}

/// Evaluate `fbm` at grid cell `(x, y)` with the x-axis wrapped at `x =
/// width`, per the noise-wrap-seam contract: a naive multi-octave sample
/// shows a visible east-west discontinuity, so the first/last `seam_border`
/// columns blend the normal sample with a sample taken as if continuing
/// past the opposite edge.
///
/// `freq` is the per-axis sampling frequency (cycles per grid unit).
pub fn wrap_x_noise(
    fbm: &Fbm2D,
    x: usize,
    y: usize,
    width: usize,
    freq_x: f64,
    freq_y: f64,
) -> f64 {
    let sample_at = |xi: f64| fbm.sample(xi * freq_x, y as f64 * freq_y);
    let border = seam_border(width);
    let w = width as f64;

    if x < border {
        let t = x as f64 / border as f64;
        let wrapped = sample_at(x as f64 + w);
        let normal = sample_at(x as f64);
        wrapped * (1.0 - t) + normal * t
    } else if x + border >= width {
        let band_start = width - border;
        let t = (x - band_start) as f64 / border as f64;
        let normal = sample_at(x as f64);
        let wrapped = sample_at(x as f64 - w);
        normal * (1.0 - t) + wrapped * t
    } else {
        sample_at(x as f64)
    }
}
