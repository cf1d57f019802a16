//! Immutable configuration for one generation run (spec §3).

use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;

/// Full parameter vector for one [`crate::generator::generate`] call.
///
/// Immutable for the lifetime of a run. `Default` is calibrated to
/// Earth-like values; the tuning knobs (`min_basin_area`,
/// `min_basin_depth`, `river_source_percentile`, `min_source_spacing`) are
/// open questions in the source spec pinned here with documented defaults —
/// changing any of them changes every downstream field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationParams {
    pub seed: u32,
    pub width: u32,
    pub height: u32,
    pub plate_count: u32,

    /// Elevation threshold below which a cell is water, in `[0, 1]`.
    pub sea_level: f32,
    /// Elevation ceiling forced onto the outer ring before ocean flood-fill.
    pub ocean_border_reduction: f32,

    /// AddNoise spatial frequency (cycles per grid width), > 0.
    pub noise_scale: f32,
    /// AddNoise amplitude; 0.0 makes AddNoise a no-op.
    pub noise_amplitude: f32,

    /// 0.5 = temperature peak at the equator.
    pub axial_tilt_normalized: f32,
    pub distance_to_sun: f32,
    /// Elevation above which altitude cooling and river-source eligibility kick in.
    pub mountain_level: f32,

    pub gamma_curve: f32,
    pub curve_offset: f32,

    /// Native solver tuning, forwarded verbatim to `create` (spec §6.2).
    pub cycle_count: u32,
    pub folding_ratio: f32,
    pub erosion_period: u32,
    pub aggr_overlap_abs: u32,
    pub aggr_overlap_rel: f32,

    /// Minimum 4-connected area (cells) for a filled pit to be preserved as a lake.
    pub min_basin_area: u32,
    /// Minimum (surface - floor) elevation for a filled pit to be preserved as a lake.
    pub min_basin_depth: f32,
    /// Percentile (0-1) of land-cell precipitation-weighted accumulation a
    /// river source must meet or exceed.
    pub river_source_percentile: f32,
    /// Minimum Chebyshev spacing between accepted river sources.
    pub min_source_spacing: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            seed: 42,
            width: 512,
            height: 256,
            plate_count: 12,
            sea_level: 0.5,
            ocean_border_reduction: 0.1,
            noise_scale: 6.0,
            noise_amplitude: 0.05,
            axial_tilt_normalized: 0.5,
            distance_to_sun: 1.0,
            mountain_level: 0.8,
            gamma_curve: 1.25,
            curve_offset: 0.2,
            cycle_count: 2,
            folding_ratio: 0.02,
            erosion_period: 60,
            aggr_overlap_abs: 1_000_000,
            aggr_overlap_rel: 0.33,
            min_basin_area: 8,
            min_basin_depth: 0.02,
            river_source_percentile: 0.98,
            min_source_spacing: 4,
        }
    }
}

impl GenerationParams {
    /// Cheap precondition check run first by the orchestrator (spec §7:
    /// each component is pure given valid inputs; invalid inputs are a typed
    /// error, never a panic).
    pub fn validate(&self) -> Result<(), ErrorKind> {
        if self.width < 3 || self.height < 3 {
            return Err(ErrorKind::invalid_params(format!(
                "width/height must be >= 3, got {}x{}",
                self.width, self.height
            )));
        }
        if self.plate_count == 0 {
            return Err(ErrorKind::invalid_params("plate_count must be >= 1"));
        }
        if !(0.0..=1.0).contains(&self.sea_level) {
            return Err(ErrorKind::invalid_params(format!(
                "sea_level must be in [0,1], got {}",
                self.sea_level
            )));
        }
        if !(0.0..=1.0).contains(&self.axial_tilt_normalized) {
            return Err(ErrorKind::invalid_params(format!(
                "axial_tilt_normalized must be in [0,1], got {}",
                self.axial_tilt_normalized
            )));
        }
        if !(0.0..=1.0).contains(&self.river_source_percentile) {
            return Err(ErrorKind::invalid_params(format!(
                "river_source_percentile must be in [0,1], got {}",
                self.river_source_percentile
            )));
        }
        if self.noise_scale <= 0.0 {
            return Err(ErrorKind::invalid_params("noise_scale must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_validate() {
        assert!(GenerationParams::default().validate().is_ok());
    }

    #[test]
    fn rejects_degenerate_grid() {
        let mut p = GenerationParams::default();
        p.width = 1;
        assert!(p.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_sea_level() {
        let mut p = GenerationParams::default();
        p.sea_level = 1.5;
        assert!(p.validate().is_err());
    }
}
