//! Climate stack: temperature, base precipitation, rain-shadow blocking,
//! coastal moisture enhancement (spec §4.3-§4.6).

pub mod coastal_moisture;
pub mod precipitation;
pub mod rain_shadow;
pub mod temperature;
pub mod wind;

use tracing::debug;

use crate::grid::Grid;
use crate::params::GenerationParams;

/// Output of the full climate stack: temperature and the three aligned
/// precipitation layers named in spec §3 (`P_base`, `P_rs`, `P_final`).
pub struct ClimateResult {
    pub temperature: Grid<f32>,
    pub precipitation_base: Grid<f32>,
    pub precipitation_rain_shadow: Grid<f32>,
    pub precipitation_final: Grid<f32>,
}

/// Run C3 -> C4 -> C5 -> C6 in sequence.
pub fn run(hf: &Grid<f32>, ocean: &Grid<bool>, params: &GenerationParams) -> ClimateResult {
    debug!(phase = "temperature", "computing temperature field");
    let temperature = temperature::compute(hf, params);

    debug!(phase = "precipitation_base", "computing base precipitation");
    let precipitation_base = precipitation::compute_base(&temperature, params);

    debug!(phase = "rain_shadow", "applying rain-shadow blocking");
    let precipitation_rain_shadow = rain_shadow::apply(&precipitation_base, hf, ocean, params.sea_level);

    debug!(phase = "coastal_moisture", "applying coastal moisture enhancement");
    let precipitation_final = coastal_moisture::apply(&precipitation_rain_shadow, hf, ocean);

    ClimateResult { temperature, precipitation_base, precipitation_rain_shadow, precipitation_final }
}
