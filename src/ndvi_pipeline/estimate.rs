//! Non-spectral estimate for plots whose imagery cannot be analysed.
//!
//! Scales with how much imagery was submitted, nothing more; callers use it
//! only when [`Analysis::Unresolved`](crate::ndvi_pipeline::Analysis) is returned.

use serde::Serialize;

use crate::ndvi_pipeline::index::round_to;

/// Tonnes of CO2 per hectare at NDVI 1.0
const CO2_TONNES_PER_HECTARE: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FallbackEstimate {
    pub ndvi: f64,
    pub growth_percent: f64,
    pub co2_tonnes: f64,
}

pub fn fallback_estimate(image_count: usize, area_hectares: f64) -> FallbackEstimate {
    let base = (0.3 + 0.1 * image_count as f64).clamp(0.2, 0.9);
    FallbackEstimate {
        ndvi: round_to(base, 3),
        growth_percent: round_to(base * 100.0, 2),
        co2_tonnes: round_to(area_hectares * CO2_TONNES_PER_HECTARE * base, 2),
    }
}
