use tracing::debug;

use crate::ndvi_pipeline::bands::Band;
use crate::ndvi_pipeline::config::AnalysisConfig;

/// Radiometric scale guessed from a band's maximum sample.
///
/// A heuristic, not a calibration: no sensor metadata is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Radiometry {
    /// Already reflectance in [0,1]
    UnitRange,
    /// 8-bit digital numbers
    EightBit,
    /// Reflectance scaled by 10000 (16-bit surface reflectance products)
    ScaledReflectance,
}

impl Radiometry {
    pub fn detect(max: f32, config: &AnalysisConfig) -> Self {
        if max <= config.unit_range_ceiling {
            Radiometry::UnitRange
        } else if max > config.eight_bit_ceiling {
            Radiometry::ScaledReflectance
        } else {
            Radiometry::EightBit
        }
    }

    pub fn divisor(&self, config: &AnalysisConfig) -> Option<f32> {
        match self {
            Radiometry::UnitRange => None,
            Radiometry::EightBit => Some(config.eight_bit_scale),
            Radiometry::ScaledReflectance => Some(config.reflectance_scale),
        }
    }
}

/// Rescales a raw band into the [0,1] reflectance domain.
pub fn normalize(mut band: Band, config: &AnalysisConfig) -> Band {
    let max = band.max();
    let radiometry = Radiometry::detect(max, config);
    debug!(max, ?radiometry, "Normalizing band");

    if let Some(divisor) = radiometry.divisor(config) {
        band.data.iter_mut().for_each(|v| *v /= divisor);
    }
    band
}
