use serde::Serialize;

use crate::ndvi_pipeline::common::error::{AnalysisError, Result};
use crate::ndvi_pipeline::index::ndvi::NdviField;

/// Summary of an NDVI field
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NdviStats {
    /// Mean NDVI, 3 decimals
    pub mean_ndvi: f64,
    /// Percentage of pixels above the health threshold, 1 decimal
    pub healthy_pct: f64,
    /// Finite elements the statistics were computed over
    pub valid_pixels: usize,
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Reduces the field to its mean and healthy-vegetation percentage.
///
/// Non-finite elements are left out of both figures; a field with none
/// finite is an error rather than a misleading zero.
pub fn summarize(field: &NdviField, healthy_threshold: f64) -> Result<NdviStats> {
    // Compared in f32 so a value equal to the threshold is never healthy.
    let threshold = healthy_threshold as f32;
    let (sum, valid, healthy) = field
        .values
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0f64, 0usize, 0usize), |(sum, valid, healthy), &v| {
            (sum + f64::from(v), valid + 1, healthy + usize::from(v > threshold))
        });

    if valid == 0 {
        return Err(AnalysisError::NoFiniteValues);
    }

    Ok(NdviStats {
        mean_ndvi: round_to(sum / valid as f64, 3),
        healthy_pct: round_to(healthy as f64 / valid as f64 * 100.0, 1),
        valid_pixels: valid,
    })
}
