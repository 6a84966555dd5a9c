//! Analysis result types

use serde::Serialize;

use crate::ndvi_pipeline::bands::UnresolvedReason;
use crate::ndvi_pipeline::common::error::RenderError;
use crate::ndvi_pipeline::preview::Heatmap;

/// Numeric NDVI results plus the best-effort preview
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    /// Mean NDVI in [-1,1], 3 decimals
    pub mean_ndvi: f64,
    /// Healthy-vegetation percentage in [0,100], 1 decimal
    pub healthy_pct: f64,
    /// Preview image, or why it could not be rendered
    pub heatmap: Result<Heatmap, RenderError>,
    /// Name of the band strategy that matched
    pub strategy: &'static str,
    /// (height, width) of the analysed bands
    pub shape: (usize, usize),
}

impl AnalysisOutcome {
    pub fn heatmap_png(&self) -> Option<&[u8]> {
        self.heatmap.as_ref().ok().map(|h| h.png.as_slice())
    }

    pub fn summary(&self) -> AnalysisSummary {
        AnalysisSummary {
            mean_ndvi: self.mean_ndvi,
            healthy_pct: self.healthy_pct,
            has_heatmap: self.heatmap.is_ok(),
            strategy: self.strategy,
        }
    }
}

/// The part of an outcome the metadata layer stores as JSON
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSummary {
    pub mean_ndvi: f64,
    pub healthy_pct: f64,
    pub has_heatmap: bool,
    pub strategy: &'static str,
}

/// Result of analysing one raster
#[derive(Debug, Clone)]
pub enum Analysis {
    Complete(AnalysisOutcome),
    /// No spectral analysis is possible for this asset; callers fall back
    /// to a non-spectral estimate.
    Unresolved(UnresolvedReason),
}

impl Analysis {
    pub fn outcome(&self) -> Option<&AnalysisOutcome> {
        match self {
            Analysis::Complete(outcome) => Some(outcome),
            Analysis::Unresolved(_) => None,
        }
    }

    pub fn into_outcome(self) -> Option<AnalysisOutcome> {
        match self {
            Analysis::Complete(outcome) => Some(outcome),
            Analysis::Unresolved(_) => None,
        }
    }
}
