use crate::ndvi_pipeline::common::error::RenderError;
use crate::ndvi_pipeline::config::AnalysisConfig;
use crate::ndvi_pipeline::index::NdviField;

/// An encoded preview image
#[derive(Debug, Clone, PartialEq)]
pub struct Heatmap {
    pub width: usize,
    pub height: usize,
    /// PNG-encoded RGB bytes
    pub png: Vec<u8>,
}

pub trait PreviewRenderer: Send + Sync {
    fn render(&self, field: &NdviField, config: &AnalysisConfig) -> Result<Heatmap, RenderError>;
}
