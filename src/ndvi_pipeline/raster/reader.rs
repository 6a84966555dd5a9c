use crate::ndvi_pipeline::common::error::Result;
use crate::ndvi_pipeline::config::AnalysisConfig;
use crate::ndvi_pipeline::raster::types::RasterContainer;

pub trait RasterReader {
    /// Decodes a container, refusing pages the config's dimension limits rule out.
    fn read_container(&self, data: &[u8], config: &AnalysisConfig) -> Result<RasterContainer>;
}
