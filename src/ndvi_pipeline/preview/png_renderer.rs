use std::io::Cursor;

use image::{ImageFormat, RgbImage};
use tracing::debug;

use crate::ndvi_pipeline::common::error::RenderError;
use crate::ndvi_pipeline::config::AnalysisConfig;
use crate::ndvi_pipeline::index::NdviField;
use crate::ndvi_pipeline::preview::ramp::ColorRamp;
use crate::ndvi_pipeline::preview::renderer::{Heatmap, PreviewRenderer};

/// Renders the preview as a lossless PNG.
pub struct PngPreviewRenderer;

/// `max(1, floor(max(height, width) / target))`
pub fn downsample_stride(height: usize, width: usize, target: usize) -> usize {
    (height.max(width) / target.max(1)).max(1)
}

/// Nearest-neighbor decimation keeping every `stride`-th row and column.
///
/// Returns the decimated (width, height, values).
pub fn downsample(field: &NdviField, stride: usize) -> (usize, usize, Vec<f32>) {
    let stride = stride.max(1);
    let width = field.width.div_ceil(stride);
    let height = field.height.div_ceil(stride);

    let values = field
        .values
        .chunks(field.width.max(1))
        .take(field.height)
        .step_by(stride)
        .flat_map(|row| row.iter().step_by(stride).copied())
        .collect();

    (width, height, values)
}

/// Maps NDVI values to interleaved RGB bytes.
pub fn colorize(values: &[f32], ramp: &ColorRamp) -> Vec<u8> {
    values
        .iter()
        .flat_map(|&v| {
            let c = ramp.for_ndvi(v);
            [c.r, c.g, c.b]
        })
        .collect()
}

impl PreviewRenderer for PngPreviewRenderer {
    fn render(&self, field: &NdviField, config: &AnalysisConfig) -> Result<Heatmap, RenderError> {
        if field.width == 0 || field.height == 0 || field.values.len() != field.width * field.height {
            return Err(RenderError::EmptyField);
        }

        let stride = downsample_stride(field.height, field.width, config.preview_target);
        let (width, height, values) = downsample(field, stride);
        debug!(stride, width, height, "Rendering NDVI preview");

        let rgb = colorize(&values, &config.ramp);
        let to_u32 = |n: usize| u32::try_from(n).map_err(|e| RenderError::Encode(e.to_string()));
        let image = RgbImage::from_raw(to_u32(width)?, to_u32(height)?, rgb)
            .ok_or_else(|| RenderError::Encode(format!("buffer does not fit {}x{}", width, height)))?;

        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| RenderError::Encode(e.to_string()))?;

        Ok(Heatmap { width, height, png })
    }
}
