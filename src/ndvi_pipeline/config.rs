//! Analysis configuration types
//!
//! Every heuristic constant the pipeline relies on lives here so product
//! policy can be tuned without touching the algorithms.

use crate::ndvi_pipeline::preview::ColorRamp;

/// Additive guard in the NDVI denominator.
pub const DEFAULT_EPSILON: f32 = 1e-6;

/// NDVI strictly above this value counts as healthy vegetation.
pub const DEFAULT_HEALTHY_THRESHOLD: f64 = 0.30;

/// Longest preview side the downsampling stride aims for.
pub const DEFAULT_PREVIEW_TARGET: usize = 1024;

/// Configuration for an NDVI analysis run
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub epsilon: f32,
    pub healthy_threshold: f64,
    /// Color ramp used by the preview renderer
    pub ramp: ColorRamp,
    pub preview_target: usize,
    /// Whether to render the preview image at all
    pub render_preview: bool,
    /// Red channel of an interleaved container.
    /// Assumes blue, green, red, near-infrared ordering; no per-file metadata confirms it.
    pub red_channel: usize,
    /// Near-infrared channel of an interleaved container
    pub nir_channel: usize,
    /// Fewest channels for which the interleaved convention applies
    pub min_interleaved_channels: usize,
    /// Case-folded substrings identifying a red page label
    pub red_keywords: Vec<String>,
    /// Case-folded substrings identifying a near-infrared page label
    pub nir_keywords: Vec<String>,
    /// Samples whose maximum is at or below this are already in [0,1]
    pub unit_range_ceiling: f32,
    /// Samples whose maximum is at or below this are 8-bit
    pub eight_bit_ceiling: f32,
    pub eight_bit_scale: f32,
    pub reflectance_scale: f32,
    /// Whether to check page dimensions before decoding pixel data
    pub validate_dimensions: bool,
    pub max_dimension: Option<usize>,
    /// Largest decoded buffer per page in bytes; `None` leaves the decoder unbounded
    pub decode_buffer_limit: Option<usize>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            healthy_threshold: DEFAULT_HEALTHY_THRESHOLD,
            ramp: ColorRamp::default(),
            preview_target: DEFAULT_PREVIEW_TARGET,
            render_preview: true,
            red_channel: 2,
            nir_channel: 3,
            min_interleaved_channels: 4,
            red_keywords: vec!["red".to_string()],
            nir_keywords: vec!["nir".to_string(), "near".to_string()],
            unit_range_ceiling: 1.5,
            eight_bit_ceiling: 255.0,
            eight_bit_scale: 255.0,
            reflectance_scale: 10000.0,
            validate_dimensions: true,
            max_dimension: Some(50000),
            decode_buffer_limit: None,
        }
    }
}

impl AnalysisConfig {
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }
}

/// Builder for AnalysisConfig
#[derive(Default)]
pub struct AnalysisConfigBuilder {
    epsilon: Option<f32>,
    healthy_threshold: Option<f64>,
    ramp: Option<ColorRamp>,
    preview_target: Option<usize>,
    render_preview: Option<bool>,
    interleaved_channels: Option<(usize, usize)>,
    min_interleaved_channels: Option<usize>,
    red_keywords: Option<Vec<String>>,
    nir_keywords: Option<Vec<String>>,
    validate_dimensions: Option<bool>,
    max_dimension: Option<Option<usize>>,
    decode_buffer_limit: Option<Option<usize>>,
}

impl AnalysisConfigBuilder {
    pub fn epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = Some(epsilon);
        self
    }

    pub fn healthy_threshold(mut self, threshold: f64) -> Self {
        self.healthy_threshold = Some(threshold);
        self
    }

    pub fn ramp(mut self, ramp: ColorRamp) -> Self {
        self.ramp = Some(ramp);
        self
    }

    pub fn preview_target(mut self, target: usize) -> Self {
        self.preview_target = Some(target);
        self
    }

    pub fn render_preview(mut self, enable: bool) -> Self {
        self.render_preview = Some(enable);
        self
    }

    pub fn interleaved_channels(mut self, red: usize, nir: usize) -> Self {
        self.interleaved_channels = Some((red, nir));
        self
    }

    pub fn min_interleaved_channels(mut self, channels: usize) -> Self {
        self.min_interleaved_channels = Some(channels);
        self
    }

    pub fn red_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.red_keywords = Some(keywords.into_iter().map(|k| k.into().to_lowercase()).collect());
        self
    }

    pub fn nir_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nir_keywords = Some(keywords.into_iter().map(|k| k.into().to_lowercase()).collect());
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn max_dimension(mut self, max: Option<usize>) -> Self {
        self.max_dimension = Some(max);
        self
    }

    pub fn decode_buffer_limit(mut self, limit: Option<usize>) -> Self {
        self.decode_buffer_limit = Some(limit);
        self
    }

    pub fn build(self) -> AnalysisConfig {
        let default = AnalysisConfig::default();
        let (red_channel, nir_channel) = self
            .interleaved_channels
            .unwrap_or((default.red_channel, default.nir_channel));
        AnalysisConfig {
            epsilon: self.epsilon.unwrap_or(default.epsilon),
            healthy_threshold: self.healthy_threshold.unwrap_or(default.healthy_threshold),
            ramp: self.ramp.unwrap_or(default.ramp),
            preview_target: self.preview_target.unwrap_or(default.preview_target),
            render_preview: self.render_preview.unwrap_or(default.render_preview),
            red_channel,
            nir_channel,
            min_interleaved_channels: self
                .min_interleaved_channels
                .unwrap_or(default.min_interleaved_channels),
            red_keywords: self.red_keywords.unwrap_or(default.red_keywords),
            nir_keywords: self.nir_keywords.unwrap_or(default.nir_keywords),
            unit_range_ceiling: default.unit_range_ceiling,
            eight_bit_ceiling: default.eight_bit_ceiling,
            eight_bit_scale: default.eight_bit_scale,
            reflectance_scale: default.reflectance_scale,
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
            max_dimension: self.max_dimension.unwrap_or(default.max_dimension),
            decode_buffer_limit: self.decode_buffer_limit.unwrap_or(default.decode_buffer_limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_policy() {
        let config = AnalysisConfig::default();
        assert_eq!(config.epsilon, 1e-6);
        assert_eq!(config.healthy_threshold, 0.30);
        assert_eq!(config.preview_target, 1024);
        assert_eq!((config.red_channel, config.nir_channel), (2, 3));
        assert_eq!(config.nir_keywords, vec!["nir", "near"]);
        assert_eq!(config.decode_buffer_limit, None);
    }

    #[test]
    fn test_config_builder() {
        let config = AnalysisConfig::builder()
            .healthy_threshold(0.4)
            .preview_target(256)
            .interleaved_channels(0, 1)
            .red_keywords(["RED", "B4"])
            .validate_dimensions(false)
            .max_dimension(None)
            .decode_buffer_limit(Some(1 << 20))
            .build();

        assert_eq!(config.healthy_threshold, 0.4);
        assert_eq!(config.preview_target, 256);
        assert_eq!((config.red_channel, config.nir_channel), (0, 1));
        assert_eq!(config.red_keywords, vec!["red", "b4"]);
        assert!(!config.validate_dimensions);
        assert_eq!(config.max_dimension, None);
        assert_eq!(config.decode_buffer_limit, Some(1 << 20));
        assert_eq!(config.epsilon, DEFAULT_EPSILON);
    }
}
