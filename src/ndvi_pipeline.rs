//! NDVI analysis pipeline module
//!
//! Raster bytes flow through band extraction, radiometric normalization and
//! the NDVI transform, then into summary statistics and a false-color
//! preview. The source/format classifier and fallback estimate stand apart
//! and never touch raster data.

pub mod analysis;
pub mod bands;
pub mod classify;
pub mod common;
pub mod config;
pub mod estimate;
pub mod index;
pub mod preview;
pub mod raster;

pub use common::{
    AnalysisError,
    RenderError,
    Result,
};

pub use config::{
    AnalysisConfig,
    AnalysisConfigBuilder,
};

pub use raster::{
    RasterContainer,
    RasterPage,
    RasterReader,
    TiffRasterReader,
};

pub use bands::{
    Band,
    BandPair,
    BandResolver,
    BandSelection,
    BandStrategy,
    UnresolvedReason,
};

pub use index::{
    NdviField,
    NdviStats,
};

pub use preview::{
    ColorRamp,
    Heatmap,
    PngPreviewRenderer,
    PreviewRenderer,
    Rgb,
};

pub use analysis::{
    Analysis,
    AnalysisOutcome,
    AnalysisSummary,
    NdviPipeline,
    PipelineTimings,
    analyze,
};

pub use classify::{
    DataSource,
    FormatType,
    classify,
};

pub use estimate::{
    FallbackEstimate,
    fallback_estimate,
};
