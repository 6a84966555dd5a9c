//! Preview rendering module
//!
//! Turns an NDVI field into a bounded-size false-color PNG.

mod png_renderer;
mod ramp;
mod renderer;

pub use png_renderer::{PngPreviewRenderer, colorize, downsample, downsample_stride};
pub use ramp::{ColorRamp, Rgb};
pub use renderer::{Heatmap, PreviewRenderer};
