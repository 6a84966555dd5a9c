//! Raster container reading module
//!
//! Decodes uploaded raster bytes into an in-memory container of pages that
//! the band extractor can inspect.

mod reader;
mod tiff_reader;
pub mod types;

pub use reader::RasterReader;
pub use tiff_reader::TiffRasterReader;
pub use types::{RasterContainer, RasterPage};
