//! Common utilities module
//!
//! Error types shared by every stage of the NDVI pipeline.

pub mod error;

pub use error::{AnalysisError, RenderError, Result};
