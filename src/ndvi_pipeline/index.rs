//! Spectral index module
//!
//! Radiometric normalization, the NDVI transform itself, and the summary
//! statistics reduced from it.

mod ndvi;
mod normalize;
mod stats;

pub use ndvi::{NdviField, compute_ndvi};
pub use normalize::{Radiometry, normalize};
pub use stats::{NdviStats, round_to, summarize};
