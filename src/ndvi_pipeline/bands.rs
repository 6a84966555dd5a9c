//! Band resolution and extraction module
//!
//! Decides which parts of a raster container are the red and near-infrared
//! bands, then copies them out as a same-shape pair.

mod extract;
mod strategy;
pub mod types;

pub use extract::{Extraction, extract_bands};
pub use strategy::{BandResolver, BandStrategy, InterleavedChannels, LabeledPages};
pub use types::{Band, BandPair, BandSelection, UnresolvedReason};
