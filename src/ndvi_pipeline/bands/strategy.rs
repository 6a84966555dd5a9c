//! Ranked band-resolution strategies.
//!
//! Each strategy inspects a container and either names the red and
//! near-infrared bands or reports no match. The resolver tries them in a
//! fixed order and the first match wins, so a container always resolves the
//! same way.

use tracing::debug;

use crate::ndvi_pipeline::bands::types::BandSelection;
use crate::ndvi_pipeline::config::AnalysisConfig;
use crate::ndvi_pipeline::raster::RasterContainer;

pub trait BandStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn resolve(&self, container: &RasterContainer) -> Option<BandSelection>;
}

/// Fixed channel positions in a multi-sample primary page.
///
/// The default 2/3 positions follow the blue, green, red, near-infrared
/// ordering common to four-band sensors. Nothing in the file confirms it, so
/// a sensor with another ordering resolves to the wrong bands.
#[derive(Debug, Clone)]
pub struct InterleavedChannels {
    pub red_channel: usize,
    pub nir_channel: usize,
    pub min_channels: usize,
}

impl Default for InterleavedChannels {
    fn default() -> Self {
        Self {
            red_channel: 2,
            nir_channel: 3,
            min_channels: 4,
        }
    }
}

impl BandStrategy for InterleavedChannels {
    fn name(&self) -> &'static str {
        "interleaved_channels"
    }

    fn resolve(&self, container: &RasterContainer) -> Option<BandSelection> {
        let page = container.primary()?;
        let channels = page.channels;
        if channels < self.min_channels || self.red_channel >= channels || self.nir_channel >= channels {
            return None;
        }
        Some(BandSelection::Interleaved {
            red_channel: self.red_channel,
            nir_channel: self.nir_channel,
        })
    }
}

/// Pages picked by keywords in their case-folded label text.
#[derive(Debug, Clone)]
pub struct LabeledPages {
    pub red_keywords: Vec<String>,
    pub nir_keywords: Vec<String>,
}

impl Default for LabeledPages {
    fn default() -> Self {
        Self {
            red_keywords: vec!["red".to_string()],
            nir_keywords: vec!["nir".to_string(), "near".to_string()],
        }
    }
}

impl LabeledPages {
    /// Index of the first page whose label contains any keyword.
    fn first_match(container: &RasterContainer, keywords: &[String]) -> Option<usize> {
        container.pages.iter().position(|page| {
            page.label.as_deref().is_some_and(|label| {
                let label = label.to_lowercase();
                keywords.iter().any(|keyword| label.contains(keyword.as_str()))
            })
        })
    }
}

impl BandStrategy for LabeledPages {
    fn name(&self) -> &'static str {
        "labeled_pages"
    }

    fn resolve(&self, container: &RasterContainer) -> Option<BandSelection> {
        let red_page = Self::first_match(container, &self.red_keywords)?;
        let nir_page = Self::first_match(container, &self.nir_keywords)?;
        if red_page == nir_page {
            debug!(page = red_page, "Red and NIR labels point at the same page");
            return None;
        }
        Some(BandSelection::Paged { red_page, nir_page })
    }
}

/// Ordered list of strategies; the lowest-ranked match wins.
pub struct BandResolver {
    strategies: Vec<Box<dyn BandStrategy>>,
}

impl Default for BandResolver {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

impl BandResolver {
    pub fn new(strategies: Vec<Box<dyn BandStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(vec![
            Box::new(InterleavedChannels {
                red_channel: config.red_channel,
                nir_channel: config.nir_channel,
                min_channels: config.min_interleaved_channels,
            }),
            Box::new(LabeledPages {
                red_keywords: config.red_keywords.clone(),
                nir_keywords: config.nir_keywords.clone(),
            }),
        ])
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Returns the winning strategy's name with its selection.
    pub fn resolve(&self, container: &RasterContainer) -> Option<(&'static str, BandSelection)> {
        self.strategies.iter().find_map(|strategy| {
            let selection = strategy.resolve(container);
            debug!(strategy = strategy.name(), matched = selection.is_some(), "Tried band strategy");
            selection.map(|selection| (strategy.name(), selection))
        })
    }
}
