use tracing::{debug, info};

use crate::ndvi_pipeline::bands::strategy::BandResolver;
use crate::ndvi_pipeline::bands::types::{Band, BandPair, BandSelection, UnresolvedReason};
use crate::ndvi_pipeline::raster::{RasterContainer, RasterPage};

/// A resolved red/NIR pair and how it was found
#[derive(Debug, Clone)]
pub struct Extraction {
    pub strategy: &'static str,
    pub selection: BandSelection,
    pub pair: BandPair,
}

fn plane(page: &RasterPage, channel: usize) -> Option<Band> {
    page.channel(channel)
        .map(|data| Band::new(page.width, page.height, data))
}

/// Runs the resolver and copies the chosen bands out of the container.
///
/// Paged selections take the first channel of each page.
pub fn extract_bands(
    resolver: &BandResolver,
    container: &RasterContainer,
) -> std::result::Result<Extraction, UnresolvedReason> {
    let (strategy, selection) = resolver
        .resolve(container)
        .ok_or(UnresolvedReason::NoStrategyMatched)?;

    let bands = match selection {
        BandSelection::Interleaved { red_channel, nir_channel } => container
            .primary()
            .and_then(|page| Some((plane(page, red_channel)?, plane(page, nir_channel)?))),
        BandSelection::Paged { red_page, nir_page } => {
            let red = container.pages.get(red_page).and_then(|page| plane(page, 0));
            let nir = container.pages.get(nir_page).and_then(|page| plane(page, 0));
            red.zip(nir)
        }
    };
    let (red, nir) = bands.ok_or(UnresolvedReason::NoStrategyMatched)?;

    let pair = BandPair::new(red, nir).map_err(|(red, nir)| {
        debug!(?red, ?nir, "Selected bands differ in shape");
        UnresolvedReason::ShapeMismatch { red, nir }
    })?;

    info!(strategy, ?selection, "Resolved red and near-infrared bands");
    Ok(Extraction {
        strategy,
        selection,
        pair,
    })
}
