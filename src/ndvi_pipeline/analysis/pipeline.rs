use std::path::Path;

use tracing::{info, instrument, warn};

use crate::ndvi_pipeline::{
    analysis::{Analysis, AnalysisOutcome, PipelineTimings, Timer},
    bands::{BandPair, BandResolver, extract_bands},
    common::error::{AnalysisError, RenderError, Result},
    config::AnalysisConfig,
    index::{compute_ndvi, normalize, summarize},
    preview::{PngPreviewRenderer, PreviewRenderer},
    raster::{RasterContainer, RasterReader, TiffRasterReader},
};

/// Raster bytes in, NDVI analysis out.
///
/// Holds no per-call state, so one pipeline can serve concurrent analyses.
pub struct NdviPipeline<R: RasterReader, P: PreviewRenderer> {
    reader: R,
    renderer: P,
    resolver: BandResolver,
    config: AnalysisConfig,
}

impl NdviPipeline<TiffRasterReader, PngPreviewRenderer> {
    pub fn new(config: AnalysisConfig) -> Self {
        Self::with_custom(TiffRasterReader, PngPreviewRenderer, config)
    }
}

impl Default for NdviPipeline<TiffRasterReader, PngPreviewRenderer> {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

/// Analyses the raster at `path` with the default configuration.
pub fn analyze<P: AsRef<Path>>(path: P) -> Result<Analysis> {
    NdviPipeline::default().analyze_file(path)
}

impl<R: RasterReader, P: PreviewRenderer> NdviPipeline<R, P> {
    pub fn with_custom(reader: R, renderer: P, config: AnalysisConfig) -> Self {
        Self {
            reader,
            renderer,
            resolver: BandResolver::from_config(&config),
            config,
        }
    }

    /// Replaces the ranked band strategies derived from the config.
    pub fn with_resolver(mut self, resolver: BandResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Rechecks decoded pages, for readers that do not bound sizes themselves.
    fn validate_dimensions(&self, container: &RasterContainer) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        for page in &container.pages {
            if page.width == 0 || page.height == 0 {
                return Err(AnalysisError::InvalidDimensions(page.width, page.height));
            }

            if let Some(max) = self.config.max_dimension {
                if page.width > max || page.height > max {
                    warn!(
                        "Page dimensions {}x{} exceed maximum {}",
                        page.width, page.height, max
                    );
                    return Err(AnalysisError::InvalidDimensions(page.width, page.height));
                }
            }
        }

        Ok(())
    }

    fn run(&self, input_data: &[u8], timings: &mut PipelineTimings) -> Result<Analysis> {
        let timer = Timer::start("decode_container");
        let container = {
            let _span = tracing::info_span!("decode_container").entered();
            self.reader.read_container(input_data, &self.config)?
        };
        timings.record(timer);

        let timer = Timer::start("validate_dimensions");
        self.validate_dimensions(&container)?;
        timings.record(timer);

        let timer = Timer::start("resolve_bands");
        let extraction = {
            let _span = tracing::info_span!("resolve_bands", pages = container.page_count()).entered();
            extract_bands(&self.resolver, &container)
        };
        timings.record(timer);
        drop(container);

        let extraction = match extraction {
            Ok(extraction) => extraction,
            Err(reason) => {
                info!(%reason, "No spectral analysis possible");
                return Ok(Analysis::Unresolved(reason));
            }
        };
        let strategy = extraction.strategy;
        let shape = extraction.pair.shape();

        let timer = Timer::start("normalize");
        let pair = {
            let _span = tracing::info_span!("normalize").entered();
            let (red, nir) = extraction.pair.into_bands();
            let red = normalize(red, &self.config);
            let nir = normalize(nir, &self.config);
            // Normalization never changes shape, so the pair is still valid.
            BandPair::new(red, nir)
                .map_err(|_| AnalysisError::InvalidDimensions(shape.1, shape.0))?
        };
        timings.record(timer);

        let timer = Timer::start("compute_ndvi");
        let field = {
            let _span = tracing::info_span!("compute_ndvi", height = shape.0, width = shape.1).entered();
            compute_ndvi(&pair, self.config.epsilon)
        };
        timings.record(timer);
        drop(pair);

        let timer = Timer::start("summarize_and_render");
        let (config, renderer, field) = (&self.config, &self.renderer, &field);
        let (stats, heatmap) = rayon::join(
            || {
                let _span = tracing::info_span!("summarize").entered();
                summarize(field, config.healthy_threshold)
            },
            || {
                let _span = tracing::info_span!("render_preview").entered();
                if config.render_preview {
                    renderer.render(field, config)
                } else {
                    Err(RenderError::Disabled)
                }
            },
        );
        timings.record(timer);

        let stats = stats?;
        if let Err(e) = &heatmap {
            warn!("Preview unavailable: {}", e);
        }

        info!(
            mean_ndvi = stats.mean_ndvi,
            healthy_pct = stats.healthy_pct,
            strategy,
            "Analysis complete"
        );

        Ok(Analysis::Complete(AnalysisOutcome {
            mean_ndvi: stats.mean_ndvi,
            healthy_pct: stats.healthy_pct,
            heatmap,
            strategy,
            shape,
        }))
    }

    #[instrument(skip(self, input_data), fields(input_size = input_data.len()))]
    pub fn analyze(&self, input_data: &[u8]) -> Result<Analysis> {
        info!("Starting NDVI analysis");
        self.run(input_data, &mut PipelineTimings::new())
    }

    pub fn analyze_with_timings(&self, input_data: &[u8]) -> Result<(Analysis, PipelineTimings)> {
        let mut timings = PipelineTimings::new();
        let analysis = self.run(input_data, &mut timings)?;
        Ok((analysis, timings))
    }

    fn read_input(path: &Path) -> Result<Vec<u8>> {
        let _span = tracing::info_span!("read_input_file").entered();
        std::fs::read(path)
            .map_err(|e| AnalysisError::InputRead(format!("{}: {}", path.display(), e)))
    }

    #[instrument(skip(self, input_path))]
    pub fn analyze_file<Q: AsRef<Path>>(&self, input_path: Q) -> Result<Analysis> {
        let input_path = input_path.as_ref();
        info!(input = %input_path.display(), "Analysing file");

        let input_data = Self::read_input(input_path)?;
        self.analyze(&input_data)
    }

    pub fn analyze_file_with_timings<Q: AsRef<Path>>(
        &self,
        input_path: Q,
    ) -> Result<(Analysis, PipelineTimings)> {
        let input_path = input_path.as_ref();
        let mut timings = PipelineTimings::new();

        let timer = Timer::start("read_input_file");
        let input_data = Self::read_input(input_path)?;
        timings.record(timer);

        let analysis = self.run(&input_data, &mut timings)?;
        Ok((analysis, timings))
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Swaps the config and rebuilds the band strategies from it.
    pub fn set_config(&mut self, config: AnalysisConfig) {
        self.resolver = BandResolver::from_config(&config);
        self.config = config;
    }
}
