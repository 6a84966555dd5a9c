use std::path::PathBuf;

use plot_ndvi_rs::logger;
use plot_ndvi_rs::ndvi_pipeline::{Analysis, AnalysisConfig, NdviPipeline, classify, fallback_estimate};
use plot_ndvi_rs::ndvi_pipeline::classify::extension_of;

use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
    logger::init();

    let paths: Vec<PathBuf> = std::env::args().skip(1).map(PathBuf::from).collect();
    if paths.is_empty() {
        anyhow::bail!("usage: analyze_plot <raster> [<raster> ...]");
    }

    let extensions: Vec<String> = paths.iter().filter_map(extension_of).collect();
    let (source, format) = classify(&extensions, None, None);
    info!(
        "Plot assets: source={}, format={}",
        source.map_or("unknown", |s| s.as_str()),
        format.map_or("unknown", |f| f.as_str())
    );

    let pipeline = NdviPipeline::new(AnalysisConfig::default());
    let mut resolved = 0;

    for path in &paths {
        let (analysis, timings) = match pipeline.analyze_file_with_timings(path) {
            Ok(result) => result,
            Err(e) => {
                warn!("{}: {}", path.display(), e);
                continue;
            }
        };
        timings.log_summary();

        match analysis {
            Analysis::Complete(outcome) => {
                resolved += 1;
                info!(
                    "{}: mean NDVI {:.3}, healthy {:.1}%",
                    path.display(),
                    outcome.mean_ndvi,
                    outcome.healthy_pct
                );
                if let Some(png) = outcome.heatmap_png() {
                    let preview = path.with_extension("ndvi.png");
                    std::fs::write(&preview, png)?;
                    info!("Preview written to {}", preview.display());
                }
            }
            Analysis::Unresolved(reason) => info!("{}: {}", path.display(), reason),
        }
    }

    if resolved == 0 {
        let estimate = fallback_estimate(paths.len(), 1.0);
        info!("No spectral bands found; fallback NDVI estimate {:.3}", estimate.ndvi);
    }

    Ok(())
}
