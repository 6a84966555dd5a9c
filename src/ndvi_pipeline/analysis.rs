mod pipeline;
mod timing;
mod types;


pub use pipeline::{NdviPipeline, analyze};
pub use timing::{PipelineTimings, StepTiming, Timer};
pub use types::{Analysis, AnalysisOutcome, AnalysisSummary};
