pub mod ndvi_pipeline;
pub mod logger;
