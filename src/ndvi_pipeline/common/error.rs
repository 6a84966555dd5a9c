use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Failed to read input file: {0}")]
    InputRead(String),

    #[error("Malformed raster container: {0}")]
    MalformedContainer(String),

    #[error("Invalid raster dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("NDVI field has no finite values")]
    NoFiniteValues,
}

/// Why the preview image could not be produced. The numeric outcome is unaffected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("Cannot render an empty NDVI field")]
    EmptyField,

    #[error("Preview rendering is disabled")]
    Disabled,

    #[error("Failed to encode preview image: {0}")]
    Encode(String),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
