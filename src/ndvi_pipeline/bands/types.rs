//! Band data types

/// A single 2-D band, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f32>,
}

impl Band {
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> Self {
        Self { width, height, data }
    }

    /// (height, width)
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn max(&self) -> f32 {
        self.data.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }
}

/// Red and near-infrared bands of identical shape
#[derive(Debug, Clone)]
pub struct BandPair {
    red: Band,
    nir: Band,
}

impl BandPair {
    /// Pairs two bands, or hands back both shapes when they differ.
    pub fn new(red: Band, nir: Band) -> Result<Self, ((usize, usize), (usize, usize))> {
        if red.shape() != nir.shape() || red.data.len() != nir.data.len() {
            return Err((red.shape(), nir.shape()));
        }
        Ok(Self { red, nir })
    }

    pub fn red(&self) -> &Band {
        &self.red
    }

    pub fn nir(&self) -> &Band {
        &self.nir
    }

    pub fn shape(&self) -> (usize, usize) {
        self.red.shape()
    }

    pub fn into_bands(self) -> (Band, Band) {
        (self.red, self.nir)
    }
}

/// Where the red and near-infrared bands live in a container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandSelection {
    /// Channels of the primary interleaved page
    Interleaved { red_channel: usize, nir_channel: usize },
    /// Whole pages of a paged container
    Paged { red_page: usize, nir_page: usize },
}

/// Why no red/NIR pair could be produced. An expected outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum UnresolvedReason {
    /// No strategy recognised a spectral layout (e.g. a plain RGB photo)
    NoStrategyMatched,
    /// The selected bands have different (height, width) shapes
    ShapeMismatch { red: (usize, usize), nir: (usize, usize) },
}

impl std::fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoStrategyMatched => write!(f, "no red/near-infrared band layout recognised"),
            Self::ShapeMismatch { red, nir } => write!(
                f,
                "red band {}x{} does not match near-infrared band {}x{}",
                red.1, red.0, nir.1, nir.0
            ),
        }
    }
}
