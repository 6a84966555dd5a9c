//! Raster container types

/// One decoded page (IFD) of a raster container
#[derive(Debug, Clone)]
pub struct RasterPage {
    /// Width of the page in pixels
    pub width: usize,
    /// Height of the page in pixels
    pub height: usize,
    /// Samples per pixel
    pub channels: usize,
    /// Pixel samples, row-major and interleaved [c0, c1, .., c0, c1, ..]
    pub samples: Vec<f32>,
    /// Description or name tag text, if the page carries one
    pub label: Option<String>,
}

impl RasterPage {
    /// Copies one channel out as a row-major plane.
    pub fn channel(&self, index: usize) -> Option<Vec<f32>> {
        if index >= self.channels {
            return None;
        }
        Some(
            self.samples
                .iter()
                .skip(index)
                .step_by(self.channels)
                .copied()
                .collect(),
        )
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }
}

/// A decoded raster file, owned by a single analysis call.
///
/// A single page with several channels is the interleaved layout; a sequence
/// of labeled single-channel pages is the paged layout.
#[derive(Debug, Clone, Default)]
pub struct RasterContainer {
    pub pages: Vec<RasterPage>,
}

impl RasterContainer {
    pub fn new(pages: Vec<RasterPage>) -> Self {
        Self { pages }
    }

    /// The first full-resolution page, which holds the interleaved samples.
    pub fn primary(&self) -> Option<&RasterPage> {
        self.pages.first()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_deinterleaves_samples() {
        let page = RasterPage {
            width: 2,
            height: 1,
            channels: 3,
            samples: vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            label: None,
        };

        assert_eq!(page.channel(0), Some(vec![1.0, 4.0]));
        assert_eq!(page.channel(2), Some(vec![3.0, 6.0]));
        assert_eq!(page.channel(3), None);
        assert_eq!(page.shape(), (1, 2));
    }
}
