use rayon::prelude::*;

use crate::ndvi_pipeline::bands::BandPair;

/// NDVI values in [-1,1], row-major, same shape as the source bands
#[derive(Debug, Clone, PartialEq)]
pub struct NdviField {
    pub width: usize,
    pub height: usize,
    pub values: Vec<f32>,
}

impl NdviField {
    pub fn new(width: usize, height: usize, values: Vec<f32>) -> Self {
        Self { width, height, values }
    }

    /// (height, width)
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }
}

/// Elementwise `(nir - red) / (nir + red + epsilon)`, clamped to [-1,1].
///
/// Non-finite inputs map to 0 so the field never carries NaN or infinity.
pub fn compute_ndvi(pair: &BandPair, epsilon: f32) -> NdviField {
    let red = &pair.red().data;
    let nir = &pair.nir().data;

    let values: Vec<f32> = red
        .par_iter()
        .zip(nir.par_iter())
        .map(|(&r, &n)| {
            let ndvi = (n - r) / (n + r + epsilon);
            if ndvi.is_finite() { ndvi.clamp(-1.0, 1.0) } else { 0.0 }
        })
        .collect();

    let (height, width) = pair.shape();
    NdviField::new(width, height, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ndvi_pipeline::bands::Band;
    use approx::assert_abs_diff_eq;

    fn pair(red: Vec<f32>, nir: Vec<f32>) -> BandPair {
        let width = red.len();
        BandPair::new(Band::new(width, 1, red), Band::new(width, 1, nir)).unwrap()
    }

    #[test]
    fn test_all_zero_is_zero_not_nan() {
        let field = compute_ndvi(&pair(vec![0.0; 16], vec![0.0; 16]), 1e-6);

        assert!(field.values.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_nir_twice_red_is_one_third() {
        let red: Vec<f32> = (1..=50).map(|v| v as f32 / 100.0).collect();
        let nir: Vec<f32> = red.iter().map(|v| v * 2.0).collect();

        let field = compute_ndvi(&pair(red, nir), 1e-6);

        for &v in &field.values {
            assert_abs_diff_eq!(v, 1.0 / 3.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_values_stay_in_range() {
        // Negative reflectance can push the raw ratio outside [-1,1].
        let field = compute_ndvi(
            &pair(vec![0.5, -0.4, 1.0, 0.0, f32::NAN], vec![-0.3, 0.5, 0.0, 1.0, 0.2]),
            1e-6,
        );

        assert!(field.values.iter().all(|v| v.is_finite() && (-1.0..=1.0).contains(v)));
        assert_abs_diff_eq!(field.values[2], -1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(field.values[3], 1.0, epsilon = 1e-5);
        assert_eq!(field.values[4], 0.0);
    }

    #[test]
    fn test_shape_is_row_major() {
        let red = Band::new(3, 2, vec![0.1; 6]);
        let nir = Band::new(3, 2, vec![0.1, 0.1, 0.1, 0.3, 0.3, 0.3]);
        let field = compute_ndvi(&BandPair::new(red, nir).unwrap(), 1e-6);

        assert_eq!(field.shape(), (2, 3));
        assert_abs_diff_eq!(field.values[3], 0.5, epsilon = 1e-4);
        assert_abs_diff_eq!(field.values[2], 0.0, epsilon = 1e-4);
    }
}
