//! Three-stop color ramp over normalized NDVI.

/// RGB color with channels in 0..=255
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    fn channels(self) -> [f32; 3] {
        [self.r as f32, self.g as f32, self.b as f32]
    }
}

/// Piecewise-linear ramp with anchors at 0, 0.5 and 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorRamp {
    /// Bare soil / poor vegetation
    pub low: Rgb,
    pub mid: Rgb,
    /// Dense healthy vegetation
    pub high: Rgb,
}

impl Default for ColorRamp {
    fn default() -> Self {
        Self {
            low: Rgb::new(120, 60, 20),
            mid: Rgb::new(240, 200, 80),
            high: Rgb::new(20, 180, 40),
        }
    }
}

impl ColorRamp {
    pub const fn new(low: Rgb, mid: Rgb, high: Rgb) -> Self {
        Self { low, mid, high }
    }

    /// Color at `t` in [0,1]; values outside are clamped.
    pub fn at(&self, t: f32) -> Rgb {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.5 };
        let (from, to, frac) = if t <= 0.5 {
            (self.low, self.mid, t / 0.5)
        } else {
            (self.mid, self.high, (t - 0.5) / 0.5)
        };

        let from = from.channels();
        let to = to.channels();
        let lerp = |i: usize| (from[i] + (to[i] - from[i]) * frac).clamp(0.0, 255.0).round() as u8;
        Rgb::new(lerp(0), lerp(1), lerp(2))
    }

    /// Color for an NDVI value in [-1,1].
    pub fn for_ndvi(&self, ndvi: f32) -> Rgb {
        self.at((ndvi + 1.0) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchors() {
        let ramp = ColorRamp::default();

        assert_eq!(ramp.at(0.0), Rgb::new(120, 60, 20));
        assert_eq!(ramp.at(0.5), Rgb::new(240, 200, 80));
        assert_eq!(ramp.at(1.0), Rgb::new(20, 180, 40));
    }

    #[test]
    fn test_interpolates_between_anchors() {
        let ramp = ColorRamp::default();

        assert_eq!(ramp.at(0.25), Rgb::new(180, 130, 50));
        assert_eq!(ramp.at(0.75), Rgb::new(130, 190, 60));
    }

    #[test]
    fn test_interpolated_channels_round_to_nearest() {
        let ramp = ColorRamp::new(Rgb::new(0, 0, 0), Rgb::new(10, 100, 255), Rgb::new(10, 100, 255));

        // frac 0.06: 0.6, 6.0 and 15.3 before rounding
        assert_eq!(ramp.at(0.03), Rgb::new(1, 6, 15));
        // frac 0.994: 9.94, 99.4 and 253.47
        assert_eq!(ramp.at(0.497), Rgb::new(10, 99, 253));
    }

    #[test]
    fn test_ndvi_mapping_and_clamping() {
        let ramp = ColorRamp::default();

        assert_eq!(ramp.for_ndvi(-1.0), ramp.low);
        assert_eq!(ramp.for_ndvi(0.0), ramp.mid);
        assert_eq!(ramp.for_ndvi(1.0), ramp.high);
        assert_eq!(ramp.for_ndvi(3.0), ramp.high);
        assert_eq!(ramp.at(-0.5), ramp.low);
    }
}
