/// Container size in logical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Backing-store size for this viewport at `pixel_ratio`.
    ///
    /// Degenerate input (zero, negative, NaN) never yields a zero dimension:
    /// the result is at least 1×1.
    pub fn to_physical(self, pixel_ratio: f32) -> PhysicalSize {
        let ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 { pixel_ratio } else { 1.0 };
        let px = |v: f32| {
            let scaled = (v * ratio).round();
            if scaled.is_finite() && scaled >= 1.0 { scaled as u32 } else { 1 }
        };
        PhysicalSize::new(px(self.width), px(self.height))
    }
}

/// Backing-store size in physical pixels. Never zero once produced by
/// `Viewport::to_physical` or `PhysicalSize::at_least_one`.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct PhysicalSize {
    pub width: u32,
    pub height: u32,
}

impl PhysicalSize {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn at_least_one(self) -> Self {
        Self::new(self.width.max(1), self.height.max(1))
    }

    #[inline]
    pub fn aspect(self) -> f32 {
        let s = self.at_least_one();
        s.width as f32 / s.height as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn physical_scales_and_rounds() {
        let p = Viewport::new(400.0, 300.0).to_physical(1.5);
        assert_eq!(p, PhysicalSize::new(600, 450));
    }

    #[test]
    fn zero_viewport_clamps_to_one_pixel() {
        assert_eq!(Viewport::new(0.0, 0.0).to_physical(2.0), PhysicalSize::new(1, 1));
        assert_eq!(Viewport::new(f32::NAN, 10.0).to_physical(1.0), PhysicalSize::new(1, 10));
    }

    #[test]
    fn bad_ratio_falls_back_to_one() {
        assert_eq!(Viewport::new(10.0, 20.0).to_physical(0.0), PhysicalSize::new(10, 20));
    }

    #[test]
    fn aspect_of_zero_height_is_finite() {
        assert_eq!(PhysicalSize::new(8, 0).aspect(), 8.0);
    }
}
