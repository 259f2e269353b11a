use super::{Vec2, Viewport};

/// Axis-aligned rectangle in host pixels (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Rect at the origin covering `viewport`.
    #[inline]
    pub const fn from_viewport(viewport: Viewport) -> Self {
        Self::new(0.0, 0.0, viewport.width, viewport.height)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        !(self.size.x > 0.0 && self.size.y > 0.0)
    }

    #[inline]
    pub fn center(self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    /// Same origin, new size.
    #[inline]
    pub fn with_size(self, viewport: Viewport) -> Self {
        Self {
            origin: self.origin,
            size: Vec2::new(viewport.width, viewport.height),
        }
    }

    /// Maps a host-pixel point into this rect's `[0, 1]²` space.
    ///
    /// Points outside the rect are clamped onto its edge. Returns `None` for an
    /// empty rect, which has no meaningful normalized space.
    pub fn normalize_point(self, p: Vec2) -> Option<Vec2> {
        if self.is_empty() || !p.is_finite() {
            return None;
        }
        let local = p - self.origin;
        Some(Vec2::new(local.x / self.size.x, local.y / self.size.y).clamp01())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: f32, y: f32, w: f32, h: f32) -> Rect { Rect::new(x, y, w, h) }

    // ── normalize_point ───────────────────────────────────────────────────

    #[test]
    fn center_maps_to_half_regardless_of_placement() {
        for rect in [r(0.0, 0.0, 400.0, 300.0), r(-120.0, 75.5, 33.0, 900.0), r(1e4, 2e4, 1.0, 1.0)] {
            let n = rect.normalize_point(rect.center()).unwrap();
            assert!((n.x - 0.5).abs() < 1e-4 && (n.y - 0.5).abs() < 1e-4, "{rect:?} -> {n:?}");
        }
    }

    #[test]
    fn corners_map_to_unit_square_corners() {
        let rect = r(10.0, 20.0, 100.0, 50.0);
        assert_eq!(rect.normalize_point(Vec2::new(10.0, 20.0)), Some(Vec2::new(0.0, 0.0)));
        assert_eq!(rect.normalize_point(Vec2::new(110.0, 70.0)), Some(Vec2::new(1.0, 1.0)));
    }

    #[test]
    fn outside_points_are_clamped() {
        let rect = r(0.0, 0.0, 100.0, 100.0);
        assert_eq!(rect.normalize_point(Vec2::new(-50.0, 250.0)), Some(Vec2::new(0.0, 1.0)));
    }

    #[test]
    fn empty_rect_has_no_normalized_space() {
        assert!(r(0.0, 0.0, 0.0, 10.0).normalize_point(Vec2::zero()).is_none());
        assert!(r(0.0, 0.0, 10.0, f32::NAN).normalize_point(Vec2::zero()).is_none());
    }

    // ── with_size ─────────────────────────────────────────────────────────

    #[test]
    fn with_size_keeps_origin() {
        let rect = r(5.0, 6.0, 1.0, 1.0).with_size(Viewport::new(40.0, 30.0));
        assert_eq!(rect, r(5.0, 6.0, 40.0, 30.0));
    }
}
