use crate::coords::Vec2;

use super::bitmap::TouchBitmap;
use super::point::TrailPoint;
use super::{CANVAS_SIZE, FORCE_CAP, FORCE_GAIN, MAX_AGE};

/// Tuning for a `TrailBuffer`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TrailParams {
    pub canvas_size: u32,
    pub max_age: u32,
    pub force_gain: f32,
    pub force_cap: f32,
}

impl Default for TrailParams {
    fn default() -> Self {
        Self {
            canvas_size: CANVAS_SIZE,
            max_age: MAX_AGE,
            force_gain: FORCE_GAIN,
            force_cap: FORCE_CAP,
        }
    }
}

/// Live trail points and the touch bitmap they rasterize into.
///
/// Points are kept in creation order. `add_touch` may be called any number of
/// times between ticks and only appends.
#[derive(Debug, Clone)]
pub struct TrailBuffer {
    params: TrailParams,
    points: Vec<TrailPoint>,
    last_sample: Option<Vec2>,
    bitmap: TouchBitmap,
}

impl TrailBuffer {
    pub fn new() -> Self {
        Self::with_params(TrailParams::default())
    }

    pub fn with_params(params: TrailParams) -> Self {
        Self {
            params,
            points: Vec::new(),
            last_sample: None,
            bitmap: TouchBitmap::new(params.canvas_size),
        }
    }

    #[inline]
    pub fn params(&self) -> &TrailParams {
        &self.params
    }

    #[inline]
    pub fn points(&self) -> &[TrailPoint] {
        &self.points
    }

    #[inline]
    pub fn last_sample(&self) -> Option<Vec2> {
        self.last_sample
    }

    #[inline]
    pub fn bitmap(&self) -> &TouchBitmap {
        &self.bitmap
    }

    #[inline]
    pub fn bitmap_mut(&mut self) -> &mut TouchBitmap {
        &mut self.bitmap
    }

    /// Records a pointer sample in normalized surface space.
    ///
    /// The first sample only primes `last_sample`; a sample identical to the
    /// previous one is dropped. Every other sample appends one point whose
    /// force grows with the squared distance travelled.
    pub fn add_touch(&mut self, point: Vec2) {
        if !point.is_finite() {
            return;
        }

        let Some(last) = self.last_sample else {
            self.last_sample = Some(point);
            return;
        };

        let delta = point - last;
        if delta.x == 0.0 && delta.y == 0.0 {
            return;
        }

        let distance_sq = delta.length_squared();
        let distance = distance_sq.sqrt();
        let velocity = delta / distance;
        let force = (distance_sq * self.params.force_gain).min(self.params.force_cap);

        self.points.push(TrailPoint::new(point, velocity, force));
        self.last_sample = Some(point);
    }

    /// Forgets the previous sample so the next one starts a new stroke.
    pub fn reset_sample(&mut self) {
        self.last_sample = None;
    }

    /// Drops every point and the previous sample. The bitmap goes neutral on
    /// the next tick.
    pub fn clear_trail(&mut self) {
        self.points.clear();
        self.last_sample = None;
    }

    /// Ages and advects every point, drops expired ones, then re-rasterizes.
    pub fn tick(&mut self) {
        let max_age = self.params.max_age;

        for p in &mut self.points {
            p.step(max_age);
        }
        self.points.retain(|p| !p.is_expired(max_age));

        self.bitmap.begin();
        for p in &self.points {
            self.bitmap.splat(p.position, p.velocity, p.intensity);
        }
        self.bitmap.resolve();
    }
}

impl Default for TrailBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_point_buffer() -> TrailBuffer {
        let mut trail = TrailBuffer::new();
        trail.add_touch(Vec2::new(0.5, 0.5));
        trail.add_touch(Vec2::new(0.6, 0.5));
        assert_eq!(trail.points().len(), 1);
        trail
    }

    // ── add_touch ─────────────────────────────────────────────────────────

    #[test]
    fn first_sample_only_primes() {
        let mut trail = TrailBuffer::new();
        trail.add_touch(Vec2::new(0.3, 0.3));
        assert!(trail.points().is_empty());
        assert_eq!(trail.last_sample(), Some(Vec2::new(0.3, 0.3)));
    }

    #[test]
    fn identical_samples_create_no_points() {
        let mut trail = TrailBuffer::new();
        trail.add_touch(Vec2::new(0.25, 0.75));
        trail.add_touch(Vec2::new(0.25, 0.75));
        assert!(trail.points().is_empty());
        assert_eq!(trail.last_sample(), Some(Vec2::new(0.25, 0.75)));
    }

    #[test]
    fn point_carries_unit_velocity_and_capped_force() {
        let trail = one_point_buffer();
        let p = trail.points()[0];
        assert_eq!(p.age, 0);
        assert_eq!(p.position, Vec2::new(0.6, 0.5));
        assert!((p.velocity.length() - 1.0).abs() < 1e-5);
        assert!(p.velocity.x > 0.99);
        // 0.1² · 20000 = 200, capped.
        assert_eq!(p.force, FORCE_CAP);
    }

    #[test]
    fn slow_motion_gives_small_force() {
        let mut trail = TrailBuffer::new();
        trail.add_touch(Vec2::new(0.5, 0.5));
        trail.add_touch(Vec2::new(0.505, 0.5));
        let f = trail.points()[0].force;
        assert!((f - 0.005f32.powi(2) * FORCE_GAIN).abs() < 1e-3, "force {f}");
    }

    #[test]
    fn non_finite_samples_are_ignored() {
        let mut trail = TrailBuffer::new();
        trail.add_touch(Vec2::new(f32::NAN, 0.5));
        assert!(trail.last_sample().is_none());
    }

    // ── tick ──────────────────────────────────────────────────────────────

    #[test]
    fn point_survives_max_age_minus_one_ticks() {
        let mut trail = one_point_buffer();
        for _ in 0..63 {
            trail.tick();
        }
        assert_eq!(trail.points().len(), 1);
        assert_eq!(trail.points()[0].age, 63);
    }

    #[test]
    fn point_is_removed_after_max_age_ticks() {
        let mut trail = one_point_buffer();
        for _ in 0..64 {
            trail.tick();
        }
        assert!(trail.points().is_empty());
        assert!(trail.bitmap().is_neutral());
    }

    #[test]
    fn removal_keeps_neighbours_and_order() {
        let mut trail = TrailBuffer::new();
        trail.add_touch(Vec2::new(0.1, 0.1));
        trail.add_touch(Vec2::new(0.2, 0.1));
        for _ in 0..10 {
            trail.tick();
        }
        // Slow strokes keep the drift well inside the canvas.
        trail.reset_sample();
        trail.add_touch(Vec2::new(0.3, 0.1));
        trail.add_touch(Vec2::new(0.305, 0.1));
        trail.reset_sample();
        trail.add_touch(Vec2::new(0.6, 0.1));
        trail.add_touch(Vec2::new(0.605, 0.1));
        for _ in 0..54 {
            trail.tick();
        }
        // The oldest point hit 64 ticks; the two younger ones are at 54.
        let ages: Vec<u32> = trail.points().iter().map(|p| p.age).collect();
        assert_eq!(ages, vec![54, 54]);
        assert!(trail.points()[0].position.x < trail.points()[1].position.x);
    }

    #[test]
    fn empty_tick_produces_neutral_dirty_bitmap() {
        let mut trail = TrailBuffer::new();
        trail.bitmap_mut().mark_uploaded();
        trail.tick();
        assert!(trail.bitmap().is_neutral());
        assert!(trail.bitmap().is_dirty());
    }

    #[test]
    fn live_point_perturbs_bitmap() {
        let mut trail = one_point_buffer();
        trail.tick();
        assert!(!trail.bitmap().is_neutral());
    }

    #[test]
    fn clear_trail_forgets_everything() {
        let mut trail = one_point_buffer();
        trail.clear_trail();
        assert!(trail.points().is_empty());
        assert!(trail.last_sample().is_none());
        trail.tick();
        assert!(trail.bitmap().is_neutral());
    }

    #[test]
    fn reset_sample_starts_new_stroke() {
        let mut trail = one_point_buffer();
        trail.reset_sample();
        trail.add_touch(Vec2::new(0.9, 0.9));
        assert_eq!(trail.points().len(), 1);
    }
}
