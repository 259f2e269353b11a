use crate::coords::Vec2;

/// Fraction of a point's life spent ramping up.
const RISE: f32 = 0.3;

/// Age-based intensity envelope in `[0, 1]`.
///
/// Sine ease-in over the first 30 % of life, then an inverted-quadratic
/// ease-out to zero at `age == max_age`. Single peak at `0.3 * max_age`.
pub fn envelope(age: u32, max_age: u32) -> f32 {
    if max_age == 0 {
        return 0.0;
    }
    let t = (age as f32 / max_age as f32).clamp(0.0, 1.0);
    if t < RISE {
        (t / RISE * std::f32::consts::FRAC_PI_2).sin()
    } else {
        let u = 1.0 - (t - RISE) / (1.0 - RISE);
        u * (2.0 - u)
    }
}

/// A single decaying stimulus.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TrailPoint {
    /// Normalized surface position; drifts along `velocity` while alive and
    /// stays inside `[0, 1]` on both axes.
    pub position: Vec2,
    /// Ticks since creation.
    pub age: u32,
    /// Fixed at creation, `[0, FORCE_CAP]`.
    pub force: f32,
    /// Unit direction of the input motion that created the point.
    pub velocity: Vec2,
    /// `envelope(age) * force` as of the last tick.
    pub intensity: f32,
}

impl TrailPoint {
    pub fn new(position: Vec2, velocity: Vec2, force: f32) -> Self {
        Self {
            position,
            age: 0,
            force,
            velocity,
            intensity: 0.0,
        }
    }

    /// Integrates one tick: drift, age, and refresh the intensity.
    ///
    /// Drift uses the pre-increment age, so points move furthest right after
    /// creation and barely at the end of their life.
    pub(crate) fn step(&mut self, max_age: u32) {
        let max = max_age.max(1) as f32;
        let drift = self.force * (1.0 / max) * (1.0 - self.age as f32 / max);
        self.position = (self.position + self.velocity * drift).clamp01();
        self.age = self.age.saturating_add(1);
        self.intensity = envelope(self.age, max_age) * self.force;
    }

    /// A point lives for exactly `max_age` ticks.
    #[inline]
    pub fn is_expired(&self, max_age: u32) -> bool {
        self.age >= max_age
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── envelope ──────────────────────────────────────────────────────────

    #[test]
    fn envelope_starts_and_ends_at_zero() {
        assert_eq!(envelope(0, 64), 0.0);
        assert!(envelope(64, 64).abs() < 1e-6);
    }

    #[test]
    fn envelope_peaks_near_thirty_percent() {
        let values: Vec<f32> = (0..=64).map(|a| envelope(a, 64)).collect();
        let peak = values
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert!((18..=20).contains(&peak), "peak at {peak}");
        assert!(values[peak] > 0.99);
    }

    #[test]
    fn envelope_rises_then_falls_without_secondary_peaks() {
        let values: Vec<f32> = (0..=64).map(|a| envelope(a, 64)).collect();
        let peak = values
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        for w in values[..=peak].windows(2) {
            assert!(w[1] > w[0], "not increasing before peak: {w:?}");
        }
        for w in values[peak..].windows(2) {
            assert!(w[1] < w[0], "not decreasing after peak: {w:?}");
        }
    }

    #[test]
    fn envelope_of_zero_lifetime_is_zero() {
        assert_eq!(envelope(3, 0), 0.0);
    }

    // ── step ──────────────────────────────────────────────────────────────

    #[test]
    fn step_drifts_further_early_in_life() {
        let mut p = TrailPoint::new(Vec2::new(0.0, 0.5), Vec2::new(1.0, 0.0), 1.0);
        let x0 = p.position.x;
        p.step(64);
        let first = p.position.x - x0;
        for _ in 0..50 {
            p.step(64);
        }
        let before = p.position.x;
        p.step(64);
        let late = p.position.x - before;
        assert!(first > 0.0);
        assert!(late < first);
        assert!((first - 1.0 / 64.0).abs() < 1e-6);
    }

    #[test]
    fn drift_stops_at_the_canvas_edge() {
        let mut p = TrailPoint::new(Vec2::new(0.9, 0.05), Vec2::new(1.0, -1.0), 3.0);
        for _ in 0..64 {
            p.step(64);
            assert!((0.0..=1.0).contains(&p.position.x), "x = {}", p.position.x);
            assert!((0.0..=1.0).contains(&p.position.y), "y = {}", p.position.y);
        }
        assert_eq!(p.position, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn step_updates_intensity_from_new_age() {
        let mut p = TrailPoint::new(Vec2::zero(), Vec2::new(0.0, 1.0), 1.5);
        p.step(64);
        assert_eq!(p.age, 1);
        assert!((p.intensity - envelope(1, 64) * 1.5).abs() < 1e-6);
    }
}
