use std::time::{Duration, Instant};

/// Upper bound for a single frame delta.
///
/// After tab-backgrounding, a debugger pause or a long stall the next frame
/// would otherwise see a multi-second jump.
pub const MAX_FRAME_DELTA: Duration = Duration::from_millis(100);

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Clamped time since the previous tick, in seconds.
    pub dt: f32,

    /// Timestamp supplied for this tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// The first tick after construction or `reset` only establishes the
/// baseline and reports `dt == 0`. Later deltas are clamped to
/// `[dt_min, dt_max]`.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a new clock with default clamps (100 µs .. `MAX_FRAME_DELTA`).
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), MAX_FRAME_DELTA)
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: None,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Forgets the baseline; the next tick reports `dt == 0`.
    ///
    /// Called when a loop resumes so the suspended interval is not counted.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Number of ticks taken so far.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Advances the clock using the wall clock.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advances the clock to `now`.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = match self.last {
            None => Duration::ZERO,
            Some(last) => now
                .saturating_duration_since(last)
                .clamp(self.dt_min, self.dt_max),
        };

        self.last = Some(now);

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_is_baseline() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        let ft = clock.tick_at(t0);
        assert_eq!(ft.dt, 0.0);
        assert_eq!(ft.frame_index, 0);
    }

    #[test]
    fn regular_frames_report_their_delta() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        clock.tick_at(t0);
        let ft = clock.tick_at(t0 + Duration::from_millis(16));
        assert!((ft.dt - 0.016).abs() < 1e-6);
        assert_eq!(ft.frame_index, 1);
    }

    #[test]
    fn long_stall_is_clamped() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        clock.tick_at(t0);
        let ft = clock.tick_at(t0 + Duration::from_secs(5));
        assert!((ft.dt - MAX_FRAME_DELTA.as_secs_f32()).abs() < 1e-6);
    }

    #[test]
    fn backwards_timestamp_is_clamped_to_minimum() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now() + Duration::from_secs(1);
        clock.tick_at(t0);
        let ft = clock.tick_at(t0 - Duration::from_millis(10));
        assert!((ft.dt - 0.0001).abs() < 1e-6);
    }

    #[test]
    fn reset_forgets_baseline() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        clock.tick_at(t0);
        clock.reset();
        let ft = clock.tick_at(t0 + Duration::from_secs(3));
        assert_eq!(ft.dt, 0.0);
        assert_eq!(ft.frame_index, 1);
    }
}
