//! Time subsystem.
//!
//! Frame timing that does not read the wall clock on its own: the host passes
//! the frame timestamp in, so tests can step a loop with synthetic instants.
//! - one `FrameClock` per render loop
//! - call `tick_at(now)` once per delivered frame

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime, MAX_FRAME_DELTA};
