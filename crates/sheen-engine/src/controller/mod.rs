//! Render loop: start/stop, visibility gating, frame sequencing.
//!
//! `RenderLoopController` is generic over the graphics backend and the
//! host's frame scheduler so it can be stepped without a window or GPU.

mod render_loop;
mod scheduler;
mod visibility;

pub use render_loop::{ControllerOptions, RenderLoopController, DEFAULT_MAX_PIXEL_RATIO};
pub use scheduler::{FrameScheduler, ManualScheduler, RedrawScheduler};
pub use visibility::Visibility;
