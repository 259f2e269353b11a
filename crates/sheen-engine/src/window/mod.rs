//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Windows; each window mounts its own
//! background render loop.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
pub use winit::dpi::LogicalSize;
