//! GPU rendering subsystem.
//!
//! `SurfacePipeline` owns the wgpu resources of the procedural surface;
//! `GpuSurfaceBackend` pairs it with a window's `Gpu` and implements
//! `SurfaceBackend` for the render loop.

mod backend;
mod ctx;
mod pipeline;

pub use backend::GpuSurfaceBackend;
pub use ctx::{RenderCtx, RenderTarget};
pub use pipeline::SurfacePipeline;
