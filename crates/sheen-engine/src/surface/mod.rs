//! Full-viewport procedural surface.
//!
//! - `config`: presets and the flat configuration object
//! - `uniforms`: uniform values and their GPU layout
//! - `camera`: frustum-filling quad
//! - `renderer`: `ProceduralSurfaceRenderer` (time, resize, hot swap)
//! - `backend`: the graphics context seam used by the render loop
//! - `reference`: CPU evaluation of the shader

pub mod backend;
pub mod camera;
pub mod config;
pub mod reference;
pub mod renderer;
pub mod software;
pub mod uniforms;

pub use backend::{DrawOutcome, SurfaceBackend};
pub use camera::{Camera, QuadGeometry, SurfaceVertex, QUAD_INDICES};
pub use config::{Preset, SurfaceConfig, MAX_CENTERS};
pub use renderer::{ProceduralSurfaceRenderer, MAX_ADVANCE};
pub use software::SoftwareBackend;
pub use uniforms::{SurfaceUniforms, UniformBlock, WELL_ORBITS};

/// WGSL source of the surface pipeline.
pub const SHADER_SOURCE: &str = include_str!("shader.wgsl");
