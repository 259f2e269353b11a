use crate::coords::PhysicalSize;

use super::camera::{Camera, QuadGeometry};
use super::config::SurfaceConfig;
use super::uniforms::{SurfaceUniforms, UniformBlock};

/// Upper bound for one `advance` step, in seconds.
pub const MAX_ADVANCE: f32 = 0.1;

/// State of the full-viewport procedural surface.
///
/// Owns the uniform values and the frustum-filling quad. GPU resources live
/// in a `SurfaceBackend`; this type only decides what they should contain.
#[derive(Debug, Clone)]
pub struct ProceduralSurfaceRenderer {
    camera: Camera,
    uniforms: SurfaceUniforms,
    geometry: Option<QuadGeometry>,
    geometry_builds: u64,
}

impl ProceduralSurfaceRenderer {
    pub fn new(config: &SurfaceConfig) -> Self {
        Self::with_camera(config, Camera::default())
    }

    pub fn with_camera(config: &SurfaceConfig, camera: Camera) -> Self {
        Self {
            camera,
            uniforms: SurfaceUniforms::new(config),
            geometry: None,
            geometry_builds: 0,
        }
    }

    /// Writes the static uniforms. Geometry and animation time are kept.
    pub fn configure(&mut self, config: &SurfaceConfig) {
        self.uniforms.apply_config(config);
    }

    /// Creates the quad for `view_size` and sets `resolution`.
    pub fn build(&mut self, view_size: PhysicalSize) {
        let size = view_size.at_least_one();
        self.geometry = Some(QuadGeometry::new(&self.camera, size));
        self.uniforms.resolution = size;
        self.geometry_builds += 1;
        log::debug!("surface geometry built for {}x{}", size.width, size.height);
    }

    /// Rebuilds geometry only when the size actually changed.
    ///
    /// Returns whether a rebuild happened.
    pub fn on_resize(&mut self, view_size: PhysicalSize) -> bool {
        let size = view_size.at_least_one();
        if self.geometry.as_ref().is_some_and(|g| g.size == size) {
            return false;
        }
        self.build(size);
        true
    }

    /// Advances animation time by `delta_seconds`, clamped to `[0, MAX_ADVANCE]`.
    pub fn advance(&mut self, delta_seconds: f32) {
        if !delta_seconds.is_finite() {
            return;
        }
        self.uniforms.time += delta_seconds.clamp(0.0, MAX_ADVANCE);
    }

    /// Resets animation time to zero.
    pub fn restart(&mut self) {
        self.uniforms.time = 0.0;
    }

    #[inline]
    pub fn time(&self) -> f32 {
        self.uniforms.time
    }

    #[inline]
    pub fn uniforms(&self) -> &SurfaceUniforms {
        &self.uniforms
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[inline]
    pub fn geometry(&self) -> Option<&QuadGeometry> {
        self.geometry.as_ref()
    }

    /// Number of geometry (re)builds so far.
    #[inline]
    pub fn geometry_builds(&self) -> u64 {
        self.geometry_builds
    }

    /// Packed uniforms for upload. Uses an identity transform until built.
    pub fn uniform_block(&self) -> UniformBlock {
        let view_proj = self
            .geometry
            .as_ref()
            .map(|g| g.view_proj)
            .unwrap_or(glam::Mat4::IDENTITY);
        self.uniforms.to_block(view_proj)
    }
}
