use crate::coords::PhysicalSize;
use crate::trail::TouchBitmap;

use super::camera::QuadGeometry;
use super::uniforms::UniformBlock;

/// Result of one draw.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DrawOutcome {
    /// The frame reached the screen.
    Presented,
    /// Transient failure; the next frame may succeed.
    Skipped,
    /// The graphics context is unusable; the loop must stop.
    Fatal,
}

/// Graphics context the render loop draws through.
///
/// Calls arrive in frame order: `resize`/`upload_geometry` when the size
/// changed, `upload_touch` when the bitmap is dirty, then `write_uniforms`
/// and `draw`.
pub trait SurfaceBackend {
    /// Resizes the backing store (physical pixels, never zero).
    fn resize(&mut self, size: PhysicalSize);

    fn upload_geometry(&mut self, geometry: &QuadGeometry);

    /// Replaces the touch texture contents. The texture itself is created
    /// once and keeps its identity.
    fn upload_touch(&mut self, bitmap: &TouchBitmap);

    fn write_uniforms(&mut self, block: &UniformBlock);

    fn draw(&mut self) -> DrawOutcome;
}
