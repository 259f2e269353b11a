use crate::coords::PhysicalSize;
use crate::trail::TouchBitmap;

use super::backend::{DrawOutcome, SurfaceBackend};
use super::camera::QuadGeometry;
use super::reference;
use super::uniforms::UniformBlock;

/// Backend without a GPU.
///
/// Keeps the last state written to it and can shade it with the CPU
/// reference. Drives headless snapshots and tests.
#[derive(Debug, Clone)]
pub struct SoftwareBackend {
    size: PhysicalSize,
    geometry: Option<QuadGeometry>,
    touch: TouchBitmap,
    uniforms: Option<UniformBlock>,
    touch_uploads: u64,
    geometry_uploads: u64,
    draws: u64,
    scripted: Vec<DrawOutcome>,
}

impl SoftwareBackend {
    pub fn new(touch_size: u32) -> Self {
        Self {
            size: PhysicalSize::new(1, 1),
            geometry: None,
            touch: TouchBitmap::new(touch_size),
            uniforms: None,
            touch_uploads: 0,
            geometry_uploads: 0,
            draws: 0,
            scripted: Vec::new(),
        }
    }

    /// Queues outcomes returned by the next draws, in order. Once exhausted,
    /// draws report `Presented`.
    pub fn script_outcomes(&mut self, outcomes: impl IntoIterator<Item = DrawOutcome>) {
        let mut queued: Vec<DrawOutcome> = outcomes.into_iter().collect();
        queued.reverse();
        queued.append(&mut self.scripted);
        self.scripted = queued;
    }

    pub fn size(&self) -> PhysicalSize {
        self.size
    }

    pub fn geometry(&self) -> Option<&QuadGeometry> {
        self.geometry.as_ref()
    }

    /// Touch texture as last uploaded.
    pub fn touch(&self) -> &TouchBitmap {
        &self.touch
    }

    pub fn uniforms(&self) -> Option<&UniformBlock> {
        self.uniforms.as_ref()
    }

    pub fn touch_uploads(&self) -> u64 {
        self.touch_uploads
    }

    pub fn geometry_uploads(&self) -> u64 {
        self.geometry_uploads
    }

    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Shades the current state at the backing-store size. `None` before the
    /// first uniform write.
    pub fn render_rgba(&self) -> Option<Vec<u8>> {
        let block = self.uniforms.as_ref()?;
        Some(reference::render_image(block, &self.touch, self.size.width, self.size.height))
    }
}

impl SurfaceBackend for SoftwareBackend {
    fn resize(&mut self, size: PhysicalSize) {
        self.size = size.at_least_one();
    }

    fn upload_geometry(&mut self, geometry: &QuadGeometry) {
        self.geometry = Some(*geometry);
        self.geometry_uploads += 1;
    }

    fn upload_touch(&mut self, bitmap: &TouchBitmap) {
        self.touch.clone_from(bitmap);
        self.touch_uploads += 1;
    }

    fn write_uniforms(&mut self, block: &UniformBlock) {
        self.uniforms = Some(*block);
    }

    fn draw(&mut self) -> DrawOutcome {
        let outcome = self.scripted.pop().unwrap_or(DrawOutcome::Presented);
        if outcome == DrawOutcome::Presented {
            self.draws += 1;
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_outcomes_play_in_order() {
        let mut b = SoftwareBackend::new(8);
        b.script_outcomes([DrawOutcome::Skipped, DrawOutcome::Fatal]);
        assert_eq!(b.draw(), DrawOutcome::Skipped);
        assert_eq!(b.draw(), DrawOutcome::Fatal);
        assert_eq!(b.draw(), DrawOutcome::Presented);
        assert_eq!(b.draws(), 1);
    }

    #[test]
    fn nothing_to_render_before_uniforms() {
        let b = SoftwareBackend::new(8);
        assert!(b.render_rgba().is_none());
    }
}
