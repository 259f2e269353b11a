use crate::coords::PhysicalSize;
use crate::device::{Gpu, SurfaceErrorAction};
use crate::surface::{DrawOutcome, QuadGeometry, SurfaceBackend, UniformBlock};
use crate::trail::TouchBitmap;

use super::pipeline::SurfacePipeline;
use super::{RenderCtx, RenderTarget};

/// `SurfaceBackend` drawing to a window surface through wgpu.
pub struct GpuSurfaceBackend<'w> {
    gpu: Gpu<'w>,
    pipeline: SurfacePipeline,
}

impl<'w> GpuSurfaceBackend<'w> {
    pub fn new(gpu: Gpu<'w>) -> Self {
        Self {
            gpu,
            pipeline: SurfacePipeline::new(),
        }
    }

    pub fn gpu(&self) -> &Gpu<'w> {
        &self.gpu
    }

    fn ctx<'a>(gpu: &'a Gpu<'w>) -> RenderCtx<'a> {
        RenderCtx::new(gpu.device(), gpu.queue(), gpu.surface_format())
    }
}

impl SurfaceBackend for GpuSurfaceBackend<'_> {
    fn resize(&mut self, size: PhysicalSize) {
        self.gpu.resize(size);
    }

    fn upload_geometry(&mut self, geometry: &QuadGeometry) {
        let ctx = Self::ctx(&self.gpu);
        self.pipeline.upload_geometry(&ctx, geometry);
    }

    fn upload_touch(&mut self, bitmap: &TouchBitmap) {
        let ctx = Self::ctx(&self.gpu);
        self.pipeline.upload_touch(&ctx, bitmap);
    }

    fn write_uniforms(&mut self, block: &UniformBlock) {
        let ctx = Self::ctx(&self.gpu);
        self.pipeline.write_uniforms(&ctx, block);
    }

    fn draw(&mut self) -> DrawOutcome {
        let mut frame = match self.gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                log::debug!("surface acquire failed: {err}");
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                        DrawOutcome::Skipped
                    }
                    SurfaceErrorAction::Fatal => DrawOutcome::Fatal,
                };
            }
        };

        {
            let ctx = Self::ctx(&self.gpu);
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
            self.pipeline.render(&ctx, &mut target);
        }

        self.gpu.submit(frame);
        DrawOutcome::Presented
    }
}
