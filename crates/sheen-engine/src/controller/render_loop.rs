use std::time::Instant;

use crate::coords::{PhysicalSize, Rect, Vec2, Viewport};
use crate::surface::{
    Camera, DrawOutcome, ProceduralSurfaceRenderer, SurfaceBackend, SurfaceConfig,
};
use crate::time::FrameClock;
use crate::trail::{TrailBuffer, TrailParams};

use super::scheduler::FrameScheduler;
use super::visibility::Visibility;

/// Default cap on the device pixel ratio used for the backing store.
pub const DEFAULT_MAX_PIXEL_RATIO: f32 = 2.0;

/// Construction parameters of a `RenderLoopController`.
#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub max_pixel_ratio: f32,
    pub trail: TrailParams,
    pub camera: Camera,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            max_pixel_ratio: DEFAULT_MAX_PIXEL_RATIO,
            trail: TrailParams::default(),
            camera: Camera::default(),
        }
    }
}

/// Per-mount render loop: owns the trail, the surface state, the clock and
/// the graphics backend, and turns scheduler callbacks into frames.
///
/// Frame order: pending resize, clock, `trail.tick()`, touch upload,
/// `surface.advance(dt)`, uniforms, draw, re-schedule.
///
/// The loop runs while it was started and the host reports the surface as
/// visible and intersecting. At most one frame request is outstanding.
pub struct RenderLoopController<B, S> {
    backend: B,
    scheduler: S,

    clock: FrameClock,
    trail: TrailBuffer,
    surface: ProceduralSurfaceRenderer,

    bounds: Rect,
    max_pixel_ratio: f32,
    pixel_ratio: f32,
    pending_resize: Option<PhysicalSize>,

    visibility: Visibility,
    wanted: bool,
    running: bool,
    frame_pending: bool,

    frames_drawn: u64,
}

impl<B, S> RenderLoopController<B, S>
where
    B: SurfaceBackend,
    S: FrameScheduler,
{
    /// Mounts a surface sized to `viewport` (logical pixels) at `scale_factor`.
    ///
    /// Geometry and uniforms are built immediately; nothing is drawn until
    /// `start`.
    pub fn new(
        backend: B,
        scheduler: S,
        viewport: Viewport,
        scale_factor: f32,
        config: &SurfaceConfig,
    ) -> Self {
        Self::with_options(backend, scheduler, viewport, scale_factor, config, ControllerOptions::default())
    }

    pub fn with_options(
        mut backend: B,
        scheduler: S,
        viewport: Viewport,
        scale_factor: f32,
        config: &SurfaceConfig,
        options: ControllerOptions,
    ) -> Self {
        let max_pixel_ratio = if options.max_pixel_ratio.is_finite() && options.max_pixel_ratio > 0.0 {
            options.max_pixel_ratio
        } else {
            DEFAULT_MAX_PIXEL_RATIO
        };
        let pixel_ratio = effective_pixel_ratio(scale_factor, max_pixel_ratio);
        let size = viewport.to_physical(pixel_ratio);

        let mut surface = ProceduralSurfaceRenderer::with_camera(config, options.camera);
        surface.build(size);

        backend.resize(size);
        if let Some(geometry) = surface.geometry() {
            backend.upload_geometry(geometry);
        }
        backend.write_uniforms(&surface.uniform_block());

        Self {
            backend,
            scheduler,
            clock: FrameClock::new(),
            trail: TrailBuffer::with_params(options.trail),
            surface,
            bounds: Rect::from_viewport(viewport),
            max_pixel_ratio,
            pixel_ratio,
            pending_resize: None,
            visibility: Visibility::default(),
            wanted: false,
            running: false,
            frame_pending: false,
            frames_drawn: 0,
        }
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    /// Starts the loop. Calling it while started does nothing.
    pub fn start(&mut self) {
        self.wanted = true;
        self.sync_running();
    }

    /// Stops the loop and withdraws the pending frame request. Safe to call
    /// any number of times.
    pub fn stop(&mut self) {
        self.wanted = false;
        self.sync_running();
    }

    pub fn set_page_visible(&mut self, visible: bool) {
        if self.visibility.page_visible != visible {
            self.visibility.page_visible = visible;
            self.sync_running();
        }
    }

    pub fn set_intersecting(&mut self, intersecting: bool) {
        if self.visibility.intersecting != intersecting {
            self.visibility.intersecting = intersecting;
            self.sync_running();
        }
    }

    fn sync_running(&mut self) {
        let should_run = self.wanted && self.visibility.allows_running();
        if should_run && !self.running {
            self.resume();
        } else if !should_run && self.running {
            self.suspend();
        }
    }

    fn resume(&mut self) {
        log::debug!("render loop resumed");
        self.running = true;
        self.clock.reset();
        self.request_frame();
    }

    fn suspend(&mut self) {
        log::debug!("render loop suspended");
        self.running = false;
        if self.frame_pending {
            self.frame_pending = false;
            self.scheduler.cancel();
        }
    }

    fn request_frame(&mut self) {
        if !self.frame_pending {
            self.frame_pending = true;
            self.scheduler.request();
        }
    }

    // ── frame ─────────────────────────────────────────────────────────────

    /// Runs one frame for a scheduler callback at `now`.
    ///
    /// Returns whether a frame was processed. Callbacks arriving while
    /// stopped or without an outstanding request are ignored.
    pub fn on_frame(&mut self, now: Instant) -> bool {
        if !self.running || !self.frame_pending {
            return false;
        }
        self.frame_pending = false;

        self.apply_pending_resize();

        let time = self.clock.tick_at(now);

        self.trail.tick();
        if self.trail.bitmap().is_dirty() {
            self.backend.upload_touch(self.trail.bitmap());
            self.trail.bitmap_mut().mark_uploaded();
        }

        self.surface.advance(time.dt);
        self.backend.write_uniforms(&self.surface.uniform_block());

        match self.backend.draw() {
            DrawOutcome::Presented => self.frames_drawn += 1,
            DrawOutcome::Skipped => {}
            DrawOutcome::Fatal => {
                log::error!("graphics context lost; stopping render loop");
                self.stop();
                return true;
            }
        }

        self.request_frame();
        true
    }

    fn apply_pending_resize(&mut self) {
        let Some(size) = self.pending_resize.take() else { return };
        if self.surface.on_resize(size) {
            log::debug!("surface resized to {}x{}", size.width, size.height);
            self.backend.resize(size);
            if let Some(geometry) = self.surface.geometry() {
                self.backend.upload_geometry(geometry);
            }
        }
    }

    // ── host signals ──────────────────────────────────────────────────────

    /// Records a new container size (logical pixels) and scale factor.
    ///
    /// Applied once at the start of the next frame; later calls before that
    /// frame replace earlier ones.
    pub fn on_resize(&mut self, viewport: Viewport, scale_factor: f32) {
        self.pixel_ratio = effective_pixel_ratio(scale_factor, self.max_pixel_ratio);
        self.bounds = self.bounds.with_size(viewport);
        self.pending_resize = Some(viewport.to_physical(self.pixel_ratio));
    }

    /// The surface's bounding rectangle in host pixels.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    /// Feeds a pointer/touch position in host pixels. Ignored while the
    /// loop is not running.
    pub fn on_pointer_sample(&mut self, client_x: f32, client_y: f32) {
        if !self.running {
            return;
        }
        if let Some(p) = self.bounds.normalize_point(Vec2::new(client_x, client_y)) {
            self.trail.add_touch(p);
        }
    }

    /// The pointer left the surface; the next sample starts a new stroke.
    pub fn on_pointer_left(&mut self) {
        self.trail.reset_sample();
    }

    /// Hot-swaps palette and tunables. Geometry and time are kept.
    pub fn configure(&mut self, config: &SurfaceConfig) {
        self.surface.configure(config);
        self.backend.write_uniforms(&self.surface.uniform_block());
    }

    // ── accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn is_frame_pending(&self) -> bool {
        self.frame_pending
    }

    #[inline]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[inline]
    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    #[inline]
    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    #[inline]
    pub fn trail(&self) -> &TrailBuffer {
        &self.trail
    }

    #[inline]
    pub fn surface(&self) -> &ProceduralSurfaceRenderer {
        &self.surface
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[inline]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }
}

fn effective_pixel_ratio(scale_factor: f32, max: f32) -> f32 {
    let ratio = if scale_factor.is_finite() && scale_factor > 0.0 { scale_factor } else { 1.0 };
    ratio.min(max)
}
