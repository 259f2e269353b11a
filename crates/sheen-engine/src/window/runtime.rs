use anyhow::{Context, Result};
use ouroboros::self_referencing;
use std::collections::HashMap;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::controller::{ControllerOptions, RedrawScheduler, RenderLoopController};
use crate::coords::Viewport;
use crate::device::{Gpu, GpuInit};
use crate::input::platform::translate_window_event;
use crate::input::{InputState, Key, SurfaceInput};
use crate::render::GpuSurfaceBackend;
use crate::surface::{Preset, SurfaceConfig};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    /// Number of windows to open, each with its own background.
    pub windows: usize,
    /// Initial surface configuration of every window.
    pub surface: SurfaceConfig,
    /// Preset that `Space` cycles onward from.
    pub preset: Preset,
    pub controller: ControllerOptions,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "sheen".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            windows: 1,
            surface: SurfaceConfig::default(),
            preset: Preset::default(),
            controller: ControllerOptions::default(),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    pub fn run(config: RuntimeConfig, gpu_init: GpuInit) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        Ok(())
    }
}

type Background<'w> = RenderLoopController<GpuSurfaceBackend<'w>, RedrawScheduler<'w>>;

#[self_referencing]
struct WindowEntry {
    input: InputState,
    preset: Preset,

    window: Window,

    /// `None` when the graphics context could not be created; the window
    /// stays open and blank.
    #[borrows(window)]
    #[covariant]
    background: Option<Background<'this>>,
}

struct AppState {
    config: RuntimeConfig,
    gpu_init: GpuInit,

    windows: HashMap<WindowId, WindowEntry>,
    exit_requested: bool,
}

impl AppState {
    fn new(config: RuntimeConfig, gpu_init: GpuInit) -> Self {
        Self {
            config,
            gpu_init,
            windows: HashMap::new(),
            exit_requested: false,
        }
    }

    fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop, title: String) -> Result<WindowId> {
        let attrs = Window::default_attributes()
            .with_title(title)
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let id = window.id();
        let gpu_init = self.gpu_init.clone();
        let surface = self.config.surface.clone();
        let options = self.config.controller.clone();

        let entry = WindowEntryBuilder {
            input: InputState::default(),
            preset: self.config.preset,
            window,
            background_builder: |w| mount_background(w, gpu_init, &surface, options),
        }
        .build();

        self.windows.insert(id, entry);
        Ok(id)
    }

    fn destroy_window_entry(&mut self, id: WindowId) {
        if self.windows.remove(&id).is_some() {
            log::debug!("window {id:?} closed");
        }
        if self.windows.is_empty() {
            self.request_exit();
        }
    }
}

/// Creates the GPU context and the render loop for one window.
fn mount_background<'w>(
    window: &'w Window,
    gpu_init: GpuInit,
    config: &SurfaceConfig,
    options: ControllerOptions,
) -> Option<Background<'w>> {
    let gpu = match pollster::block_on(Gpu::new(window, gpu_init)) {
        Ok(gpu) => gpu,
        Err(e) => {
            log::warn!("background disabled for window {:?}: {e:#}", window.id());
            return None;
        }
    };

    let info = gpu.adapter_info();
    log::info!("window {:?} rendering on {} ({:?})", window.id(), info.name, info.backend);

    let (viewport, scale) = window_viewport(window);
    let mut background = RenderLoopController::with_options(
        GpuSurfaceBackend::new(gpu),
        RedrawScheduler::new(window),
        viewport,
        scale,
        config,
        options,
    );
    background.set_intersecting(is_visible_size(window));
    background.start();
    Some(background)
}

fn window_viewport(window: &Window) -> (Viewport, f32) {
    let scale = window.scale_factor();
    let logical = window.inner_size().to_logical::<f64>(scale);
    (Viewport::new(logical.width as f32, logical.height as f32), scale as f32)
}

fn is_visible_size(window: &Window) -> bool {
    let size = window.inner_size();
    size.width > 0 && size.height > 0
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !self.windows.is_empty() {
            return;
        }

        let count = self.config.windows.max(1);
        for i in 0..count {
            let title = if count == 1 {
                self.config.title.clone()
            } else {
                format!("{} #{}", self.config.title, i + 1)
            };
            if let Err(e) = self.create_window_entry(event_loop, title) {
                log::error!("failed to create window: {e:#}");
            }
        }

        if self.windows.is_empty() {
            self.request_exit();
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Frames are requested by each background's scheduler.
        event_loop.set_control_flow(ControlFlow::Wait);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let Some(entry) = self.windows.get_mut(&window_id) else {
            return;
        };

        let mut close = false;

        entry.with_mut(|fields| {
            let input = translate_window_event(fields.window, &event)
                .and_then(|ev| fields.input.apply_event(&ev));

            if let Some(SurfaceInput::KeyPressed(Key::Escape)) = input {
                close = true;
                return;
            }

            let Some(background) = fields.background.as_mut() else { return };

            match input {
                Some(SurfaceInput::Sample { x, y }) => background.on_pointer_sample(x, y),
                Some(SurfaceInput::Leave) => background.on_pointer_left(),
                Some(SurfaceInput::KeyPressed(Key::Space)) => {
                    *fields.preset = fields.preset.next();
                    log::info!("switching to preset {}", fields.preset.name());
                    background.configure(&fields.preset.config());
                }
                _ => {}
            }

            match &event {
                WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                    let visible = is_visible_size(fields.window);
                    background.set_intersecting(visible);
                    if visible {
                        let (viewport, scale) = window_viewport(fields.window);
                        background.on_resize(viewport, scale);
                    }
                }
                WindowEvent::Occluded(occluded) => background.set_page_visible(!occluded),
                WindowEvent::RedrawRequested => {
                    background.on_frame(Instant::now());
                }
                _ => {}
            }
        });

        if close || matches!(event, WindowEvent::CloseRequested) {
            self.destroy_window_entry(window_id);
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }
}
