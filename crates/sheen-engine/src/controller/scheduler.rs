use winit::window::Window;

/// Animation-frame primitive of the host.
///
/// `request` asks for one future `on_frame` call; `cancel` withdraws an
/// outstanding request. The controller tracks pending state itself, so a
/// frame delivered after `cancel` is ignored even if the host cannot
/// withdraw it.
pub trait FrameScheduler {
    fn request(&mut self);
    fn cancel(&mut self);
}

/// Scheduler that only counts requests. The caller delivers frames by hand.
#[derive(Debug, Default, Clone)]
pub struct ManualScheduler {
    requests: u64,
    cancels: u64,
    pending: bool,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a request is outstanding.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn requests(&self) -> u64 {
        self.requests
    }

    pub fn cancels(&self) -> u64 {
        self.cancels
    }
}

impl FrameScheduler for ManualScheduler {
    fn request(&mut self) {
        self.requests += 1;
        self.pending = true;
    }

    fn cancel(&mut self) {
        self.cancels += 1;
        self.pending = false;
    }
}

/// Scheduler backed by `Window::request_redraw`.
///
/// winit cannot withdraw a redraw request; `cancel` is a no-op and the
/// controller drops the stray `RedrawRequested`.
pub struct RedrawScheduler<'w> {
    window: &'w Window,
}

impl<'w> RedrawScheduler<'w> {
    pub fn new(window: &'w Window) -> Self {
        Self { window }
    }
}

impl FrameScheduler for RedrawScheduler<'_> {
    fn request(&mut self) {
        self.window.request_redraw();
    }

    fn cancel(&mut self) {}
}
