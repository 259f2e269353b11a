//! Headless rendering: a scripted swipe through a software-backed render loop,
//! shaded on the CPU and written as PNG.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use image::{ImageBuffer, Rgba};

use sheen_engine::controller::{ManualScheduler, RenderLoopController};
use sheen_engine::coords::Viewport;
use sheen_engine::surface::{SoftwareBackend, SurfaceConfig};
use sheen_engine::trail::CANVAS_SIZE;

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Pointer position for frame `i` of `frames`: a diagonal stroke over the
/// first two thirds, then still.
fn swipe_point(i: u32, frames: u32, width: f32, height: f32) -> Option<(f32, f32)> {
    let stroke = (frames * 2 / 3).max(2);
    if i >= stroke {
        return None;
    }
    let t = i as f32 / (stroke - 1) as f32;
    Some((width * (0.2 + 0.6 * t), height * (0.3 + 0.4 * t)))
}

pub fn render_to_png(
    config: &SurfaceConfig,
    width: u32,
    height: u32,
    frames: u32,
    out: &Path,
) -> Result<()> {
    let (w, h) = (width.max(1), height.max(1));
    let mut bg = RenderLoopController::new(
        SoftwareBackend::new(CANVAS_SIZE),
        ManualScheduler::new(),
        Viewport::new(w as f32, h as f32),
        1.0,
        config,
    );

    let t0 = Instant::now();
    bg.start();
    for i in 0..frames.max(1) {
        if let Some((x, y)) = swipe_point(i, frames, w as f32, h as f32) {
            bg.on_pointer_sample(x, y);
        }
        bg.on_frame(t0 + FRAME_INTERVAL * i);
    }
    bg.stop();

    log::info!(
        "simulated {} frames, {} live trail points, t = {:.3}s",
        bg.frames_drawn(),
        bg.trail().points().len(),
        bg.surface().time()
    );

    let backend = bg.backend();
    let size = backend.size();
    let pixels = backend
        .render_rgba()
        .context("render loop produced no uniforms")?;
    let img: ImageBuffer<Rgba<u8>, _> = ImageBuffer::from_raw(size.width, size.height, pixels)
        .context("snapshot buffer does not match its size")?;
    img.save(out)
        .with_context(|| format!("failed to write snapshot {}", out.display()))?;

    log::info!("snapshot written to {} ({}x{})", out.display(), size.width, size.height);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swipe_moves_then_rests() {
        let a = swipe_point(0, 30, 100.0, 100.0).unwrap();
        let b = swipe_point(19, 30, 100.0, 100.0).unwrap();
        assert!((a.0 - 20.0).abs() < 1e-4 && (a.1 - 30.0).abs() < 1e-4);
        assert!((b.0 - 80.0).abs() < 1e-4 && (b.1 - 70.0).abs() < 1e-4);
        assert!(swipe_point(20, 30, 100.0, 100.0).is_none());
    }

    #[test]
    fn tiny_frame_counts_still_stroke() {
        assert!(swipe_point(0, 1, 10.0, 10.0).is_some());
        assert!(swipe_point(1, 1, 10.0, 10.0).is_some());
    }
}
