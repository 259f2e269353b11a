use std::time::{Duration, Instant};

use sheen_engine::controller::{ManualScheduler, RenderLoopController};
use sheen_engine::coords::Viewport;
use sheen_engine::surface::{Preset, SoftwareBackend};
use sheen_engine::trail::CANVAS_SIZE;

fn mount(width: f32, height: f32) -> RenderLoopController<SoftwareBackend, ManualScheduler> {
    RenderLoopController::new(
        SoftwareBackend::new(CANVAS_SIZE),
        ManualScheduler::new(),
        Viewport::new(width, height),
        1.0,
        &Preset::Liquid.config(),
    )
}

#[test]
fn swipe_between_frames_reaches_the_touch_texture() {
    let mut bg = mount(400.0, 300.0);
    let t0 = Instant::now();
    let frame_at = |i: u64| t0 + Duration::from_millis(16 * i);

    bg.start();
    for i in 1..=10u64 {
        if i == 3 {
            // (0.2, 0.2) -> (0.8, 0.8) of a 400×300 container.
            bg.on_pointer_sample(80.0, 60.0);
            bg.on_pointer_sample(320.0, 240.0);
        }

        assert!(bg.on_frame(frame_at(i)), "frame {i} was not processed");

        if i == 3 {
            let points = bg.trail().points();
            assert_eq!(points.len(), 1);
            assert_eq!(points[0].age, 1);
            assert!(!bg.trail().bitmap().is_neutral());
            assert!(!bg.backend().touch().is_neutral());
        }
    }

    assert_eq!(bg.frames_drawn(), 10);
    assert_eq!(bg.trail().points()[0].age, 8);
    // The first frame only sets the clock baseline.
    assert!((bg.surface().time() - 9.0 * 0.016).abs() < 1e-4);
}

#[test]
fn rendered_snapshot_changes_with_the_trail() {
    let mut touched = mount(48.0, 36.0);
    let mut still = mount(48.0, 36.0);
    let t0 = Instant::now();

    touched.start();
    still.start();
    // Run both past the envelope peak on identical frame times.
    for i in 0..20u64 {
        if i == 1 {
            touched.on_pointer_sample(5.0, 5.0);
            touched.on_pointer_sample(14.0, 11.0);
        }
        let now = t0 + Duration::from_millis(16 * i);
        assert!(touched.on_frame(now));
        assert!(still.on_frame(now));
    }

    assert_eq!(touched.surface().time(), still.surface().time());
    assert_eq!(touched.trail().points().len(), 1);
    assert!(still.trail().points().is_empty());

    let with_trail = touched.backend().render_rgba().expect("uniforms written");
    let without = still.backend().render_rgba().expect("uniforms written");
    assert_eq!(with_trail.len(), 48 * 36 * 4);
    assert_eq!(without, still.backend().render_rgba().expect("uniforms written"));
    assert_ne!(with_trail, without);
}

#[test]
fn independent_mounts_do_not_share_state() {
    let mut a = mount(400.0, 300.0);
    let mut b = mount(400.0, 300.0);
    let t0 = Instant::now();

    a.start();
    b.start();
    a.on_pointer_sample(10.0, 10.0);
    a.on_pointer_sample(200.0, 200.0);
    a.on_frame(t0);
    b.on_frame(t0);

    assert_eq!(a.trail().points().len(), 1);
    assert!(b.trail().points().is_empty());
    assert!(b.trail().bitmap().is_neutral());
}
