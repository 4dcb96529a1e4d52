//! End-to-end runs of the background on the CPU renderer.

use smokefield::kernel::{self, POINTER_SCALE, REPEL_RADIUS};
use smokefield::prelude::*;
use smokefield::uniforms::POINTER_SENTINEL;

const FRAME_DT: f32 = 1.0 / 60.0;

fn containers() -> ContainerRegistry {
    let mut containers = ContainerRegistry::new();
    containers.register("fondo", ContainerSpec::new("test", 800, 600));
    containers
}

#[test]
fn test_missing_container_allocates_nothing() {
    assert!(init_background(&containers(), "nope").is_none());
}

#[test]
fn test_empty_field_presents_frames() {
    let mut render_loop = init_background(&containers(), "fondo")
        .unwrap()
        .with_particle_count(0)
        .into_headless();

    for i in 0..120 {
        assert_eq!(render_loop.frame(i as f32 * FRAME_DT), LoopStatus::Continue);
    }

    assert_eq!(render_loop.frames(), 120);
    let renderer = render_loop.renderer().unwrap();
    assert_eq!(renderer.presented(), 120);
    assert!(renderer.samples().is_empty());
}

#[test]
fn test_pointer_at_center_repels_nearby_particles() {
    let background = init_background(&containers(), "fondo")
        .unwrap()
        .with_particle_count(5000)
        .with_seed(2024);
    let sender = background.event_sender();
    let mut render_loop = background.into_headless();

    let mut repelled_near_center = false;
    for i in 0..100 {
        sender.pointer_moved(400.0, 300.0);
        render_loop.frame(i as f32 * FRAME_DT);

        let renderer = render_loop.renderer().unwrap();
        let pointer = render_loop.state().pointer.smoothed() * POINTER_SCALE;
        for sample in renderer.samples() {
            let before = sample.position.truncate() - sample.displacement;
            if sample.displacement != Vec2::ZERO && before.distance(pointer) < REPEL_RADIUS {
                repelled_near_center = true;
            }
        }
    }

    assert!(repelled_near_center);
    assert!(render_loop.renderer().unwrap().frames_with_repulsion() > 0);
    assert_eq!(render_loop.state().pointer.smoothed(), Vec2::ZERO);
}

#[test]
fn test_no_repulsion_before_first_pointer_sample() {
    let mut render_loop = init_background(&containers(), "fondo")
        .unwrap()
        .with_particle_count(5000)
        .with_seed(7)
        .into_headless();

    for i in 0..30 {
        render_loop.frame(i as f32 * FRAME_DT);
    }

    assert_eq!(render_loop.state().pointer.smoothed(), POINTER_SENTINEL);
    assert_eq!(render_loop.renderer().unwrap().frames_with_repulsion(), 0);
}

#[test]
fn test_pointer_eases_between_samples() {
    let background = init_background(&containers(), "fondo").unwrap().with_seed(1);
    let sender = background.event_sender();
    let mut render_loop = background.into_headless();

    // left edge, then jump to the right edge
    sender.pointer_moved(0.0, 300.0);
    render_loop.frame(0.0);
    assert_eq!(render_loop.state().pointer.smoothed(), Vec2::new(-1.0, 0.0));

    sender.pointer_moved(800.0, 300.0);
    let initial = 2.0;
    for k in 1..=60 {
        render_loop.frame(k as f32 * FRAME_DT);
        let err = (render_loop.state().pointer.smoothed() - Vec2::new(1.0, 0.0)).length();
        assert!(err <= 0.95f32.powi(k) * initial * 1.0001 + 1e-6);
    }
}

#[test]
fn test_resize_changes_aspect_and_surface() {
    let background = init_background(&containers(), "fondo").unwrap().with_particle_count(10);
    let sender = background.event_sender();
    let mut render_loop = background.into_headless();

    sender.resized(1280, 720);
    render_loop.frame(0.0);

    assert_eq!(render_loop.viewport().camera().aspect(), 1280.0 / 720.0);
    assert_eq!(render_loop.renderer().unwrap().size(), (1280, 720));

    // same size again: nothing changes
    sender.resized(1280, 720);
    render_loop.frame(FRAME_DT);
    assert_eq!(render_loop.renderer().unwrap().size(), (1280, 720));
}

#[test]
fn test_teardown_stops_loop() {
    let background = init_background(&containers(), "fondo").unwrap().with_particle_count(10);
    let sender = background.event_sender();
    let mut render_loop = background.into_headless();

    render_loop.frame(0.0);
    sender.teardown();
    assert_eq!(render_loop.frame(FRAME_DT), LoopStatus::TornDown);
    assert!(render_loop.renderer().is_none());
    assert_eq!(render_loop.frame(2.0 * FRAME_DT), LoopStatus::TornDown);
}

#[test]
fn test_particles_rise_and_wrap() {
    let mut render_loop = init_background(&containers(), "fondo")
        .unwrap()
        .with_particle_count(200)
        .with_seed(9)
        .into_headless();

    render_loop.frame(0.0);
    let start: Vec<f32> = render_loop.renderer().unwrap().samples().iter().map(|s| s.cycle).collect();

    // one full period later every particle is back where its cycle started
    render_loop.frame(kernel::RISE_PERIOD);
    let renderer = render_loop.renderer().unwrap();
    for (s, c0) in renderer.samples().iter().zip(start) {
        let d = (s.cycle - c0).abs();
        assert!(d < 1e-3 || (1.0 - d) < 1e-3, "cycle {} vs {}", s.cycle, c0);
    }
}
