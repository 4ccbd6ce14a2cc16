use bevy::prelude::*;

use ar_configurator::engine::camera::CameraRig;
use ar_configurator::engine::input::{PointerFrame, TouchPhase, TouchPoint};
use ar_configurator::tools::viewer::{
    SpawnPoint, SpawnPoints, ViewerController, ViewerPhase, ViewerSettings,
};

const FRAME: f32 = 1.0 / 60.0;

fn camera() -> CameraRig {
    CameraRig::looking_at(
        Vec3::new(0.0, 1.6, 0.0),
        Vec3::new(0.0, 1.6, -5.0),
        Vec2::new(1920.0, 1080.0),
    )
}

fn loaded(camera: &CameraRig) -> ViewerController {
    let mut viewer = ViewerController::default();
    viewer.load("Alloy Wheels", None, &SpawnPoints::default(), Some(camera));
    viewer
}

#[test]
fn zoom_sequence_accumulates_and_clamps() {
    let mut settings = ViewerSettings::default();
    settings.min_zoom = 0.005;
    settings.max_zoom = 100.0;
    settings.zoom_multiplier = 0.8;
    let mut viewer = ViewerController::new(settings);
    viewer.load("Alloy Wheels", None, &SpawnPoints::default(), Some(&camera()));

    let mut seen = Vec::new();
    for increment in [1.0, 1.0, -50.0, 1.0] {
        assert!(viewer.apply_zoom(increment));
        seen.push(viewer.zoom());
    }
    for (got, want) in seen.iter().zip([1.8, 2.6, 0.005, 0.805]) {
        assert!((got - want).abs() < 1e-5, "zoom {got} != {want}");
    }
}

#[test]
fn zoom_never_leaves_its_range() {
    let mut viewer = loaded(&camera());
    let settings = viewer.settings().clone();
    let increments = [3.0, 250.0, -0.5, -1000.0, 0.002, 75.0, 75.0, -12.5, 0.3, -0.0001];
    for increment in increments.iter().cycle().take(200) {
        viewer.apply_zoom(*increment);
        assert!(viewer.zoom() >= settings.min_zoom && viewer.zoom() <= settings.max_zoom);
    }
}

#[test]
fn reset_after_manipulation_restores_snapshot_exactly() {
    let camera = camera();
    let mut viewer = loaded(&camera);
    let original = *viewer.transform();

    viewer.rotate(37.0, -12.0);
    viewer.apply_zoom(2.5);
    viewer.tick(FRAME, &PointerFrame::mouse_drag(Vec2::new(400.0, 300.0), Vec2::new(25.0, -8.0)), &camera);
    viewer.toggle_movement_mode();
    viewer.tick(FRAME, &PointerFrame::mouse_drag(Vec2::new(400.0, 300.0), Vec2::new(-40.0, 15.0)), &camera);
    viewer.pan(Vec3::new(0.3, -0.1, 0.2));
    for _ in 0..30 {
        viewer.tick(FRAME, &PointerFrame::default(), &camera);
    }
    assert_ne!(*viewer.transform(), original);

    viewer.reset();

    assert_eq!(*viewer.transform(), original);
    assert_eq!(viewer.zoom(), 1.0);
    assert!(!viewer.state().movement_mode);
    assert_eq!(viewer.phase(), ViewerPhase::Placed);

    // Nothing left easing after the reset.
    viewer.tick(FRAME, &PointerFrame::default(), &camera);
    assert_eq!(*viewer.transform(), original);
}

#[test]
fn spawn_point_wins_over_camera_placement() {
    let spawn_points = SpawnPoints {
        points: vec![SpawnPoint {
            name: "Wheels".to_string(),
            position: Vec3::new(0.5, 1.0, -2.0),
            rotation: Quat::IDENTITY,
        }],
        default_point: None,
    };
    let mut viewer = ViewerController::default();
    viewer.load("Alloy Wheels", Some(0.4), &spawn_points, Some(&camera()));

    assert_eq!(viewer.transform().translation, Vec3::new(0.5, 1.0, -2.0));
    assert_eq!(viewer.transform().scale, Vec3::splat(0.4));
}

#[test]
fn visible_model_is_left_where_it_was_loaded() {
    let camera = camera();
    let mut viewer = loaded(&camera);
    let placed = *viewer.transform();
    assert!(viewer.visibility_pending());

    for _ in 0..3 {
        viewer.tick(0.05, &PointerFrame::default(), &camera);
    }
    assert!(!viewer.visibility_pending());
    assert!(viewer.state().diagnostic.is_none());
    assert_eq!(*viewer.transform(), placed);
}

#[test]
fn unseen_model_escalates_to_diagnostic() {
    // Every fallback sits inside the near plane of this camera.
    let camera = CameraRig {
        near: 5.0,
        ..camera()
    };
    let mut viewer = loaded(&camera);

    for _ in 0..10 {
        viewer.tick(0.05, &PointerFrame::default(), &camera);
    }

    let diagnostic = viewer.state().diagnostic.clone().expect("diagnostic recorded");
    assert_eq!(diagnostic.attempts, viewer.settings().max_visibility_attempts);
    assert_eq!(diagnostic.camera_position, camera.position());
    assert_eq!(diagnostic.model_scale, Vec3::splat(0.3), "emergency placement was the last resort");
    assert!(!viewer.visibility_pending());
}

#[test]
fn spreading_pinch_lowers_zoom_and_four_fingers_recover() {
    let camera = camera();
    let mut viewer = loaded(&camera);

    let pinch = |a: Vec2, b: Vec2, phase| PointerFrame {
        touches: vec![
            TouchPoint::new(0, a, Vec2::ZERO, phase),
            TouchPoint::new(1, b, Vec2::ZERO, phase),
        ],
        ..default()
    };
    viewer.tick(FRAME, &pinch(Vec2::new(900.0, 540.0), Vec2::new(1020.0, 540.0), TouchPhase::Began), &camera);
    viewer.tick(FRAME, &pinch(Vec2::new(800.0, 540.0), Vec2::new(1120.0, 540.0), TouchPhase::Moved), &camera);
    assert!(viewer.zoom() < 1.0, "spreading fingers lowers zoom, got {}", viewer.zoom());

    let four = PointerFrame {
        touches: (0..4)
            .map(|id| TouchPoint::new(id, Vec2::splat(100.0 * id as f32), Vec2::ZERO, TouchPhase::Began))
            .collect(),
        ..default()
    };
    viewer.tick(FRAME, &four, &camera);
    assert_eq!(viewer.transform().scale, Vec3::splat(0.3));
    assert_eq!(viewer.zoom(), 1.0);
}
