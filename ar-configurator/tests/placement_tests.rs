use bevy::prelude::*;

use ar_configurator::engine::camera::CameraRig;
use ar_configurator::engine::host::simulated::{AnchorCall, InMemoryAnchors, ScriptedSurfaces};
use ar_configurator::engine::host::{AnchorId, Surface, SurfaceAlignment, SurfaceId, TrackingState};
use ar_configurator::engine::input::{PressPhase, PrimaryPointer};
use ar_configurator::tools::placement::{
    PlacementController, PlacementError, PlacementEvent, PlacementHost, PlacementSettings,
    Rejection, SequencePhase,
};

const DT: f32 = 0.05;
const FLOOR: SurfaceId = SurfaceId(1);
const CENTER: Vec2 = Vec2::new(960.0, 540.0);

fn floor(size: Vec2) -> Surface {
    Surface {
        id: FLOOR,
        normal: Vec3::Y,
        alignment: SurfaceAlignment::HorizontalUp,
        size,
        tracking: TrackingState::Tracking,
    }
}

struct Session {
    surfaces: ScriptedSurfaces,
    anchors: InMemoryAnchors,
    camera: CameraRig,
}

impl Session {
    fn new(surface: Surface) -> Self {
        Self {
            surfaces: ScriptedSurfaces::new().with_surface(surface),
            anchors: InMemoryAnchors::new(),
            camera: CameraRig::looking_at(Vec3::new(0.0, 1.5, 3.0), Vec3::ZERO, Vec2::new(1920.0, 1080.0)),
        }
    }

    /// Every raycast hits the floor at the origin.
    fn always_hitting(surface: Surface) -> Self {
        let mut session = Self::new(surface);
        session.surfaces = std::mem::take(&mut session.surfaces).always_hit(FLOOR, Vec3::ZERO);
        session
    }

    fn tick(&mut self, controller: &mut PlacementController, pointer: Option<PrimaryPointer>) {
        let mut host = PlacementHost {
            surfaces: &mut self.surfaces,
            anchors: &mut self.anchors,
            camera: &self.camera,
        };
        controller.tick(DT, pointer, &mut host);
    }

    fn idle(&mut self, controller: &mut PlacementController, frames: usize) {
        for _ in 0..frames {
            self.tick(controller, None);
        }
    }
}

fn pointer(phase: PressPhase, position: Vec2) -> Option<PrimaryPointer> {
    Some(PrimaryPointer { phase, position })
}

#[test]
fn small_surface_is_rejected_without_record() {
    let mut session = Session::new(floor(Vec2::new(0.25, 0.2)));
    session.surfaces.push_hit(FLOOR, Vec3::ZERO);
    let mut settings = PlacementSettings::default();
    settings.min_surface_area = 0.10;
    let mut controller = PlacementController::new(settings);

    controller.request_placement(CENTER).unwrap();
    session.idle(&mut controller, 1);

    assert_eq!(controller.placed_count(), 0);
    let events = controller.drain_events();
    assert!(matches!(
        events.as_slice(),
        [PlacementEvent::Rejected {
            error: PlacementError::InvalidTarget(Rejection::TooSmall { .. })
        }]
    ));
    assert_eq!(session.surfaces.raycast_calls, 1, "invalid targets are not retried");
    assert!(session.anchors.log().is_empty());
}

#[test]
fn hit_on_third_attempt_places_on_third_attempt() {
    let mut session = Session::new(floor(Vec2::new(1.0, 1.0)));
    session.surfaces.push_miss();
    session.surfaces.push_miss();
    session.surfaces.push_hit(FLOOR, Vec3::new(0.0, 0.0, -0.5));
    let mut settings = PlacementSettings::default();
    settings.settle_delay = 0.05;
    settings.retry_delay = 0.05;
    let mut controller = PlacementController::new(settings);

    controller.request_placement(CENTER).unwrap();
    session.idle(&mut controller, 2);
    assert_eq!(controller.placed_count(), 0);
    assert_eq!(controller.phase(), SequencePhase::Resolving);
    assert_eq!(session.surfaces.raycast_calls, 2);

    session.idle(&mut controller, 1);
    assert_eq!(controller.placed_count(), 1);
    assert!(matches!(
        controller.drain_events().as_slice(),
        [PlacementEvent::Placed { attempt: 3, anchored: true, .. }]
    ));
}

#[test]
fn misses_past_retry_limit_give_up() {
    let mut session = Session::new(floor(Vec2::new(1.0, 1.0)));
    let mut controller = PlacementController::default();

    controller.request_placement(CENTER).unwrap();
    session.idle(&mut controller, 6);

    assert_eq!(controller.placed_count(), 0);
    assert_eq!(session.surfaces.raycast_calls, 3);
    assert!(controller
        .drain_events()
        .contains(&PlacementEvent::GaveUp { attempts: 3 }));
}

#[test]
fn single_mode_releases_old_anchor_before_creating_new_one() {
    let mut session = Session::new(floor(Vec2::new(1.0, 1.0)));
    let mut controller = PlacementController::default();

    for x in [-0.4, 0.4] {
        session.surfaces.push_hit(FLOOR, Vec3::new(x, 0.0, 0.0));
        controller.request_placement(CENTER).unwrap();
        session.idle(&mut controller, 4);
    }

    assert_eq!(controller.placed_count(), 1);
    assert_eq!(
        session.anchors.log(),
        &[
            AnchorCall::Create(Some(AnchorId(1))),
            AnchorCall::Release(AnchorId(1)),
            AnchorCall::Create(Some(AnchorId(2))),
        ]
    );
    assert_eq!(
        controller.last_placed().unwrap().original_position,
        Vec3::new(0.4, 0.0, 0.0)
    );
}

#[test]
fn multiple_mode_stops_at_capacity() {
    let mut session = Session::always_hitting(floor(Vec2::new(2.0, 2.0)));
    let mut settings = PlacementSettings::default();
    settings.allow_multiple = true;
    settings.max_objects = 2;
    let mut controller = PlacementController::new(settings);

    for _ in 0..2 {
        controller.request_placement(CENTER).unwrap();
        session.idle(&mut controller, 4);
    }
    assert_eq!(controller.placed_count(), 2);
    assert!(!controller.can_place_more());
    assert_eq!(
        controller.request_placement(CENTER),
        Err(PlacementError::CapacityReached)
    );
}

#[test]
fn unavailable_anchors_degrade_to_unanchored_placement() {
    let mut session = Session::new(floor(Vec2::new(1.0, 1.0)));
    session.anchors = InMemoryAnchors::unavailable();
    session.surfaces.push_hit(FLOOR, Vec3::ZERO);
    let mut controller = PlacementController::default();

    controller.request_placement(CENTER).unwrap();
    session.idle(&mut controller, 1);

    let record = controller.last_placed().unwrap();
    assert!(!record.is_anchored());
    let events = controller.drain_events();
    assert!(matches!(
        events.as_slice(),
        [
            PlacementEvent::Placed { anchored: false, .. },
            PlacementEvent::AnchorDegraded { .. }
        ]
    ));
}

/// Place one object under the screen centre and let the cooldown expire.
fn placed_at_center(session: &mut Session) -> PlacementController {
    let mut controller = PlacementController::default();
    session.tick(&mut controller, pointer(PressPhase::Pressed, CENTER));
    session.tick(&mut controller, pointer(PressPhase::Released, CENTER));
    session.idle(&mut controller, 4);
    assert_eq!(controller.placed_count(), 1);
    assert_eq!(controller.phase(), SequencePhase::Idle);
    controller
}

/// Press on the object, hold past the hold time, then drag right by `dx`.
fn hold_and_drag(session: &mut Session, controller: &mut PlacementController, dx: f32) {
    session.tick(controller, pointer(PressPhase::Pressed, CENTER));
    for _ in 0..12 {
        session.tick(controller, pointer(PressPhase::Held, CENTER));
    }
    let end = CENTER + Vec2::new(dx, 0.0);
    session.tick(controller, pointer(PressPhase::Held, end));
    session.tick(controller, pointer(PressPhase::Released, end));
}

#[test]
fn held_drag_spins_object_about_surface_normal() {
    let mut session = Session::always_hitting(floor(Vec2::new(1.0, 1.0)));
    let mut controller = placed_at_center(&mut session);
    let before = controller.last_placed().unwrap().transform.rotation;
    let placements = session.surfaces.raycast_calls;

    hold_and_drag(&mut session, &mut controller, 400.0);

    assert_eq!(controller.placed_count(), 1, "press on an object must not place");
    assert_eq!(session.surfaces.raycast_calls, placements);
    let after = controller.last_placed().unwrap().transform.rotation;
    let (axis, angle) = (after * before.inverse()).to_axis_angle();
    assert!(axis.abs().distance(Vec3::Y) < 1e-3);
    assert!((angle.to_degrees() - 120.0).abs() < 0.1, "rotated {}", angle.to_degrees());
    assert!(controller.selected().is_none());
}

#[test]
fn locked_object_ignores_drag() {
    let mut session = Session::always_hitting(floor(Vec2::new(1.0, 1.0)));
    let mut controller = placed_at_center(&mut session);
    let record = controller.last_placed().unwrap();
    let (object, before) = (record.object, record.transform.rotation);
    assert!(controller.set_locked(object, true));

    hold_and_drag(&mut session, &mut controller, 400.0);

    assert_eq!(controller.last_placed().unwrap().transform.rotation, before);
}

#[test]
fn removing_an_object_releases_its_anchor() {
    let mut session = Session::always_hitting(floor(Vec2::new(2.0, 2.0)));
    let mut settings = PlacementSettings::default();
    settings.allow_multiple = true;
    let mut controller = PlacementController::new(settings);

    controller.request_placement(CENTER).unwrap();
    session.idle(&mut controller, 4);
    let first = controller.last_placed().unwrap().object;
    assert_eq!(session.anchors.live_count(), 1);
    controller.drain_events();

    assert_eq!(controller.remove_last(&mut session.anchors), Some(first));
    assert_eq!(session.anchors.live_count(), 0);
    assert_eq!(controller.drain_events(), vec![PlacementEvent::Removed { object: first }]);
    assert!(controller.remove_last(&mut session.anchors).is_none());
}
