//! Placement of objects on tracked surfaces.
//!
//! The controller itself is engine-agnostic: it is ticked with the frame
//! time, the primary pointer and borrowed host capabilities, and reports
//! what happened as [`PlacementEvent`]s. This module wires it into Bevy.
//!
//! ## Frame flow
//!
//! ```text
//! PointerFrame ──> drive_placement()
//!                    ├─> PlacementController::tick()
//!                    │     ├─> due retry / cooldown steps
//!                    │     ├─> hold selection, drag rotation
//!                    │     ├─> new placement sequence
//!                    │     └─> anchored records follow anchors
//!                    └─> PlacementEvent (EventWriter)
//!                          └─> sync_placed_objects()
//!                                └─> spawn / move / hide PlacedObject entities
//! ```
//!
//! ## Pooling
//!
//! Removed objects keep their entity hidden when pooling is enabled, and the
//! next placement reuses it. Without pooling the entity is despawned.

/// Placement sequence, drag rotation and record bookkeeping.
pub mod controller;

/// Placement and surface rejection errors.
pub mod error;

/// Handle recycling for placed objects.
pub mod pool;

/// Ray tests against oriented object bounds.
pub mod ray;

/// Scale and orientation of objects placed on a surface.
pub mod scaling;

/// Records, settings and events.
pub mod state;

/// Surface acceptance rules.
pub mod validation;

use bevy::prelude::*;

pub use controller::{PlacementController, PlacementHost, SequencePhase};
pub use error::{PlacementError, Rejection};
pub use state::{ObjectId, PlacedObjectRecord, PlacementEvent, PlacementSettings};

use crate::engine::camera::{CameraRig, sync_camera_rig};
use crate::engine::host::{AnchorProvider, SurfaceProvider};
use crate::engine::input::{PointerFrame, gather_pointer_frame};
use crate::tools::mode_manager::ModeManager;

/// Marks the entity showing a placed (or pooled) object.
#[derive(Component, Debug, Clone, Copy)]
pub struct PlacedObject(pub ObjectId);

#[derive(Resource)]
pub struct PlacementVisuals {
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
}

pub struct PlacementPlugin;

impl Plugin for PlacementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlacementController>()
            .add_event::<PlacementEvent>()
            .add_systems(Startup, create_placement_visuals)
            .add_systems(
                Update,
                (drive_placement, sync_placed_objects)
                    .chain()
                    .after(gather_pointer_frame)
                    .after(sync_camera_rig),
            )
            .add_systems(Last, release_placements_on_exit);
    }
}

fn create_placement_visuals(
    mut commands: Commands,
    controller: Res<PlacementController>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let size = controller.settings().pick_half_extents * 2.0;
    commands.insert_resource(PlacementVisuals {
        mesh: meshes.add(Cuboid::from_size(size)),
        material: materials.add(StandardMaterial {
            base_color: Color::srgb(0.78, 0.12, 0.10),
            perceptual_roughness: 0.4,
            metallic: 0.6,
            ..default()
        }),
    });
}

pub fn drive_placement(
    time: Res<Time>,
    frame: Res<PointerFrame>,
    modes: Res<ModeManager>,
    camera: Res<CameraRig>,
    mut surfaces: ResMut<SurfaceProvider>,
    mut anchors: ResMut<AnchorProvider>,
    mut controller: ResMut<PlacementController>,
    mut events: EventWriter<PlacementEvent>,
) {
    surfaces.0.observe_camera(&camera);

    let pointer = if modes.placement_enabled() {
        frame.primary()
    } else {
        None
    };

    let mut host = PlacementHost {
        surfaces: surfaces.0.as_mut(),
        anchors: anchors.0.as_mut(),
        camera: &camera,
    };
    controller.tick(time.delta_secs(), pointer, &mut host);
    events.write_batch(controller.drain_events());
}

/// Release every anchor before the app shuts down.
pub fn release_placements_on_exit(
    mut exits: EventReader<AppExit>,
    mut anchors: ResMut<AnchorProvider>,
    mut controller: ResMut<PlacementController>,
) {
    if exits.read().count() == 0 || !controller.is_active() {
        return;
    }
    info!("App exiting, releasing {} placed objects", controller.placed_count());
    controller.shutdown(anchors.0.as_mut());
}

pub fn sync_placed_objects(
    mut commands: Commands,
    mut events: EventReader<PlacementEvent>,
    controller: Res<PlacementController>,
    visuals: Option<Res<PlacementVisuals>>,
    mut objects: Query<(Entity, &PlacedObject, &mut Transform, &mut Visibility)>,
) {
    for event in events.read() {
        match event {
            PlacementEvent::Placed {
                object, transform, ..
            } => {
                if let Some((_, _, mut current, mut visibility)) =
                    objects.iter_mut().find(|(_, placed, _, _)| placed.0 == *object)
                {
                    *current = *transform;
                    *visibility = Visibility::Visible;
                    continue;
                }
                let Some(visuals) = visuals.as_ref() else {
                    warn!("Placement visuals not ready, {object:?} has no entity");
                    continue;
                };
                commands.spawn((
                    Mesh3d(visuals.mesh.clone()),
                    MeshMaterial3d(visuals.material.clone()),
                    *transform,
                    Visibility::Visible,
                    PlacedObject(*object),
                    Name::new(format!("placed_object_{}", object.0)),
                ));
            }
            PlacementEvent::Moved { object, transform } => {
                if let Some((_, _, mut current, _)) =
                    objects.iter_mut().find(|(_, placed, _, _)| placed.0 == *object)
                {
                    *current = *transform;
                }
            }
            PlacementEvent::Removed { object } => {
                let Some((entity, _, _, mut visibility)) =
                    objects.iter_mut().find(|(_, placed, _, _)| placed.0 == *object)
                else {
                    continue;
                };
                if controller.settings().pooling && controller.is_active() {
                    *visibility = Visibility::Hidden;
                } else {
                    commands.entity(entity).despawn();
                }
            }
            PlacementEvent::AnchorDegraded { object } => {
                debug!("{object:?} is not anchored and may drift");
            }
            PlacementEvent::Rejected { .. } | PlacementEvent::GaveUp { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::host::simulated::{InMemoryAnchors, ScriptedSurfaces};
    use crate::engine::host::{Surface, SurfaceAlignment, SurfaceId, TrackingState};

    fn placed_controller(anchors: &mut InMemoryAnchors) -> PlacementController {
        let mut surfaces = ScriptedSurfaces::new().with_surface(Surface {
            id: SurfaceId(1),
            normal: Vec3::Y,
            alignment: SurfaceAlignment::HorizontalUp,
            size: Vec2::new(1.0, 1.0),
            tracking: TrackingState::Tracking,
        });
        surfaces.push_hit(SurfaceId(1), Vec3::ZERO);
        let camera = CameraRig::looking_at(Vec3::new(0.0, 1.5, 3.0), Vec3::ZERO, Vec2::new(1920.0, 1080.0));

        let mut settings = PlacementSettings::default();
        settings.confirmation_delay = 0.0;
        let mut controller = PlacementController::new(settings);
        controller.request_placement(Vec2::new(960.0, 700.0)).unwrap();
        for _ in 0..2 {
            let mut host = PlacementHost {
                surfaces: &mut surfaces,
                anchors: &mut *anchors,
                camera: &camera,
            };
            controller.tick(0.05, None, &mut host);
        }
        controller
    }

    #[test]
    fn app_exit_releases_anchors() {
        let mut anchors = InMemoryAnchors::new();
        let controller = placed_controller(&mut anchors);
        let anchor = controller.last_placed().unwrap().anchor.unwrap().id;

        let mut app = App::new();
        app.add_event::<AppExit>()
            .insert_resource(controller)
            .insert_resource(AnchorProvider::new(anchors))
            .add_systems(Last, release_placements_on_exit);

        app.update();
        assert_eq!(app.world().resource::<PlacementController>().placed_count(), 1);

        app.world_mut().send_event(AppExit::Success);
        app.update();
        let controller = app.world().resource::<PlacementController>();
        assert_eq!(controller.placed_count(), 0);
        assert!(!controller.is_active());
        assert!(app.world().resource::<AnchorProvider>().0.pose(anchor).is_none());
    }
}
