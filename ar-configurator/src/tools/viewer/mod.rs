//! Close-up inspection of a single model.
//!
//! [`ViewerController`] owns the model transform while inspecting. The systems
//! here feed it the pointer frame, copy its transform onto the
//! [`ViewedModel`] entity and tear it down when inspection ends.

pub mod controller;
pub mod gestures;
pub mod spawn_points;
pub mod state;
pub mod visibility;
pub mod zoom;

use bevy::prelude::*;

use constants::interaction::INTERACTABLE_HALF_EXTENTS;

pub use controller::ViewerController;
pub use gestures::{GestureTracker, PointerSource, ViewerGesture};
pub use spawn_points::{SpawnPoint, SpawnPoints};
pub use state::{ViewerPhase, ViewerSettings, ViewerSnapshot, ViewerState, VisibilityDiagnostic};
pub use visibility::VisibilityStrategy;

use crate::engine::camera::{CameraRig, sync_camera_rig};
use crate::engine::input::{PointerFrame, gather_pointer_frame};
use crate::tools::info_panel::{AccessoryCatalog, Catalog, CloseInfoPanel, ShowAccessoryInfo};
use crate::tools::interactables::{
    AccessoryHotspot, InteractableKind, InteractionFocus, SteeringWheel, apply_steering_rotation,
    handle_interactables,
};
use crate::tools::mode_manager::ModeManager;

/// Entity showing the inspected model.
#[derive(Component, Debug, Clone, Copy)]
pub struct ViewedModel;

/// Open `id` in the viewer and show its info.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct InspectAccessory {
    pub id: String,
}

pub struct ViewerPlugin;

impl Plugin for ViewerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ViewerController>()
            .init_resource::<SpawnPoints>()
            .init_resource::<InteractionFocus>()
            .add_event::<InspectAccessory>()
            .add_systems(
                Update,
                (
                    handle_inspect_requests,
                    handle_interactables,
                    drive_viewer,
                    apply_viewer_transform,
                    apply_steering_rotation,
                    end_inspection,
                )
                    .chain()
                    .after(gather_pointer_frame)
                    .after(sync_camera_rig),
            );
    }
}

pub fn handle_inspect_requests(
    mut commands: Commands,
    mut requests: EventReader<InspectAccessory>,
    mut viewer: ResMut<ViewerController>,
    mut modes: ResMut<ModeManager>,
    mut info: EventWriter<ShowAccessoryInfo>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    catalog: Res<AccessoryCatalog>,
    spawn_points: Res<SpawnPoints>,
    camera: Res<CameraRig>,
    models: Query<Entity, With<ViewedModel>>,
) {
    let Some(request) = requests.read().last() else {
        return;
    };

    if viewer.phase() == ViewerPhase::Destroyed {
        let settings = viewer.settings().clone();
        *viewer = ViewerController::new(settings);
    }

    let record = catalog.get(&request.id);
    let name = record.as_ref().map_or(request.id.as_str(), |r| r.name.as_str());
    let preferred_scale = record.as_ref().and_then(|r| r.preferred_scale);
    viewer.load(name, preferred_scale, &spawn_points, Some(&camera));
    modes.enter_inspection();
    info.write(ShowAccessoryInfo {
        id: request.id.clone(),
    });

    for entity in &models {
        commands.entity(entity).despawn();
    }
    let size = viewer.settings().model_half_extents * 2.0;
    let part_mesh = meshes.add(Cuboid::from_size(Vec3::from_array(INTERACTABLE_HALF_EXTENTS) * 2.0));
    let part_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.95, 0.65, 0.15),
        emissive: LinearRgba::rgb(0.4, 0.25, 0.05),
        ..default()
    });
    commands
        .spawn((
            ViewedModel,
            Name::new("viewed_model"),
            Mesh3d(meshes.add(Cuboid::from_size(size))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(0.55, 0.57, 0.62),
                metallic: 0.8,
                perceptual_roughness: 0.3,
                ..default()
            })),
            *viewer.transform(),
            Visibility::Visible,
        ))
        .with_children(|model| {
            model.spawn((
                Name::new("steering_wheel"),
                InteractableKind::SteeringWheel(SteeringWheel::default()),
                Mesh3d(part_mesh.clone()),
                MeshMaterial3d(part_material.clone()),
                Transform::from_translation(size * Vec3::new(-0.25, 0.5, 0.1)),
            ));
            model.spawn((
                Name::new(format!("hotspot_{}", request.id)),
                InteractableKind::Hotspot(AccessoryHotspot::new(request.id.clone())),
                Mesh3d(part_mesh),
                MeshMaterial3d(part_material),
                Transform::from_translation(size * Vec3::new(0.5, 0.25, 0.0)),
            ));
        });
}

pub fn drive_viewer(
    time: Res<Time>,
    frame: Res<PointerFrame>,
    modes: Res<ModeManager>,
    focus: Res<InteractionFocus>,
    camera: Res<CameraRig>,
    mut viewer: ResMut<ViewerController>,
) {
    let idle = PointerFrame::default();
    let frame = if modes.is_inspecting() && !focus.is_engaged() {
        frame.as_ref()
    } else {
        &idle
    };
    viewer.tick(time.delta_secs(), frame, &camera);
}

pub fn apply_viewer_transform(
    viewer: Res<ViewerController>,
    mut models: Query<(&mut Transform, &mut Visibility), With<ViewedModel>>,
) {
    if !viewer.is_changed() {
        return;
    }
    let shown = viewer.phase().accepts_input();
    for (mut transform, mut visibility) in &mut models {
        if shown {
            *transform = *viewer.transform();
        }
        *visibility = if shown { Visibility::Visible } else { Visibility::Hidden };
    }
}

/// Leaving inspection destroys the viewer and closes the panel.
pub fn end_inspection(
    modes: Res<ModeManager>,
    mut viewer: ResMut<ViewerController>,
    mut close: EventWriter<CloseInfoPanel>,
) {
    if !modes.is_changed() || modes.is_inspecting() {
        return;
    }
    if viewer.phase().accepts_input() {
        viewer.destroy();
        close.write(CloseInfoPanel);
    }
}
