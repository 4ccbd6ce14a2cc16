use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use bevy::window::PresentMode;

use crate::engine::camera::{CameraRig, sync_camera_rig};
use crate::engine::core::app_state::{AppState, StatusText, transition_to_running};
use crate::engine::core::config::ConfiguratorConfig;
use crate::engine::host::{AnchorProvider, SurfaceProvider};
use crate::engine::input::{PointerFrame, gather_pointer_frame};
use crate::tools::info_panel::{AccessoryCatalog, InfoPanelPlugin};
use crate::tools::mode_manager::{
    InteractionMode, ModeManager, ModeSelectionEvent, ModeSelectionSource,
    handle_mode_keyboard_shortcuts, handle_mode_selection_events,
};
use crate::tools::placement::{PlacementController, PlacementPlugin};
use crate::tools::viewer::{InspectAccessory, ViewerController, ViewerPlugin};

/// Assemble the app around the given host capabilities.
pub fn create_app(config: ConfiguratorConfig, surfaces: SurfaceProvider, anchors: AnchorProvider) -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        .init_state::<AppState>()
        .add_plugins(InfoPanelPlugin {
            catalog_path: config.catalog_path.clone(),
        })
        .add_plugins(PlacementPlugin)
        .add_plugins(ViewerPlugin);

    let mut modes = ModeManager::default();
    modes.activate(config.start_mode);

    // Configured state replaces the plugin defaults
    app.init_resource::<PointerFrame>()
        .init_resource::<CameraRig>()
        .insert_resource(modes)
        .insert_resource(surfaces)
        .insert_resource(anchors)
        .insert_resource(PlacementController::new(config.placement.clone()))
        .insert_resource(ViewerController::new(config.viewer.clone()))
        .insert_resource(config.spawn_points.clone())
        .insert_resource(config)
        .add_event::<ModeSelectionEvent>();

    app.add_systems(Startup, setup)
        .add_systems(
            Update,
            (
                handle_mode_keyboard_shortcuts,
                handle_mode_selection_events,
                sync_camera_rig,
                gather_pointer_frame,
            )
                .chain(),
        )
        .add_systems(
            Update,
            transition_to_running.run_if(in_state(AppState::Loading)),
        )
        .add_systems(
            Update,
            (handle_preview_shortcuts, apply_config_changes, status_text_update_system)
                .chain()
                .after(gather_pointer_frame)
                .run_if(in_state(AppState::Running)),
        );

    app
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(Window {
            title: "AR Configurator Preview".into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}

fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            1.0,
            -std::f32::consts::FRAC_PI_4,
        )),
    ));
}

/// Eye-height camera standing in for the device camera.
fn spawn_camera(commands: &mut Commands) {
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection::default()),
        Transform::from_xyz(0.0, 1.5, 2.5).looking_at(Vec3::new(0.0, 0.0, -1.0), Vec3::Y),
    ));
}

fn spawn_ground(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    commands.spawn((
        Name::new("ground"),
        Mesh3d(meshes.add(Plane3d::default().mesh().size(8.0, 8.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.22, 0.24, 0.26),
            perceptual_roughness: 0.9,
            ..default()
        })),
        Transform::IDENTITY,
    ));
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    spawn_lighting(&mut commands);
    spawn_camera(&mut commands);
    spawn_ground(&mut commands, &mut meshes, &mut materials);
    create_native_overlays(&mut commands);
}

fn create_native_overlays(commands: &mut Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 1.0, 1.0)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    left: Val::Px(12.0),
                    ..default()
                },
                StatusText,
            ));
        });
}

/// Desktop stand-ins for the mobile UI buttons.
///
/// `1`-`9` inspect catalog entries, `Delete` removes the last object and
/// `Shift+Delete` all of them, `Tab` toggles multi-object mode, `F5` reloads
/// the config file, `Escape` leaves inspection.
fn handle_preview_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    catalog: Res<AccessoryCatalog>,
    mut placement: ResMut<PlacementController>,
    mut anchors: ResMut<AnchorProvider>,
    mut config: ResMut<ConfiguratorConfig>,
    mut inspect: EventWriter<InspectAccessory>,
    mut modes: EventWriter<ModeSelectionEvent>,
) {
    const DIGITS: [KeyCode; 9] = [
        KeyCode::Digit1,
        KeyCode::Digit2,
        KeyCode::Digit3,
        KeyCode::Digit4,
        KeyCode::Digit5,
        KeyCode::Digit6,
        KeyCode::Digit7,
        KeyCode::Digit8,
        KeyCode::Digit9,
    ];
    for (index, key) in DIGITS.iter().enumerate() {
        if !keyboard.just_pressed(*key) {
            continue;
        }
        match catalog.accessories.get(index) {
            Some(record) => {
                inspect.write(InspectAccessory {
                    id: record.id.clone(),
                });
            }
            None => warn!("No catalog entry for slot {}", index + 1),
        }
    }

    if keyboard.just_pressed(KeyCode::Delete) || keyboard.just_pressed(KeyCode::Backspace) {
        if keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]) {
            placement.remove_all(anchors.0.as_mut());
        } else {
            placement.remove_last(anchors.0.as_mut());
        }
    }
    if keyboard.just_pressed(KeyCode::Tab) {
        let multiple = placement.toggle_multiple();
        info!("Multiple placement {}", if multiple { "on" } else { "off" });
    }
    if keyboard.just_pressed(KeyCode::F5) {
        match config.reload() {
            Some(Ok(reloaded)) => {
                info!("Config reloaded from {:?}", reloaded.source);
                *config = reloaded;
            }
            Some(Err(e)) => warn!("Config reload failed: {e}"),
            None => warn!("Config has no source file to reload"),
        }
    }
    if keyboard.just_pressed(KeyCode::Escape) {
        modes.write(ModeSelectionEvent {
            mode: InteractionMode::Placement,
            source: ModeSelectionSource::Keyboard,
        });
    }
}

/// Push edited placement settings into the running controller.
fn apply_config_changes(config: Res<ConfiguratorConfig>, mut placement: ResMut<PlacementController>) {
    if !config.is_changed() || config.is_added() {
        return;
    }
    placement.apply_settings(config.placement.clone());
}

fn status_text_update_system(
    diagnostics: Res<DiagnosticsStore>,
    modes: Res<ModeManager>,
    placement: Res<PlacementController>,
    viewer: Res<ViewerController>,
    mut query: Query<&mut Text, With<StatusText>>,
) {
    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed())
        .unwrap_or(0.0);

    let detail = if modes.is_inspecting() {
        let mut line = format!("Inspecting {:?}  zoom {:.2}", viewer.model_name(), viewer.zoom());
        if viewer.hints_visible() {
            line.push_str("\nDrag to rotate, pinch or scroll to zoom, double tap to move");
        }
        line
    } else if !placement.surfaces_detected() {
        "Scanning for surfaces...".to_string()
    } else {
        let drifting = placement.records().iter().filter(|r| !r.is_anchored()).count();
        let mut line = format!(
            "Placed {}/{}  {:?}",
            placement.placed_count(),
            placement.settings().capacity(),
            placement.phase()
        );
        if drifting > 0 {
            line.push_str(&format!("  ({drifting} unanchored)"));
        }
        line
    };

    for mut text in &mut query {
        text.0 = format!("FPS: {fps:.1}\n{detail}");
    }
}
