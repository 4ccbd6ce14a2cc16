//! Accessory info panel.
//!
//! [`InfoPanelDispatcher`] turns a catalog record into display text and hands
//! it to a [`DisplaySink`]. In the app the sink is [`PanelContent`], which the
//! UI systems below mirror into a side panel.

pub mod catalog;
pub mod dispatcher;

use bevy::asset::LoadState;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

pub use catalog::{AccessoryCatalog, AccessoryRecord, Catalog, CatalogError};
pub use dispatcher::{DisplayRecord, DisplaySink, InfoPanelDispatcher, RecordingSink};

#[derive(Event, Debug, Clone, PartialEq)]
pub struct ShowAccessoryInfo {
    pub id: String,
}

#[derive(Event, Debug, Clone, Copy, Default)]
pub struct CloseInfoPanel;

/// Sink backing the on-screen panel.
#[derive(Resource, Debug, Default)]
pub struct PanelContent {
    pub record: Option<DisplayRecord>,
}

impl DisplaySink for PanelContent {
    fn push(&mut self, record: &DisplayRecord) {
        self.record = Some(record.clone());
    }

    fn clear(&mut self) {
        self.record = None;
    }
}

#[derive(Resource, Default)]
struct CatalogLoader {
    path: Option<String>,
    handle: Option<Handle<AccessoryCatalog>>,
}

/// Progress of the catalog asset.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CatalogStatus {
    /// No catalog path; lookups fall back to stubs.
    #[default]
    NotConfigured,
    Loading,
    Ready,
    Failed,
}

impl CatalogStatus {
    pub fn is_resolved(self) -> bool {
        self != Self::Loading
    }
}

#[derive(Component)]
struct InfoPanelRoot;

#[derive(Component, Clone, Copy)]
enum PanelField {
    Title,
    Maker,
    Price,
    Description,
    Features,
}

#[derive(Component)]
struct ClosePanelButton;

/// Info panel wiring. `catalog_path` is relative to the asset folder.
#[derive(Default)]
pub struct InfoPanelPlugin {
    pub catalog_path: Option<String>,
}

impl Plugin for InfoPanelPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(JsonAssetPlugin::<AccessoryCatalog>::new(&["catalog.json"]))
            .init_resource::<InfoPanelDispatcher>()
            .init_resource::<PanelContent>()
            .init_resource::<AccessoryCatalog>()
            .init_resource::<CatalogStatus>()
            .insert_resource(CatalogLoader {
                path: self.catalog_path.clone(),
                ..default()
            })
            .add_event::<ShowAccessoryInfo>()
            .add_event::<CloseInfoPanel>()
            .add_systems(Startup, (start_catalog_loading, spawn_info_panel_ui))
            .add_systems(
                Update,
                (
                    install_loaded_catalog,
                    handle_close_button,
                    handle_info_requests,
                    reflect_panel_content,
                )
                    .chain(),
            );
    }
}

fn start_catalog_loading(
    mut loader: ResMut<CatalogLoader>,
    mut status: ResMut<CatalogStatus>,
    asset_server: Res<AssetServer>,
) {
    let Some(path) = loader.path.clone() else {
        info!("No accessory catalog configured");
        return;
    };
    info!("Loading accessory catalog from {path}");
    loader.handle = Some(asset_server.load(path));
    *status = CatalogStatus::Loading;
}

fn install_loaded_catalog(
    loader: Res<CatalogLoader>,
    mut status: ResMut<CatalogStatus>,
    catalogs: Res<Assets<AccessoryCatalog>>,
    asset_server: Res<AssetServer>,
    mut commands: Commands,
) {
    if *status != CatalogStatus::Loading {
        return;
    }
    let Some(handle) = loader.handle.as_ref() else {
        return;
    };
    if let LoadState::Failed(e) = asset_server.load_state(handle) {
        error!("Accessory catalog failed to load: {e}");
        *status = CatalogStatus::Failed;
        return;
    }
    let Some(catalog) = catalogs.get(handle) else {
        return;
    };
    match catalog.validate() {
        Ok(()) => {
            info!("Accessory catalog ready with {} records", catalog.len());
            commands.insert_resource(catalog.clone());
            *status = CatalogStatus::Ready;
        }
        Err(e) => {
            error!("Accessory catalog rejected: {e}");
            *status = CatalogStatus::Failed;
        }
    }
}

pub fn handle_info_requests(
    mut shows: EventReader<ShowAccessoryInfo>,
    mut closes: EventReader<CloseInfoPanel>,
    catalog: Res<AccessoryCatalog>,
    mut dispatcher: ResMut<InfoPanelDispatcher>,
    mut content: ResMut<PanelContent>,
) {
    for _ in closes.read() {
        dispatcher.close(content.as_mut());
    }
    for request in shows.read() {
        dispatcher.show(&request.id, catalog.as_ref(), content.as_mut());
    }
}

fn handle_close_button(
    buttons: Query<&Interaction, (Changed<Interaction>, With<ClosePanelButton>)>,
    mut closes: EventWriter<CloseInfoPanel>,
) {
    for interaction in &buttons {
        if *interaction == Interaction::Pressed {
            closes.write(CloseInfoPanel);
        }
    }
}

fn spawn_info_panel_ui(mut commands: Commands) {
    let text = |field: PanelField, size: f32| {
        (
            field,
            Text::new(""),
            TextFont { font_size: size, ..default() },
            TextColor(Color::srgb(1.0, 1.0, 1.0)),
        )
    };

    commands
        .spawn((
            InfoPanelRoot,
            Name::new("InfoPanel"),
            BackgroundColor(Color::srgba(0.10, 0.11, 0.13, 0.92)),
            Node {
                width: Val::Px(320.0),
                position_type: PositionType::Absolute,
                right: Val::Px(0.0),
                top: Val::Px(0.0),
                bottom: Val::Px(0.0),
                padding: UiRect::all(Val::Px(12.0)),
                row_gap: Val::Px(8.0),
                display: Display::None,
                flex_direction: FlexDirection::Column,
                overflow: Overflow::clip_y(),
                ..default()
            },
        ))
        .with_children(|panel| {
            panel
                .spawn(Node {
                    width: Val::Percent(100.0),
                    justify_content: JustifyContent::SpaceBetween,
                    align_items: AlignItems::Center,
                    ..default()
                })
                .with_children(|header| {
                    header.spawn(text(PanelField::Title, 20.0));
                    header
                        .spawn((
                            ClosePanelButton,
                            Button,
                            Name::new("CloseInfoPanel"),
                            BackgroundColor(Color::srgb(0.22, 0.24, 0.28)),
                            BorderColor(Color::srgba(0.0, 0.0, 0.0, 0.25)),
                            Node {
                                width: Val::Px(28.0),
                                height: Val::Px(28.0),
                                align_items: AlignItems::Center,
                                justify_content: JustifyContent::Center,
                                border: UiRect::all(Val::Px(1.0)),
                                ..default()
                            },
                        ))
                        .with_children(|btn| {
                            btn.spawn((
                                Text::new("x"),
                                TextFont { font_size: 16.0, ..default() },
                                TextColor(Color::srgb(1.0, 1.0, 1.0)),
                            ));
                        });
                });
            panel.spawn(text(PanelField::Maker, 14.0));
            panel.spawn(text(PanelField::Price, 18.0));
            panel.spawn(text(PanelField::Description, 14.0));
            panel.spawn(text(PanelField::Features, 14.0));
        });
}

fn reflect_panel_content(
    content: Res<PanelContent>,
    mut roots: Query<&mut Node, With<InfoPanelRoot>>,
    mut fields: Query<(&PanelField, &mut Text)>,
) {
    if !content.is_changed() {
        return;
    }
    if let Ok(mut node) = roots.single_mut() {
        node.display = if content.record.is_some() { Display::Flex } else { Display::None };
    }
    let Some(record) = content.record.as_ref() else {
        return;
    };
    for (field, mut text) in &mut fields {
        let value = match field {
            PanelField::Title => record.title.clone(),
            PanelField::Maker => match (record.manufacturer.is_empty(), record.model_number.is_empty()) {
                (false, false) => format!("{} · {}", record.manufacturer, record.model_number),
                (false, true) => record.manufacturer.clone(),
                (true, _) => record.model_number.clone(),
            },
            PanelField::Price => record.price_label.clone(),
            PanelField::Description => record.description.clone(),
            PanelField::Features => record.features_text.clone(),
        };
        *text = Text::new(value);
    }
}
