use bevy::prelude::*;

use crate::tools::info_panel::CatalogStatus;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    Running,
}

#[derive(Component)]
pub struct StatusText;

/// Leave `Loading` once the catalog is installed, failed, or not configured.
pub fn transition_to_running(status: Res<CatalogStatus>, mut next_state: ResMut<NextState<AppState>>) {
    if status.is_resolved() {
        info!("Catalog resolved ({:?}), running", *status);
        next_state.set(AppState::Running);
    }
}
