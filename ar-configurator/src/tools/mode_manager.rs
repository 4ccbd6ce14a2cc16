use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// What touches on the AR view currently do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    /// Touches place and rotate objects on surfaces.
    #[default]
    Placement,
    /// Touches drive the viewer and interactables; placement is disabled.
    Inspection,
}

impl InteractionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Placement => "placement",
            Self::Inspection => "inspection",
        }
    }
}

/// Resource holding the exclusive interaction mode.
#[derive(Resource, Debug, Default)]
pub struct ModeManager {
    mode: InteractionMode,
}

impl ModeManager {
    /// Switch mode. Returns `false` when already in it.
    pub fn activate(&mut self, mode: InteractionMode) -> bool {
        if self.mode == mode {
            return false;
        }
        info!("Mode manager: {} -> {}", self.mode.as_str(), mode.as_str());
        self.mode = mode;
        true
    }

    pub fn enter_inspection(&mut self) -> bool {
        self.activate(InteractionMode::Inspection)
    }

    pub fn exit_inspection(&mut self) -> bool {
        self.activate(InteractionMode::Placement)
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn placement_enabled(&self) -> bool {
        self.mode == InteractionMode::Placement
    }

    pub fn is_inspecting(&self) -> bool {
        self.mode == InteractionMode::Inspection
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ModeSelectionSource {
    Keyboard,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct ModeSelectionEvent {
    pub mode: InteractionMode,
    pub source: ModeSelectionSource,
}

pub fn handle_mode_selection_events(
    mut events: EventReader<ModeSelectionEvent>,
    mut modes: ResMut<ModeManager>,
) {
    for event in events.read() {
        if modes.activate(event.mode) {
            debug!("Mode switched via {:?}", event.source);
        }
    }
}

/// `I` toggles inspection on native builds.
pub fn handle_mode_keyboard_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    modes: Res<ModeManager>,
    mut events: EventWriter<ModeSelectionEvent>,
) {
    if keyboard.just_pressed(KeyCode::KeyI) {
        let mode = if modes.is_inspecting() {
            InteractionMode::Placement
        } else {
            InteractionMode::Inspection
        };
        events.write(ModeSelectionEvent {
            mode,
            source: ModeSelectionSource::Keyboard,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inspection_disables_placement() {
        let mut modes = ModeManager::default();
        assert!(modes.placement_enabled());
        assert!(modes.enter_inspection());
        assert!(!modes.enter_inspection());
        assert!(!modes.placement_enabled());
        assert!(modes.exit_inspection());
        assert_eq!(modes.mode(), InteractionMode::Placement);
    }

    #[test]
    fn selection_events_switch_mode() {
        let mut app = App::new();
        app.init_resource::<ModeManager>()
            .add_event::<ModeSelectionEvent>()
            .add_systems(Update, handle_mode_selection_events);

        app.world_mut().send_event(ModeSelectionEvent {
            mode: InteractionMode::Inspection,
            source: ModeSelectionSource::Keyboard,
        });
        app.update();
        assert!(app.world().resource::<ModeManager>().is_inspecting());
    }
}
