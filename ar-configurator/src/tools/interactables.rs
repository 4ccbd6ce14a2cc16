use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use constants::interaction::{
    INTERACT_MAX_DISTANCE, INTERACTABLE_HALF_EXTENTS, STEERING_DEADZONE, STEERING_MAX_ANGLE,
    STEERING_RETURN_SPEED, STEERING_ROTATION_SPEED,
};

use crate::engine::camera::CameraRig;
use crate::engine::input::{PointerFrame, PressPhase};
use crate::tools::info_panel::ShowAccessoryInfo;
use crate::tools::mode_manager::ModeManager;
use crate::tools::placement::ray::nearest_hit;

/// What an interaction asks the surrounding app to do.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionOutcome {
    #[default]
    None,
    ShowInfo(String),
}

/// A part of the inspected model that reacts to taps and drags.
pub trait Interactable {
    fn on_interact(&mut self) -> InteractionOutcome;

    fn on_deselect(&mut self) {}

    /// Horizontal and vertical drag in pixels for this frame.
    fn on_drag(&mut self, _delta: Vec2, _dt: f32) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringWheel {
    /// Current yaw in degrees, within `[-max_angle, max_angle]`.
    pub yaw: f32,
    pub rotation_speed: f32,
    pub max_angle: f32,
    /// Rate a released wheel eases back to centre (1/s).
    pub return_speed: f32,
    /// Released yaw inside this band snaps to zero.
    pub deadzone: f32,
    #[serde(skip)]
    pub grabbed: bool,
}

impl Default for SteeringWheel {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            rotation_speed: STEERING_ROTATION_SPEED,
            max_angle: STEERING_MAX_ANGLE,
            return_speed: STEERING_RETURN_SPEED,
            deadzone: STEERING_DEADZONE,
            grabbed: false,
        }
    }
}

impl SteeringWheel {
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw.to_radians())
    }

    /// Ease a released wheel toward centre. Returns whether the yaw changed.
    pub fn settle(&mut self, dt: f32) -> bool {
        if self.grabbed || self.yaw == 0.0 {
            return false;
        }
        let eased = self.yaw * (1.0 - (dt * self.return_speed).min(1.0));
        self.yaw = if eased.abs() < self.deadzone { 0.0 } else { eased };
        true
    }
}

impl Interactable for SteeringWheel {
    fn on_interact(&mut self) -> InteractionOutcome {
        self.grabbed = true;
        InteractionOutcome::None
    }

    fn on_deselect(&mut self) {
        self.grabbed = false;
    }

    fn on_drag(&mut self, delta: Vec2, dt: f32) {
        if !self.grabbed {
            return;
        }
        self.yaw = (self.yaw - delta.x * self.rotation_speed * dt).clamp(-self.max_angle, self.max_angle);
    }
}

/// Tappable spot that opens the info panel for one accessory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessoryHotspot {
    pub accessory_id: String,
}

impl AccessoryHotspot {
    pub fn new(accessory_id: impl Into<String>) -> Self {
        Self {
            accessory_id: accessory_id.into(),
        }
    }

}

impl Interactable for AccessoryHotspot {
    fn on_interact(&mut self) -> InteractionOutcome {
        InteractionOutcome::ShowInfo(self.accessory_id.clone())
    }
}

/// Interactable parts attached to model entities.
#[derive(Component, Debug, Clone, PartialEq)]
pub enum InteractableKind {
    SteeringWheel(SteeringWheel),
    Hotspot(AccessoryHotspot),
}

impl Interactable for InteractableKind {
    fn on_interact(&mut self) -> InteractionOutcome {
        match self {
            Self::SteeringWheel(wheel) => wheel.on_interact(),
            Self::Hotspot(hotspot) => hotspot.on_interact(),
        }
    }

    fn on_deselect(&mut self) {
        match self {
            Self::SteeringWheel(wheel) => wheel.on_deselect(),
            Self::Hotspot(hotspot) => hotspot.on_deselect(),
        }
    }

    fn on_drag(&mut self, delta: Vec2, dt: f32) {
        match self {
            Self::SteeringWheel(wheel) => wheel.on_drag(delta, dt),
            Self::Hotspot(hotspot) => hotspot.on_drag(delta, dt),
        }
    }
}

/// Interactable under the pointer since the last press.
#[derive(Resource, Debug, Default)]
pub struct InteractionFocus {
    pub entity: Option<Entity>,
    last_position: Vec2,
}

impl InteractionFocus {
    pub fn is_engaged(&self) -> bool {
        self.entity.is_some()
    }
}

/// Route pointer presses during inspection to the interactable they hit.
pub fn handle_interactables(
    time: Res<Time>,
    frame: Res<PointerFrame>,
    modes: Res<ModeManager>,
    camera: Res<CameraRig>,
    mut focus: ResMut<InteractionFocus>,
    mut parts: Query<(Entity, &GlobalTransform, &mut InteractableKind)>,
    mut info: EventWriter<ShowAccessoryInfo>,
) {
    if !modes.is_inspecting() {
        if let Some(entity) = focus.entity.take() {
            if let Ok((_, _, mut part)) = parts.get_mut(entity) {
                part.on_deselect();
            }
        }
        return;
    }
    let Some(pointer) = frame.primary() else {
        return;
    };

    match pointer.phase {
        PressPhase::Pressed => {
            let Some(ray) = camera.screen_to_ray(pointer.position) else {
                return;
            };
            let candidates = parts
                .iter()
                .map(|(entity, global, _)| (entity, global.compute_transform()));
            let hit = nearest_hit(
                &ray,
                candidates,
                Vec3::from_array(INTERACTABLE_HALF_EXTENTS),
                INTERACT_MAX_DISTANCE,
            );
            let Some((entity, _)) = hit else {
                return;
            };
            if let Ok((_, _, mut part)) = parts.get_mut(entity) {
                if let InteractionOutcome::ShowInfo(id) = part.on_interact() {
                    info.write(ShowAccessoryInfo { id });
                }
                focus.entity = Some(entity);
                focus.last_position = pointer.position;
            }
        }
        PressPhase::Held => {
            let Some(entity) = focus.entity else {
                return;
            };
            let delta = pointer.position - focus.last_position;
            focus.last_position = pointer.position;
            if let Ok((_, _, mut part)) = parts.get_mut(entity) {
                part.on_drag(delta, time.delta_secs());
            }
        }
        PressPhase::Released => {
            if let Some(entity) = focus.entity.take() {
                if let Ok((_, _, mut part)) = parts.get_mut(entity) {
                    part.on_deselect();
                }
            }
        }
    }
}

/// Released steering wheels return to centre; every wheel turns its entity
/// to match its yaw.
pub fn apply_steering_rotation(time: Res<Time>, mut parts: Query<(&mut InteractableKind, &mut Transform)>) {
    let dt = time.delta_secs();
    for (mut part, mut transform) in &mut parts {
        let InteractableKind::SteeringWheel(wheel) = part.bypass_change_detection() else {
            continue;
        };
        wheel.settle(dt);
        let rotation = wheel.rotation();
        if transform.rotation != rotation {
            transform.rotation = rotation;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheel_turns_against_drag_and_clamps() {
        let mut wheel = SteeringWheel::default();
        wheel.on_drag(Vec2::new(10.0, 0.0), 0.1);
        assert_eq!(wheel.yaw, 0.0, "drag without grab is ignored");

        wheel.on_interact();
        wheel.on_drag(Vec2::new(10.0, 0.0), 0.1);
        assert!((wheel.yaw + 5.0).abs() < 1e-5);

        wheel.on_drag(Vec2::new(-1000.0, 0.0), 0.1);
        assert_eq!(wheel.yaw, STEERING_MAX_ANGLE);

        wheel.on_deselect();
        wheel.on_drag(Vec2::new(1000.0, 0.0), 0.1);
        assert_eq!(wheel.yaw, STEERING_MAX_ANGLE);
    }

    #[test]
    fn released_wheel_returns_to_centre() {
        let mut wheel = SteeringWheel::default();
        wheel.on_interact();
        wheel.on_drag(Vec2::new(-1000.0, 0.0), 0.1);
        assert_eq!(wheel.yaw, STEERING_MAX_ANGLE);
        assert!(!wheel.settle(0.1), "held wheel stays put");
        assert_eq!(wheel.yaw, STEERING_MAX_ANGLE);

        wheel.on_deselect();
        let mut last = wheel.yaw;
        for _ in 0..120 {
            wheel.settle(1.0 / 60.0);
            assert!(wheel.yaw <= last);
            last = wheel.yaw;
        }
        assert_eq!(wheel.yaw, 0.0);
        assert!(!wheel.settle(1.0 / 60.0));
    }

    #[test]
    fn hotspot_asks_for_its_accessory() {
        let mut kind = InteractableKind::Hotspot(AccessoryHotspot::new("alloy_wheels"));
        assert_eq!(
            kind.on_interact(),
            InteractionOutcome::ShowInfo("alloy_wheels".to_string())
        );
    }
}
