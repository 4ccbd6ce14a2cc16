use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use constants::viewer::*;

/// Lifecycle of the inspected model. The manipulation phases last one frame
/// each and are chosen by the input present in that frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewerPhase {
    #[default]
    Uninitialized,
    Placed,
    Rotating,
    Panning,
    Zooming,
    Destroyed,
}

impl ViewerPhase {
    pub fn accepts_input(self) -> bool {
        !matches!(self, Self::Uninitialized | Self::Destroyed)
    }
}

/// Pose and scale the model returns to on reset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerSnapshot {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl ViewerSnapshot {
    pub fn from_transform(transform: &Transform) -> Self {
        Self {
            position: transform.translation,
            rotation: transform.rotation,
            scale: transform.scale,
        }
    }

    pub fn to_transform(self) -> Transform {
        Transform {
            translation: self.position,
            rotation: self.rotation,
            scale: self.scale,
        }
    }
}

impl Default for ViewerSnapshot {
    fn default() -> Self {
        Self::from_transform(&Transform::IDENTITY)
    }
}

/// Recorded when every visibility strategy ran and the model is still
/// outside the camera frustum.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityDiagnostic {
    pub attempts: u32,
    pub model_position: Vec3,
    pub model_scale: Vec3,
    pub camera_position: Vec3,
    pub camera_forward: Vec3,
}

/// Working set of the viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerState {
    pub zoom: f32,
    pub snapshot: ViewerSnapshot,
    pub movement_mode: bool,
    pub phase: ViewerPhase,
    pub scale_target: Vec3,
    /// Forward offset the model is easing toward, metres along camera forward.
    pub offset_target: f32,
    /// Forward offset already applied to the model position.
    pub applied_offset: f32,
    pub hint_timer: f32,
    pub diagnostic: Option<VisibilityDiagnostic>,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self {
            zoom: ORIGINAL_ZOOM,
            snapshot: ViewerSnapshot::default(),
            movement_mode: false,
            phase: ViewerPhase::Uninitialized,
            scale_target: Vec3::ONE,
            offset_target: 0.0,
            applied_offset: 0.0,
            hint_timer: 0.0,
            diagnostic: None,
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub zoom_multiplier: f32,
    pub zoom_deadband: f32,
    pub scroll_zoom_speed: f32,
    pub pinch_zoom_speed: f32,
    pub key_zoom_step: f32,

    /// Degrees per pixel per second at 1080 px screen height.
    pub mouse_rotation_speed: f32,
    pub touch_rotation_sensitivity: f32,
    pub mouse_move_speed: f32,
    /// Metres per second of keyboard pan.
    pub key_move_speed: f32,
    pub touch_move_speed: f32,
    pub three_finger_pan_boost: f32,

    pub scale_smoothing_rate: f32,
    pub position_smoothing_rate: f32,

    pub default_model_scale: f32,
    pub hint_fade_time: f32,
    pub visibility_first_check_delay: f32,
    pub visibility_recheck_delay: f32,
    pub max_visibility_attempts: u32,
    /// Visibility box of an unscaled model, in its local space.
    pub model_half_extents: Vec3,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_multiplier: ZOOM_MULTIPLIER,
            zoom_deadband: ZOOM_DEADBAND,
            scroll_zoom_speed: SCROLL_ZOOM_SPEED,
            pinch_zoom_speed: PINCH_ZOOM_SPEED,
            key_zoom_step: KEY_ZOOM_STEP,
            mouse_rotation_speed: MOUSE_ROTATION_SPEED,
            touch_rotation_sensitivity: TOUCH_ROTATION_SENSITIVITY,
            mouse_move_speed: MOUSE_MOVE_SPEED,
            key_move_speed: KEY_MOVE_SPEED,
            touch_move_speed: TOUCH_MOVE_SPEED,
            three_finger_pan_boost: THREE_FINGER_PAN_BOOST,
            scale_smoothing_rate: SCALE_SMOOTHING_RATE,
            position_smoothing_rate: POSITION_SMOOTHING_RATE,
            default_model_scale: DEFAULT_MODEL_SCALE,
            hint_fade_time: HINT_FADE_TIME,
            visibility_first_check_delay: VISIBILITY_FIRST_CHECK_DELAY,
            visibility_recheck_delay: VISIBILITY_RECHECK_DELAY,
            max_visibility_attempts: MAX_VISIBILITY_ATTEMPTS,
            model_half_extents: MODEL_HALF_EXTENTS,
        }
    }
}
