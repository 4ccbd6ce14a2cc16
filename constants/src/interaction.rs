/// Degrees per pixel-second of steering wheel drag.
pub const STEERING_ROTATION_SPEED: f32 = 5.0;
/// Steering wheel yaw limit in either direction (degrees).
pub const STEERING_MAX_ANGLE: f32 = 45.0;
/// Rate at which a released steering wheel eases back to centre (1/s).
pub const STEERING_RETURN_SPEED: f32 = 5.0;
/// Released wheels closer to centre than this (degrees) snap to zero.
pub const STEERING_DEADZONE: f32 = 0.1;
/// Pick box of an interactable part, in its local space (metres).
pub const INTERACTABLE_HALF_EXTENTS: [f32; 3] = [0.15, 0.15, 0.15];
/// Interactables further than this along the pick ray are ignored.
pub const INTERACT_MAX_DISTANCE: f32 = 10.0;
