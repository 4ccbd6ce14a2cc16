use bevy::math::Vec3;

/// Smallest surface area (m²) accepted as ground for placement.
pub const MIN_SURFACE_AREA: f32 = 0.1;

/// Hard cap on concurrently placed objects in multi-object mode.
pub const MAX_PLACED_OBJECTS: usize = 10;

/// Hit-test attempts per placement request before giving up.
pub const MAX_PLACEMENT_RETRIES: u32 = 3;

/// Delay before the first hit-test of a placement request (seconds).
pub const PLACEMENT_SETTLE_DELAY: f32 = 0.05;

/// Delay between hit-test retries (seconds).
pub const PLACEMENT_RETRY_DELAY: f32 = 0.05;

/// Cooldown after a placement sequence before another touch is accepted (seconds).
pub const PLACEMENT_CONFIRMATION_DELAY: f32 = 0.1;

/// Touch duration before a press on a placed object becomes a drag (seconds).
pub const TOUCH_HOLD_TIME: f32 = 0.5;

/// Drag rotation speed, degrees per 400 px of horizontal travel.
pub const DRAG_ROTATION_SPEED: f32 = 120.0;

/// Horizontal pixels that map to one unit of `DRAG_ROTATION_SPEED`.
pub const DRAG_ROTATION_PIXELS: f32 = 400.0;

/// Multiplier applied to the model's authored scale on the smallest surfaces.
pub const SCALE_FACTOR: f32 = 0.3;

pub const MIN_OBJECT_SCALE: Vec3 = Vec3::splat(0.1);
pub const MAX_OBJECT_SCALE: Vec3 = Vec3::splat(2.0);

/// Average surface extent (m) below which scale stops shrinking.
pub const RESPONSIVE_SURFACE_MIN: f32 = 0.5;
/// Average surface extent (m) above which scale stops growing.
pub const RESPONSIVE_SURFACE_MAX: f32 = 2.0;

/// Lower bound of the object pool size when pooling is enabled.
pub const MIN_POOL_SIZE: usize = 3;

/// Half extents of the placed model's pick box in unscaled local space.
pub const OBJECT_PICK_HALF_EXTENTS: Vec3 = Vec3::new(1.0, 0.6, 2.2);

/// Farthest distance (m) at which a placed object can be picked for dragging.
pub const PICK_MAX_DISTANCE: f32 = 100.0;

/// Frames between "still scanning" log lines while no surface is tracked.
pub const SCANNING_LOG_INTERVAL: u64 = 120;
