use bevy::math::Vec3;

pub const MIN_ZOOM: f32 = 0.005;
pub const MAX_ZOOM: f32 = 100.0;
pub const ORIGINAL_ZOOM: f32 = 1.0;

/// Every zoom increment is multiplied by this before accumulating.
pub const ZOOM_MULTIPLIER: f32 = 0.8;
/// Increments that move the factor by less than this are dropped.
pub const ZOOM_DEADBAND: f32 = 0.001;
/// Exponent of the sub-linear zoom → scale curve.
pub const ZOOM_SCALE_EXPONENT: f32 = 0.85;
/// Forward nudge (m) per unit of `1 - curve`.
pub const ZOOM_DISTANCE_FACTOR: f32 = 0.25;
pub const SCALE_SMOOTHING_RATE: f32 = 8.0;
pub const POSITION_SMOOTHING_RATE: f32 = 4.0;

/// Scroll-wheel lines to zoom increment.
pub const SCROLL_ZOOM_SPEED: f32 = 2.5 * 1.2;
/// Normalised pinch delta to zoom increment.
pub const PINCH_ZOOM_SPEED: f32 = 12.0;
/// Keyboard +/- zoom increment.
pub const KEY_ZOOM_STEP: f32 = 1.0;

/// Degrees per pixel-second of mouse drag at 1080 px screen height.
pub const MOUSE_ROTATION_SPEED: f32 = 30.0;
pub const REFERENCE_SCREEN_HEIGHT: f32 = 1080.0;
pub const TOUCH_ROTATION_SENSITIVITY: f32 = 0.25;

/// Metres per pixel of mouse pan.
pub const MOUSE_MOVE_SPEED: f32 = 0.01;
/// Metres per second of WASD pan.
pub const KEY_MOVE_SPEED: f32 = 0.6;
/// Metres per pixel of touch pan.
pub const TOUCH_MOVE_SPEED: f32 = 0.007;
pub const THREE_FINGER_PAN_BOOST: f32 = 1.5;

pub const DEFAULT_MODEL_SCALE: f32 = 0.75;
pub const MODEL_HOLDER_DROP: f32 = 0.15;
pub const MIN_VIEW_DISTANCE: f32 = 1.5;
pub const MAX_VIEW_DISTANCE: f32 = 3.0;

/// Used when no camera is known at all.
pub const FALLBACK_MODEL_POSITION: Vec3 = Vec3::new(0.0, 0.0, 5.0);

pub const VISIBILITY_FIRST_CHECK_DELAY: f32 = 0.05;
pub const VISIBILITY_RECHECK_DELAY: f32 = 0.1;
pub const MAX_VISIBILITY_ATTEMPTS: u32 = 3;

pub const HINT_FADE_TIME: f32 = 3.0;

/// Default half extents of an inspected model in unscaled local space.
pub const MODEL_HALF_EXTENTS: Vec3 = Vec3::splat(0.5);
