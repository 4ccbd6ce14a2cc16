//! Camera snapshot used by the controllers.
//!
//! The engine camera is copied into a [`CameraRig`] once per frame so the pure
//! controllers can build screen rays, read camera-relative axes and run
//! frustum visibility tests without touching ECS queries.

/// Camera pose and projection snapshot with ray and frustum helpers.
pub mod camera_rig;

pub use camera_rig::{CameraRig, sync_camera_rig};
