use bevy::prelude::*;

use constants::placement::{RESPONSIVE_SURFACE_MAX, RESPONSIVE_SURFACE_MIN};

use crate::engine::host::Surface;
use crate::tools::placement::state::PlacementSettings;

const MIN_PROJECTED_LENGTH_SQ: f32 = 0.001;

/// Scale for an object placed on `surface`.
///
/// Only surfaces between 0.5 m and 2 m across influence the result; smaller
/// ones get the base scale, larger ones the maximum.
pub fn responsive_scale(surface: Option<&Surface>, settings: &PlacementSettings) -> Vec3 {
    let base = settings.base_scale * settings.scale_factor;
    let Some(surface) = surface else {
        return base;
    };
    if surface.size.x <= 0.0 || surface.size.y <= 0.0 {
        return base;
    }

    let extent = surface
        .average_extent()
        .clamp(RESPONSIVE_SURFACE_MIN, RESPONSIVE_SURFACE_MAX);
    let t = (extent - RESPONSIVE_SURFACE_MIN) / (RESPONSIVE_SURFACE_MAX - RESPONSIVE_SURFACE_MIN);

    base.lerp(settings.max_scale, t)
        .clamp(settings.min_scale, settings.max_scale)
}

/// Orientation with up along `normal` and forward taken from the hit pose,
/// falling back to the camera forward and then world forward when the
/// candidate is parallel to the normal.
pub fn align_to_surface(hit_rotation: Quat, normal: Vec3, camera_forward: Vec3) -> Quat {
    let normal = normal.try_normalize().unwrap_or(Vec3::Y);
    let candidates = [hit_rotation * Vec3::NEG_Z, camera_forward, Vec3::NEG_Z];

    candidates
        .into_iter()
        .map(|dir| project_on_plane(dir, normal))
        .find(|dir| dir.length_squared() >= MIN_PROJECTED_LENGTH_SQ)
        .map(|forward| Transform::IDENTITY.looking_to(forward, normal).rotation)
        .unwrap_or(hit_rotation)
}

pub fn project_on_plane(v: Vec3, normal: Vec3) -> Vec3 {
    v - normal * v.dot(normal)
}
