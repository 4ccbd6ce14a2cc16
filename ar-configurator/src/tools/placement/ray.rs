use bevy::math::Ray3d;
use bevy::prelude::*;

/// Distance along `ray` to the box `half_extents` oriented by `transform`
/// (scale included), if it is hit.
pub fn ray_hits_obb(ray: &Ray3d, transform: &Transform, half_extents: Vec3) -> Option<f32> {
    let world_from_local = transform.compute_matrix();
    let local_from_world = world_from_local.inverse();
    let origin = local_from_world.transform_point3(ray.origin);
    let direction = local_from_world.transform_vector3(*ray.direction);
    let t_local = ray_aabb_hit_t(origin, direction, -half_extents, half_extents)?;

    // Local t is measured in scaled units; convert back to world distance.
    let hit = world_from_local.transform_point3(origin + direction * t_local);
    Some(hit.distance(ray.origin))
}

// Slab method. Returns the entry distance, or exit distance when the origin is inside.
pub fn ray_aabb_hit_t(ray_origin: Vec3, ray_direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let inv = ray_direction.map(|d| if d != 0.0 { 1.0 / d } else { f32::INFINITY });

    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    for axis in 0..3 {
        let (lo, hi) = (min[axis], max[axis]);
        let origin = ray_origin[axis];
        if ray_direction[axis] == 0.0 {
            if origin < lo || origin > hi {
                return None;
            }
            continue;
        }
        let mut t0 = (lo - origin) * inv[axis];
        let mut t1 = (hi - origin) * inv[axis];
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_enter = t_enter.max(t0);
        t_exit = t_exit.min(t1);
        if t_enter > t_exit {
            return None;
        }
    }

    if t_exit < 0.0 {
        return None;
    }
    Some(if t_enter >= 0.0 { t_enter } else { t_exit })
}

/// Nearest of `candidates` hit by `ray` within `max_distance`.
pub fn nearest_hit<K: Copy>(
    ray: &Ray3d,
    candidates: impl IntoIterator<Item = (K, Transform)>,
    half_extents: Vec3,
    max_distance: f32,
) -> Option<(K, f32)> {
    candidates
        .into_iter()
        .filter_map(|(key, transform)| {
            ray_hits_obb(ray, &transform, half_extents).map(|distance| (key, distance))
        })
        .filter(|(_, distance)| *distance <= max_distance)
        .min_by(|a, b| a.1.total_cmp(&b.1))
}
