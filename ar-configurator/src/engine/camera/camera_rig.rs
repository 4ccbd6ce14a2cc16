use bevy::math::Affine3A;
use bevy::prelude::*;
use bevy::render::camera::Projection;
use bevy::render::primitives::{Aabb, Frustum};
use bevy::window::PrimaryWindow;

/// Pose and perspective parameters of the viewing camera for one frame.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    pub transform: Transform,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub viewport: Vec2,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            transform: Transform::from_xyz(0.0, 1.0, 0.0),
            fov: std::f32::consts::FRAC_PI_4,
            viewport: Vec2::new(1920.0, 1080.0),
            near: 0.05,
            far: 100.0,
        }
    }
}

impl CameraRig {
    pub fn looking_at(eye: Vec3, target: Vec3, viewport: Vec2) -> Self {
        Self {
            transform: Transform::from_translation(eye).looking_at(target, Vec3::Y),
            viewport,
            ..default()
        }
    }

    pub fn position(&self) -> Vec3 {
        self.transform.translation
    }

    pub fn forward(&self) -> Vec3 {
        self.transform.forward().as_vec3()
    }

    pub fn right(&self) -> Vec3 {
        self.transform.right().as_vec3()
    }

    pub fn up(&self) -> Vec3 {
        self.transform.up().as_vec3()
    }

    pub fn fov_degrees(&self) -> f32 {
        self.fov.to_degrees()
    }

    pub fn aspect(&self) -> f32 {
        self.viewport.x / self.viewport.y.max(1.0)
    }

    pub fn screen_diagonal(&self) -> f32 {
        self.viewport.length()
    }

    pub fn clip_from_world(&self) -> Mat4 {
        let proj = Mat4::perspective_rh(self.fov, self.aspect(), self.near, self.far);
        let view = self.transform.compute_matrix().inverse();
        proj * view
    }

    /// World-space ray through a screen point (origin top-left, pixels).
    pub fn screen_to_ray(&self, screen: Vec2) -> Option<Ray3d> {
        if self.viewport.x <= 0.0 || self.viewport.y <= 0.0 {
            return None;
        }
        let ndc_x = (2.0 * screen.x / self.viewport.x) - 1.0;
        let ndc_y = 1.0 - (2.0 * screen.y / self.viewport.y);
        let inv = self.clip_from_world().inverse();
        let far = inv * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
        if far.w.abs() < f32::EPSILON {
            return None;
        }
        let far = far.truncate() / far.w;
        let origin = self.position();
        let direction = Dir3::new(far - origin).ok()?;
        Some(Ray3d::new(origin, direction))
    }

    /// Intersection of a ray with the horizontal plane `y = plane_y`.
    pub fn flat_plane_intersection(ray: &Ray3d, plane_y: f32) -> Option<Vec3> {
        if ray.direction.y.abs() < 0.001 {
            return None;
        }
        let t = (plane_y - ray.origin.y) / ray.direction.y;
        if t > 0.0 {
            Some(ray.origin + ray.direction * t)
        } else {
            None
        }
    }

    pub fn frustum(&self) -> Frustum {
        Frustum::from_clip_from_world(&self.clip_from_world())
    }

    /// Whether an object's local box, placed by `transform`, touches the view volume.
    pub fn sees_box(&self, transform: &Transform, half_extents: Vec3) -> bool {
        let aabb = Aabb::from_min_max(-half_extents, half_extents);
        let world_from_local: Affine3A = transform.compute_affine();
        self.frustum()
            .intersects_obb(&aabb, &world_from_local, true, true)
    }
}

/// Copy the active 3D camera into the [`CameraRig`] resource.
pub fn sync_camera_rig(
    cameras: Query<(&GlobalTransform, &Projection), With<Camera3d>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut rig: ResMut<CameraRig>,
) {
    let Ok((global, projection)) = cameras.single() else {
        return;
    };
    rig.transform = global.compute_transform();
    if let Projection::Perspective(perspective) = projection {
        rig.fov = perspective.fov;
        rig.near = perspective.near;
        rig.far = perspective.far;
    }
    if let Ok(window) = windows.single() {
        rig.viewport = Vec2::new(window.width(), window.height());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_ray_points_forward() {
        let rig = CameraRig::looking_at(Vec3::new(0.0, 1.5, 0.0), Vec3::new(0.0, 1.5, -5.0), Vec2::new(800.0, 600.0));
        let ray = rig.screen_to_ray(Vec2::new(400.0, 300.0)).unwrap();
        assert!(ray.direction.as_vec3().dot(Vec3::NEG_Z) > 0.999);
    }

    #[test]
    fn lower_half_of_screen_hits_floor() {
        let rig = CameraRig::looking_at(Vec3::new(0.0, 1.5, 0.0), Vec3::new(0.0, 0.0, -3.0), Vec2::new(800.0, 600.0));
        let ray = rig.screen_to_ray(Vec2::new(400.0, 500.0)).unwrap();
        let hit = CameraRig::flat_plane_intersection(&ray, 0.0).unwrap();
        assert!(hit.y.abs() < 1e-4);
        assert!(hit.z < 0.0);
    }

    #[test]
    fn box_behind_camera_is_not_visible() {
        let rig = CameraRig::looking_at(Vec3::ZERO, Vec3::NEG_Z, Vec2::new(800.0, 600.0));
        let ahead = Transform::from_xyz(0.0, 0.0, -3.0);
        let behind = Transform::from_xyz(0.0, 0.0, 3.0);
        assert!(rig.sees_box(&ahead, Vec3::splat(0.5)));
        assert!(!rig.sees_box(&behind, Vec3::splat(0.5)));
    }
}
