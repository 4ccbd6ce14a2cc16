use bevy::prelude::*;

use crate::engine::camera::CameraRig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u64);

/// Host classification of a tracked plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceAlignment {
    HorizontalUp,
    HorizontalDown,
    Vertical,
    NotAxisAligned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingState {
    Tracking,
    Limited,
    None,
}

/// A tracked planar region. Owned by the host, read-only here.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pub id: SurfaceId,
    pub normal: Vec3,
    pub alignment: SurfaceAlignment,
    /// Extents along the plane's local X and Z axes, in metres.
    pub size: Vec2,
    pub tracking: TrackingState,
}

impl Surface {
    pub fn area(&self) -> f32 {
        self.size.x * self.size.y
    }

    /// Mean of both extents, used to pick a placement scale.
    pub fn average_extent(&self) -> f32 {
        (self.size.x + self.size.y) * 0.5
    }
}

/// World-space position and orientation without scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Pose {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn to_transform(self) -> Transform {
        Transform::from_translation(self.position).with_rotation(self.rotation)
    }
}

impl From<Transform> for Pose {
    fn from(transform: Transform) -> Self {
        Self::new(transform.translation, transform.rotation)
    }
}

/// One intersection of a screen ray with a tracked surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    pub surface: SurfaceId,
    pub pose: Pose,
    pub distance: f32,
}

/// Plane provider. Hits are ordered nearest first.
pub trait SurfaceSource {
    fn raycast(&mut self, screen_position: Vec2) -> Vec<SurfaceHit>;

    fn surface(&self, id: SurfaceId) -> Option<Surface>;

    fn surface_count(&self) -> usize;

    /// Latest camera snapshot, for sources that cast their own rays.
    fn observe_camera(&mut self, _camera: &CameraRig) {}
}
