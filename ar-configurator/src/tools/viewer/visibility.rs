use bevy::prelude::*;

use crate::engine::camera::CameraRig;
use crate::tools::viewer::state::ViewerSnapshot;

/// Fallback placements tried in order while the model stays off-screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityStrategy {
    CenterInFront,
    Guaranteed,
    Emergency,
}

impl VisibilityStrategy {
    pub const ESCALATION: [Self; 3] = [Self::CenterInFront, Self::Guaranteed, Self::Emergency];

    /// Strategy for the 1-based `attempt`, saturating at `Emergency`.
    pub fn for_attempt(attempt: u32) -> Self {
        let index = (attempt.max(1) - 1) as usize;
        Self::ESCALATION[index.min(Self::ESCALATION.len() - 1)]
    }

    /// Metres in front of the camera.
    pub fn distance(self) -> f32 {
        match self {
            Self::CenterInFront => 1.0,
            Self::Guaranteed => 0.9,
            Self::Emergency => 0.8,
        }
    }

    pub fn scale(self) -> f32 {
        match self {
            Self::CenterInFront => 0.5,
            Self::Guaranteed => 0.35,
            Self::Emergency => 0.3,
        }
    }

    /// Placement just below eye level, facing the camera.
    pub fn placement(self, camera: &CameraRig) -> ViewerSnapshot {
        let mut position = camera.position() + camera.forward() * self.distance();
        position.y = camera.position().y - 0.1;
        ViewerSnapshot {
            position,
            rotation: facing_camera(camera),
            scale: Vec3::splat(self.scale()),
        }
    }
}

/// Rotation whose forward points back at the camera.
pub fn facing_camera(camera: &CameraRig) -> Quat {
    Transform::IDENTITY
        .looking_to(-camera.forward(), Vec3::Y)
        .rotation
}
