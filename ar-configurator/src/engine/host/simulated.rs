//! In-process stand-ins for the AR runtime.
//!
//! `FlatGroundSource` backs the desktop preview with one infinite ground
//! plane under the camera. `ScriptedSurfaces` replays queued hit results so
//! retry and rejection paths can be driven frame by frame. `InMemoryAnchors`
//! keeps anchors in a map and logs every call in order.

use std::collections::{HashMap, VecDeque};

use bevy::prelude::*;

use super::anchor::{AnchorId, AnchorService};
use super::surface::{
    Pose, Surface, SurfaceAlignment, SurfaceHit, SurfaceId, SurfaceSource, TrackingState,
};
use crate::engine::camera::CameraRig;

/// One horizontal, always-tracked surface at `ground_height`.
#[derive(Debug, Clone)]
pub struct FlatGroundSource {
    pub camera: CameraRig,
    pub ground_height: f32,
    pub surface: Surface,
}

impl FlatGroundSource {
    pub fn new(ground_height: f32, size: Vec2) -> Self {
        Self {
            camera: CameraRig::default(),
            ground_height,
            surface: Surface {
                id: SurfaceId(1),
                normal: Vec3::Y,
                alignment: SurfaceAlignment::HorizontalUp,
                size,
                tracking: TrackingState::Tracking,
            },
        }
    }
}

impl SurfaceSource for FlatGroundSource {
    fn raycast(&mut self, screen_position: Vec2) -> Vec<SurfaceHit> {
        let Some(ray) = self.camera.screen_to_ray(screen_position) else {
            return Vec::new();
        };
        let Some(point) = CameraRig::flat_plane_intersection(&ray, self.ground_height) else {
            return Vec::new();
        };
        vec![SurfaceHit {
            surface: self.surface.id,
            pose: Pose::new(point, Quat::IDENTITY),
            distance: point.distance(ray.origin),
        }]
    }

    fn surface(&self, id: SurfaceId) -> Option<Surface> {
        (id == self.surface.id).then(|| self.surface.clone())
    }

    fn surface_count(&self) -> usize {
        1
    }

    fn observe_camera(&mut self, camera: &CameraRig) {
        self.camera = *camera;
    }
}

/// Replays queued raycast answers, one per call.
#[derive(Debug, Default, Clone)]
pub struct ScriptedSurfaces {
    surfaces: HashMap<SurfaceId, Surface>,
    script: VecDeque<Vec<SurfaceHit>>,
    /// Returned once the script runs dry.
    pub fallback: Vec<SurfaceHit>,
    pub raycast_calls: usize,
}

impl ScriptedSurfaces {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_surface(mut self, surface: Surface) -> Self {
        self.surfaces.insert(surface.id, surface);
        self
    }

    pub fn insert_surface(&mut self, surface: Surface) {
        self.surfaces.insert(surface.id, surface);
    }

    pub fn remove_surface(&mut self, id: SurfaceId) {
        self.surfaces.remove(&id);
    }

    pub fn push_miss(&mut self) {
        self.script.push_back(Vec::new());
    }

    pub fn push_hit(&mut self, surface: SurfaceId, position: Vec3) {
        self.script.push_back(vec![SurfaceHit {
            surface,
            pose: Pose::new(position, Quat::IDENTITY),
            distance: position.length(),
        }]);
    }

    /// Every call after the script is exhausted hits `surface` at `position`.
    pub fn always_hit(mut self, surface: SurfaceId, position: Vec3) -> Self {
        self.fallback = vec![SurfaceHit {
            surface,
            pose: Pose::new(position, Quat::IDENTITY),
            distance: position.length(),
        }];
        self
    }
}

impl SurfaceSource for ScriptedSurfaces {
    fn raycast(&mut self, _screen_position: Vec2) -> Vec<SurfaceHit> {
        self.raycast_calls += 1;
        self.script
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }

    fn surface(&self, id: SurfaceId) -> Option<Surface> {
        self.surfaces.get(&id).cloned()
    }

    fn surface_count(&self) -> usize {
        self.surfaces.len()
    }
}

/// A call made against [`InMemoryAnchors`], in the order it happened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnchorCall {
    Create(Option<AnchorId>),
    Release(AnchorId),
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryAnchors {
    next_id: u64,
    live: HashMap<AnchorId, Pose>,
    log: Vec<AnchorCall>,
    /// When false every `create` fails, as on a session without anchor support.
    pub available: bool,
}

impl InMemoryAnchors {
    pub fn new() -> Self {
        Self {
            available: true,
            ..default()
        }
    }

    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn log(&self) -> &[AnchorCall] {
        &self.log
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn is_live(&self, anchor: AnchorId) -> bool {
        self.live.contains_key(&anchor)
    }

    /// Move a live anchor, as a tracking correction would.
    pub fn relocate(&mut self, anchor: AnchorId, pose: Pose) {
        if let Some(current) = self.live.get_mut(&anchor) {
            *current = pose;
        }
    }
}

impl AnchorService for InMemoryAnchors {
    fn create(&mut self, pose: Pose) -> Option<AnchorId> {
        let created = self.available.then(|| {
            self.next_id += 1;
            let id = AnchorId(self.next_id);
            self.live.insert(id, pose);
            id
        });
        self.log.push(AnchorCall::Create(created));
        created
    }

    fn release(&mut self, anchor: AnchorId) {
        self.live.remove(&anchor);
        self.log.push(AnchorCall::Release(anchor));
    }

    fn pose(&self, anchor: AnchorId) -> Option<Pose> {
        self.live.get(&anchor).copied()
    }
}
