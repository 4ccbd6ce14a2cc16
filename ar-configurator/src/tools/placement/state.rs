use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use constants::placement::*;

use crate::engine::host::{AnchorId, Pose, SurfaceId};
use crate::tools::placement::error::PlacementError;

/// Handle of a placed (or pooled) object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

/// Anchor a record is parented to, with the record's pose relative to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorBinding {
    pub id: AnchorId,
    /// Last pose the host reported for the anchor.
    pub pose: Pose,
    pub local_offset: Pose,
}

impl AnchorBinding {
    /// Binding for an anchor created exactly at the object's pose.
    pub fn at(id: AnchorId, pose: Pose) -> Self {
        Self {
            id,
            pose,
            local_offset: Pose::IDENTITY,
        }
    }

    pub fn world_pose(&self) -> Pose {
        Pose {
            position: self.pose.position + self.pose.rotation * self.local_offset.position,
            rotation: self.pose.rotation * self.local_offset.rotation,
        }
    }

    /// Re-express a world pose relative to the anchor.
    pub fn rebind(&mut self, world: Pose) {
        let inverse = self.pose.rotation.inverse();
        self.local_offset = Pose {
            position: inverse * (world.position - self.pose.position),
            rotation: inverse * world.rotation,
        };
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedObjectRecord {
    pub object: ObjectId,
    pub surface: SurfaceId,
    pub original_position: Vec3,
    pub original_rotation: Quat,
    pub locked: bool,
    pub anchor: Option<AnchorBinding>,
    /// Current world transform, scale included.
    pub transform: Transform,
}

impl PlacedObjectRecord {
    pub fn is_anchored(&self) -> bool {
        self.anchor.is_some()
    }
}

/// Tunables for the placement controller. Every field falls back to the
/// workspace default when missing from a settings file.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementSettings {
    pub allow_multiple: bool,
    pub require_surfaces: bool,
    pub min_surface_area: f32,
    pub max_objects: usize,
    pub pooling: bool,

    pub base_scale: Vec3,
    pub scale_factor: f32,
    pub min_scale: Vec3,
    pub max_scale: Vec3,
    pub align_rotation: bool,

    pub use_anchors: bool,
    pub settle_delay: f32,
    pub retry_delay: f32,
    pub confirmation_delay: f32,
    pub max_retries: u32,

    pub hold_time: f32,
    /// Degrees per 400 px of horizontal drag.
    pub rotation_speed: f32,
    /// Selection box of an unscaled object, in its local space.
    pub pick_half_extents: Vec3,
    /// Newly placed objects start locked against drag rotation.
    pub lock_on_place: bool,
}

impl Default for PlacementSettings {
    fn default() -> Self {
        Self {
            allow_multiple: false,
            require_surfaces: true,
            min_surface_area: MIN_SURFACE_AREA,
            max_objects: MAX_PLACED_OBJECTS,
            pooling: true,
            base_scale: Vec3::ONE,
            scale_factor: SCALE_FACTOR,
            min_scale: MIN_OBJECT_SCALE,
            max_scale: MAX_OBJECT_SCALE,
            align_rotation: true,
            use_anchors: true,
            settle_delay: PLACEMENT_SETTLE_DELAY,
            retry_delay: PLACEMENT_RETRY_DELAY,
            confirmation_delay: PLACEMENT_CONFIRMATION_DELAY,
            max_retries: MAX_PLACEMENT_RETRIES,
            hold_time: TOUCH_HOLD_TIME,
            rotation_speed: DRAG_ROTATION_SPEED,
            pick_half_extents: OBJECT_PICK_HALF_EXTENTS,
            lock_on_place: false,
        }
    }
}

impl PlacementSettings {
    pub fn pool_size(&self) -> usize {
        self.max_objects.max(MIN_POOL_SIZE)
    }

    pub fn capacity(&self) -> usize {
        if self.allow_multiple { self.max_objects } else { 1 }
    }
}

/// Outcome notifications drained by the engine adapter once per frame.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum PlacementEvent {
    Placed {
        object: ObjectId,
        transform: Transform,
        anchored: bool,
        attempt: u32,
    },
    Removed {
        object: ObjectId,
    },
    /// Drag rotation or anchor drift changed the world transform.
    Moved {
        object: ObjectId,
        transform: Transform,
    },
    /// Anchor could not be created; the object was placed without one.
    AnchorDegraded {
        object: ObjectId,
    },
    Rejected {
        error: PlacementError,
    },
    GaveUp {
        attempts: u32,
    },
}

