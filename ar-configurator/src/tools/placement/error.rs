use thiserror::Error;

use crate::engine::host::{SurfaceAlignment, TrackingState};

/// Why a hit surface cannot hold an object.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum Rejection {
    #[error("surface is {0:?}, expected an upward-facing horizontal plane")]
    Alignment(SurfaceAlignment),
    #[error("surface area {area:.4} m² is below the required {required} m²")]
    TooSmall { area: f32, required: f32 },
    #[error("surface extents must be positive")]
    DegenerateExtents,
    #[error("surface tracking is {0:?}")]
    NotTracking(TrackingState),
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum PlacementError {
    #[error("no surface under the touch point")]
    NoSurface,
    #[error("invalid placement target: {0}")]
    InvalidTarget(Rejection),
    #[error("placement capacity reached")]
    CapacityReached,
    #[error("placement controller is shut down")]
    Inactive,
    #[error("previous placement still settling")]
    CoolingDown,
}

impl From<Rejection> for PlacementError {
    fn from(rejection: Rejection) -> Self {
        Self::InvalidTarget(rejection)
    }
}
