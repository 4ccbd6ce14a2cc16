//! Host capability contracts.
//!
//! The AR runtime owns plane tracking, hit-testing and anchors. The core only
//! consumes them through these traits, so every controller can be driven by a
//! real device session, the desktop preview, or a scripted test double.

/// Persistence anchors and the anchor service contract.
pub mod anchor;

/// Simulated hosts for the desktop preview and for tests.
pub mod simulated;

/// Tracked surfaces, hit results and the surface source contract.
pub mod surface;

pub use anchor::{AnchorId, AnchorService};
pub use surface::{
    Pose, Surface, SurfaceAlignment, SurfaceHit, SurfaceId, SurfaceSource, TrackingState,
};

use bevy::prelude::*;

/// The surface source the running app hit-tests against.
#[derive(Resource)]
pub struct SurfaceProvider(pub Box<dyn SurfaceSource + Send + Sync>);

impl SurfaceProvider {
    pub fn new(source: impl SurfaceSource + Send + Sync + 'static) -> Self {
        Self(Box::new(source))
    }
}

/// The anchor service placed objects are pinned through.
#[derive(Resource)]
pub struct AnchorProvider(pub Box<dyn AnchorService + Send + Sync>);

impl AnchorProvider {
    pub fn new(service: impl AnchorService + Send + Sync + 'static) -> Self {
        Self(Box::new(service))
    }
}
