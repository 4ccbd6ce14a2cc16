//! Tuning constants shared by the configurator crates.
//!
//! Runtime settings structs default to these values; JSON configuration can
//! override most of them per deployment.

pub mod interaction;
pub mod placement;
pub mod viewer;
