//! Interaction core of an AR product configurator.
//!
//! Three controllers do the work, each engine-agnostic and ticked explicitly:
//! [`tools::placement::PlacementController`] puts objects on tracked surfaces,
//! [`tools::viewer::ViewerController`] drives close-up inspection, and
//! [`tools::info_panel::InfoPanelDispatcher`] feeds the accessory panel. The
//! Bevy plugins around them form the desktop preview app.

pub mod engine;
pub mod tools;
