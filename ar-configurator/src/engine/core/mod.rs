//! App assembly, startup configuration and the loading state.

/// Builds the Bevy app from a [`config::ConfiguratorConfig`].
pub mod app_setup;

/// `Loading` to `Running` transition.
pub mod app_state;

/// JSON configuration file.
pub mod config;
