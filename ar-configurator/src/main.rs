use bevy::prelude::*;

use ar_configurator::engine::core::app_setup::create_app;
use ar_configurator::engine::core::config::ConfiguratorConfig;
use ar_configurator::engine::host::simulated::{FlatGroundSource, InMemoryAnchors};
use ar_configurator::engine::host::{AnchorProvider, SurfaceProvider};

const DEFAULT_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/configurator.json");

fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let config = match ConfiguratorConfig::load(&path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Using default configuration: {e}");
            ConfiguratorConfig::default()
        }
    };

    let surfaces = SurfaceProvider::new(FlatGroundSource::new(0.0, Vec2::new(4.0, 4.0)));
    let anchors = AnchorProvider::new(InMemoryAnchors::new());

    create_app(config, surfaces, anchors).run();
}
