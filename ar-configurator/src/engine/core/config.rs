use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tools::mode_manager::InteractionMode;
use crate::tools::placement::PlacementSettings;
use crate::tools::viewer::{SpawnPoints, ViewerSettings};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Everything the app reads at startup. Missing fields take the defaults
/// from the `constants` crate.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfiguratorConfig {
    pub placement: PlacementSettings,
    pub viewer: ViewerSettings,
    pub spawn_points: SpawnPoints,
    /// Accessory catalog, relative to the asset folder.
    pub catalog_path: Option<String>,
    pub start_mode: InteractionMode,
    /// File this config was read from, if any.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl ConfiguratorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut config = Self::from_json(&json)?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Read the source file again. `None` when this config has no file.
    pub fn reload(&self) -> Option<Result<Self, ConfigError>> {
        self.source.as_deref().map(Self::load)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.placement;
        if p.max_objects == 0 {
            return Err(ConfigError::Invalid("placement.max_objects must be at least 1".into()));
        }
        if p.min_scale.cmple(Vec3::ZERO).any() || p.min_scale.cmpgt(p.max_scale).any() {
            return Err(ConfigError::Invalid(format!(
                "placement scale range [{}, {}] is empty",
                p.min_scale, p.max_scale
            )));
        }
        if p.min_surface_area < 0.0 {
            return Err(ConfigError::Invalid("placement.min_surface_area is negative".into()));
        }

        let v = &self.viewer;
        if v.min_zoom <= 0.0 || v.min_zoom > v.max_zoom {
            return Err(ConfigError::Invalid(format!(
                "viewer zoom range [{}, {}] is empty",
                v.min_zoom, v.max_zoom
            )));
        }
        if v.max_visibility_attempts == 0 {
            warn!("viewer.max_visibility_attempts is 0, visibility failures go straight to diagnostics");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ConfiguratorConfig::from_json(
            r#"{ "placement": { "allow_multiple": true, "max_objects": 3 }, "start_mode": "inspection" }"#,
        )
        .unwrap();
        assert!(config.placement.allow_multiple);
        assert_eq!(config.placement.max_objects, 3);
        assert_eq!(config.placement.min_surface_area, PlacementSettings::default().min_surface_area);
        assert_eq!(config.viewer, ViewerSettings::default());
        assert_eq!(config.start_mode, InteractionMode::Inspection);
    }

    #[test]
    fn inverted_zoom_range_is_invalid() {
        let result = ConfiguratorConfig::from_json(r#"{ "viewer": { "min_zoom": 5.0, "max_zoom": 1.0 } }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn inverted_scale_range_is_invalid() {
        let result = ConfiguratorConfig::from_json(
            r#"{ "placement": { "min_scale": [2.0, 2.0, 2.0], "max_scale": [1.0, 1.0, 1.0] } }"#,
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let result = ConfiguratorConfig::from_json(r#"{ "placement": { "min_scale": [0.0, 1.0, 1.0] } }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn reload_reads_the_source_file_again() {
        let path = std::env::temp_dir().join(format!("ar-configurator-reload-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "placement": { "max_objects": 2 } }"#).unwrap();
        let config = ConfiguratorConfig::load(&path).unwrap();
        assert_eq!(config.source.as_deref(), Some(path.as_path()));

        std::fs::write(&path, r#"{ "placement": { "max_objects": 6 } }"#).unwrap();
        let reloaded = config.reload().unwrap().unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(reloaded.placement.max_objects, 6);

        assert!(ConfiguratorConfig::default().reload().is_none());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = ConfiguratorConfig::load("does/not/exist.json");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
