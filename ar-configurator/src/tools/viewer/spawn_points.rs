use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::host::Pose;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub name: String,
    pub position: Vec3,
    #[serde(default = "default_rotation")]
    pub rotation: Quat,
}

fn default_rotation() -> Quat {
    Quat::IDENTITY
}

impl SpawnPoint {
    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.rotation)
    }
}

/// Named model anchors in the inspection scene.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnPoints {
    pub points: Vec<SpawnPoint>,
    pub default_point: Option<SpawnPoint>,
}

impl SpawnPoints {
    /// Exact name first, then containment either way, then the default.
    pub fn lookup(&self, model_name: &str) -> Option<&SpawnPoint> {
        if model_name.is_empty() {
            return self.default_point.as_ref();
        }
        if let Some(exact) = self.points.iter().find(|p| p.name == model_name) {
            return Some(exact);
        }
        if let Some(partial) = self
            .points
            .iter()
            .find(|p| model_name.contains(p.name.as_str()) || p.name.contains(model_name))
        {
            debug!("Spawn point for {model_name:?} found by partial match {:?}", partial.name);
            return Some(partial);
        }
        self.default_point.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(name: &str, x: f32) -> SpawnPoint {
        SpawnPoint {
            name: name.to_string(),
            position: Vec3::X * x,
            rotation: Quat::IDENTITY,
        }
    }

    #[test]
    fn lookup_prefers_exact_then_partial_then_default() {
        let points = SpawnPoints {
            points: vec![point("Steering Wheel", 1.0), point("Exhaust", 2.0)],
            default_point: Some(point("default", 9.0)),
        };
        assert_eq!(points.lookup("Exhaust").unwrap().position.x, 2.0);
        assert_eq!(points.lookup("Classic Steering Wheel").unwrap().position.x, 1.0);
        assert_eq!(points.lookup("Gear Stick").unwrap().position.x, 9.0);
        assert!(SpawnPoints::default().lookup("Exhaust").is_none());
    }
}
