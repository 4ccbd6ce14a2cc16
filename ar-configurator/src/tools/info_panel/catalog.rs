use std::collections::HashSet;
use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate accessory id {0:?}")]
    DuplicateId(String),
    #[error("accessory record with an empty id")]
    EmptyId,
}

/// Descriptive record of one accessory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessoryRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default)]
    pub model_number: String,
    #[serde(default)]
    pub price: f32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Uniform scale the viewer should show the model at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_scale: Option<f32>,
}

impl AccessoryRecord {
    /// Placeholder for an id the catalog does not know.
    pub fn stub(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            manufacturer: String::new(),
            model_number: String::new(),
            price: 0.0,
            description: "Detailed information not available.".to_string(),
            features: Vec::new(),
            image: None,
            preferred_scale: None,
        }
    }
}

pub trait Catalog {
    fn get(&self, id: &str) -> Option<AccessoryRecord>;
}

/// Accessory catalog, loadable from JSON directly or as a Bevy asset.
#[derive(Asset, TypePath, Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessoryCatalog {
    pub accessories: Vec<AccessoryRecord>,
}

impl AccessoryCatalog {
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for record in &self.accessories {
            if record.id.is_empty() {
                return Err(CatalogError::EmptyId);
            }
            if !seen.insert(record.id.as_str()) {
                return Err(CatalogError::DuplicateId(record.id.clone()));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.accessories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accessories.is_empty()
    }
}

impl Catalog for AccessoryCatalog {
    fn get(&self, id: &str) -> Option<AccessoryRecord> {
        self.accessories.iter().find(|r| r.id == id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"{
        "accessories": [
            {
                "id": "steering_wheel",
                "name": "Classic Steering Wheel",
                "manufacturer": "Alfa Romeo",
                "price": 1299.5,
                "features": ["Wood rim", "Aluminium spokes"],
                "preferred_scale": 0.55
            },
            { "id": "mirror", "name": "Rear View Mirror" }
        ]
    }"#;

    #[test]
    fn missing_fields_take_defaults() {
        let catalog = AccessoryCatalog::from_json(CATALOG).unwrap();
        assert_eq!(catalog.len(), 2);
        let mirror = catalog.get("mirror").unwrap();
        assert_eq!(mirror.price, 0.0);
        assert!(mirror.features.is_empty());
        assert_eq!(catalog.get("steering_wheel").unwrap().preferred_scale, Some(0.55));
        assert!(catalog.get("exhaust").is_none());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let json = r#"{"accessories":[{"id":"a","name":"A"},{"id":"a","name":"B"}]}"#;
        assert!(matches!(
            AccessoryCatalog::from_json(json),
            Err(CatalogError::DuplicateId(id)) if id == "a"
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            AccessoryCatalog::from_json("{\"accessories\": 3}"),
            Err(CatalogError::Parse(_))
        ));
    }
}
