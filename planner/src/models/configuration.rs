use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::constants::DEFAULT_MINIMUM_TURBINE_DISTANCE;
use crate::config::turbine_types;
use crate::data::poi::GeoPoint;
use crate::models::turbine::TurbineType;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Configuration name is required")]
    EmptyName,
    #[error("Plaats eerst turbines voordat je een configuratie opslaat")]
    EmptyLayout,
    #[error("Turbine {position} has unknown type index {type_index}")]
    UnknownTurbineType { position: usize, type_index: usize },
    #[error("Invalid minimum distance: {0}")]
    InvalidMinimumDistance(f64),
    #[error("No configuration with id {0}")]
    NotFound(i64),
}

/// One placed turbine inside a saved configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfiguredTurbine {
    pub latlng: GeoPoint,
    pub type_index: usize,
    /// Informational copy of the catalog entry; ignored on load.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_spec: Option<TurbineType>,
}

impl ConfiguredTurbine {
    pub fn new(latlng: GeoPoint, type_index: usize) -> Self {
        Self {
            latlng,
            type_index,
            type_spec: turbine_types::turbine_type(type_index).cloned(),
        }
    }
}

/// A named, timestamped snapshot of a turbine layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    pub turbines: Vec<ConfiguredTurbine>,
    #[serde(default = "default_minimum_distance")]
    pub minimum_distance: f64,
}

fn default_minimum_distance() -> f64 {
    DEFAULT_MINIMUM_TURBINE_DISTANCE
}

impl Configuration {
    pub fn new(name: &str, turbines: Vec<ConfiguredTurbine>, minimum_distance: f64) -> Self {
        let timestamp = Utc::now();
        Self {
            id: timestamp.timestamp_millis(),
            name: name.to_string(),
            timestamp,
            turbines,
            minimum_distance,
        }
    }

    /// Parse and validate. Only structurally complete configurations with
    /// catalog-known turbine types are accepted.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Configuration = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if !(self.minimum_distance.is_finite() && self.minimum_distance >= 0.0) {
            return Err(ConfigError::InvalidMinimumDistance(self.minimum_distance));
        }
        for (position, turbine) in self.turbines.iter().enumerate() {
            if turbine.type_index >= turbine_types::catalog_len() {
                return Err(ConfigError::UnknownTurbineType {
                    position,
                    type_index: turbine.type_index,
                });
            }
        }
        Ok(())
    }

    /// File-name friendly form of the name: non-alphanumerics become `-`.
    pub fn slug(&self) -> String {
        self.name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
            .collect()
    }
}
