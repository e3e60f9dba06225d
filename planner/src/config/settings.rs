use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::config::constants::{DEFAULT_HINDER_DISTANCE, DEFAULT_MINIMUM_TURBINE_DISTANCE};
use crate::core::zones::zones_are_ordered;
use crate::models::zone::{default_zones, DistanceZone};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid settings file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{name} must be a non-negative finite distance, got {value}")]
    InvalidDistance { name: &'static str, value: f64 },
    #[error("Distance zones must be non-empty and strictly ascending")]
    UnorderedZones,
}

/// Thresholds driving an analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    pub minimum_turbine_distance: f64,   // Turbine-to-turbine separation (m)
    pub hinder_distance: f64,            // Radius for affected addresses (m)
    pub zones: Vec<DistanceZone>,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            minimum_turbine_distance: DEFAULT_MINIMUM_TURBINE_DISTANCE,
            hinder_distance: DEFAULT_HINDER_DISTANCE,
            zones: default_zones(),
        }
    }
}

impl AnalysisSettings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let file = File::open(path.as_ref())?;
        let settings: AnalysisSettings = serde_json::from_reader(BufReader::new(file))?;
        settings.validate()?;
        info!(path = %path.as_ref().display(), "loaded analysis settings");
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        for (name, value) in [
            ("minimum_turbine_distance", self.minimum_turbine_distance),
            ("hinder_distance", self.hinder_distance),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SettingsError::InvalidDistance { name, value });
            }
        }
        if !zones_are_ordered(&self.zones) {
            return Err(SettingsError::UnorderedZones);
        }
        Ok(())
    }
}
