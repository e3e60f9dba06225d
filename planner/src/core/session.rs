// Session-scoped turbine state. Replaces process-wide stores: the caller owns a
// TurbineSession and hands its snapshots to the pure analysis functions.

use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::constants::{DEFAULT_HINDER_DISTANCE, DEFAULT_MINIMUM_TURBINE_DISTANCE};
use crate::config::settings::AnalysisSettings;
use crate::config::turbine_types;
use crate::core::conflicts;
use crate::data::poi::{POI, GeoPoint};
use crate::models::configuration::{ConfigError, Configuration, ConfiguredTurbine};
use crate::models::turbine::{Turbine, TurbineRef};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Unknown turbine type index: {0}")]
    UnknownTurbineType(usize),
    #[error("No turbine with id {0}")]
    TurbineNotFound(u64),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone)]
pub struct TurbineSession {
    turbines: Vec<Turbine>,
    next_id: u64,
    selected_type_index: usize,
    minimum_turbine_distance: f64,
    hinder_distance: f64,
}

impl Default for TurbineSession {
    fn default() -> Self {
        Self {
            turbines: Vec::new(),
            next_id: 1,
            selected_type_index: 0,
            minimum_turbine_distance: DEFAULT_MINIMUM_TURBINE_DISTANCE,
            hinder_distance: DEFAULT_HINDER_DISTANCE,
        }
    }
}

impl TurbineSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_settings(settings: &AnalysisSettings) -> Self {
        Self {
            minimum_turbine_distance: settings.minimum_turbine_distance,
            hinder_distance: settings.hinder_distance,
            ..Self::default()
        }
    }

    pub fn get_turbines(&self) -> &[Turbine] {
        &self.turbines
    }

    pub fn get_turbine(&self, id: u64) -> Option<&Turbine> {
        self.turbines.iter().find(|t| t.get_id() == id)
    }

    pub fn len(&self) -> usize {
        self.turbines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turbines.is_empty()
    }

    pub fn get_selected_type_index(&self) -> usize {
        self.selected_type_index
    }

    pub fn set_selected_type_index(&mut self, type_index: usize) -> Result<(), SessionError> {
        if turbine_types::turbine_type(type_index).is_none() {
            return Err(SessionError::UnknownTurbineType(type_index));
        }
        self.selected_type_index = type_index;
        Ok(())
    }

    pub fn get_minimum_turbine_distance(&self) -> f64 {
        self.minimum_turbine_distance
    }

    pub fn set_minimum_turbine_distance(&mut self, distance: f64) {
        self.minimum_turbine_distance = distance;
    }

    pub fn get_hinder_distance(&self) -> f64 {
        self.hinder_distance
    }

    pub fn set_hinder_distance(&mut self, distance: f64) {
        self.hinder_distance = distance;
    }

    /// Place a turbine and return its id. Ids are never reused within a session.
    pub fn add_turbine(&mut self, position: GeoPoint, type_index: usize) -> Result<u64, SessionError> {
        let type_spec = turbine_types::turbine_type(type_index)
            .ok_or(SessionError::UnknownTurbineType(type_index))?
            .clone();

        let id = self.next_id;
        self.next_id += 1;
        self.turbines.push(Turbine::new(id, position, type_index, type_spec));
        debug!(id, lat = position.lat, lng = position.lng, type_index, "turbine added");
        Ok(id)
    }

    /// Place a turbine of the currently selected type.
    pub fn add_selected_turbine(&mut self, position: GeoPoint) -> Result<u64, SessionError> {
        self.add_turbine(position, self.selected_type_index)
    }

    pub fn remove_turbine(&mut self, id: u64) -> Result<Turbine, SessionError> {
        let pos = self.position_of(id)?;
        Ok(self.turbines.remove(pos))
    }

    pub fn move_turbine(&mut self, id: u64, position: GeoPoint) -> Result<(), SessionError> {
        let pos = self.position_of(id)?;
        self.turbines[pos].update_position(position);
        Ok(())
    }

    pub fn set_turbine_type(&mut self, id: u64, type_index: usize) -> Result<(), SessionError> {
        let type_spec = turbine_types::turbine_type(type_index)
            .ok_or(SessionError::UnknownTurbineType(type_index))?
            .clone();
        let pos = self.position_of(id)?;
        self.turbines[pos].update_type(type_index, type_spec);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.turbines.clear();
    }

    /// Ids of turbines violating the session's minimum separation.
    pub fn conflicts(&self) -> HashSet<u64> {
        conflicts::find_conflicts(&self.turbines, self.minimum_turbine_distance)
    }

    /// Turbines in session order, labelled the way analysis results name them.
    pub fn analysis_inputs(&self) -> Vec<TurbineRef> {
        self.turbines
            .iter()
            .enumerate()
            .map(|(index, turbine)| TurbineRef::new(index, *turbine.get_position()))
            .collect()
    }

    pub fn to_configuration(&self, name: &str) -> Configuration {
        let turbines = self.turbines
            .iter()
            .map(|t| ConfiguredTurbine::new(*t.get_position(), t.get_type_index()))
            .collect();
        Configuration::new(name, turbines, self.minimum_turbine_distance)
    }

    /// Replace the layout with a saved configuration. The session is left
    /// untouched when the configuration does not validate.
    pub fn load_configuration(&mut self, config: &Configuration) -> Result<(), SessionError> {
        config.validate()?;

        self.clear();
        self.minimum_turbine_distance = config.minimum_distance;
        for turbine in &config.turbines {
            self.add_turbine(turbine.latlng, turbine.type_index)?;
        }
        info!(name = %config.name, turbines = self.turbines.len(), "configuration loaded");
        Ok(())
    }

    fn position_of(&self, id: u64) -> Result<usize, SessionError> {
        self.turbines
            .iter()
            .position(|t| t.get_id() == id)
            .ok_or(SessionError::TurbineNotFound(id))
    }
}
