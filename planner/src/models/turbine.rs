use serde::{Deserialize, Serialize};
use crate::data::poi::{POI, GeoPoint};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurbineType {
    pub name: String,
    pub hub_height: f64,
    pub rotor_diameter: f64,
    #[serde(rename = "power")]
    pub power_mw: f64,
}

impl TurbineType {
    pub fn new(name: &str, hub_height: f64, rotor_diameter: f64, power_mw: f64) -> Self {
        Self {
            name: name.to_string(),
            hub_height,
            rotor_diameter,
            power_mw,
        }
    }

    /// Height of a blade tip at its highest point. Always derived, never stored.
    pub fn tip_height(&self) -> f64 {
        self.hub_height + self.rotor_diameter / 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Turbine {
    id: u64,
    position: GeoPoint,
    type_index: usize,
    type_spec: TurbineType,
    key: String,
}

impl Turbine {
    pub fn new(id: u64, position: GeoPoint, type_index: usize, type_spec: TurbineType) -> Self {
        Self {
            id,
            position,
            type_index,
            type_spec,
            key: id.to_string(),
        }
    }

    pub fn get_id(&self) -> u64 {
        self.id
    }

    pub fn get_type_index(&self) -> usize {
        self.type_index
    }

    pub fn get_type(&self) -> &TurbineType {
        &self.type_spec
    }

    pub fn update_position(&mut self, position: GeoPoint) {
        self.position = position;
    }

    pub fn update_type(&mut self, type_index: usize, type_spec: TurbineType) {
        self.type_index = type_index;
        self.type_spec = type_spec;
    }
}

impl POI for Turbine {
    fn get_position(&self) -> &GeoPoint {
        &self.position
    }

    fn get_key(&self) -> &str {
        &self.key
    }
}

/// A turbine as seen by the impact analysis: its place in the session order,
/// where it stands and how results should name it.
#[derive(Debug, Clone, PartialEq)]
pub struct TurbineRef {
    pub index: usize,
    pub position: GeoPoint,
    pub label: String,
}

impl TurbineRef {
    pub fn new(index: usize, position: GeoPoint) -> Self {
        Self {
            index,
            position,
            label: turbine_label(index),
        }
    }
}

/// Display label for the turbine at `index` in session order (1-based).
pub fn turbine_label(index: usize) -> String {
    format!("Turbine {}", index + 1)
}
