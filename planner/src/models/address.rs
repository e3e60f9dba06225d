use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::data::poi::{POI, GeoPoint};

/// BAG classification of an addressable object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectType {
    #[serde(rename = "verblijfsobject")]
    Dwelling,
    #[serde(rename = "ligplaats")]
    HouseboatBerth,
    #[serde(rename = "standplaats")]
    Pitch,
}

impl FromStr for ObjectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "verblijfsobject" | "01" => Ok(ObjectType::Dwelling),
            "ligplaats" | "02" => Ok(ObjectType::HouseboatBerth),
            "standplaats" | "03" => Ok(ObjectType::Pitch),
            _ => Err(format!("Unknown object type: {}", s)),
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ObjectType::Dwelling => write!(f, "verblijfsobject"),
            ObjectType::HouseboatBerth => write!(f, "ligplaats"),
            ObjectType::Pitch => write!(f, "standplaats"),
        }
    }
}

impl Default for ObjectType {
    fn default() -> Self {
        ObjectType::Dwelling
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub address: String,
    pub postcode: String,
    pub house_number: String,
    pub town: String,
    pub object_type: ObjectType,
    pub position: GeoPoint,
}

impl Address {
    pub fn new(address: &str, postcode: &str, position: GeoPoint) -> Self {
        Self {
            address: address.to_string(),
            postcode: postcode.to_string(),
            house_number: String::new(),
            town: String::new(),
            object_type: ObjectType::Dwelling,
            position,
        }
    }

    pub fn with_house_number(mut self, house_number: &str) -> Self {
        self.house_number = house_number.to_string();
        self
    }

    pub fn with_town(mut self, town: &str) -> Self {
        self.town = town.to_string();
        self
    }

    pub fn with_object_type(mut self, object_type: ObjectType) -> Self {
        self.object_type = object_type;
        self
    }
}

impl POI for Address {
    fn get_position(&self) -> &GeoPoint {
        &self.position
    }

    fn get_key(&self) -> &str {
        &self.address
    }
}

/// An address inside the hinder radius, attributed to exactly one turbine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffectedAddress {
    #[serde(flatten)]
    pub address: Address,
    pub distance_meters: i64,
    pub turbine_index: usize,
    pub turbine_label: String,
}

impl AffectedAddress {
    pub fn key(&self) -> &str {
        &self.address.address
    }
}

/// Stable nearest-first view over analysis results. Ties keep analysis order.
pub fn sorted_by_distance(results: &[AffectedAddress]) -> Vec<&AffectedAddress> {
    let mut sorted: Vec<&AffectedAddress> = results.iter().collect();
    sorted.sort_by_key(|a| a.distance_meters);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_type_accepts_names_and_bag_codes() {
        assert_eq!("ligplaats".parse::<ObjectType>(), Ok(ObjectType::HouseboatBerth));
        assert_eq!("03".parse::<ObjectType>(), Ok(ObjectType::Pitch));
        assert_eq!(" Verblijfsobject ".parse::<ObjectType>(), Ok(ObjectType::Dwelling));
        assert!("kantoor".parse::<ObjectType>().is_err());
    }

    #[test]
    fn sorted_by_distance_is_stable() {
        let make = |key: &str, d: i64| AffectedAddress {
            address: Address::new(key, "1234AB", GeoPoint::new(52.0, 5.0)),
            distance_meters: d,
            turbine_index: 0,
            turbine_label: "Turbine 1".to_string(),
        };
        let results = vec![make("a", 300), make("b", 100), make("c", 300), make("d", 50)];
        let keys: Vec<&str> = sorted_by_distance(&results).iter().map(|a| a.key()).collect();
        assert_eq!(keys, vec!["d", "b", "a", "c"]);
    }
}
