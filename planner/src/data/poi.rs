use serde::{Deserialize, Serialize};
use crate::core::geo_distance;

/// A WGS84 position in degrees. No range checks are applied; callers own validity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        geo_distance::distance(self, other)
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

pub trait POI {
    fn get_position(&self) -> &GeoPoint;
    fn get_key(&self) -> &str;
}
