use serde::{Deserialize, Serialize};
use lazy_static::lazy_static;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceZone {
    #[serde(rename = "distance")]
    pub threshold_meters: f64,
    pub color: String,
    pub label: String,
    pub id: String,
}

impl DistanceZone {
    pub fn new(threshold_meters: f64, color: &str, label: &str, id: &str) -> Self {
        Self {
            threshold_meters,
            color: color.to_string(),
            label: label.to_string(),
            id: id.to_string(),
        }
    }
}

lazy_static! {
    pub static ref DEFAULT_ZONES: Vec<DistanceZone> = vec![
        DistanceZone::new(500.0, "#ef4444", "500m", "zone500"),
        DistanceZone::new(1000.0, "#f97316", "1km", "zone1000"),
        DistanceZone::new(1500.0, "#eab308", "1.5km", "zone1500"),
        DistanceZone::new(2000.0, "#84cc16", "2km", "zone2000"),
    ];
}

pub fn default_zones() -> Vec<DistanceZone> {
    DEFAULT_ZONES.clone()
}
