//! Distance tier classification.
//!
//! Two rules live here. [`classify`] is the color rule used for result lists:
//! inclusive thresholds, with distances past the outer zone reusing the outer
//! zone. [`zone_standing`] is the wording used for a single looked-up address:
//! exclusive thresholds, and an explicit "beyond" outcome.

use crate::models::zone::DistanceZone;

/// First zone (in ascending order) whose threshold is `>= distance`. Distances
/// beyond every threshold, and NaN, land in the last zone. `None` only when
/// `zones` is empty.
pub fn classify(distance: f64, zones: &[DistanceZone]) -> Option<&DistanceZone> {
    zones
        .iter()
        .find(|zone| distance <= zone.threshold_meters)
        .or_else(|| zones.last())
}

pub fn zone_color(distance: f64, zones: &[DistanceZone]) -> Option<&str> {
    classify(distance, zones).map(|zone| zone.color.as_str())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoneStanding<'a> {
    Within(&'a DistanceZone),
    Beyond(&'a DistanceZone),
}

impl ZoneStanding<'_> {
    pub fn describe(&self) -> String {
        match self {
            ZoneStanding::Within(zone) => format!("Binnen {} zone", zone.label),
            ZoneStanding::Beyond(zone) => format!("Buiten {} zone", zone.label),
        }
    }
}

/// Strictly-inside standing of `distance` relative to `zones`.
pub fn zone_standing(distance: f64, zones: &[DistanceZone]) -> Option<ZoneStanding<'_>> {
    match zones.iter().find(|zone| distance < zone.threshold_meters) {
        Some(zone) => Some(ZoneStanding::Within(zone)),
        None => zones.last().map(ZoneStanding::Beyond),
    }
}

/// Zones must be non-empty and strictly ascending by threshold.
pub fn zones_are_ordered(zones: &[DistanceZone]) -> bool {
    !zones.is_empty()
        && zones
            .windows(2)
            .all(|pair| pair[0].threshold_meters < pair[1].threshold_meters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::zone::default_zones;

    #[test]
    fn threshold_is_inclusive() {
        let zones = default_zones();
        assert_eq!(classify(500.0, &zones).map(|z| z.id.as_str()), Some("zone500"));
        assert_eq!(classify(500.01, &zones).map(|z| z.id.as_str()), Some("zone1000"));
        assert_eq!(classify(0.0, &zones).map(|z| z.id.as_str()), Some("zone500"));
    }

    #[test]
    fn overflow_reuses_outer_zone() {
        let zones = default_zones();
        assert_eq!(zone_color(2500.0, &zones), Some("#84cc16"));
        assert_eq!(zone_color(f64::NAN, &zones), Some("#84cc16"));
    }

    #[test]
    fn empty_zone_list_has_no_color() {
        assert_eq!(zone_color(10.0, &[]), None);
        assert!(zone_standing(10.0, &[]).is_none());
    }

    #[test]
    fn standing_is_exclusive() {
        let zones = default_zones();
        assert_eq!(
            zone_standing(499.0, &zones).map(|s| s.describe()),
            Some("Binnen 500m zone".to_string())
        );
        assert_eq!(
            zone_standing(500.0, &zones).map(|s| s.describe()),
            Some("Binnen 1km zone".to_string())
        );
        assert_eq!(
            zone_standing(2000.0, &zones).map(|s| s.describe()),
            Some("Buiten 2km zone".to_string())
        );
    }

    #[test]
    fn ordering_check() {
        let mut zones = default_zones();
        assert!(zones_are_ordered(&zones));
        zones.swap(0, 1);
        assert!(!zones_are_ordered(&zones));
        assert!(!zones_are_ordered(&[]));
    }
}
