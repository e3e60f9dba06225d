use std::collections::HashMap;
use serde::Serialize;

use crate::config::constants::SAMPLE_ADDRESS_COUNT;
use crate::models::address::{Address, AffectedAddress, ObjectType};
use crate::models::turbine::turbine_label;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurbineImpact {
    pub turbine_index: usize,
    pub turbine_label: String,
    pub affected_count: usize,
}

/// Aggregate view of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactSummary {
    pub radius: f64,
    pub total_affected: usize,
    pub per_turbine: Vec<TurbineImpact>,
    pub object_type_counts: HashMap<ObjectType, usize>,
    pub nearest_distance: Option<i64>,
}

impl ImpactSummary {
    /// `turbine_count` is the number of turbines analysed; turbines that
    /// reached no address still get a zero row.
    pub fn new(results: &[AffectedAddress], turbine_count: usize, radius: f64) -> Self {
        let mut per_turbine: Vec<TurbineImpact> = (0..turbine_count)
            .map(|i| TurbineImpact {
                turbine_index: i,
                turbine_label: turbine_label(i),
                affected_count: 0,
            })
            .collect();

        let mut object_type_counts = HashMap::new();
        for affected in results {
            if let Some(row) = per_turbine.get_mut(affected.turbine_index) {
                row.affected_count += 1;
            }
            *object_type_counts.entry(affected.address.object_type).or_insert(0) += 1;
        }

        Self {
            radius,
            total_affected: results.len(),
            per_turbine,
            object_type_counts,
            nearest_distance: results.iter().map(|a| a.distance_meters).min(),
        }
    }

    pub fn count_of(&self, object_type: ObjectType) -> usize {
        self.object_type_counts.get(&object_type).copied().unwrap_or(0)
    }
}

/// The first few results in analysis order, then shown nearest-first.
pub fn sample_addresses(results: &[AffectedAddress]) -> Vec<&AffectedAddress> {
    let mut sample: Vec<&AffectedAddress> = results.iter().take(SAMPLE_ADDRESS_COUNT).collect();
    sample.sort_by_key(|a| a.distance_meters);
    sample
}

/// Counts of a freshly loaded address set by object type.
pub fn object_type_counts(addresses: &[Address]) -> HashMap<ObjectType, usize> {
    let mut counts = HashMap::new();
    for address in addresses {
        *counts.entry(address.object_type).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::poi::GeoPoint;

    fn affected(key: &str, distance: i64, turbine_index: usize, object_type: ObjectType) -> AffectedAddress {
        AffectedAddress {
            address: Address::new(key, "1234AB", GeoPoint::new(52.0, 5.0)).with_object_type(object_type),
            distance_meters: distance,
            turbine_index,
            turbine_label: turbine_label(turbine_index),
        }
    }

    #[test]
    fn counts_per_turbine_and_type() {
        let results = vec![
            affected("a", 400, 0, ObjectType::Dwelling),
            affected("b", 250, 0, ObjectType::HouseboatBerth),
            affected("c", 900, 2, ObjectType::Dwelling),
        ];
        let summary = ImpactSummary::new(&results, 3, 1000.0);

        let counts: Vec<usize> = summary.per_turbine.iter().map(|t| t.affected_count).collect();
        assert_eq!(counts, vec![2, 0, 1]);
        assert_eq!(summary.count_of(ObjectType::Dwelling), 2);
        assert_eq!(summary.count_of(ObjectType::Pitch), 0);
        assert_eq!(summary.nearest_distance, Some(250));
    }

    #[test]
    fn sample_takes_first_then_sorts() {
        let results: Vec<AffectedAddress> = (0..12)
            .map(|i| affected(&format!("a{}", i), 1000 - i as i64 * 10, 0, ObjectType::Dwelling))
            .collect();
        let sample = sample_addresses(&results);
        assert_eq!(sample.len(), 10);
        assert_eq!(sample[0].key(), "a9");
        assert_eq!(sample[9].key(), "a0");
    }
}
