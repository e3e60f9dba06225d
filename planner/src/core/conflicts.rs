use std::collections::HashSet;
use tracing::debug;

use crate::data::poi::{POI, GeoPoint};
use crate::models::turbine::Turbine;
use crate::utils::logging::{self, OperationCategory};

/// Anything that can take part in a separation check.
pub trait Separable {
    fn separation_id(&self) -> u64;
    fn separation_position(&self) -> &GeoPoint;
}

impl Separable for Turbine {
    fn separation_id(&self) -> u64 {
        self.get_id()
    }

    fn separation_position(&self) -> &GeoPoint {
        self.get_position()
    }
}

impl Separable for (u64, GeoPoint) {
    fn separation_id(&self) -> u64 {
        self.0
    }

    fn separation_position(&self) -> &GeoPoint {
        &self.1
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConflictPair {
    pub first: u64,
    pub second: u64,
    pub distance: f64,
}

/// Every unordered pair closer than `min_distance` (strict). Pairs come out in
/// input order, `first` always preceding `second`.
pub fn conflicting_pairs<T: Separable>(turbines: &[T], min_distance: f64) -> Vec<ConflictPair> {
    let _timing = logging::start_timing("conflicting_pairs", OperationCategory::ConflictCheck);

    let mut pairs = Vec::new();
    for (i, a) in turbines.iter().enumerate() {
        for b in &turbines[i + 1..] {
            let distance = a.separation_position().distance_to(b.separation_position());
            // NaN fails the comparison and is never a conflict
            if distance < min_distance {
                pairs.push(ConflictPair {
                    first: a.separation_id(),
                    second: b.separation_id(),
                    distance,
                });
            }
        }
    }

    debug!(turbines = turbines.len(), pairs = pairs.len(), min_distance, "conflict check");
    pairs
}

/// Ids of every turbine that is closer than `min_distance` to at least one other.
pub fn find_conflicts<T: Separable>(turbines: &[T], min_distance: f64) -> HashSet<u64> {
    conflicting_pairs(turbines, min_distance)
        .into_iter()
        .flat_map(|pair| [pair.first, pair.second])
        .collect()
}
