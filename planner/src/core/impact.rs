//! Joins a turbine set against an address set.
//!
//! Attribution is first-match-wins: turbines are visited in the order given,
//! and each address key goes to the first turbine that reaches it within the
//! radius, even when a later turbine is closer. Output is in that same
//! turbine-major, address-minor order. All three entry points below produce
//! identical results; they only differ in how they find the matches.

use std::collections::HashSet;
use rayon::prelude::*;
use tracing::debug;

use crate::data::poi::{POI, GeoPoint};
use crate::models::address::{Address, AffectedAddress};
use crate::models::turbine::TurbineRef;
use crate::utils::logging::{self, OperationCategory, ImpactAnalysisType};
use crate::utils::spatial_index::SpatialIndex;

/// Reference single-sweep analysis, O(turbines x addresses).
pub fn analyze(turbines: &[TurbineRef], addresses: &[Address], radius: f64) -> Vec<AffectedAddress> {
    let _timing = logging::start_timing("analyze",
        OperationCategory::ImpactAnalysis { subcategory: ImpactAnalysisType::Sequential });

    let mut seen: HashSet<&str> = HashSet::new();
    let mut affected = Vec::new();

    for turbine in turbines {
        for address in addresses {
            let distance = turbine.position.distance_to(address.get_position());
            if distance <= radius && !seen.contains(address.get_key()) {
                seen.insert(address.get_key());
                affected.push(attribute(address, turbine, distance));
            }
        }
    }

    debug!(turbines = turbines.len(), addresses = addresses.len(), radius, affected = affected.len(),
        "impact analysis");
    affected
}

/// Same result as [`analyze`], with the distance work spread over the rayon pool.
///
/// Each address independently finds the first turbine (in input order) that
/// reaches it. Sorting the hits by (turbine, address) position then replays
/// the sequential sweep, so the seen-set resolves duplicate keys exactly as
/// [`analyze`] does.
pub fn analyze_parallel(turbines: &[TurbineRef], addresses: &[Address], radius: f64) -> Vec<AffectedAddress> {
    let _timing = logging::start_timing("analyze_parallel",
        OperationCategory::ImpactAnalysis { subcategory: ImpactAnalysisType::Parallel });

    let mut hits: Vec<(usize, usize, f64)> = addresses
        .par_iter()
        .enumerate()
        .filter_map(|(address_pos, address)| {
            turbines.iter().enumerate().find_map(|(turbine_pos, turbine)| {
                let distance = turbine.position.distance_to(address.get_position());
                (distance <= radius).then_some((turbine_pos, address_pos, distance))
            })
        })
        .collect();

    hits.par_sort_unstable_by_key(|&(turbine_pos, address_pos, _)| (turbine_pos, address_pos));

    let affected = resolve_hits(&hits, turbines, addresses);
    debug!(turbines = turbines.len(), addresses = addresses.len(), radius, affected = affected.len(),
        "parallel impact analysis");
    affected
}

/// Same result as [`analyze`], visiting only addresses the grid index places
/// near each turbine.
pub fn analyze_indexed(
    turbines: &[TurbineRef],
    addresses: &[Address],
    index: &SpatialIndex,
    radius: f64,
) -> Vec<AffectedAddress> {
    let _timing = logging::start_timing("analyze_indexed",
        OperationCategory::ImpactAnalysis { subcategory: ImpactAnalysisType::Indexed });

    let mut seen: HashSet<&str> = HashSet::new();
    let mut affected = Vec::new();

    for turbine in turbines {
        for address_pos in index.candidates(&turbine.position, radius) {
            let Some(address) = addresses.get(address_pos) else {
                continue;
            };
            let distance = turbine.position.distance_to(address.get_position());
            if distance <= radius && !seen.contains(address.get_key()) {
                seen.insert(address.get_key());
                affected.push(attribute(address, turbine, distance));
            }
        }
    }

    debug!(turbines = turbines.len(), candidates_indexed = index.len(), radius, affected = affected.len(),
        "indexed impact analysis");
    affected
}

#[derive(Debug, Clone, PartialEq)]
pub struct NearestTurbine {
    pub turbine_index: usize,
    pub turbine_label: String,
    pub distance: f64,
}

impl NearestTurbine {
    pub fn distance_meters(&self) -> i64 {
        self.distance.round() as i64
    }
}

/// Closest turbine to a single point. Earlier turbines win ties; NaN distances
/// never win. `None` when no turbine yields a comparable distance.
pub fn nearest_turbine(point: &GeoPoint, turbines: &[TurbineRef]) -> Option<NearestTurbine> {
    let mut best: Option<NearestTurbine> = None;
    for turbine in turbines {
        let distance = turbine.position.distance_to(point);
        if distance.is_nan() {
            continue;
        }
        if best.as_ref().map_or(true, |b| distance < b.distance) {
            best = Some(NearestTurbine {
                turbine_index: turbine.index,
                turbine_label: turbine.label.clone(),
                distance,
            });
        }
    }
    best
}

fn resolve_hits(
    hits: &[(usize, usize, f64)],
    turbines: &[TurbineRef],
    addresses: &[Address],
) -> Vec<AffectedAddress> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut affected = Vec::with_capacity(hits.len());
    for &(turbine_pos, address_pos, distance) in hits {
        let address = &addresses[address_pos];
        if seen.insert(address.get_key()) {
            affected.push(attribute(address, &turbines[turbine_pos], distance));
        }
    }
    affected
}

fn attribute(address: &Address, turbine: &TurbineRef, distance: f64) -> AffectedAddress {
    AffectedAddress {
        address: address.clone(),
        distance_meters: distance.round() as i64,
        turbine_index: turbine.index,
        turbine_label: turbine.label.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo_distance::destination;

    fn turbine(index: usize, lat: f64, lng: f64) -> TurbineRef {
        TurbineRef::new(index, GeoPoint::new(lat, lng))
    }

    #[test]
    fn empty_inputs_yield_empty_results() {
        let addresses = vec![Address::new("a", "1234AB", GeoPoint::new(52.0, 5.0))];
        assert!(analyze(&[], &addresses, 1000.0).is_empty());
        assert!(analyze(&[turbine(0, 52.0, 5.0)], &[], 1000.0).is_empty());
    }

    #[test]
    fn radius_zero_matches_coincident_points() {
        let addresses = vec![Address::new("a", "1234AB", GeoPoint::new(52.0, 5.0))];
        let result = analyze(&[turbine(0, 52.0, 5.0)], &addresses, 0.0);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].distance_meters, 0);
    }

    #[test]
    fn first_qualifying_turbine_keeps_the_address() {
        let home = GeoPoint::new(52.0, 5.0);
        let far = destination(&home, 90.0, 900.0);
        let near = destination(&home, 270.0, 100.0);
        let addresses = vec![Address::new("Dorpsstraat 1", "1234AB", home)];
        let turbines = vec![TurbineRef::new(0, far), TurbineRef::new(1, near)];

        let result = analyze(&turbines, &addresses, 1000.0);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].turbine_index, 0);
        assert_eq!(result[0].turbine_label, "Turbine 1");
        assert_eq!(result[0].distance_meters, 900);
    }

    #[test]
    fn duplicate_keys_collapse_to_first_record() {
        let t = GeoPoint::new(52.0, 5.0);
        let addresses = vec![
            Address::new("Kade 3", "1234AB", destination(&t, 0.0, 200.0)),
            Address::new("Kade 3", "1234AB", destination(&t, 0.0, 100.0)),
        ];
        let result = analyze(&[TurbineRef::new(0, t)], &addresses, 500.0);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].distance_meters, 200);
    }

    #[test]
    fn nan_address_is_excluded() {
        let addresses = vec![Address::new("x", "1234AB", GeoPoint::new(f64::NAN, 5.0))];
        assert!(analyze(&[turbine(0, 52.0, 5.0)], &addresses, 1e9).is_empty());
    }

    #[test]
    fn nearest_turbine_prefers_closest_and_skips_nan() {
        let home = GeoPoint::new(52.0, 5.0);
        let turbines = vec![
            TurbineRef::new(0, destination(&home, 0.0, 700.0)),
            TurbineRef::new(1, GeoPoint::new(f64::NAN, 5.0)),
            TurbineRef::new(2, destination(&home, 90.0, 300.0)),
        ];
        let nearest = nearest_turbine(&home, &turbines).expect("a finite turbine exists");
        assert_eq!(nearest.turbine_index, 2);
        assert_eq!(nearest.distance_meters(), 300);
        assert!(nearest_turbine(&home, &[]).is_none());
    }
}
