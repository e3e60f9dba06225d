use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use windplanner::core::conflicts::{conflicting_pairs, find_conflicts};
use windplanner::core::geo_distance::{destination, distance};
use windplanner::core::zones::{classify, zone_standing, ZoneStanding};
use windplanner::models::zone::default_zones;
use windplanner::GeoPoint;

macro_rules! assert_approx {
    ($left:expr, $right:expr, $tol:expr) => {
        let (l, r) = ($left as f64, $right as f64);
        assert!(
            (l - r).abs() <= $tol,
            "assert_approx failed: left={}, right={}, diff={}, tol={}",
            l, r, (l - r).abs(), $tol
        );
    };
}

fn random_nl_point(rng: &mut StdRng) -> GeoPoint {
    GeoPoint::new(rng.gen_range(50.7..53.6), rng.gen_range(3.3..7.2))
}

// ── Distance ──

#[test]
fn test_distance_is_symmetric() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let a = random_nl_point(&mut rng);
        let b = random_nl_point(&mut rng);
        let (ab, ba) = (distance(&a, &b), distance(&b, &a));
        assert_approx!(ab, ba, ab * 1e-6);
    }
}

#[test]
fn test_distance_identity_is_zero() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..50 {
        let p = random_nl_point(&mut rng);
        assert_eq!(distance(&p, &p), 0.0);
    }
}

#[test]
fn test_distance_known_anchor() {
    let d = distance(&GeoPoint::new(52.0, 5.0), &GeoPoint::new(52.0, 5.01));
    assert!((d - 687.0).abs() <= 5.0, "got {}", d);
}

#[test]
fn test_destination_matches_distance() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..100 {
        let origin = random_nl_point(&mut rng);
        let bearing = rng.gen_range(0.0..360.0);
        let meters = rng.gen_range(10.0..5000.0);
        let target = destination(&origin, bearing, meters);
        assert_approx!(distance(&origin, &target), meters, 1e-3);
    }
}

// ── Conflicts ──

#[test]
fn test_turbines_exactly_min_apart_do_not_conflict() {
    let a = GeoPoint::new(52.3, 4.9);
    let b = destination(&a, 45.0, 800.0);
    let min = distance(&a, &b);
    let turbines = vec![(1u64, a), (2u64, b)];

    assert!(find_conflicts(&turbines, min).is_empty());
    assert!(conflicting_pairs(&turbines, min).is_empty());
}

#[test]
fn test_turbines_one_meter_short_conflict() {
    let a = GeoPoint::new(52.3, 4.9);
    let b = destination(&a, 45.0, 800.0);
    let min = distance(&a, &b) + 1.0;
    let turbines = vec![(1u64, a), (2u64, b)];

    let flagged = find_conflicts(&turbines, min);
    assert_eq!(flagged.len(), 2);
    assert!(flagged.contains(&1) && flagged.contains(&2));
}

#[test]
fn test_conflict_closure_leaves_others_out() {
    let a = GeoPoint::new(52.3, 4.9);
    let close = destination(&a, 0.0, 300.0);
    let far = destination(&a, 180.0, 3000.0);
    let turbines = vec![(10u64, a), (20u64, close), (30u64, far)];

    let flagged = find_conflicts(&turbines, 800.0);
    assert!(flagged.contains(&10));
    assert!(flagged.contains(&20));
    assert!(!flagged.contains(&30));

    let pairs = conflicting_pairs(&turbines, 800.0);
    assert_eq!(pairs.len(), 1);
    assert_eq!((pairs[0].first, pairs[0].second), (10, 20));
}

#[test]
fn test_conflicts_on_empty_and_single() {
    let none: Vec<(u64, GeoPoint)> = Vec::new();
    assert!(find_conflicts(&none, 800.0).is_empty());
    assert!(find_conflicts(&[(1u64, GeoPoint::new(52.0, 5.0))], 800.0).is_empty());
}

// ── Zones ──

#[test]
fn test_zone_boundaries() {
    let zones = default_zones();
    assert_eq!(classify(500.0, &zones).map(|z| z.threshold_meters), Some(500.0));
    assert_eq!(classify(500.01, &zones).map(|z| z.threshold_meters), Some(1000.0));
    assert_eq!(classify(2500.0, &zones).map(|z| z.threshold_meters), Some(2000.0));
    assert_eq!(classify(0.0, &zones).map(|z| z.threshold_meters), Some(500.0));
}

#[test]
fn test_zone_standing_is_strict() {
    let zones = default_zones();
    match zone_standing(500.0, &zones) {
        Some(ZoneStanding::Within(zone)) => assert_eq!(zone.threshold_meters, 1000.0),
        other => panic!("unexpected standing {:?}", other),
    }
    assert!(matches!(zone_standing(2000.0, &zones), Some(ZoneStanding::Beyond(_))));
    assert!(zone_standing(100.0, &[]).is_none());
}
