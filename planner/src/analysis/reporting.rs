use std::collections::HashSet;

use super::summary::{sample_addresses, ImpactSummary};
use crate::config::turbine_types::size_label;
use crate::core::conflicts::ConflictPair;
use crate::core::impact::NearestTurbine;
use crate::core::zones::{classify, zone_standing};
use crate::data::pdok::LookedUpAddress;
use crate::data::poi::POI;
use crate::models::address::{AffectedAddress, ObjectType};
use crate::models::configuration::Configuration;
use crate::models::turbine::{turbine_label, Turbine};
use crate::models::zone::DistanceZone;

pub fn print_load_summary(total: usize, berths: usize, pitches: usize) {
    println!("{} adressen succesvol geladen!", total);
    if berths > 0 || pitches > 0 {
        let mut parts = Vec::new();
        if berths > 0 {
            parts.push(format!("{} ligplaatsen (woonboten)", berths));
        }
        if pitches > 0 {
            parts.push(format!("{} standplaatsen", pitches));
        }
        println!("Waarvan {}.", parts.join(", "));
    }
}

pub fn print_turbine_details(turbines: &[Turbine]) {
    println!("\nTurbine Details");
    println!("----------------------------------------");
    for (idx, turbine) in turbines.iter().enumerate() {
        let spec = turbine.get_type();
        let position = turbine.get_position();
        println!("{}: {} ({})", turbine_label(idx), size_label(turbine.get_type_index()), spec.name);
        println!("  Locatie: {:.6}, {:.6}", position.lat, position.lng);
        println!("  Ashoogte: {}m, Tiphoogte: {}m", spec.hub_height, spec.tip_height());
    }
    let total_mw: f64 = turbines.iter().map(|t| t.get_type().power_mw).sum();
    println!("Totaal vermogen: {} MW", total_mw);
    println!("----------------------------------------");
}

/// One sample line: key, rounded distance and the zone the distance falls in.
pub fn sample_line(affected: &AffectedAddress, zones: &[DistanceZone]) -> String {
    match classify(affected.distance_meters as f64, zones) {
        Some(zone) => format!("{} ({}m, zone {})", affected.key(), affected.distance_meters, zone.label),
        None => format!("{} ({}m)", affected.key(), affected.distance_meters),
    }
}

pub fn print_impact_summary(summary: &ImpactSummary, results: &[AffectedAddress], zones: &[DistanceZone]) {
    println!("\nResultaten:");
    println!("----------------------------------------");
    println!("Totaal: {} woningen binnen {}m", summary.total_affected, summary.radius);

    let berths = summary.count_of(ObjectType::HouseboatBerth);
    let pitches = summary.count_of(ObjectType::Pitch);
    if berths > 0 || pitches > 0 {
        println!("  waarvan {} ligplaatsen en {} standplaatsen", berths, pitches);
    }

    for row in &summary.per_turbine {
        println!("  {}: {} woningen", row.turbine_label, row.affected_count);
    }

    let sample = sample_addresses(results);
    if !sample.is_empty() {
        println!("Voorbeeldadressen:");
        for affected in &sample {
            println!("  {}", sample_line(affected, zones));
        }
        if results.len() > sample.len() {
            println!("  ... en {} meer", results.len() - sample.len());
        }
    }
    println!("----------------------------------------");
}

pub fn print_conflicts(turbines: &[Turbine], pairs: &[ConflictPair], flagged: &HashSet<u64>, min_distance: f64) {
    println!("\nMinimale turbine-afstand: {}m", min_distance);
    if pairs.is_empty() {
        println!("Geen conflicten gevonden.");
        return;
    }

    let label_of = |id: u64| {
        turbines
            .iter()
            .position(|t| t.get_id() == id)
            .map(turbine_label)
            .unwrap_or_else(|| format!("Turbine #{}", id))
    };

    for pair in pairs {
        println!("  {} <-> {}: {:.0}m", label_of(pair.first), label_of(pair.second), pair.distance);
    }
    println!("{} turbines te dicht bij elkaar", flagged.len());
}

pub fn print_lookup_report(found: &LookedUpAddress, nearest: Option<&NearestTurbine>, zones: &[DistanceZone]) {
    println!("\nAnalyse adres");
    println!("{}", found.address);
    println!("  Locatie: {:.6}, {:.6}", found.position.lat, found.position.lng);
    match nearest {
        Some(nearest) => {
            println!("  Dichtstbijzijnde turbine: {}m ({})", nearest.distance_meters(), nearest.turbine_label);
            if let Some(standing) = zone_standing(nearest.distance_meters() as f64, zones) {
                println!("  {}", standing.describe());
            }
        },
        None => println!("  Geen turbines geplaatst"),
    }
}

pub fn print_configurations(configurations: &[Configuration]) {
    if configurations.is_empty() {
        println!("Nog geen configuraties opgeslagen");
        return;
    }
    for config in configurations {
        let count = config.turbines.len();
        println!(
            "[{}] {} - {} turbine{} - {} - min. afstand {}m",
            config.id,
            config.name,
            count,
            if count != 1 { "s" } else { "" },
            config.timestamp.format("%d %b %H:%M"),
            config.minimum_distance,
        );
    }
}
