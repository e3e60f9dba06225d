use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use windplanner::analysis::reporting;
use windplanner::analysis::summary::{self, ImpactSummary};
use windplanner::cli::cli::{Args, Command, ConfigAction};
use windplanner::config::settings::AnalysisSettings;
use windplanner::core::conflicts;
use windplanner::core::impact;
use windplanner::core::session::TurbineSession;
use windplanner::data::address_loader;
use windplanner::data::config_store::ConfigStore;
use windplanner::data::pdok::{AddressLookup, PdokClient};
use windplanner::models::address::ObjectType;
use windplanner::models::configuration::Configuration;
use windplanner::utils::csv_export::CsvExporter;
use windplanner::utils::logging::{self, OperationCategory, ImpactAnalysisType};
use windplanner::utils::spatial_index::SpatialIndex;

fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_logging(args.enable_timing(), args.debug_logging());

    let settings = match args.settings() {
        Some(path) => AnalysisSettings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => AnalysisSettings::default(),
    };
    settings.validate().context("invalid analysis settings")?;

    match args.command() {
        Command::Analyze { addresses, config, radius, export, parallel, indexed } => {
            let radius = radius.map(f64::from).unwrap_or(settings.hinder_distance);
            run_analyze(&args, &settings, addresses, config, radius, export.as_deref(), *parallel, *indexed)?;
        },
        Command::Conflicts { config, min_distance } => {
            run_conflicts(&args, &settings, config, *min_distance)?;
        },
        Command::Lookup { postcode, number, config, batch } => {
            let session = match config {
                Some(config) => session_for(&args, &settings, config)?,
                None => TurbineSession::from_settings(&settings),
            };
            let client = PdokClient::new().context("creating PDOK client")?;
            match (batch, postcode, number) {
                (Some(batch), _, _) => run_batch_lookup(&client, &session, &settings, batch)?,
                (None, Some(postcode), Some(number)) => {
                    let found = client.lookup(postcode, number)
                        .with_context(|| format!("looking up {} {}", postcode, number))?;
                    let nearest = impact::nearest_turbine(&found.position, &session.analysis_inputs());
                    reporting::print_lookup_report(&found, nearest.as_ref(), &settings.zones);
                },
                _ => bail!("either --batch or both --postcode and --number are required"),
            }
        },
        Command::Config { action } => run_config(&args, &settings, action)?,
    }

    logging::print_timing_report();
    Ok(())
}

/// Resolve `--config` as a JSON file if one exists at that path, otherwise
/// as the name of a saved configuration.
fn resolve_configuration(args: &Args, config: &str) -> Result<Configuration> {
    let path = Path::new(config);
    if path.is_file() {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading configuration {}", path.display()))?;
        return Configuration::from_json(&json)
            .with_context(|| format!("parsing configuration {}", path.display()));
    }

    let store = ConfigStore::open(args.store())
        .with_context(|| format!("opening store {}", args.store().display()))?;
    match store.find_by_name(config) {
        Some(found) => Ok(found.clone()),
        None => bail!("no configuration file or saved configuration named {:?}", config),
    }
}

fn session_for(args: &Args, settings: &AnalysisSettings, config: &str) -> Result<TurbineSession> {
    let configuration = resolve_configuration(args, config)?;
    let mut session = TurbineSession::from_settings(settings);
    session.load_configuration(&configuration)
        .with_context(|| format!("loading configuration {:?}", configuration.name))?;
    Ok(session)
}

#[allow(clippy::too_many_arguments)]
fn run_analyze(
    args: &Args,
    settings: &AnalysisSettings,
    addresses_path: &Path,
    config: &str,
    radius: f64,
    export_dir: Option<&Path>,
    parallel: bool,
    indexed: bool,
) -> Result<()> {
    let session = session_for(args, settings, config)?;
    if session.is_empty() {
        bail!("configuration has no turbines; nothing to analyse");
    }

    let addresses = address_loader::load_addresses(addresses_path)
        .with_context(|| format!("loading addresses from {}", addresses_path.display()))?;
    let counts = summary::object_type_counts(&addresses);
    reporting::print_load_summary(
        addresses.len(),
        counts.get(&ObjectType::HouseboatBerth).copied().unwrap_or(0),
        counts.get(&ObjectType::Pitch).copied().unwrap_or(0),
    );

    reporting::print_turbine_details(session.get_turbines());

    let turbines = session.analysis_inputs();
    let results = if indexed {
        let index = {
            let _timing = logging::start_timing("build_spatial_index",
                OperationCategory::ImpactAnalysis { subcategory: ImpactAnalysisType::IndexBuild });
            SpatialIndex::new(&addresses)
        };
        impact::analyze_indexed(&turbines, &addresses, &index, radius)
    } else if parallel {
        impact::analyze_parallel(&turbines, &addresses, radius)
    } else {
        impact::analyze(&turbines, &addresses, radius)
    };

    let impact_summary = ImpactSummary::new(&results, turbines.len(), radius);
    reporting::print_impact_summary(&impact_summary, &results, &settings.zones);

    let conflicts = session.conflicts();
    if !conflicts.is_empty() {
        warn!(count = conflicts.len(), min_distance = session.get_minimum_turbine_distance(),
            "layout has turbines closer than the minimum distance");
    }

    if let Some(dir) = export_dir {
        let exporter = CsvExporter::new(dir, args.debug_logging())
            .with_context(|| format!("creating export directory in {}", dir.display()))?;
        if results.is_empty() {
            println!("Geen adressen binnen {}m; niets te exporteren", radius);
        } else {
            let path = exporter.export_affected_addresses(&results, radius)?;
            println!("Resultaten geschreven naar {}", path.display());
        }
        let path = exporter.export_turbines(session.get_turbines())?;
        println!("Turbines geschreven naar {}", path.display());
    }
    Ok(())
}

fn run_conflicts(args: &Args, settings: &AnalysisSettings, config: &str, min_distance: Option<f64>) -> Result<()> {
    let mut session = session_for(args, settings, config)?;
    if let Some(min_distance) = min_distance {
        session.set_minimum_turbine_distance(min_distance);
    }

    let min_distance = session.get_minimum_turbine_distance();
    let pairs = conflicts::conflicting_pairs(session.get_turbines(), min_distance);
    let flagged = session.conflicts();
    reporting::print_conflicts(session.get_turbines(), &pairs, &flagged, min_distance);
    Ok(())
}

fn run_batch_lookup(
    client: &impl AddressLookup,
    session: &TurbineSession,
    settings: &AnalysisSettings,
    batch: &Path,
) -> Result<()> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(batch)
        .with_context(|| format!("opening batch file {}", batch.display()))?;

    let headers = reader.headers()?.clone();
    let column = |names: &[&str]| {
        headers.iter().position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
    };
    let postcode_col = column(&["postcode"]).context("batch file needs a postcode column")?;
    let number_col = column(&["huisnummer", "number", "house_number"])
        .context("batch file needs a huisnummer column")?;

    let records: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>()?;
    let turbines = session.analysis_inputs();

    let progress = ProgressBar::new(records.len() as u64);
    progress.set_style(ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")?);

    let mut failures = 0;
    for record in &records {
        let postcode = record.get(postcode_col).unwrap_or_default();
        let number = record.get(number_col).unwrap_or_default();
        progress.set_message(format!("{} {}", postcode, number));

        match client.lookup(postcode, number) {
            Ok(found) => {
                let nearest = impact::nearest_turbine(&found.position, &turbines);
                progress.suspend(|| reporting::print_lookup_report(&found, nearest.as_ref(), &settings.zones));
            },
            Err(e) => {
                failures += 1;
                progress.suspend(|| warn!(postcode, number, error = %e, "lookup failed"));
            },
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    info!(total = records.len(), failures, "batch lookup finished");
    Ok(())
}

fn run_config(args: &Args, settings: &AnalysisSettings, action: &ConfigAction) -> Result<()> {
    let mut store = ConfigStore::open(args.store())
        .with_context(|| format!("opening store {}", args.store().display()))?;

    match action {
        ConfigAction::List => reporting::print_configurations(store.list()),
        ConfigAction::Save { name, turbines, type_index, min_distance } => {
            let mut session = TurbineSession::from_settings(settings);
            session.set_selected_type_index(*type_index)?;
            if let Some(min_distance) = min_distance {
                session.set_minimum_turbine_distance(*min_distance);
            }
            for placement in turbines {
                match placement.type_index {
                    Some(type_index) => session.add_turbine(placement.position, type_index)?,
                    None => session.add_selected_turbine(placement.position)?,
                };
            }

            let flagged = session.conflicts();
            if !flagged.is_empty() {
                warn!(count = flagged.len(), min_distance = session.get_minimum_turbine_distance(),
                    "saving a layout with turbines closer than the minimum distance");
            }

            let saved = store.save_layout(&session, name)
                .with_context(|| format!("saving configuration {:?}", name))?;
            println!("Configuratie \"{}\" opgeslagen als [{}] met {} turbine(s)", saved.name, saved.id, saved.turbines.len());
        },
        ConfigAction::Import { file } => {
            let imported = store.import(file)
                .with_context(|| format!("importing {}", file.display()))?;
            println!("Configuratie \"{}\" geïmporteerd als [{}]", imported.name, imported.id);
        },
        ConfigAction::Export { id, dir } => {
            let path = store.export(*id, dir)?;
            println!("Configuratie geëxporteerd naar {}", path.display());
        },
        ConfigAction::Delete { id } => {
            let removed = store.delete(*id)?;
            println!("Configuratie \"{}\" verwijderd", removed.name);
        },
    }
    Ok(())
}
