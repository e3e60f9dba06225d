use std::path::PathBuf;
use std::str::FromStr;
use clap::{Parser, Subcommand};

use crate::config::constants::{
    DEFAULT_STORE_FILE, HINDER_DISTANCE_MAX, HINDER_DISTANCE_MIN, HINDER_DISTANCE_STEP,
};
use crate::data::poi::GeoPoint;

#[derive(Parser)]
#[command(author, version, about = "Wind turbine placement and noise-impact planner", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    command: Command,

    #[arg(long, global = true, help = "JSON file with analysis settings")]
    settings: Option<PathBuf>,

    #[arg(long, global = true, default_value_t = false)]
    debug_logging: bool,

    #[arg(long, global = true, default_value_t = false)]
    enable_timing: bool,

    #[arg(long, global = true, default_value = DEFAULT_STORE_FILE, help = "Saved configurations file")]
    store: PathBuf,
}

#[derive(Subcommand)]
pub enum Command {
    /// Count addresses within the hinder distance of a layout
    Analyze {
        #[arg(short, long, help = "Address CSV with lat/lng columns")]
        addresses: PathBuf,

        #[arg(short, long, help = "Configuration JSON file or a saved configuration name")]
        config: String,

        #[arg(short, long, value_parser = parse_radius, help = "Hinder distance in meters (250-2000, step 50)")]
        radius: Option<u32>,

        #[arg(short, long, help = "Write CSV results into a timestamped subdirectory of DIR")]
        export: Option<PathBuf>,

        #[arg(long, default_value_t = false)]
        parallel: bool,

        #[arg(long, default_value_t = false, help = "Prefilter addresses with a grid index")]
        indexed: bool,
    },

    /// Report turbines closer together than the minimum distance
    Conflicts {
        #[arg(short, long)]
        config: String,

        #[arg(short, long, help = "Override the configuration's minimum distance")]
        min_distance: Option<f64>,
    },

    /// Geocode an address and check it against a layout
    Lookup {
        #[arg(short, long, required_unless_present = "batch")]
        postcode: Option<String>,

        #[arg(short, long, required_unless_present = "batch")]
        number: Option<String>,

        #[arg(short, long)]
        config: Option<String>,

        #[arg(short, long, conflicts_with_all = ["postcode", "number"], help = "CSV with postcode and huisnummer columns")]
        batch: Option<PathBuf>,
    },

    /// Manage saved configurations
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    List,
    /// Save a new layout to the store
    Save {
        #[arg(short, long)]
        name: String,

        #[arg(short, long = "turbine", value_name = "LAT,LNG[,TYPE]", allow_hyphen_values = true)]
        turbines: Vec<TurbinePlacement>,

        #[arg(short = 'T', long = "type", default_value_t = 0, help = "Type index for turbines given without one")]
        type_index: usize,

        #[arg(short, long)]
        min_distance: Option<f64>,
    },
    Import {
        file: PathBuf,
    },
    Export {
        id: i64,
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },
    Delete {
        id: i64,
    },
}

/// One `--turbine` value: a position and an optional catalog index.
#[derive(Debug, Clone, PartialEq)]
pub struct TurbinePlacement {
    pub position: GeoPoint,
    pub type_index: Option<usize>,
}

impl FromStr for TurbinePlacement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let coordinate = |raw: &str| -> Result<f64, String> {
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| format!("invalid coordinate {:?} in {:?}", raw, s))
        };

        match parts.as_slice() {
            [lat, lng] => Ok(Self {
                position: GeoPoint::new(coordinate(lat)?, coordinate(lng)?),
                type_index: None,
            }),
            [lat, lng, type_index] => Ok(Self {
                position: GeoPoint::new(coordinate(lat)?, coordinate(lng)?),
                type_index: Some(type_index.parse().map_err(|_| format!("invalid type index {:?}", type_index))?),
            }),
            _ => Err(format!("expected LAT,LNG[,TYPE], got {:?}", s)),
        }
    }
}

/// Radius values follow the hinder slider: 250-2000 m in steps of 50.
pub fn parse_radius(s: &str) -> Result<u32, String> {
    let radius: u32 = s.trim().parse().map_err(|_| format!("{:?} is not a whole number of meters", s))?;
    if !(HINDER_DISTANCE_MIN..=HINDER_DISTANCE_MAX).contains(&radius) {
        return Err(format!("radius must be between {} and {} m", HINDER_DISTANCE_MIN, HINDER_DISTANCE_MAX));
    }
    if radius % HINDER_DISTANCE_STEP != 0 {
        return Err(format!("radius must be a multiple of {} m", HINDER_DISTANCE_STEP));
    }
    Ok(radius)
}

impl Args {
    pub fn command(&self) -> &Command {
        &self.command
    }

    pub fn settings(&self) -> Option<&PathBuf> {
        self.settings.as_ref()
    }

    pub fn debug_logging(&self) -> bool {
        self.debug_logging
    }

    pub fn enable_timing(&self) -> bool {
        self.enable_timing
    }

    pub fn store(&self) -> &PathBuf {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_analyze() {
        let args = Args::try_parse_from([
            "windplanner", "analyze", "--addresses", "a.csv", "--config", "park.json",
            "--radius", "1500", "--parallel",
        ]).expect("valid arguments");

        match args.command() {
            Command::Analyze { radius, parallel, indexed, .. } => {
                assert_eq!(*radius, Some(1500));
                assert!(*parallel);
                assert!(!*indexed);
            },
            _ => panic!("expected analyze"),
        }
        assert_eq!(args.store(), &PathBuf::from(DEFAULT_STORE_FILE));
    }

    #[test]
    fn radius_outside_slider_range_is_rejected() {
        let result = Args::try_parse_from([
            "windplanner", "analyze", "--addresses", "a.csv", "--config", "p.json", "--radius", "100",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn radius_must_follow_slider_step() {
        assert_eq!(parse_radius("1050"), Ok(1050));
        assert!(parse_radius("1025").is_err());
        assert!(parse_radius("2050").is_err());
        assert!(parse_radius("abc").is_err());
    }

    #[test]
    fn parses_config_save_placements() {
        let args = Args::try_parse_from([
            "windplanner", "config", "save", "--name", "Polder", "-t", "52.64,5.06", "-t", "52.65, 5.08, 2",
        ]).expect("valid arguments");

        match args.command() {
            Command::Config { action: ConfigAction::Save { name, turbines, type_index, .. } } => {
                assert_eq!(name, "Polder");
                assert_eq!(*type_index, 0);
                assert_eq!(turbines.len(), 2);
                assert_eq!(turbines[0].type_index, None);
                assert_eq!(turbines[1], TurbinePlacement { position: GeoPoint::new(52.65, 5.08), type_index: Some(2) });
            },
            _ => panic!("expected config save"),
        }
    }

    #[test]
    fn malformed_placement_is_rejected() {
        assert!("52.6".parse::<TurbinePlacement>().is_err());
        assert!("52.6,NaN".parse::<TurbinePlacement>().is_err());
        assert!("52.6,5.0,groot".parse::<TurbinePlacement>().is_err());
    }

    #[test]
    fn lookup_needs_postcode_or_batch() {
        assert!(Args::try_parse_from(["windplanner", "lookup"]).is_err());
        assert!(Args::try_parse_from(["windplanner", "lookup", "--batch", "list.csv"]).is_ok());
        assert!(Args::try_parse_from(["windplanner", "lookup", "-p", "1621AB", "-n", "3"]).is_ok());
    }
}
