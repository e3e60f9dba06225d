use std::io::Write;
use std::path::{Path, PathBuf};
use chrono::Local;
use csv::WriterBuilder;
use thiserror::Error;
use tracing::info;

use crate::config::constants::EXPORT_FILE_PREFIX;
use crate::config::turbine_types::size_label;
use crate::data::poi::POI;
use crate::models::address::{sorted_by_distance, AffectedAddress};
use crate::models::turbine::{turbine_label, Turbine};
use crate::utils::logging::{self, OperationCategory, FileIOType};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Nothing to export; run an analysis first")]
    NothingToExport,
}

pub const AFFECTED_HEADER: [&str; 8] = [
    "Adres",
    "Postcode",
    "Huisnummer",
    "Woonplaats",
    "Afstand (m)",
    "Dichtstbijzijnde Turbine",
    "Latitude",
    "Longitude",
];

pub const TURBINE_HEADER: [&str; 9] = [
    "Turbine",
    "Grootte",
    "Type",
    "Latitude",
    "Longitude",
    "Ashoogte (m)",
    "Rotordiameter (m)",
    "Tiphoogte (m)",
    "Vermogen (MW)",
];

/// Write affected addresses nearest-first.
pub fn write_affected_csv<W: Write>(writer: W, results: &[AffectedAddress]) -> Result<(), ExportError> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record(AFFECTED_HEADER)?;

    for affected in sorted_by_distance(results) {
        let a = &affected.address;
        wtr.write_record([
            a.address.clone(),
            a.postcode.clone(),
            a.house_number.clone(),
            a.town.clone(),
            affected.distance_meters.to_string(),
            affected.turbine_label.clone(),
            a.position.lat.to_string(),
            a.position.lng.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write turbine details in session order.
pub fn write_turbines_csv<W: Write>(writer: W, turbines: &[Turbine]) -> Result<(), ExportError> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record(TURBINE_HEADER)?;

    for (index, turbine) in turbines.iter().enumerate() {
        let spec = turbine.get_type();
        let position = turbine.get_position();
        wtr.write_record([
            turbine_label(index),
            size_label(turbine.get_type_index()).to_string(),
            spec.name.clone(),
            format!("{:.6}", position.lat),
            format!("{:.6}", position.lng),
            spec.hub_height.to_string(),
            spec.rotor_diameter.to_string(),
            spec.tip_height().to_string(),
            spec.power_mw.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// File name used for an affected-address export at `radius` meters.
pub fn affected_file_name(radius: f64) -> String {
    format!("{}{}m.csv", EXPORT_FILE_PREFIX, radius)
}

/// Writes result files into a timestamped subdirectory of an output directory.
pub struct CsvExporter {
    output_dir: PathBuf,
    timestamp: String,
    verbose_logging: bool,
}

impl CsvExporter {
    pub fn new(output_dir: impl AsRef<Path>, verbose_logging: bool) -> Result<Self, ExportError> {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let full_path = output_dir.as_ref().join(&timestamp);
        std::fs::create_dir_all(&full_path)?;

        Ok(Self {
            output_dir: full_path,
            timestamp,
            verbose_logging,
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn export_affected_addresses(&self, results: &[AffectedAddress], radius: f64) -> Result<PathBuf, ExportError> {
        let _timing = logging::start_timing("export_affected_addresses",
            OperationCategory::FileIO { subcategory: FileIOType::ResultsSave });

        if results.is_empty() {
            return Err(ExportError::NothingToExport);
        }

        let path = self.output_dir.join(affected_file_name(radius));
        let file = std::fs::File::create(&path)?;
        write_affected_csv(file, results)?;

        if self.verbose_logging {
            info!(path = %path.display(), rows = results.len(), "exported affected addresses");
        }
        Ok(path)
    }

    pub fn export_turbines(&self, turbines: &[Turbine]) -> Result<PathBuf, ExportError> {
        let _timing = logging::start_timing("export_turbines",
            OperationCategory::FileIO { subcategory: FileIOType::ResultsSave });

        let path = self.output_dir.join("turbines.csv");
        let file = std::fs::File::create(&path)?;
        write_turbines_csv(file, turbines)?;

        if self.verbose_logging {
            info!(path = %path.display(), rows = turbines.len(), "exported turbines");
        }
        Ok(path)
    }
}
