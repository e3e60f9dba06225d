use std::fs::File;
use std::io::Read;
use std::path::Path;
use csv::{ReaderBuilder, StringRecord};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::data::poi::GeoPoint;
use crate::models::address::{Address, ObjectType};
use crate::utils::logging::{self, OperationCategory, FileIOType};

#[derive(Debug, Error)]
pub enum AddressLoadError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV parse error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("CSV file is missing lat/lng columns; the header must contain \"lat\" and \"lng\" columns")]
    MissingCoordinateColumns,
}

/// Column positions resolved from the header row.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMap {
    pub address: Option<usize>,
    pub postcode: Option<usize>,
    pub lat: usize,
    pub lng: usize,
    pub house_number: Option<usize>,
    pub town: Option<usize>,
    pub object_type: Option<usize>,
}

impl ColumnMap {
    /// Match header names case-insensitively against the known aliases. The
    /// address and postcode columns fall back to the first and second column.
    pub fn from_headers(headers: &StringRecord) -> Result<Self, AddressLoadError> {
        let lower: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
        let find = |names: &[&str]| -> Option<usize> {
            names.iter().find_map(|name| lower.iter().position(|h| h == name))
        };
        let fallback = |idx: usize| (idx < lower.len()).then_some(idx);

        let lat = find(&["lat", "latitude"]);
        let lng = find(&["lng", "lon", "longitude"]);
        let (lat, lng) = match (lat, lng) {
            (Some(lat), Some(lng)) => (lat, lng),
            _ => return Err(AddressLoadError::MissingCoordinateColumns),
        };

        Ok(Self {
            address: find(&["adres", "address", "weergavenaam"]).or_else(|| fallback(0)),
            postcode: find(&["postcode"]).or_else(|| fallback(1)),
            lat,
            lng,
            house_number: find(&["huisnummer", "huis_nlt"]),
            town: find(&["woonplaats", "woonplaatsnaam"]),
            object_type: find(&["objecttype"]),
        })
    }

    /// Build an address from one row. `None` when the coordinates do not parse.
    fn address_from(&self, record: &StringRecord) -> Option<Address> {
        let lat = parse_coordinate(record.get(self.lat))?;
        let lng = parse_coordinate(record.get(self.lng))?;
        let field = |col: Option<usize>| col.and_then(|c| record.get(c)).unwrap_or("").to_string();

        let object_type = match self.object_type.and_then(|c| record.get(c)) {
            Some(raw) if !raw.trim().is_empty() => raw.parse::<ObjectType>().unwrap_or_else(|e| {
                debug!("{}, treating as dwelling", e);
                ObjectType::Dwelling
            }),
            _ => ObjectType::Dwelling,
        };

        Some(Address {
            address: field(self.address),
            postcode: field(self.postcode),
            house_number: field(self.house_number),
            town: field(self.town),
            object_type,
            position: GeoPoint::new(lat, lng),
        })
    }
}

fn parse_coordinate(raw: Option<&str>) -> Option<f64> {
    let value: f64 = raw?.trim().parse().ok()?;
    (!value.is_nan()).then_some(value)
}

/// Parse address CSV text from any reader. Rows with unusable coordinates are
/// skipped. Malformed rows are skipped too, unless nothing at all could be read.
pub fn parse_addresses<R: Read>(input: R) -> Result<Vec<Address>, AddressLoadError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(input);

    let columns = ColumnMap::from_headers(reader.headers()?)?;

    let mut addresses = Vec::new();
    let mut first_error: Option<csv::Error> = None;
    let mut skipped = 0usize;

    for result in reader.records() {
        match result {
            Ok(record) => match columns.address_from(&record) {
                Some(address) => addresses.push(address),
                None => skipped += 1,
            },
            Err(e) => {
                warn!("Skipping malformed CSV row: {}", e);
                first_error.get_or_insert(e);
            }
        }
    }

    if addresses.is_empty() {
        if let Some(e) = first_error {
            return Err(AddressLoadError::CsvError(e));
        }
    }

    if skipped > 0 {
        debug!(skipped, "rows without valid coordinates skipped");
    }
    Ok(addresses)
}

pub fn load_addresses(csv_path: impl AsRef<Path>) -> Result<Vec<Address>, AddressLoadError> {
    let _timing = logging::start_timing("load_addresses",
        OperationCategory::FileIO { subcategory: FileIOType::DataLoad });

    let file = File::open(csv_path.as_ref())?;
    let addresses = parse_addresses(file)?;
    info!(path = %csv_path.as_ref().display(), count = addresses.len(), "loaded addresses");
    Ok(addresses)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_aliases_case_insensitively() {
        let csv = "Weergavenaam,Postcode,HUIS_NLT,WoonplaatsNaam,ObjectType,Latitude,Lon\n\
                   \"Kade 3, Hoorn\",1621AB,3,Hoorn,ligplaats,52.64,5.06\n";
        let addresses = parse_addresses(csv.as_bytes()).expect("valid csv");
        assert_eq!(addresses.len(), 1);
        let a = &addresses[0];
        assert_eq!(a.address, "Kade 3, Hoorn");
        assert_eq!(a.house_number, "3");
        assert_eq!(a.town, "Hoorn");
        assert_eq!(a.object_type, ObjectType::HouseboatBerth);
        assert_eq!(a.position, GeoPoint::new(52.64, 5.06));
    }

    #[test]
    fn falls_back_to_first_columns() {
        let csv = "naam,pc,lat,lng\nDorpsstraat 1,1234AB,52.0,5.0\n";
        let addresses = parse_addresses(csv.as_bytes()).expect("valid csv");
        assert_eq!(addresses[0].address, "Dorpsstraat 1");
        assert_eq!(addresses[0].postcode, "1234AB");
        assert_eq!(addresses[0].object_type, ObjectType::Dwelling);
    }

    #[test]
    fn missing_coordinate_columns_is_an_error() {
        let csv = "adres,postcode,x,y\nA,1234AB,1,2\n";
        assert!(matches!(parse_addresses(csv.as_bytes()), Err(AddressLoadError::MissingCoordinateColumns)));
    }

    #[test]
    fn rows_with_bad_coordinates_are_skipped() {
        let csv = "adres,postcode,lat,lng\nA,1,52.0,5.0\nB,2,,5.0\nC,3,NaN,5.0\nD,4,abc,5.0\n\nE,5,52.1,5.1\n";
        let keys: Vec<String> = parse_addresses(csv.as_bytes())
            .expect("valid csv")
            .into_iter()
            .map(|a| a.address)
            .collect();
        assert_eq!(keys, vec!["A", "E"]);
    }

    #[test]
    fn unknown_object_type_defaults_to_dwelling() {
        let csv = "adres,postcode,objecttype,lat,lng\nA,1,kantoor,52.0,5.0\nB,2,03,52.0,5.0\n";
        let addresses = parse_addresses(csv.as_bytes()).expect("valid csv");
        assert_eq!(addresses[0].object_type, ObjectType::Dwelling);
        assert_eq!(addresses[1].object_type, ObjectType::Pitch);
    }
}
