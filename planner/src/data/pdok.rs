//! Address lookup against the PDOK Locatieserver.

use std::time::Duration;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::constants::{
    NL_MAX_LAT, NL_MAX_LNG, NL_MIN_LAT, NL_MIN_LNG, PDOK_SEARCH_URL, PDOK_TIMEOUT_SECS,
};
use crate::data::poi::GeoPoint;
use crate::utils::logging::{self, OperationCategory};

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Invalid postcode {0:?} (expected e.g. 1234AB)")]
    InvalidPostcode(String),
    #[error("House number is required")]
    MissingHouseNumber,
    #[error("Address not found")]
    NotFound,
    #[error("Invalid coordinates received from PDOK: {0}")]
    InvalidCoordinates(String),
    #[error("Coordinates ({lat}, {lng}) do not appear to lie in the Netherlands")]
    OutsideNetherlands { lat: f64, lng: f64 },
    #[error("PDOK request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// A geocoded address.
#[derive(Debug, Clone, PartialEq)]
pub struct LookedUpAddress {
    pub position: GeoPoint,
    pub address: String,
    pub postcode: String,
    pub house_number: String,
}

pub trait AddressLookup {
    fn lookup(&self, postcode: &str, house_number: &str) -> Result<LookedUpAddress, LookupError>;
}

#[derive(Debug, Deserialize)]
pub struct PdokSearchResponse {
    pub response: PdokDocs,
}

#[derive(Debug, Deserialize)]
pub struct PdokDocs {
    pub docs: Vec<PdokDoc>,
}

#[derive(Debug, Deserialize)]
pub struct PdokDoc {
    pub weergavenaam: String,
    pub centroide_ll: String,
    #[serde(default)]
    pub postcode: Option<String>,
}

/// Strip whitespace and upper-case, then require four digits and two letters.
pub fn normalize_postcode(raw: &str) -> Result<String, LookupError> {
    let clean: String = raw.chars().filter(|c| !c.is_whitespace()).collect::<String>().to_uppercase();
    let bytes = clean.as_bytes();
    let valid = bytes.len() == 6
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[4..].iter().all(u8::is_ascii_alphabetic);
    if valid {
        Ok(clean)
    } else {
        Err(LookupError::InvalidPostcode(raw.to_string()))
    }
}

/// Parse a WKT `POINT(lng lat)` into a position.
pub fn parse_point(wkt: &str) -> Result<GeoPoint, LookupError> {
    let invalid = || LookupError::InvalidCoordinates(wkt.to_string());
    let inner = wkt
        .trim()
        .strip_prefix("POINT(")
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(invalid)?;

    let mut parts = inner.split(' ').filter(|p| !p.is_empty());
    let lng: f64 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
    let lat: f64 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
    if lat.is_nan() || lng.is_nan() {
        return Err(invalid());
    }
    Ok(GeoPoint::new(lat, lng))
}

/// Take the first hit of a search response and check it lies in the Netherlands.
pub fn resolve_response(
    response: PdokSearchResponse,
    postcode: &str,
    house_number: &str,
) -> Result<LookedUpAddress, LookupError> {
    let doc = response.response.docs.into_iter().next().ok_or(LookupError::NotFound)?;
    let position = parse_point(&doc.centroide_ll)?;

    if position.lat < NL_MIN_LAT || position.lat > NL_MAX_LAT
        || position.lng < NL_MIN_LNG || position.lng > NL_MAX_LNG {
        return Err(LookupError::OutsideNetherlands { lat: position.lat, lng: position.lng });
    }

    Ok(LookedUpAddress {
        position,
        address: doc.weergavenaam,
        postcode: postcode.to_string(),
        house_number: house_number.to_string(),
    })
}

pub struct PdokClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl PdokClient {
    pub fn new() -> Result<Self, LookupError> {
        Self::with_base_url(PDOK_SEARCH_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, LookupError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(PDOK_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }
}

impl AddressLookup for PdokClient {
    fn lookup(&self, postcode: &str, house_number: &str) -> Result<LookedUpAddress, LookupError> {
        let _timing = logging::start_timing("pdok_lookup", OperationCategory::Lookup);

        let postcode = normalize_postcode(postcode)?;
        let house_number = house_number.trim();
        if house_number.is_empty() {
            return Err(LookupError::MissingHouseNumber);
        }

        let query = format!("{} {}", postcode, house_number);
        debug!(%query, "querying PDOK");
        let response: PdokSearchResponse = self.client
            .get(&self.base_url)
            .query(&[("q", query.as_str()), ("fq", "type:adres")])
            .send()?
            .error_for_status()?
            .json()?;

        let found = resolve_response(response, &postcode, house_number)?;
        info!(address = %found.address, lat = found.position.lat, lng = found.position.lng, "address found");
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: &str) -> PdokSearchResponse {
        serde_json::from_str(json).expect("well-formed response")
    }

    #[test]
    fn postcode_is_normalised() {
        assert_eq!(normalize_postcode(" 1621 ab ").expect("valid"), "1621AB");
        assert!(matches!(normalize_postcode("162AB"), Err(LookupError::InvalidPostcode(_))));
        assert!(normalize_postcode("1621A1").is_err());
    }

    #[test]
    fn point_is_lng_then_lat() {
        let p = parse_point("POINT(5.06 52.64)").expect("valid point");
        assert_eq!(p, GeoPoint::new(52.64, 5.06));
        assert!(parse_point("POINT(5.06)").is_err());
        assert!(parse_point("LINESTRING(1 2, 3 4)").is_err());
    }

    #[test]
    fn first_doc_wins() {
        let r = response(r#"{"response": {"docs": [
            {"weergavenaam": "Kade 3, 1621AB Hoorn", "centroide_ll": "POINT(5.06 52.64)", "postcode": "1621AB"},
            {"weergavenaam": "Kade 3A, 1621AB Hoorn", "centroide_ll": "POINT(5.07 52.65)"}
        ]}}"#);
        let found = resolve_response(r, "1621AB", "3").expect("found");
        assert_eq!(found.address, "Kade 3, 1621AB Hoorn");
        assert_eq!(found.house_number, "3");
    }

    #[test]
    fn empty_response_is_not_found() {
        let r = response(r#"{"response": {"docs": []}}"#);
        assert!(matches!(resolve_response(r, "1621AB", "3"), Err(LookupError::NotFound)));
    }

    #[test]
    fn foreign_coordinates_are_rejected() {
        let r = response(r#"{"response": {"docs": [
            {"weergavenaam": "Elders", "centroide_ll": "POINT(13.4 52.5)"}
        ]}}"#);
        assert!(matches!(resolve_response(r, "1621AB", "3"), Err(LookupError::OutsideNetherlands { .. })));
    }
}
