use std::collections::HashMap;
use std::fmt;

use crate::config::constants::{EARTH_RADIUS_M, GRID_CELL_SIZE_DEG, INDEX_MAX_ABS_LAT};
use crate::data::poi::{POI, GeoPoint};

type CellKey = (i64, i64);

/// Lat/lng rectangle, in degrees.
#[derive(Clone, Debug, PartialEq)]
pub struct Boundary {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Boundary {
    /// Smallest rectangle guaranteed to hold every point whose great-circle
    /// distance from `center` is at most `radius`. `None` when no such
    /// rectangle can be drawn without wrapping (poles, antimeridian, huge radii).
    pub fn around(center: &GeoPoint, radius: f64) -> Option<Self> {
        let angular = radius / EARTH_RADIUS_M;
        let d_lat = angular.to_degrees();
        let max_abs_lat = center.lat.abs() + d_lat;
        if !d_lat.is_finite() || max_abs_lat >= INDEX_MAX_ABS_LAT {
            return None;
        }

        // sin(dλ/2) <= sin(d/2R) / cos(φmax) for any point inside the circle
        let ratio = (angular / 2.0).sin() / max_abs_lat.to_radians().cos();
        if ratio >= 1.0 {
            return None;
        }
        let d_lng = (2.0 * ratio.asin()).to_degrees();

        let boundary = Self {
            min_lat: center.lat - d_lat,
            max_lat: center.lat + d_lat,
            min_lng: center.lng - d_lng,
            max_lng: center.lng + d_lng,
        };
        if boundary.min_lng < -180.0 || boundary.max_lng > 180.0 {
            return None;
        }
        Some(boundary)
    }

    pub fn contains_point(&self, point: &GeoPoint) -> bool {
        point.lat >= self.min_lat &&
        point.lat <= self.max_lat &&
        point.lng >= self.min_lng &&
        point.lng <= self.max_lng
    }
}

/// Uniform lat/lng bucket grid over a fixed point set.
///
/// Queries return candidate indices in ascending input order; callers still
/// run the exact distance test. Points the grid cannot reason about (out of
/// range or non-finite coordinates) are returned by every query.
#[derive(Clone)]
pub struct SpatialIndex {
    cell_size: f64,
    cells: HashMap<CellKey, Vec<usize>>,
    unbounded: Vec<usize>,
    len: usize,
}

impl fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("cell_size", &self.cell_size)
            .field("occupied_cells", &self.cells.len())
            .field("unbounded", &self.unbounded.len())
            .field("len", &self.len)
            .finish()
    }
}

impl SpatialIndex {
    pub fn new<P: POI>(points: &[P]) -> Self {
        Self::with_cell_size(points, GRID_CELL_SIZE_DEG)
    }

    pub fn with_cell_size<P: POI>(points: &[P], cell_size: f64) -> Self {
        let mut cells: HashMap<CellKey, Vec<usize>> = HashMap::new();
        let mut unbounded = Vec::new();

        for (i, point) in points.iter().enumerate() {
            let p = point.get_position();
            if p.is_finite() && p.lat.abs() <= 90.0 && p.lng.abs() <= 180.0 {
                cells.entry(cell_key(p, cell_size)).or_default().push(i);
            } else {
                unbounded.push(i);
            }
        }

        Self {
            cell_size,
            cells,
            unbounded,
            len: points.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Indices of every point that may lie within `radius` meters of `center`.
    pub fn candidates(&self, center: &GeoPoint, radius: f64) -> Vec<usize> {
        // Negative or NaN radius matches nothing under `<=`
        if !(radius >= 0.0) || !center.is_finite() {
            return self.unbounded.clone();
        }

        let boundary = match Boundary::around(center, radius) {
            Some(b) => b,
            None => return (0..self.len).collect(),
        };

        let (lat_lo, lng_lo) = cell_key(&GeoPoint::new(boundary.min_lat, boundary.min_lng), self.cell_size);
        let (lat_hi, lng_hi) = cell_key(&GeoPoint::new(boundary.max_lat, boundary.max_lng), self.cell_size);
        let (lat_lo, lng_lo, lat_hi, lng_hi) = (lat_lo - 1, lng_lo - 1, lat_hi + 1, lng_hi + 1);

        let in_range = |key: &CellKey| {
            key.0 >= lat_lo && key.0 <= lat_hi && key.1 >= lng_lo && key.1 <= lng_hi
        };

        let span = ((lat_hi - lat_lo + 1) as u128) * ((lng_hi - lng_lo + 1) as u128);
        let mut found: Vec<usize> = self.unbounded.clone();

        if span > self.cells.len() as u128 {
            for (key, members) in &self.cells {
                if in_range(key) {
                    found.extend_from_slice(members);
                }
            }
        } else {
            for lat_cell in lat_lo..=lat_hi {
                for lng_cell in lng_lo..=lng_hi {
                    if let Some(members) = self.cells.get(&(lat_cell, lng_cell)) {
                        found.extend_from_slice(members);
                    }
                }
            }
        }

        found.sort_unstable();
        found
    }
}

fn cell_key(point: &GeoPoint, cell_size: f64) -> CellKey {
    (
        (point.lat / cell_size).floor() as i64,
        (point.lng / cell_size).floor() as i64,
    )
}
