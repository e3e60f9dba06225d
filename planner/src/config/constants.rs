// Geodesy
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;       // Mean earth radius used by the haversine model

// Session defaults
pub const DEFAULT_MINIMUM_TURBINE_DISTANCE: f64 = 800.0;
pub const DEFAULT_HINDER_DISTANCE: f64 = 1000.0;

// Hinder distance slider range (meters)
pub const HINDER_DISTANCE_MIN: u32 = 250;
pub const HINDER_DISTANCE_MAX: u32 = 2000;
pub const HINDER_DISTANCE_STEP: u32 = 50;

// Netherlands bounding box used to sanity check geocoded results
pub const NL_MIN_LAT: f64 = 50.0;
pub const NL_MAX_LAT: f64 = 54.0;
pub const NL_MIN_LNG: f64 = 3.0;
pub const NL_MAX_LNG: f64 = 8.0;

// PDOK Locatieserver
pub const PDOK_SEARCH_URL: &str = "https://api.pdok.nl/bzk/locatieserver/search/v3_1/free";
pub const PDOK_TIMEOUT_SECS: u64 = 10;

// Spatial index
pub const GRID_CELL_SIZE_DEG: f64 = 0.01;          // ~1.1km of latitude per cell
pub const INDEX_MAX_ABS_LAT: f64 = 85.0;           // Beyond this the longitude span degenerates

// Report limits
pub const SAMPLE_ADDRESS_COUNT: usize = 10;

// File names
pub const DEFAULT_STORE_FILE: &str = "windturbine_configs.json";
pub const EXPORT_FILE_PREFIX: &str = "windturbine-adressen-binnen-";
pub const CONFIG_EXPORT_PREFIX: &str = "windturbine-";
