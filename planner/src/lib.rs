// Module declarations for the wind turbine planner

// Pure geodesy and analysis
pub mod core {
    pub mod geo_distance;
    pub mod conflicts;
    pub mod impact;
    pub mod zones;
    pub mod session;
}

// Configuration modules
pub mod config {
    pub mod constants;
    pub mod settings;
    pub mod turbine_types;
}

// Model definitions
pub mod models {
    pub mod turbine;
    pub mod address;
    pub mod zone;
    pub mod configuration;
}

// Data loaders and external sources
pub mod data {
    pub mod poi;
    pub mod address_loader;
    pub mod config_store;
    pub mod pdok;
}

// Summaries and console reports
pub mod analysis {
    pub mod summary;
    pub mod reporting;
}

// Utility functions
pub mod utils {
    pub mod spatial_index;
    pub mod logging;
    pub mod csv_export;
}

// CLI interface
pub mod cli {
    pub mod cli;
}

// Re-export commonly used items
pub use crate::core::session::TurbineSession;
pub use crate::data::poi::{GeoPoint, POI};
pub use crate::models::address::{Address, AffectedAddress};
pub use crate::models::configuration::Configuration;
pub use crate::models::turbine::{Turbine, TurbineRef, TurbineType};
pub use crate::models::zone::DistanceZone;
