// Turbine type catalog - immutable reference data shared by every session
use lazy_static::lazy_static;
use crate::models::turbine::TurbineType;

lazy_static! {
    pub static ref TURBINE_TYPES: Vec<TurbineType> = vec![
        TurbineType::new("Klein (3 MW, 150m tip)", 100.0, 100.0, 3.0),
        TurbineType::new("Middelgroot (4.5 MW, 200m tip)", 120.0, 160.0, 4.5),
        TurbineType::new("Groot (6 MW, 250m tip)", 150.0, 200.0, 6.0),
    ];
}

/// Short size labels used in reports, indexed like [`TURBINE_TYPES`]
pub const TURBINE_SIZE_LABELS: [&str; 3] = ["Klein", "Middelgroot", "Groot"];

pub fn turbine_type(index: usize) -> Option<&'static TurbineType> {
    TURBINE_TYPES.get(index)
}

pub fn size_label(index: usize) -> &'static str {
    TURBINE_SIZE_LABELS.get(index).copied().unwrap_or("Onbekend")
}

pub fn catalog_len() -> usize {
    TURBINE_TYPES.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_tip_heights_match_names() {
        let tips: Vec<f64> = TURBINE_TYPES.iter().map(|t| t.tip_height()).collect();
        assert_eq!(tips, vec![150.0, 200.0, 250.0]);
    }

    #[test]
    fn unknown_index_is_none() {
        assert!(turbine_type(3).is_none());
        assert_eq!(size_label(7), "Onbekend");
    }
}
