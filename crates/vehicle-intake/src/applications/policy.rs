use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_VEHICLES: usize = 3;
pub const DEFAULT_MINIMUM_AGE_YEARS: u32 = 16;
pub const DEFAULT_EARLIEST_MODEL_YEAR: i32 = 1985;

/// Limits applied during intake validation and vehicle reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakePolicy {
    pub max_vehicles: usize,
    pub minimum_age_years: u32,
    pub earliest_model_year: i32,
}

impl Default for IntakePolicy {
    fn default() -> Self {
        Self {
            max_vehicles: DEFAULT_MAX_VEHICLES,
            minimum_age_years: DEFAULT_MINIMUM_AGE_YEARS,
            earliest_model_year: DEFAULT_EARLIEST_MODEL_YEAR,
        }
    }
}
