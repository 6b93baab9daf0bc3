use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, FieldError};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketInsightQuery {
    pub brand: String,
    pub model: String,
    pub trim: String,
    /// Governorate and area, e.g. `Baghdad, Al-Mansour`.
    pub location: String,
}

impl MarketInsightQuery {
    /// Field presence only. The query is forwarded to the analyst even when
    /// the brand/model/trim combination exists in no reference data.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut fields = Vec::new();
        for (name, value) in [
            ("brand", &self.brand),
            ("model", &self.model),
            ("trim", &self.trim),
            ("location", &self.location),
        ] {
            if value.trim().is_empty() {
                fields.push(FieldError::new(name, format!("{name} is required")));
            }
        }

        if fields.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(fields))
        }
    }
}

/// Descriptive market aggregates as returned by the analyst. The listing
/// count is taken at face value, without lower or upper bound checks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketInsightReport {
    pub active_listings: f64,
    pub high_demand_areas: String,
    pub average_selling_time: String,
    pub supply_demand_ratio: String,
    /// Expected price with a confidence qualifier.
    pub expected_market_price: String,
}
