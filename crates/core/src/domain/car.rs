use serde::{Deserialize, Serialize};

use crate::catalog::CatalogProvider;
use crate::errors::{DomainError, FieldError};

/// Earliest model year the marketplace accepts.
pub const MIN_MODEL_YEAR: i32 = 1980;

const VALID_CYLINDER_COUNTS: [u8; 3] = [4, 6, 8];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FuelType {
    Petrol,
    Diesel,
    Hybrid,
}

impl FuelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Petrol => "Petrol",
            Self::Diesel => "Diesel",
            Self::Hybrid => "Hybrid",
        }
    }
}

/// A seller-submitted car description. Immutable once constructed; every
/// engine takes it by reference and returns derived values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarAttributes {
    pub brand: String,
    pub model: String,
    pub trim: String,
    pub year: i32,
    /// Odometer reading in kilometers. Signed so that out-of-range input is
    /// representable and rejected by validation instead of at parse time.
    pub mileage_km: i64,
    pub fuel_type: FuelType,
    pub cylinders: u8,
    pub origin: String,
    pub color: String,
    pub paint_condition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CarAttributes {
    /// Validates type/range constraints and the brand/model/trim chain
    /// against the injected catalog. Collects every failing field rather
    /// than stopping at the first.
    pub fn validate(
        &self,
        catalog: &dyn CatalogProvider,
        as_of_year: i32,
    ) -> Result<(), DomainError> {
        let mut fields = Vec::new();

        require_non_empty(&mut fields, "brand", &self.brand);
        require_non_empty(&mut fields, "model", &self.model);
        require_non_empty(&mut fields, "trim", &self.trim);
        require_non_empty(&mut fields, "origin", &self.origin);
        require_non_empty(&mut fields, "color", &self.color);
        require_non_empty(&mut fields, "paint_condition", &self.paint_condition);

        if self.year < MIN_MODEL_YEAR || self.year > as_of_year + 1 {
            fields.push(FieldError::new(
                "year",
                format!("year must be between {MIN_MODEL_YEAR} and {}", as_of_year + 1),
            ));
        }

        if self.mileage_km < 0 {
            fields.push(FieldError::new("mileage_km", "mileage cannot be negative"));
        }

        if !VALID_CYLINDER_COUNTS.contains(&self.cylinders) {
            fields.push(FieldError::new("cylinders", "cylinder count must be 4, 6, or 8"));
        }

        let chain_named = !self.brand.trim().is_empty()
            && !self.model.trim().is_empty()
            && !self.trim.trim().is_empty();
        if chain_named && catalog.resolve(&self.brand, &self.model, &self.trim).is_none() {
            fields.push(FieldError::new(
                "trim",
                format!("unknown combination `{} {} {}`", self.brand, self.model, self.trim),
            ));
        }

        if fields.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(fields))
        }
    }

    /// One-line description used in assistant prompts, e.g.
    /// `2023 Toyota Land Cruiser VXR, 15000 km, Petrol, 8 cylinders, Gulf import, White, No paint`.
    pub fn describe(&self) -> String {
        format!(
            "{} {} {} {}, {} km, {}, {} cylinders, {} import, {}, {}",
            self.year,
            self.brand,
            self.model,
            self.trim,
            self.mileage_km,
            self.fuel_type.as_str(),
            self.cylinders,
            self.origin,
            self.color,
            self.paint_condition,
        )
    }
}

fn require_non_empty(fields: &mut Vec<FieldError>, field: &str, value: &str) {
    if value.trim().is_empty() {
        fields.push(FieldError::new(field, format!("{field} is required")));
    }
}
