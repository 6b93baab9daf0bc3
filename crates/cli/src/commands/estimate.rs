use chrono::{Datelike, Utc};
use sayara_core::catalog::InMemoryCatalog;
use sayara_core::domain::car::{CarAttributes, FuelType};
use sayara_core::errors::DomainError;
use sayara_core::estimate::{MarketEstimator, PriceEstimate, PriceEstimator};
use serde::Serialize;

use crate::commands::CommandResult;
use crate::EstimateArgs;

#[derive(Debug, Serialize)]
struct EstimateOutput {
    command: &'static str,
    status: &'static str,
    as_of_year: i32,
    car: String,
    #[serde(flatten)]
    estimate: PriceEstimate,
}

pub fn run(args: EstimateArgs) -> CommandResult {
    let fuel_type = match parse_fuel(&args.fuel) {
        Ok(fuel_type) => fuel_type,
        Err(message) => return CommandResult::failure("estimate", "input_validation", message, 2),
    };

    let attrs = CarAttributes {
        brand: args.brand,
        model: args.model,
        trim: args.trim,
        year: args.year,
        mileage_km: args.mileage,
        fuel_type,
        cylinders: args.cylinders,
        origin: args.origin,
        color: args.color,
        paint_condition: args.paint_condition,
        notes: args.notes,
    };

    let catalog = InMemoryCatalog::seeded();
    let as_of_year = args.as_of_year.unwrap_or_else(|| Utc::now().year());

    if let Err(error) = attrs.validate(&catalog, as_of_year) {
        return CommandResult::failure("estimate", "input_validation", describe(&error), 2);
    }

    let estimator = match args.seed {
        Some(seed) => MarketEstimator::with_seed(seed),
        None => MarketEstimator::new(),
    };
    let estimate = estimator.estimate(&attrs, as_of_year);

    let output = EstimateOutput {
        command: "estimate",
        status: "ok",
        as_of_year,
        car: attrs.describe(),
        estimate,
    };

    match serde_json::to_string_pretty(&output) {
        Ok(rendered) => CommandResult { exit_code: 0, output: rendered },
        Err(error) => CommandResult::failure("estimate", "serialization", error.to_string(), 1),
    }
}

fn parse_fuel(raw: &str) -> Result<FuelType, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "petrol" => Ok(FuelType::Petrol),
        "diesel" => Ok(FuelType::Diesel),
        "hybrid" => Ok(FuelType::Hybrid),
        other => Err(format!("unsupported fuel type `{other}` (expected petrol|diesel|hybrid)")),
    }
}

fn describe(error: &DomainError) -> String {
    let details = error
        .field_errors()
        .iter()
        .map(|field| format!("{}: {}", field.field, field.message))
        .collect::<Vec<_>>();

    if details.is_empty() {
        error.to_string()
    } else {
        details.join("; ")
    }
}
