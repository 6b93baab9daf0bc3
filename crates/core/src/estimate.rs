//! Price estimation.
//!
//! Min/avg/max are a pure function of the car attributes and the valuation
//! year. Only the days-to-sell figure is drawn from a random source, which
//! is injected so tests can pin the seed.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::domain::car::CarAttributes;

/// Inclusive bounds of the days-to-sell draw.
pub const DAYS_TO_SELL_RANGE: (u32, u32) = (10, 30);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceEstimate {
    pub min_price: Decimal,
    pub average_price: Decimal,
    pub max_price: Decimal,
    pub days_to_sell: u32,
}

pub trait PriceEstimator: Send + Sync {
    fn estimate(&self, attrs: &CarAttributes, as_of_year: i32) -> PriceEstimate;
}

/// Linear-depreciation market estimator. A brand-new car starts at a 40000
/// base, loses 1500 per model year of age and 1 per thousand kilometers.
/// Very old or very high-mileage cars can push the base negative; the
/// figure is surfaced unmodified.
pub struct MarketEstimator {
    rng: Mutex<StdRng>,
}

impl MarketEstimator {
    pub fn new() -> Self {
        Self { rng: Mutex::new(StdRng::from_entropy()) }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self { rng: Mutex::new(StdRng::seed_from_u64(seed)) }
    }
}

impl Default for MarketEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceEstimator for MarketEstimator {
    fn estimate(&self, attrs: &CarAttributes, as_of_year: i32) -> PriceEstimate {
        let mut rng = self.rng.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        estimate_with_rng(attrs, as_of_year, &mut *rng)
    }
}

/// The estimate computation against an explicit random source.
pub fn estimate_with_rng(
    attrs: &CarAttributes,
    as_of_year: i32,
    rng: &mut impl Rng,
) -> PriceEstimate {
    let base = base_price(attrs, as_of_year);
    let (days_min, days_max) = DAYS_TO_SELL_RANGE;

    PriceEstimate {
        min_price: round_to_hundred(base * Decimal::new(85, 2)),
        average_price: round_to_hundred(base),
        max_price: round_to_hundred(base * Decimal::new(115, 2)),
        days_to_sell: rng.gen_range(days_min..=days_max),
    }
}

fn base_price(attrs: &CarAttributes, as_of_year: i32) -> Decimal {
    let age = Decimal::from(as_of_year - attrs.year);
    Decimal::from(40_000) - age * Decimal::from(1_500)
        - Decimal::from(attrs.mileage_km) / Decimal::from(1_000)
}

fn round_to_hundred(value: Decimal) -> Decimal {
    let hundred = Decimal::from(100);
    (value / hundred).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero) * hundred
}
