//! The static listing set behind the market browser.
//!
//! Listings are read-only seed data held in memory; there is no persistence
//! layer behind them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::car::FuelType;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingSpecs {
    pub origin: String,
    pub engine_cylinders: u8,
    pub fuel_type: FuelType,
    pub color: String,
    pub paint_condition: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    pub brand: String,
    pub model: String,
    pub trim: String,
    pub year: i32,
    pub price: Decimal,
    pub market_price: Decimal,
    pub mileage_km: i64,
    pub location: String,
    pub specs: ListingSpecs,
    pub notes: String,
}

/// Browser-side filters, all optional and combined with AND.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ListingFilter {
    pub brand: Option<String>,
    pub model: Option<String>,
    /// Substring match against the listing location, case-insensitive.
    pub location: Option<String>,
    pub max_price: Option<Decimal>,
    pub min_year: Option<i32>,
}

impl ListingFilter {
    pub fn matches(&self, listing: &Listing) -> bool {
        let brand_ok = self
            .brand
            .as_deref()
            .map_or(true, |brand| listing.brand.eq_ignore_ascii_case(brand.trim()));
        let model_ok = self
            .model
            .as_deref()
            .map_or(true, |model| listing.model.eq_ignore_ascii_case(model.trim()));
        let location_ok = self.location.as_deref().map_or(true, |location| {
            listing.location.to_lowercase().contains(&location.trim().to_lowercase())
        });
        let price_ok = self.max_price.map_or(true, |cap| listing.price <= cap);
        let year_ok = self.min_year.map_or(true, |floor| listing.year >= floor);

        brand_ok && model_ok && location_ok && price_ok && year_ok
    }
}

#[derive(Clone, Debug)]
pub struct ListingStore {
    listings: Vec<Listing>,
}

impl ListingStore {
    pub fn new(listings: Vec<Listing>) -> Self {
        Self { listings }
    }

    pub fn seeded() -> Self {
        Self::new(seed_listings())
    }

    pub fn all(&self) -> &[Listing] {
        &self.listings
    }

    pub fn get(&self, id: &str) -> Option<&Listing> {
        self.listings.iter().find(|listing| listing.id == id)
    }

    pub fn search(&self, filter: &ListingFilter) -> Vec<&Listing> {
        self.listings.iter().filter(|listing| filter.matches(listing)).collect()
    }
}

impl Default for ListingStore {
    fn default() -> Self {
        Self::seeded()
    }
}

struct ListingSeed {
    id: &'static str,
    brand: &'static str,
    model: &'static str,
    trim: &'static str,
    year: i32,
    price: i64,
    market_price: i64,
    mileage_km: i64,
    location: &'static str,
    origin: &'static str,
    engine_cylinders: u8,
    fuel_type: FuelType,
    color: &'static str,
    paint_condition: &'static str,
    notes: &'static str,
}

impl ListingSeed {
    fn build(self) -> Listing {
        Listing {
            id: self.id.to_string(),
            brand: self.brand.to_string(),
            model: self.model.to_string(),
            trim: self.trim.to_string(),
            year: self.year,
            price: Decimal::from(self.price),
            market_price: Decimal::from(self.market_price),
            mileage_km: self.mileage_km,
            location: self.location.to_string(),
            specs: ListingSpecs {
                origin: self.origin.to_string(),
                engine_cylinders: self.engine_cylinders,
                fuel_type: self.fuel_type,
                color: self.color.to_string(),
                paint_condition: self.paint_condition.to_string(),
            },
            notes: self.notes.to_string(),
        }
    }
}

fn seed_listings() -> Vec<Listing> {
    let seeds = vec![
        ListingSeed {
            id: "1",
            brand: "Toyota",
            model: "Land Cruiser",
            trim: "VXR",
            year: 2023,
            price: 85_000,
            market_price: 83_500,
            mileage_km: 15_000,
            location: "Baghdad, Al-Mansour",
            origin: "Gulf",
            engine_cylinders: 8,
            fuel_type: FuelType::Petrol,
            color: "White",
            paint_condition: "No paint",
            notes: "Excellent condition, agency maintained. First owner.",
        },
        ListingSeed {
            id: "2",
            brand: "BMW",
            model: "530i",
            trim: "M Sport",
            year: 2022,
            price: 52_000,
            market_price: 53_000,
            mileage_km: 28_000,
            location: "Erbil, Dream City",
            origin: "USA",
            engine_cylinders: 4,
            fuel_type: FuelType::Petrol,
            color: "Black",
            paint_condition: "One panel painted",
            notes: "Clean title, minor cosmetic repair on rear bumper.",
        },
        ListingSeed {
            id: "3",
            brand: "Kia",
            model: "Sportage",
            trim: "EX",
            year: 2021,
            price: 21_500,
            market_price: 22_000,
            mileage_km: 42_000,
            location: "Basra, Al-Jazair",
            origin: "Korea",
            engine_cylinders: 4,
            fuel_type: FuelType::Petrol,
            color: "Gray",
            paint_condition: "No paint",
            notes: "Family car, regularly serviced.",
        },
        ListingSeed {
            id: "4",
            brand: "Toyota",
            model: "Camry",
            trim: "XSE",
            year: 2020,
            price: 24_000,
            market_price: 23_500,
            mileage_km: 60_000,
            location: "Baghdad, Zayouna",
            origin: "USA",
            engine_cylinders: 4,
            fuel_type: FuelType::Hybrid,
            color: "Blue",
            paint_condition: "Two panels painted",
            notes: "Hybrid battery replaced under warranty.",
        },
        ListingSeed {
            id: "5",
            brand: "BMW",
            model: "X6",
            trim: "M60i",
            year: 2023,
            price: 98_000,
            market_price: 96_000,
            mileage_km: 9_000,
            location: "Sulaymaniyah, Bakhtiari",
            origin: "Gulf",
            engine_cylinders: 8,
            fuel_type: FuelType::Petrol,
            color: "Carbon Black",
            paint_condition: "No paint",
            notes: "Still under agency warranty.",
        },
    ];

    seeds.into_iter().map(ListingSeed::build).collect()
}
