pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod estimate;
pub mod listings;

pub use catalog::{Brand, CatalogProvider, InMemoryCatalog, Model, Trim};
pub use domain::car::{CarAttributes, FuelType};
pub use domain::insight::{MarketInsightQuery, MarketInsightReport};
pub use domain::negotiation::{
    NegotiationReply, NegotiationRequest, NegotiationRole, NegotiationTurn, TurnRole,
};
pub use errors::{ApplicationError, DomainError, FieldError, InterfaceError};
pub use estimate::{MarketEstimator, PriceEstimate, PriceEstimator};
pub use listings::{Listing, ListingFilter, ListingSpecs, ListingStore};
