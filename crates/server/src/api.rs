//! JSON API surface.
//!
//! - `POST /api/v1/estimates`      — price estimate for submitted attributes
//! - `POST /api/v1/negotiations`   — next suggested negotiation message
//! - `POST /api/v1/insights`       — market insight report
//! - `GET  /api/v1/catalog`        — brand/model/trim tree + governorates
//! - `GET  /api/v1/listings`       — filtered listing search
//! - `GET  /api/v1/listings/{id}`  — single listing

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{Datelike, Utc};
use sayara_core::catalog::{Brand, CatalogProvider};
use sayara_core::domain::car::CarAttributes;
use sayara_core::domain::insight::{MarketInsightQuery, MarketInsightReport};
use sayara_core::domain::negotiation::{NegotiationReply, NegotiationRequest};
use sayara_core::errors::{ApplicationError, FieldError, InterfaceError};
use sayara_core::estimate::{PriceEstimate, PriceEstimator};
use sayara_core::listings::{Listing, ListingFilter};
use serde::Serialize;
use tracing::{error, warn};
use uuid::Uuid;

use crate::bootstrap::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/estimates", post(estimate))
        .route("/api/v1/negotiations", post(negotiate))
        .route("/api/v1/insights", post(insights))
        .route("/api/v1/catalog", get(catalog))
        .route("/api/v1/listings", get(search_listings))
        .route("/api/v1/listings/{id}", get(get_listing))
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
    pub correlation_id: String,
}

type ErrorResponse = (StatusCode, Json<ErrorBody>);

fn fail(error: ApplicationError, correlation_id: Uuid) -> ErrorResponse {
    let interface = error.into_interface(correlation_id.to_string());
    let user_message = interface.user_message().to_string();

    match interface {
        InterfaceError::BadRequest { message, fields, correlation_id } => {
            warn!(
                event_name = "api.request.rejected",
                correlation_id = %correlation_id,
                detail = %message,
                "request failed validation"
            );
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    error: "bad_request",
                    message: user_message,
                    fields,
                    correlation_id,
                }),
            )
        }
        InterfaceError::ServiceUnavailable { message, correlation_id } => {
            error!(
                event_name = "api.generation.unavailable",
                correlation_id = %correlation_id,
                detail = %message,
                "text generation collaborator failed"
            );
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorBody {
                    error: "service_unavailable",
                    message: user_message,
                    fields: Vec::new(),
                    correlation_id,
                }),
            )
        }
        InterfaceError::Internal { message, correlation_id } => {
            error!(
                event_name = "api.internal_error",
                correlation_id = %correlation_id,
                detail = %message,
                "request failed internally"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: "internal",
                    message: user_message,
                    fields: Vec::new(),
                    correlation_id,
                }),
            )
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    pub as_of_year: i32,
    #[serde(flatten)]
    pub estimate: PriceEstimate,
}

pub async fn estimate(
    State(state): State<AppState>,
    Json(attrs): Json<CarAttributes>,
) -> Result<Json<EstimateResponse>, ErrorResponse> {
    let correlation_id = Uuid::new_v4();
    let as_of_year = Utc::now().year();

    attrs
        .validate(state.catalog.as_ref(), as_of_year)
        .map_err(|error| fail(error.into(), correlation_id))?;

    let estimate = state.estimator.estimate(&attrs, as_of_year);
    Ok(Json(EstimateResponse { as_of_year, estimate }))
}

pub async fn negotiate(
    State(state): State<AppState>,
    Json(request): Json<NegotiationRequest>,
) -> Result<Json<NegotiationReply>, ErrorResponse> {
    let correlation_id = Uuid::new_v4();
    let reply = state
        .negotiation
        .negotiate(&request)
        .await
        .map_err(|error| fail(error, correlation_id))?;
    Ok(Json(reply))
}

pub async fn insights(
    State(state): State<AppState>,
    Json(query): Json<MarketInsightQuery>,
) -> Result<Json<MarketInsightReport>, ErrorResponse> {
    let correlation_id = Uuid::new_v4();
    let report =
        state.analyst.lookup(&query).await.map_err(|error| fail(error, correlation_id))?;
    Ok(Json(report))
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub brands: Vec<Brand>,
    pub governorates: Vec<String>,
}

pub async fn catalog(State(state): State<AppState>) -> Json<CatalogResponse> {
    Json(CatalogResponse {
        brands: state.catalog.brands().to_vec(),
        governorates: state.catalog.governorates().to_vec(),
    })
}

pub async fn search_listings(
    State(state): State<AppState>,
    Query(filter): Query<ListingFilter>,
) -> Json<Vec<Listing>> {
    let hits = state.listings.search(&filter).into_iter().cloned().collect();
    Json(hits)
}

pub async fn get_listing(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Listing>, ErrorResponse> {
    match state.listings.get(&id) {
        Some(listing) => Ok(Json(listing.clone())),
        None => {
            let correlation_id = Uuid::new_v4().to_string();
            warn!(
                event_name = "api.listing.not_found",
                correlation_id = %correlation_id,
                listing_id = %id,
                "listing lookup missed"
            );
            Err((
                StatusCode::NOT_FOUND,
                Json(ErrorBody {
                    error: "not_found",
                    message: format!("no listing with id `{id}`"),
                    fields: Vec::new(),
                    correlation_id,
                }),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::extract::{Path, Query, State};
    use axum::http::StatusCode;
    use axum::Json;
    use rust_decimal::Decimal;
    use sayara_assistant::{
        GenerationError, GenerationRequest, MarketAnalyst, NegotiationAssistant,
        StructuredGenerator,
    };
    use sayara_core::catalog::InMemoryCatalog;
    use sayara_core::domain::car::{CarAttributes, FuelType};
    use sayara_core::domain::negotiation::{NegotiationRequest, NegotiationRole};
    use sayara_core::estimate::MarketEstimator;
    use sayara_core::listings::{ListingFilter, ListingStore};
    use serde_json::{json, Value};

    use crate::bootstrap::AppState;

    use super::{estimate, get_listing, negotiate, search_listings};

    struct CannedGenerator {
        response: Result<Value, String>,
    }

    #[async_trait]
    impl StructuredGenerator for CannedGenerator {
        async fn generate(
            &self,
            _request: GenerationRequest<'_>,
        ) -> Result<Value, GenerationError> {
            match &self.response {
                Ok(value) => Ok(value.clone()),
                Err(message) => Err(GenerationError::Transport(message.clone())),
            }
        }
    }

    fn state_with_generator(response: Result<Value, String>) -> AppState {
        let generator = Arc::new(CannedGenerator { response });
        AppState {
            catalog: Arc::new(InMemoryCatalog::seeded()),
            listings: Arc::new(ListingStore::seeded()),
            estimator: Arc::new(MarketEstimator::with_seed(5)),
            negotiation: Arc::new(
                NegotiationAssistant::new(generator.clone()).expect("assistant"),
            ),
            analyst: Arc::new(MarketAnalyst::new(generator).expect("analyst")),
        }
    }

    fn attrs() -> CarAttributes {
        CarAttributes {
            brand: "Toyota".to_string(),
            model: "Camry".to_string(),
            trim: "SE".to_string(),
            year: 2020,
            mileage_km: 60_000,
            fuel_type: FuelType::Petrol,
            cylinders: 4,
            origin: "USA".to_string(),
            color: "Blue".to_string(),
            paint_condition: "No paint".to_string(),
            notes: None,
        }
    }

    #[tokio::test]
    async fn estimate_returns_ordered_rounded_prices() {
        let state = state_with_generator(Ok(json!({})));
        let Json(response) =
            estimate(State(state), Json(attrs())).await.expect("estimate should succeed");

        let hundred = Decimal::from(100);
        assert!(response.estimate.min_price <= response.estimate.average_price);
        assert!(response.estimate.average_price <= response.estimate.max_price);
        assert_eq!(response.estimate.average_price % hundred, Decimal::ZERO);
        assert!((10..=30).contains(&response.estimate.days_to_sell));
    }

    #[tokio::test]
    async fn estimate_rejects_invalid_attributes_with_field_errors() {
        let state = state_with_generator(Ok(json!({})));
        let mut bad = attrs();
        bad.mileage_km = -1;
        bad.brand = String::new();

        let (status, Json(body)) =
            estimate(State(state), Json(bad)).await.expect_err("must be rejected");

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "bad_request");
        let fields = body.fields.iter().map(|field| field.field.as_str()).collect::<Vec<_>>();
        assert!(fields.contains(&"brand"));
        assert!(fields.contains(&"mileage_km"));
    }

    #[tokio::test]
    async fn negotiate_passes_reply_through() {
        let state = state_with_generator(Ok(json!({
            "suggestedMessage": "Meet in the middle at 22500.",
            "newPrice": 22_500,
        })));
        let request = NegotiationRequest {
            car_description: "2020 Toyota Camry XSE".to_string(),
            role: NegotiationRole::Seller,
            initial_price: Decimal::from(24_000),
            target_price: Decimal::from(23_000),
            minimum_acceptable_price: Some(Decimal::from(22_000)),
            buyer_budget: None,
            history: Vec::new(),
        };

        let Json(reply) =
            negotiate(State(state), Json(request)).await.expect("negotiation should succeed");
        assert_eq!(reply.suggested_message, "Meet in the middle at 22500.");
        assert_eq!(reply.proposed_price, Some(Decimal::from(22_500)));
    }

    #[tokio::test]
    async fn generator_outage_maps_to_service_unavailable() {
        let state = state_with_generator(Err("connection refused".to_string()));
        let request = NegotiationRequest {
            car_description: "2020 Toyota Camry XSE".to_string(),
            role: NegotiationRole::Buyer,
            initial_price: Decimal::from(24_000),
            target_price: Decimal::from(22_000),
            minimum_acceptable_price: None,
            buyer_budget: None,
            history: Vec::new(),
        };

        let (status, Json(body)) =
            negotiate(State(state), Json(request)).await.expect_err("must fail");

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.error, "service_unavailable");
        assert!(!body.correlation_id.is_empty());
    }

    #[tokio::test]
    async fn listing_search_and_lookup() {
        let state = state_with_generator(Ok(json!({})));
        let filter =
            ListingFilter { brand: Some("Toyota".to_string()), ..ListingFilter::default() };

        let Json(hits) = search_listings(State(state.clone()), Query(filter)).await;
        assert!(hits.iter().all(|listing| listing.brand == "Toyota"));

        let Json(listing) = get_listing(State(state.clone()), Path("1".to_string()))
            .await
            .expect("seed listing exists");
        assert_eq!(listing.id, "1");

        let (status, _) = get_listing(State(state), Path("999".to_string()))
            .await
            .expect_err("unknown id should miss");
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
