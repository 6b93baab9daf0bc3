use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use sayara_core::catalog::CatalogProvider;
use serde::Serialize;

use crate::bootstrap::AppState;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub reference_data: HealthCheck,
    pub checked_at: String,
}

pub fn router(state: AppState) -> Router {
    Router::new().route("/health", get(health)).with_state(state)
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let reference_data = reference_data_check(&state);
    let ready = reference_data.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "sayara-server runtime initialized".to_string(),
        },
        reference_data,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

fn reference_data_check(state: &AppState) -> HealthCheck {
    let brands = state.catalog.brands().len();
    let listings = state.listings.all().len();

    if brands == 0 || listings == 0 {
        return HealthCheck {
            status: "degraded",
            detail: format!("reference data incomplete: {brands} brands, {listings} listings"),
        };
    }

    HealthCheck { status: "ready", detail: format!("{brands} brands, {listings} listings loaded") }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::Json;
    use sayara_assistant::{
        GenerationError, GenerationRequest, MarketAnalyst, NegotiationAssistant,
        StructuredGenerator,
    };
    use sayara_core::catalog::InMemoryCatalog;
    use sayara_core::estimate::MarketEstimator;
    use sayara_core::listings::ListingStore;
    use serde_json::Value;

    use crate::bootstrap::AppState;

    use super::health;

    struct SilentGenerator;

    #[async_trait]
    impl StructuredGenerator for SilentGenerator {
        async fn generate(
            &self,
            _request: GenerationRequest<'_>,
        ) -> Result<Value, GenerationError> {
            Err(GenerationError::Transport("not wired in tests".to_string()))
        }
    }

    fn state(listings: ListingStore) -> AppState {
        let generator = Arc::new(SilentGenerator);
        AppState {
            catalog: Arc::new(InMemoryCatalog::seeded()),
            listings: Arc::new(listings),
            estimator: Arc::new(MarketEstimator::with_seed(1)),
            negotiation: Arc::new(
                NegotiationAssistant::new(generator.clone()).expect("assistant"),
            ),
            analyst: Arc::new(MarketAnalyst::new(generator).expect("analyst")),
        }
    }

    #[tokio::test]
    async fn health_is_ready_with_seeded_reference_data() {
        let (status, Json(payload)) = health(State(state(ListingStore::seeded()))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.status, "ready");
        assert_eq!(payload.reference_data.status, "ready");
        assert_eq!(payload.service.status, "ready");
    }

    #[tokio::test]
    async fn health_degrades_when_reference_data_is_empty() {
        let (status, Json(payload)) = health(State(state(ListingStore::new(Vec::new())))).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(payload.status, "degraded");
        assert_eq!(payload.reference_data.status, "degraded");
    }
}
