use std::sync::Arc;

use sayara_core::domain::insight::{MarketInsightQuery, MarketInsightReport};
use sayara_core::errors::ApplicationError;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::generate::{GenerationError, GenerationRequest, StructuredGenerator};
use crate::prompts::PromptLibrary;

const REPORT_SCHEMA_NAME: &str = "market_insight_report";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MarketInsightWire {
    active_listings: f64,
    high_demand_areas: String,
    average_selling_time: String,
    supply_demand_ratio: String,
    expected_market_price: String,
}

fn report_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "activeListings": {
                "type": "number",
                "description": "The number of active listings for the specified car type."
            },
            "highDemandAreas": {
                "type": "string",
                "description": "Areas with high demand for the specified car type."
            },
            "averageSellingTime": {
                "type": "string",
                "description": "The average selling time for the specified car type."
            },
            "supplyDemandRatio": {
                "type": "string",
                "description": "The ratio of supply to demand for the specified car type."
            },
            "expectedMarketPrice": {
                "type": "string",
                "description": "The expected market price with confidence indicators."
            }
        },
        "required": [
            "activeListings",
            "highDemandAreas",
            "averageSellingTime",
            "supplyDemandRatio",
            "expectedMarketPrice"
        ],
        "additionalProperties": false,
    })
}

/// Market insight lookup: one templated call per query, forwarded blindly.
/// No caching, no aggregation across calls, and no existence check of the
/// queried combination against any reference data.
pub struct MarketAnalyst {
    generator: Arc<dyn StructuredGenerator>,
    prompts: PromptLibrary,
}

impl MarketAnalyst {
    pub fn new(generator: Arc<dyn StructuredGenerator>) -> Result<Self, ApplicationError> {
        let prompts = PromptLibrary::new().map_err(|error| {
            ApplicationError::Configuration(format!("prompt templates failed to compile: {error}"))
        })?;
        Ok(Self { generator, prompts })
    }

    pub async fn lookup(
        &self,
        query: &MarketInsightQuery,
    ) -> Result<MarketInsightReport, ApplicationError> {
        query.validate()?;

        let instructions = self.prompts.render_market_insight(query).map_err(|error| {
            ApplicationError::Configuration(format!("prompt render failed: {error}"))
        })?;
        let schema = report_schema();

        let raw = self
            .generator
            .generate(GenerationRequest {
                instructions: &instructions,
                schema_name: REPORT_SCHEMA_NAME,
                output_schema: &schema,
            })
            .await?;

        let report = decode_report(raw)?;
        info!(
            event_name = "assistant.insight.report",
            brand = %query.brand,
            model = %query.model,
            "market insight report generated"
        );
        Ok(report)
    }
}

fn decode_report(raw: Value) -> Result<MarketInsightReport, GenerationError> {
    let wire: MarketInsightWire = serde_json::from_value(raw)
        .map_err(|error| GenerationError::MalformedOutput(error.to_string()))?;

    Ok(MarketInsightReport {
        active_listings: wire.active_listings,
        high_demand_areas: wire.high_demand_areas,
        average_selling_time: wire.average_selling_time,
        supply_demand_ratio: wire.supply_demand_ratio,
        expected_market_price: wire.expected_market_price,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use sayara_core::domain::insight::MarketInsightQuery;
    use sayara_core::errors::{ApplicationError, InterfaceError};
    use serde_json::{json, Value};

    use crate::generate::{GenerationError, GenerationRequest, StructuredGenerator};

    use super::MarketAnalyst;

    struct CannedGenerator {
        response: Value,
    }

    #[async_trait]
    impl StructuredGenerator for CannedGenerator {
        async fn generate(
            &self,
            _request: GenerationRequest<'_>,
        ) -> Result<Value, GenerationError> {
            Ok(self.response.clone())
        }
    }

    fn analyst_returning(value: Value) -> MarketAnalyst {
        MarketAnalyst::new(Arc::new(CannedGenerator { response: value }))
            .expect("analyst should construct")
    }

    fn report_json() -> Value {
        json!({
            "activeListings": 37,
            "highDemandAreas": "Al-Mansour, Zayouna",
            "averageSellingTime": "2 to 3 weeks",
            "supplyDemandRatio": "roughly balanced, slight demand surplus",
            "expectedMarketPrice": "around 84000, medium confidence",
        })
    }

    fn query() -> MarketInsightQuery {
        MarketInsightQuery {
            brand: "Toyota".to_string(),
            model: "Land Cruiser".to_string(),
            trim: "VXR".to_string(),
            location: "Baghdad".to_string(),
        }
    }

    #[tokio::test]
    async fn returns_structured_report() {
        let analyst = analyst_returning(report_json());
        let report = analyst.lookup(&query()).await.expect("report");

        assert_eq!(report.active_listings, 37.0);
        assert_eq!(report.average_selling_time, "2 to 3 weeks");
    }

    #[tokio::test]
    async fn unknown_combination_still_yields_a_report() {
        let analyst = analyst_returning(report_json());
        let off_catalog = MarketInsightQuery {
            brand: "Lada".to_string(),
            model: "Niva".to_string(),
            trim: "Base".to_string(),
            location: "Basra".to_string(),
        };

        analyst.lookup(&off_catalog).await.expect("the query is forwarded blindly");
    }

    #[tokio::test]
    async fn listing_count_is_accepted_without_bounds_checks() {
        let mut raw = report_json();
        raw["activeListings"] = json!(-12.5);

        let report = analyst_returning(raw).lookup(&query()).await.expect("report");
        assert_eq!(report.active_listings, -12.5);
    }

    #[tokio::test]
    async fn missing_field_is_service_unavailable() {
        let mut raw = report_json();
        raw.as_object_mut().expect("object").remove("supplyDemandRatio");

        let error = analyst_returning(raw).lookup(&query()).await.expect_err("must fail");
        let interface = error.into_interface("req-2");
        assert!(matches!(interface, InterfaceError::ServiceUnavailable { .. }));
    }

    #[tokio::test]
    async fn blank_query_field_fails_validation_before_generation() {
        let analyst = analyst_returning(report_json());
        let mut input = query();
        input.location = String::new();

        let error = analyst.lookup(&input).await.expect_err("validation must fail");
        assert!(matches!(error, ApplicationError::Domain(_)));
    }
}
