use std::sync::Arc;

use sayara_assistant::{GenerationClient, GenerationError, MarketAnalyst, NegotiationAssistant};
use sayara_core::catalog::{CatalogProvider, InMemoryCatalog};
use sayara_core::config::{AppConfig, ConfigError, LoadOptions};
use sayara_core::errors::ApplicationError;
use sayara_core::estimate::{MarketEstimator, PriceEstimator};
use sayara_core::listings::ListingStore;
use thiserror::Error;
use tracing::info;

/// Shared handler state. Everything inside is immutable or internally
/// synchronized, so the whole bundle is cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogProvider>,
    pub listings: Arc<ListingStore>,
    pub estimator: Arc<dyn PriceEstimator>,
    pub negotiation: Arc<NegotiationAssistant>,
    pub analyst: Arc<MarketAnalyst>,
}

pub struct Application {
    pub config: AppConfig,
    pub state: AppState,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("generation client setup failed: {0}")]
    GenerationClient(#[from] GenerationError),
    #[error(transparent)]
    Assistant(#[from] ApplicationError),
}

pub fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config)
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let generator = Arc::new(GenerationClient::from_config(&config.llm)?);
    let state = AppState {
        catalog: Arc::new(InMemoryCatalog::seeded()),
        listings: Arc::new(ListingStore::seeded()),
        estimator: Arc::new(MarketEstimator::new()),
        negotiation: Arc::new(NegotiationAssistant::new(generator.clone())?),
        analyst: Arc::new(MarketAnalyst::new(generator)?),
    };

    info!(
        event_name = "system.bootstrap.ready",
        correlation_id = "bootstrap",
        brands = state.catalog.brands().len(),
        listings = state.listings.all().len(),
        "reference data and engines initialized"
    );

    Ok(Application { config, state })
}
