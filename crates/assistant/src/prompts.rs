//! Instruction templates for the generation flows.
//!
//! Templates are compiled once per library instance. Rendering takes the
//! validated request value itself as context, so the template sees exactly
//! the fields the wire types expose.

use sayara_core::domain::insight::MarketInsightQuery;
use sayara_core::domain::negotiation::NegotiationRequest;
use tera::{Context, Tera};

const NEGOTIATION_TEMPLATE: &str = include_str!("templates/negotiation.txt");
const MARKET_INSIGHT_TEMPLATE: &str = include_str!("templates/market_insight.txt");

const NEGOTIATION: &str = "negotiation";
const MARKET_INSIGHT: &str = "market_insight";

pub struct PromptLibrary {
    tera: Tera,
}

impl PromptLibrary {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_template(NEGOTIATION, NEGOTIATION_TEMPLATE)?;
        tera.add_raw_template(MARKET_INSIGHT, MARKET_INSIGHT_TEMPLATE)?;
        Ok(Self { tera })
    }

    pub fn render_negotiation(&self, request: &NegotiationRequest) -> Result<String, tera::Error> {
        self.tera.render(NEGOTIATION, &Context::from_serialize(request)?)
    }

    pub fn render_market_insight(
        &self,
        query: &MarketInsightQuery,
    ) -> Result<String, tera::Error> {
        self.tera.render(MARKET_INSIGHT, &Context::from_serialize(query)?)
    }
}
