use std::sync::Arc;

use sayara_core::domain::negotiation::{NegotiationReply, NegotiationRequest};
use sayara_core::errors::ApplicationError;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::generate::{GenerationError, GenerationRequest, StructuredGenerator};
use crate::prompts::PromptLibrary;

const REPLY_SCHEMA_NAME: &str = "negotiation_reply";

/// Output shape the generator must produce. Field names are the wire
/// contract with the model, not the crate's own naming.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NegotiationReplyWire {
    suggested_message: String,
    #[serde(default)]
    new_price: Option<rust_decimal::Decimal>,
}

fn reply_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "suggestedMessage": {
                "type": "string",
                "description": "The message to suggest for the next negotiation turn."
            },
            "newPrice": {
                "type": "number",
                "description": "The suggested new price for the car, when one applies."
            }
        },
        "required": ["suggestedMessage"],
        "additionalProperties": false,
    })
}

/// Stateless negotiation coach. Each call receives the caller-held
/// transcript and returns exactly one reply; overlapping calls for the same
/// conversation are the caller's problem to serialize.
pub struct NegotiationAssistant {
    generator: Arc<dyn StructuredGenerator>,
    prompts: PromptLibrary,
}

impl NegotiationAssistant {
    pub fn new(generator: Arc<dyn StructuredGenerator>) -> Result<Self, ApplicationError> {
        let prompts = PromptLibrary::new().map_err(|error| {
            ApplicationError::Configuration(format!("prompt templates failed to compile: {error}"))
        })?;
        Ok(Self { generator, prompts })
    }

    pub async fn negotiate(
        &self,
        request: &NegotiationRequest,
    ) -> Result<NegotiationReply, ApplicationError> {
        request.validate()?;

        let instructions = self.prompts.render_negotiation(request).map_err(|error| {
            ApplicationError::Configuration(format!("prompt render failed: {error}"))
        })?;
        let schema = reply_schema();

        let raw = self
            .generator
            .generate(GenerationRequest {
                instructions: &instructions,
                schema_name: REPLY_SCHEMA_NAME,
                output_schema: &schema,
            })
            .await?;

        let reply = decode_reply(raw)?;
        info!(
            event_name = "assistant.negotiation.reply",
            role = request.role.as_str(),
            turns = request.history.len(),
            proposed_price = reply.proposed_price.is_some(),
            "negotiation reply generated"
        );
        Ok(reply)
    }
}

fn decode_reply(raw: Value) -> Result<NegotiationReply, GenerationError> {
    let wire: NegotiationReplyWire = serde_json::from_value(raw)
        .map_err(|error| GenerationError::MalformedOutput(error.to_string()))?;

    if wire.suggested_message.trim().is_empty() {
        return Err(GenerationError::MalformedOutput(
            "suggested message was empty".to_string(),
        ));
    }

    Ok(NegotiationReply {
        suggested_message: wire.suggested_message,
        proposed_price: wire.new_price,
    })
}
