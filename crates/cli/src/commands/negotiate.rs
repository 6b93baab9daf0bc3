use std::sync::Arc;

use sayara_assistant::{GenerationClient, NegotiationAssistant};
use sayara_core::config::{AppConfig, LoadOptions};
use sayara_core::domain::negotiation::{NegotiationRequest, NegotiationRole};
use sayara_core::errors::ApplicationError;
use serde::Serialize;

use crate::commands::CommandResult;
use crate::NegotiateArgs;

#[derive(Debug, Serialize)]
struct NegotiateOutput {
    command: &'static str,
    status: &'static str,
    role: &'static str,
    suggested_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    proposed_price: Option<rust_decimal::Decimal>,
}

pub fn run(args: NegotiateArgs) -> CommandResult {
    let role = match args.role.trim().to_ascii_lowercase().as_str() {
        "buyer" => NegotiationRole::Buyer,
        "seller" => NegotiationRole::Seller,
        other => {
            return CommandResult::failure(
                "negotiate",
                "input_validation",
                format!("unsupported role `{other}` (expected buyer|seller)"),
                2,
            );
        }
    };

    let request = NegotiationRequest {
        car_description: args.car_description,
        role,
        initial_price: args.initial_price,
        target_price: args.target_price,
        minimum_acceptable_price: args.floor_price,
        buyer_budget: args.budget,
        history: Vec::new(),
    };

    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("negotiate", "config_validation", error.to_string(), 2);
        }
    };

    let reply = match block_on_negotiation(&config, &request) {
        Ok(reply) => reply,
        Err(result) => return result,
    };

    let output = NegotiateOutput {
        command: "negotiate",
        status: "ok",
        role: role.as_str(),
        suggested_message: reply.suggested_message,
        proposed_price: reply.proposed_price,
    };

    match serde_json::to_string_pretty(&output) {
        Ok(rendered) => CommandResult { exit_code: 0, output: rendered },
        Err(error) => CommandResult::failure("negotiate", "serialization", error.to_string(), 1),
    }
}

fn block_on_negotiation(
    config: &AppConfig,
    request: &NegotiationRequest,
) -> Result<sayara_core::domain::negotiation::NegotiationReply, CommandResult> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| {
            CommandResult::failure(
                "negotiate",
                "runtime",
                format!("failed to initialize async runtime: {error}"),
                1,
            )
        })?;

    runtime.block_on(async {
        let generator = GenerationClient::from_config(&config.llm)
            .map_err(|error| failure_for(ApplicationError::from(error)))?;
        let assistant =
            NegotiationAssistant::new(Arc::new(generator)).map_err(failure_for)?;
        assistant.negotiate(request).await.map_err(failure_for)
    })
}

fn failure_for(error: ApplicationError) -> CommandResult {
    match &error {
        ApplicationError::Domain(_) => {
            CommandResult::failure("negotiate", "input_validation", error.to_string(), 2)
        }
        ApplicationError::Generation(_) => {
            CommandResult::failure("negotiate", "generation_unavailable", error.to_string(), 3)
        }
        ApplicationError::Configuration(_) => {
            CommandResult::failure("negotiate", "config_validation", error.to_string(), 2)
        }
    }
}
