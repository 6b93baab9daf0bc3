use std::sync::Arc;

use sayara_assistant::{GenerationClient, MarketAnalyst};
use sayara_core::config::{AppConfig, LoadOptions};
use sayara_core::domain::insight::{MarketInsightQuery, MarketInsightReport};
use sayara_core::errors::ApplicationError;
use serde::Serialize;

use crate::commands::CommandResult;
use crate::InsightsArgs;

#[derive(Debug, Serialize)]
struct InsightsOutput {
    command: &'static str,
    status: &'static str,
    query: MarketInsightQuery,
    report: MarketInsightReport,
}

pub fn run(args: InsightsArgs) -> CommandResult {
    let query = MarketInsightQuery {
        brand: args.brand,
        model: args.model,
        trim: args.trim,
        location: args.location,
    };

    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("insights", "config_validation", error.to_string(), 2);
        }
    };

    let report = match block_on_lookup(&config, &query) {
        Ok(report) => report,
        Err(result) => return result,
    };

    let output = InsightsOutput { command: "insights", status: "ok", query, report };

    match serde_json::to_string_pretty(&output) {
        Ok(rendered) => CommandResult { exit_code: 0, output: rendered },
        Err(error) => CommandResult::failure("insights", "serialization", error.to_string(), 1),
    }
}

fn block_on_lookup(
    config: &AppConfig,
    query: &MarketInsightQuery,
) -> Result<MarketInsightReport, CommandResult> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| {
            CommandResult::failure(
                "insights",
                "runtime",
                format!("failed to initialize async runtime: {error}"),
                1,
            )
        })?;

    runtime.block_on(async {
        let generator = GenerationClient::from_config(&config.llm)
            .map_err(|error| failure_for(ApplicationError::from(error)))?;
        let analyst = MarketAnalyst::new(Arc::new(generator)).map_err(failure_for)?;
        analyst.lookup(query).await.map_err(failure_for)
    })
}

fn failure_for(error: ApplicationError) -> CommandResult {
    match &error {
        ApplicationError::Domain(_) => {
            CommandResult::failure("insights", "input_validation", error.to_string(), 2)
        }
        ApplicationError::Generation(_) => {
            CommandResult::failure("insights", "generation_unavailable", error.to_string(), 3)
        }
        ApplicationError::Configuration(_) => {
            CommandResult::failure("insights", "config_validation", error.to_string(), 2)
        }
    }
}
