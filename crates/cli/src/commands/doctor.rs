use rust_decimal::Decimal;
use sayara_assistant::PromptLibrary;
use sayara_core::catalog::{CatalogProvider, InMemoryCatalog};
use sayara_core::config::{AppConfig, LoadOptions};
use sayara_core::domain::insight::MarketInsightQuery;
use sayara_core::domain::negotiation::{NegotiationRequest, NegotiationRole};
use sayara_core::listings::ListingStore;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> String {
    let report = build_report();

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                error.to_string().replace('"', "\\\"")
            )
        });
    }

    render_human(&report)
}

fn build_report() -> DoctorReport {
    let checks = vec![check_config(), check_catalog_integrity(), check_prompt_templates()];

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_config() -> DoctorCheck {
    match AppConfig::load(LoadOptions::default()) {
        Ok(_) => DoctorCheck {
            name: "config_validation",
            status: CheckStatus::Pass,
            details: "configuration loaded and validated".to_string(),
        },
        Err(error) => DoctorCheck {
            name: "config_validation",
            status: CheckStatus::Fail,
            details: error.to_string(),
        },
    }
}

fn check_catalog_integrity() -> DoctorCheck {
    let catalog = InMemoryCatalog::seeded();
    let listings = ListingStore::seeded();

    let mut problems = Vec::new();
    if catalog.brands().is_empty() {
        problems.push("catalog has no brands".to_string());
    }
    for brand in catalog.brands() {
        for model in &brand.models {
            if model.trims.is_empty() {
                problems.push(format!("model `{}/{}` has no trims", brand.id, model.id));
            }
        }
    }

    let mut ids = listings.all().iter().map(|listing| listing.id.as_str()).collect::<Vec<_>>();
    let total = ids.len();
    ids.sort_unstable();
    ids.dedup();
    if ids.len() != total {
        problems.push("listing ids are not unique".to_string());
    }

    if problems.is_empty() {
        DoctorCheck {
            name: "catalog_integrity",
            status: CheckStatus::Pass,
            details: format!("{} brands, {} listings", catalog.brands().len(), total),
        }
    } else {
        DoctorCheck {
            name: "catalog_integrity",
            status: CheckStatus::Fail,
            details: problems.join("; "),
        }
    }
}

fn check_prompt_templates() -> DoctorCheck {
    let prompts = match PromptLibrary::new() {
        Ok(prompts) => prompts,
        Err(error) => {
            return DoctorCheck {
                name: "prompt_templates",
                status: CheckStatus::Fail,
                details: format!("templates failed to compile: {error}"),
            };
        }
    };

    let request = NegotiationRequest {
        car_description: "2020 Toyota Camry XSE, 60000 km".to_string(),
        role: NegotiationRole::Buyer,
        initial_price: Decimal::from(24_000),
        target_price: Decimal::from(22_000),
        minimum_acceptable_price: None,
        buyer_budget: Some(Decimal::from(23_000)),
        history: Vec::new(),
    };
    let query = MarketInsightQuery {
        brand: "Toyota".to_string(),
        model: "Camry".to_string(),
        trim: "XSE".to_string(),
        location: "Baghdad".to_string(),
    };

    let negotiation = prompts.render_negotiation(&request);
    let insight = prompts.render_market_insight(&query);

    match (negotiation, insight) {
        (Ok(_), Ok(_)) => DoctorCheck {
            name: "prompt_templates",
            status: CheckStatus::Pass,
            details: "negotiation and market insight templates render".to_string(),
        },
        (negotiation, insight) => {
            let mut problems = Vec::new();
            if let Err(error) = negotiation {
                problems.push(format!("negotiation: {error}"));
            }
            if let Err(error) = insight {
                problems.push(format!("market_insight: {error}"));
            }
            DoctorCheck {
                name: "prompt_templates",
                status: CheckStatus::Fail,
                details: problems.join("; "),
            }
        }
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
        };
        lines.push(format!("[{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}
