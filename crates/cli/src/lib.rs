pub mod commands;

use clap::{Args, Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "sayara",
    about = "Sayara marketplace CLI",
    long_about = "Run price estimates, negotiation drafts, and market insight lookups against the Sayara engines.",
    after_help = "Examples:\n  sayara estimate --brand toyota --model camry --trim se --year 2020 --mileage 60000\n  sayara insights --brand Toyota --model \"Land Cruiser\" --trim VXR --location Baghdad\n  sayara doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Compute a deterministic price estimate for a car, offline")]
    Estimate(EstimateArgs),
    #[command(about = "Draft an opening negotiation message via the configured text generator")]
    Negotiate(NegotiateArgs),
    #[command(about = "Fetch a market insight report via the configured text generator")]
    Insights(InsightsArgs),
    #[command(about = "Inspect effective configuration values with source attribution and redaction")]
    Config,
    #[command(about = "Run offline readiness checks: config, catalog, prompt templates")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

#[derive(Debug, Args)]
pub struct EstimateArgs {
    #[arg(long)]
    pub brand: String,
    #[arg(long)]
    pub model: String,
    #[arg(long)]
    pub trim: String,
    #[arg(long)]
    pub year: i32,
    #[arg(long, help = "Odometer reading in kilometers")]
    pub mileage: i64,
    #[arg(long, default_value = "petrol", help = "petrol, diesel, or hybrid")]
    pub fuel: String,
    #[arg(long, default_value_t = 4)]
    pub cylinders: u8,
    #[arg(long, default_value = "Gulf")]
    pub origin: String,
    #[arg(long, default_value = "White")]
    pub color: String,
    #[arg(long = "paint", default_value = "No paint")]
    pub paint_condition: String,
    #[arg(long)]
    pub notes: Option<String>,
    #[arg(long, help = "Valuation year; defaults to the current year")]
    pub as_of_year: Option<i32>,
    #[arg(long, help = "Fixed seed for the days-to-sell draw")]
    pub seed: Option<u64>,
}

#[derive(Debug, Args)]
pub struct NegotiateArgs {
    #[arg(long, help = "buyer or seller")]
    pub role: String,
    #[arg(long = "car", help = "One-line car description")]
    pub car_description: String,
    #[arg(long)]
    pub initial_price: rust_decimal::Decimal,
    #[arg(long)]
    pub target_price: rust_decimal::Decimal,
    #[arg(long, help = "Seller floor price")]
    pub floor_price: Option<rust_decimal::Decimal>,
    #[arg(long, help = "Buyer budget")]
    pub budget: Option<rust_decimal::Decimal>,
}

#[derive(Debug, Args)]
pub struct InsightsArgs {
    #[arg(long)]
    pub brand: String,
    #[arg(long)]
    pub model: String,
    #[arg(long)]
    pub trim: String,
    #[arg(long)]
    pub location: String,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Estimate(args) => commands::estimate::run(args),
        Command::Negotiate(args) => commands::negotiate::run(args),
        Command::Insights(args) => commands::insights::run(args),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
