use std::env;
use std::sync::{Mutex, OnceLock};

use sayara_cli::commands::{doctor, estimate};
use sayara_cli::EstimateArgs;
use serde_json::Value;

fn estimate_args() -> EstimateArgs {
    EstimateArgs {
        brand: "toyota".to_string(),
        model: "camry".to_string(),
        trim: "se".to_string(),
        year: 2020,
        mileage: 60_000,
        fuel: "petrol".to_string(),
        cylinders: 4,
        origin: "USA".to_string(),
        color: "Blue".to_string(),
        paint_condition: "No paint".to_string(),
        notes: None,
        as_of_year: Some(2021),
        seed: Some(9),
    }
}

#[test]
fn estimate_produces_the_known_valuation_vector() {
    with_clean_env(|| {
        let result = estimate::run(estimate_args());
        assert_eq!(result.exit_code, 0, "expected successful estimate: {}", result.output);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "estimate");
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["as_of_year"], 2021);
        assert_eq!(payload["min_price"], "32700");
        assert_eq!(payload["average_price"], "38400");
        assert_eq!(payload["max_price"], "44200");

        let days = payload["days_to_sell"].as_u64().expect("days_to_sell");
        assert!((10..=30).contains(&days));
    });
}

#[test]
fn estimate_is_reproducible_under_a_fixed_seed() {
    with_clean_env(|| {
        let first = parse_payload(&estimate::run(estimate_args()).output);
        let second = parse_payload(&estimate::run(estimate_args()).output);
        assert_eq!(first["days_to_sell"], second["days_to_sell"]);
    });
}

#[test]
fn estimate_rejects_off_catalog_combinations() {
    with_clean_env(|| {
        let mut args = estimate_args();
        args.trim = "vxr".to_string();

        let result = estimate::run(args);
        assert_eq!(result.exit_code, 2, "expected validation failure");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "input_validation");
        assert!(payload["message"].as_str().unwrap_or("").contains("unknown combination"));
    });
}

#[test]
fn estimate_rejects_negative_mileage() {
    with_clean_env(|| {
        let mut args = estimate_args();
        args.mileage = -10;

        let result = estimate::run(args);
        assert_eq!(result.exit_code, 2, "expected validation failure");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "input_validation");
        assert!(payload["message"].as_str().unwrap_or("").contains("mileage"));
    });
}

#[test]
fn doctor_passes_offline_with_default_config() {
    with_clean_env(|| {
        let output = doctor::run(true);
        let payload = parse_payload(&output);

        assert_eq!(payload["overall_status"], "pass", "doctor output: {output}");
        let checks = payload["checks"].as_array().expect("checks array");
        let names = checks
            .iter()
            .map(|check| check["name"].as_str().unwrap_or(""))
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["config_validation", "catalog_integrity", "prompt_templates"]);
        assert!(checks.iter().all(|check| check["status"] == "pass"));
    });
}

fn parse_payload(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|error| panic!("invalid JSON output ({error}): {raw}"))
}

fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

/// Runs `f` with every SAYARA_* variable cleared, restoring the previous
/// values afterwards. Tests touching the environment must go through this.
fn with_clean_env(f: impl FnOnce()) {
    let _guard = env_lock().lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    let saved = env::vars()
        .filter(|(key, _)| key.starts_with("SAYARA_"))
        .collect::<Vec<_>>();
    for (key, _) in &saved {
        env::remove_var(key);
    }

    f();

    for (key, value) in saved {
        env::set_var(key, value);
    }
}
