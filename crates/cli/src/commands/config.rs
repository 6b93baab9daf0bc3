use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use sayara_core::config::{AppConfig, LoadOptions};
use secrecy::ExposeSecret;
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    let entries: Vec<(&str, String, Option<&str>)> = vec![
        ("llm.provider", format!("{:?}", config.llm.provider), Some("SAYARA_LLM_PROVIDER")),
        ("llm.model", config.llm.model.clone(), Some("SAYARA_LLM_MODEL")),
        (
            "llm.base_url",
            config.llm.base_url.clone().unwrap_or_else(|| "<unset>".to_string()),
            Some("SAYARA_LLM_BASE_URL"),
        ),
        (
            "llm.api_key",
            config
                .llm
                .api_key
                .as_ref()
                .map(|key| redact_token(key.expose_secret()))
                .unwrap_or_else(|| "<unset>".to_string()),
            Some("SAYARA_LLM_API_KEY"),
        ),
        ("llm.timeout_secs", config.llm.timeout_secs.to_string(), Some("SAYARA_LLM_TIMEOUT_SECS")),
        (
            "server.bind_address",
            config.server.bind_address.clone(),
            Some("SAYARA_SERVER_BIND_ADDRESS"),
        ),
        ("server.port", config.server.port.to_string(), Some("SAYARA_SERVER_PORT")),
        ("logging.level", config.logging.level.clone(), Some("SAYARA_LOGGING_LEVEL")),
        ("logging.format", format!("{:?}", config.logging.format), Some("SAYARA_LOGGING_FORMAT")),
    ];

    for (key, value, env_key) in entries {
        lines.push(render_line(
            key,
            &value,
            field_source(key, env_key, config_file_doc.as_ref(), config_file_path.as_deref()),
        ));
    }

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("sayara.toml"), PathBuf::from("config/sayara.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let raw = fs::read_to_string(path?).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: Option<&str>,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_key {
        if env::var_os(env_key).is_some() {
            return format!("env ({env_key})");
        }
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

fn redact_token(token: &str) -> String {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    if let Some((prefix, _)) = trimmed.split_once('-') {
        return format!("{prefix}-***");
    }

    "<redacted>".to_string()
}
