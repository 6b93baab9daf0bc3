//! HTTP implementation of the text-generation capability.
//!
//! One client speaks to whichever provider the configuration names. Request
//! and response handling per provider:
//!
//! - `openai` — chat completions with a named `json_schema` response format.
//! - `anthropic` — messages API; the schema travels in the system prompt
//!   since the API has no schema-constrained output mode.
//! - `ollama` — `/api/chat` with the schema passed as the `format` field.
//!
//! A single failed call surfaces immediately. No retries, no backoff.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use sayara_core::config::{LlmConfig, LlmProvider};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use tracing::debug;

use crate::generate::{GenerationError, GenerationRequest, StructuredGenerator};

const OPENAI_DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const ANTHROPIC_DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const ANTHROPIC_MAX_TOKENS: u32 = 1024;
const ERROR_DETAIL_LIMIT: usize = 600;

pub struct GenerationClient {
    http: reqwest::Client,
    provider: LlmProvider,
    api_key: Option<SecretString>,
    base_url: Option<String>,
    model: String,
}

impl GenerationClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self, GenerationError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| {
                GenerationError::Transport(format!("could not build http client: {error}"))
            })?;

        Ok(Self {
            http,
            provider: config.provider,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        match self.provider {
            LlmProvider::OpenAi => {
                let base = self.base_url.as_deref().unwrap_or(OPENAI_DEFAULT_BASE_URL);
                format!("{}/chat/completions", base.trim_end_matches('/'))
            }
            LlmProvider::Anthropic => {
                let base = self.base_url.as_deref().unwrap_or(ANTHROPIC_DEFAULT_BASE_URL);
                format!("{}/v1/messages", base.trim_end_matches('/'))
            }
            // Config validation guarantees a base_url for ollama.
            LlmProvider::Ollama => {
                let base = self.base_url.as_deref().unwrap_or_default();
                format!("{}/api/chat", base.trim_end_matches('/'))
            }
        }
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let api_key = self.api_key.as_ref().map(|key| key.expose_secret().to_string());
        match self.provider {
            LlmProvider::OpenAi => {
                if let Some(key) = api_key {
                    if let Ok(value) = HeaderValue::from_str(&format!("Bearer {key}")) {
                        headers.insert(AUTHORIZATION, value);
                    }
                }
            }
            LlmProvider::Anthropic => {
                if let Some(key) = api_key {
                    if let Ok(value) = HeaderValue::from_str(&key) {
                        headers.insert("x-api-key", value);
                    }
                }
                headers.insert("anthropic-version", HeaderValue::from_static(ANTHROPIC_VERSION));
            }
            LlmProvider::Ollama => {}
        }

        headers
    }

    fn request_body(&self, request: &GenerationRequest<'_>) -> Value {
        match self.provider {
            LlmProvider::OpenAi => openai_request_body(
                &self.model,
                request.instructions,
                request.schema_name,
                request.output_schema,
            ),
            LlmProvider::Anthropic => {
                anthropic_request_body(&self.model, request.instructions, request.output_schema)
            }
            LlmProvider::Ollama => {
                ollama_request_body(&self.model, request.instructions, request.output_schema)
            }
        }
    }
}

#[async_trait]
impl StructuredGenerator for GenerationClient {
    async fn generate(
        &self,
        request: GenerationRequest<'_>,
    ) -> Result<Value, GenerationError> {
        let url = self.endpoint();
        let body = self.request_body(&request);

        debug!(
            event_name = "assistant.generate.request",
            provider = ?self.provider,
            model = %self.model,
            schema = request.schema_name,
            "dispatching structured generation call"
        );

        let response = self
            .http
            .post(&url)
            .headers(self.headers())
            .json(&body)
            .send()
            .await
            .map_err(|error| GenerationError::Transport(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api {
                status: status.as_u16(),
                detail: truncate_detail(&detail),
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|error| GenerationError::Transport(error.to_string()))?;

        let content = extract_content(self.provider, &payload)?;
        parse_structured(content)
    }
}

pub(crate) fn openai_request_body(
    model: &str,
    instructions: &str,
    schema_name: &str,
    schema: &Value,
) -> Value {
    json!({
        "model": model,
        "messages": [{"role": "user", "content": instructions}],
        "response_format": {
            "type": "json_schema",
            "json_schema": {
                "name": schema_name,
                "schema": schema,
                "strict": true,
            }
        },
    })
}

pub(crate) fn anthropic_request_body(model: &str, instructions: &str, schema: &Value) -> Value {
    let system = format!(
        "Respond with ONLY valid JSON (no markdown, no explanation) matching this schema:\n{}",
        serde_json::to_string_pretty(schema).unwrap_or_default()
    );

    json!({
        "model": model,
        "max_tokens": ANTHROPIC_MAX_TOKENS,
        "system": system,
        "messages": [{"role": "user", "content": instructions}],
    })
}

pub(crate) fn ollama_request_body(model: &str, instructions: &str, schema: &Value) -> Value {
    json!({
        "model": model,
        "messages": [{"role": "user", "content": instructions}],
        "stream": false,
        "format": schema,
    })
}

/// Pulls the generated text out of the provider-specific response envelope.
pub(crate) fn extract_content(
    provider: LlmProvider,
    payload: &Value,
) -> Result<&str, GenerationError> {
    let content = match provider {
        LlmProvider::OpenAi => payload
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str),
        LlmProvider::Anthropic => payload.pointer("/content/0/text").and_then(Value::as_str),
        LlmProvider::Ollama => payload.pointer("/message/content").and_then(Value::as_str),
    };

    content.ok_or_else(|| {
        GenerationError::MalformedOutput("response envelope carried no text content".to_string())
    })
}

/// Parses the generated text as a JSON object, tolerating markdown fences.
pub(crate) fn parse_structured(content: &str) -> Result<Value, GenerationError> {
    let stripped = strip_code_fences(content);
    let value: Value = serde_json::from_str(stripped.trim())
        .map_err(|error| GenerationError::MalformedOutput(error.to_string()))?;

    if !value.is_object() {
        return Err(GenerationError::MalformedOutput(
            "generated JSON was not an object".to_string(),
        ));
    }

    Ok(value)
}

fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn truncate_detail(detail: &str) -> String {
    if detail.len() <= ERROR_DETAIL_LIMIT {
        return detail.to_string();
    }
    let mut cut = ERROR_DETAIL_LIMIT;
    while !detail.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &detail[..cut])
}

#[cfg(test)]
mod tests {
    use sayara_core::config::LlmProvider;
    use serde_json::json;

    use super::{
        anthropic_request_body, extract_content, ollama_request_body, openai_request_body,
        parse_structured,
    };
    use crate::generate::GenerationError;

    fn schema() -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {"suggestedMessage": {"type": "string"}},
            "required": ["suggestedMessage"],
        })
    }

    #[test]
    fn openai_body_names_the_schema() {
        let body = openai_request_body("gpt-4o-mini", "negotiate", "negotiation_reply", &schema());
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["response_format"]["type"], "json_schema");
        assert_eq!(body["response_format"]["json_schema"]["name"], "negotiation_reply");
        assert_eq!(
            body["response_format"]["json_schema"]["schema"]["required"][0],
            "suggestedMessage"
        );
    }

    #[test]
    fn anthropic_body_embeds_schema_in_system_prompt() {
        let body = anthropic_request_body("claude-sonnet", "negotiate", &schema());
        let system = body["system"].as_str().expect("system prompt");
        assert!(system.contains("suggestedMessage"));
        assert_eq!(body["messages"][0]["content"], "negotiate");
    }

    #[test]
    fn ollama_body_passes_schema_as_format() {
        let body = ollama_request_body("llama3.1", "negotiate", &schema());
        assert_eq!(body["stream"], false);
        assert_eq!(body["format"]["type"], "object");
    }

    #[test]
    fn extracts_content_per_provider_envelope() {
        let openai = json!({"choices": [{"message": {"content": "{\"a\":1}"}}]});
        let anthropic = json!({"content": [{"type": "text", "text": "{\"a\":1}"}]});
        let ollama = json!({"message": {"role": "assistant", "content": "{\"a\":1}"}});

        assert_eq!(extract_content(LlmProvider::OpenAi, &openai).expect("openai"), "{\"a\":1}");
        assert_eq!(
            extract_content(LlmProvider::Anthropic, &anthropic).expect("anthropic"),
            "{\"a\":1}"
        );
        assert_eq!(extract_content(LlmProvider::Ollama, &ollama).expect("ollama"), "{\"a\":1}");
    }

    #[test]
    fn missing_content_is_malformed_output() {
        let empty = json!({"choices": []});
        let error = extract_content(LlmProvider::OpenAi, &empty).expect_err("no content");
        assert!(matches!(error, GenerationError::MalformedOutput(_)));
    }

    #[test]
    fn parses_plain_and_fenced_json() {
        let plain = parse_structured(r#"{"suggestedMessage": "Offer 19500."}"#).expect("plain");
        assert_eq!(plain["suggestedMessage"], "Offer 19500.");

        let fenced =
            parse_structured("```json\n{\"suggestedMessage\": \"Offer 19500.\"}\n```").expect("fenced");
        assert_eq!(fenced["suggestedMessage"], "Offer 19500.");
    }

    #[test]
    fn non_object_output_is_rejected() {
        assert!(matches!(
            parse_structured("[1, 2, 3]"),
            Err(GenerationError::MalformedOutput(_))
        ));
        assert!(matches!(
            parse_structured("not json at all"),
            Err(GenerationError::MalformedOutput(_))
        ));
    }
}
