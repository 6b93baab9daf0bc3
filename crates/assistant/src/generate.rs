use async_trait::async_trait;
use sayara_core::errors::ApplicationError;
use thiserror::Error;

/// One structured generation call: an instruction block plus the JSON shape
/// the answer must conform to.
#[derive(Clone, Debug)]
pub struct GenerationRequest<'a> {
    pub instructions: &'a str,
    /// Short identifier for the output shape, surfaced to providers that
    /// name their response schemas.
    pub schema_name: &'a str,
    pub output_schema: &'a serde_json::Value,
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("text generation transport failed: {0}")]
    Transport(String),
    #[error("text generation service returned status {status}: {detail}")]
    Api { status: u16, detail: String },
    #[error("generated output did not match the expected shape: {0}")]
    MalformedOutput(String),
}

impl From<GenerationError> for ApplicationError {
    fn from(value: GenerationError) -> Self {
        ApplicationError::Generation(value.to_string())
    }
}

/// The text-generation collaborator. One shot per call: no retries, no
/// streaming, no session state. Callers bound the call with the client's
/// configured timeout.
#[async_trait]
pub trait StructuredGenerator: Send + Sync {
    async fn generate(
        &self,
        request: GenerationRequest<'_>,
    ) -> Result<serde_json::Value, GenerationError>;
}
