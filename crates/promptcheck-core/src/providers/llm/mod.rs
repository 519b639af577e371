//! Chat client boundary: the only place the harness talks to the network.

pub mod bedrock;
pub mod fake;

use async_trait::async_trait;

pub use bedrock::BedrockClient;
pub use fake::FakeClient;

/// Generation settings sent with every request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub model_id: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model_id: crate::config::DEFAULT_MODEL_ID.to_string(),
            max_tokens: 220,
            temperature: 0.2,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("request failed: {0}")]
    Network(String),

    #[error("endpoint returned status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("response contained no text content")]
    EmptyContent,

    #[error("invalid endpoint {0}")]
    InvalidEndpoint(String),
}

impl GenerationError {
    /// Stable name used in recorded error markers.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::Network(_) => "NetworkError",
            GenerationError::HttpStatus { .. } => "HttpStatusError",
            GenerationError::MalformedResponse(_) => "MalformedResponse",
            GenerationError::EmptyContent => "EmptyContent",
            GenerationError::InvalidEndpoint(_) => "InvalidEndpoint",
        }
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            GenerationError::MalformedResponse(e.to_string())
        } else {
            GenerationError::Network(e.to_string())
        }
    }
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Sends one system prompt plus one user turn; returns the trimmed reply text.
    async fn send(
        &self,
        system_prompt: &str,
        user_text: &str,
        config: &GenerationConfig,
    ) -> Result<String, GenerationError>;

    fn provider_name(&self) -> &'static str;
}
