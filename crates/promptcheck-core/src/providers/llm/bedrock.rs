//! Anthropic Messages API on Bedrock (`/model/{id}/invoke`), bearer-token auth.

use super::{ChatClient, GenerationConfig, GenerationError};
use crate::providers::retry::RetryPolicy;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Url;
use serde_json::{json, Value};
use tracing::debug;

pub const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";
pub const API_KEY_ENV: &str = "AWS_BEARER_TOKEN_BEDROCK";

pub struct BedrockClient {
    endpoint: String,
    api_key: Option<String>,
    retry: RetryPolicy,
    client: reqwest::Client,
}

impl BedrockClient {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>, retry: RetryPolicy) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key,
            retry,
            client: reqwest::Client::new(),
        }
    }

    /// `{endpoint}/model/{model_id}/invoke`, with the model id encoded as a single path segment.
    pub fn invoke_url(&self, model_id: &str) -> Result<Url, GenerationError> {
        let mut url = Url::parse(&self.endpoint).map_err(|e| {
            GenerationError::InvalidEndpoint(format!("{}: {}", self.endpoint, e))
        })?;
        url.path_segments_mut()
            .map_err(|()| {
                GenerationError::InvalidEndpoint(format!(
                    "{}: base URL does not support path segments",
                    self.endpoint
                ))
            })?
            .pop_if_empty()
            .extend(["model", model_id, "invoke"]);
        Ok(url)
    }

    async fn invoke_once(&self, url: &str, body: &Value) -> Result<String, GenerationError> {
        let mut request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(body);
        if let Some(key) = &self.api_key {
            request = request.header(AUTHORIZATION, format!("Bearer {}", key));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let raw = response.text().await?;
        let json: Value = serde_json::from_str(&raw)
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;
        extract_text(&json)
    }
}

/// Request body: system prompt plus a single user turn.
pub fn request_body(system_prompt: &str, user_text: &str, config: &GenerationConfig) -> Value {
    json!({
        "anthropic_version": ANTHROPIC_VERSION,
        "max_tokens": config.max_tokens,
        "temperature": config.temperature,
        "system": system_prompt,
        "messages": [
            {
                "role": "user",
                "content": [{ "type": "text", "text": user_text }]
            }
        ],
    })
}

/// Concatenates the `text` segments of `content`, in order, and trims the result.
pub fn extract_text(json: &Value) -> Result<String, GenerationError> {
    let parts = json
        .get("content")
        .and_then(|v| v.as_array())
        .ok_or_else(|| {
            GenerationError::MalformedResponse("response missing `content` array".into())
        })?;

    let text: String = parts
        .iter()
        .filter(|p| p.get("type").and_then(|t| t.as_str()) == Some("text"))
        .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
        .collect();

    let text = text.trim();
    if text.is_empty() {
        return Err(GenerationError::EmptyContent);
    }
    Ok(text.to_string())
}

/// `AWS_BEARER_TOKEN_BEDROCK_<PROFILE>`, upper-cased with `-` and `.` mapped to `_`.
pub fn profile_key_var(profile: &str) -> String {
    format!(
        "{}_{}",
        API_KEY_ENV,
        profile.to_uppercase().replace(['-', '.'], "_")
    )
}

/// First non-blank key among the profile-scoped variable and the generic one.
pub fn api_key_from<F>(profile: Option<&str>, lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let scoped = profile.map(profile_key_var);
    scoped
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(API_KEY_ENV))
        .find_map(|name| lookup(name).filter(|v| !v.trim().is_empty()))
}

/// Bearer key for `profile` from the process environment.
pub fn api_key_from_env(profile: Option<&str>) -> Option<String> {
    api_key_from(profile, |name| std::env::var(name).ok())
}

#[async_trait]
impl ChatClient for BedrockClient {
    async fn send(
        &self,
        system_prompt: &str,
        user_text: &str,
        config: &GenerationConfig,
    ) -> Result<String, GenerationError> {
        let url = self.invoke_url(&config.model_id)?;
        let body = request_body(system_prompt, user_text, config);
        let (url, body) = (url.as_str(), &body);

        self.retry
            .run(|attempt| async move {
                debug!(attempt, url, "invoking model");
                self.invoke_once(url, body).await
            })
            .await
    }

    fn provider_name(&self) -> &'static str {
        "bedrock"
    }
}
