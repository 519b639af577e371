use super::{ChatClient, GenerationConfig, GenerationError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const DEFAULT_FAKE_RESPONSE: &str = "Thank you for sharing that. What feels most pressing right now?";

/// Offline client for dry runs and tests. Never touches the network.
#[derive(Debug)]
pub struct FakeClient {
    fixed_response: String,
    /// Inputs containing this substring fail with a network error.
    fail_on: Option<String>,
    calls: AtomicUsize,
}

impl Default for FakeClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeClient {
    pub fn new() -> Self {
        Self {
            fixed_response: DEFAULT_FAKE_RESPONSE.to_string(),
            fail_on: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.fixed_response = response.into();
        self
    }

    pub fn failing_on(mut self, needle: impl Into<String>) -> Self {
        self.fail_on = Some(needle.into());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatClient for FakeClient {
    async fn send(
        &self,
        _system_prompt: &str,
        user_text: &str,
        _config: &GenerationConfig,
    ) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(needle) = &self.fail_on {
            if user_text.contains(needle.as_str()) {
                return Err(GenerationError::Network("simulated outage".into()));
            }
        }
        Ok(self.fixed_response.trim().to_string())
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}
