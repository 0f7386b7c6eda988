use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

pub const DEFAULT_HISTORY_LENGTH: usize = 10;
pub const DEFAULT_MAX_TOKENS: u32 = 150;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Sampling knobs forwarded verbatim in every completion request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    pub temperature: f32,
    pub top_p: f32,
    pub presence_penalty: f32,
    pub frequency_penalty: f32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            top_p: 1.0,
            presence_penalty: 0.0,
            frequency_penalty: 0.0,
        }
    }
}

/// Immutable session configuration, loaded once at start-up.
#[derive(Clone)]
pub struct ChatConfig {
    endpoint: String,
    api_key: String,
    deployment: String,
    history_length: usize,
    max_tokens: u32,
    sampling: SamplingParams,
    request_timeout: Duration,
}

impl ChatConfig {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        deployment: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            deployment: deployment.into(),
            history_length: DEFAULT_HISTORY_LENGTH,
            max_tokens: DEFAULT_MAX_TOKENS,
            sampling: SamplingParams::default(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    pub fn with_history_length(mut self, history_length: usize) -> Self {
        self.history_length = history_length;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_sampling(mut self, sampling: SamplingParams) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn deployment(&self) -> &str {
        &self.deployment
    }

    pub fn history_length(&self) -> usize {
        self.history_length
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    pub fn sampling(&self) -> SamplingParams {
        self.sampling
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.endpoint.trim().is_empty() {
            return Err(DomainError::config("openAiUri must not be empty"));
        }
        let endpoint = url::Url::parse(&self.endpoint).map_err(|e| {
            DomainError::config(format!("Invalid openAiUri '{}': {e}", self.endpoint))
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(DomainError::config(format!(
                "openAiUri must be an http(s) URL, got '{}'",
                self.endpoint
            )));
        }
        if self.api_key.trim().is_empty() {
            return Err(DomainError::config("openAiKey must not be empty"));
        }
        if self.deployment.trim().is_empty() {
            return Err(DomainError::config("deployment must not be empty"));
        }
        if self.max_tokens == 0 {
            return Err(DomainError::config("maxTokens must be greater than zero"));
        }
        if self.request_timeout.is_zero() {
            return Err(DomainError::config(
                "requestTimeoutSecs must be greater than zero",
            ));
        }
        Ok(())
    }

    pub fn summary(&self) -> String {
        format!(
            "endpoint={}, deployment={}, history_length={}, max_tokens={}, \
             temperature={:.2}, top_p={:.2}",
            self.endpoint,
            self.deployment,
            self.history_length,
            self.max_tokens,
            self.sampling.temperature,
            self.sampling.top_p,
        )
    }
}

// Keeps the API key out of logs and panic messages.
impl std::fmt::Debug for ChatConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("deployment", &self.deployment)
            .field("history_length", &self.history_length)
            .field("max_tokens", &self.max_tokens)
            .field("sampling", &self.sampling)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
