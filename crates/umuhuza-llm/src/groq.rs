//! Groq chat-completion backend (OpenAI-compatible wire format).
//!
//! The client is constructed explicitly and injected into the assistant; there
//! is no lazily memoized global handle. A missing API key fails the request
//! before any network I/O with [`ChatError::MissingApiKey`].

use std::time::Duration;

use reqwest::{Client, Response, header};
use serde::Deserialize;

use crate::backend::ChatBackend;
use crate::error::{ChatError, Result, classify_provider_error};
use crate::types::CompletionRequest;

/// Default Groq API base URL (OpenAI-compatible).
const DEFAULT_GROQ_BASE: &str = "https://api.groq.com/openai/v1";

/// Default request timeout. The completion call is the only slow path in the
/// pipeline, so the transport bound doubles as the request deadline.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration for the Groq backend.
#[derive(Debug, Clone)]
pub struct GroqConfig {
    /// API key. `None` means unconfigured; completion fails fast.
    pub api_key: Option<String>,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for GroqConfig {
    /// An unconfigured client: no credential, default endpoint and timeout.
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_GROQ_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl GroqConfig {
    /// Create a config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Create a config from an already-resolved optional key (empty strings
    /// count as absent).
    ///
    /// An absent key does not fail here; it fails at completion time with
    /// [`ChatError::MissingApiKey`] so that callers see a typed error.
    pub fn with_key(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.is_empty()),
            ..Self::default()
        }
    }

    /// Create a config from the `GROQ_API_KEY` environment variable.
    pub fn from_env() -> Self {
        Self::with_key(std::env::var("GROQ_API_KEY").ok())
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Groq Backend
// ─────────────────────────────────────────────────────────────────────────────

/// Chat backend speaking the OpenAI-compatible completions protocol.
pub struct GroqBackend {
    client: Client,
    config: GroqConfig,
}

impl GroqBackend {
    /// Create a new backend with the given configuration.
    pub fn new(config: GroqConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ChatError::Unavailable(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Create a backend configured from the environment.
    pub fn from_env() -> Result<Self> {
        Self::new(GroqConfig::from_env())
    }

    /// Build the chat completions endpoint URL.
    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    /// Extract the reply text from a successful response.
    async fn handle_response(response: Response) -> Result<String> {
        if !response.status().is_success() {
            return Err(Self::handle_error_response(response).await);
        }

        let body = response.text().await?;
        let parsed: ChatCompletionResponse = serde_json::from_str(&body)?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        Ok(content.trim().to_string())
    }

    /// Translate an error response into a typed error.
    async fn handle_error_response(response: Response) -> ChatError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        let message = serde_json::from_str::<ProviderErrorResponse>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);

        classify_provider_error(status, &message)
    }
}

#[async_trait::async_trait]
impl ChatBackend for GroqBackend {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ChatError::MissingApiKey)?;

        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(self.completions_url())
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {}", api_key))
            .json(&request)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    fn name(&self) -> &str {
        "groq"
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorResponse {
    error: ProviderError,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    message: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
