//! Error types for the chat-completion client.
//!
//! Every failure on the completion path resolves to one of three categories:
//! a missing credential, a provider rate limit, or a generic unavailability.
//! Callers map these to configuration errors, "retry later" messages, and
//! "try again" messages respectively; nothing else escapes.

use thiserror::Error;

/// Result type alias using the chat error type.
pub type Result<T> = std::result::Result<T, ChatError>;

/// Error type for chat-completion operations.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The provider API key is not configured. Raised before any network
    /// call is attempted; never retried.
    #[error("GROQ_API_KEY is not configured. Set it in your environment.")]
    MissingApiKey,

    /// The provider reported a rate or usage limit. Transient; the caller
    /// should ask the user to retry later. Not retried internally.
    #[error("Rate limit reached: {0}")]
    RateLimited(String),

    /// Any other provider or transport failure: timeout, connection error,
    /// 5xx, malformed response body.
    #[error("Chat service unavailable: {0}")]
    Unavailable(String),
}

impl ChatError {
    /// Returns true if this error indicates provider-side throttling.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }
}

/// Classify a provider error response into a typed error.
///
/// HTTP 429 is the structured signal; the "rate limit" substring check is a
/// fallback for providers that bury throttling inside a 4xx/5xx body.
pub fn classify_provider_error(status: u16, message: &str) -> ChatError {
    if status == 429 || message.to_lowercase().contains("rate limit") {
        ChatError::RateLimited(message.to_string())
    } else {
        ChatError::Unavailable(format!("HTTP {}: {}", status, message))
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ChatError::Unavailable(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            ChatError::Unavailable(format!("Connection failed: {}", err))
        } else {
            ChatError::Unavailable(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        ChatError::Unavailable(format!("Malformed provider response: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_429_is_rate_limit() {
        let err = classify_provider_error(429, "Too many requests");
        assert!(err.is_rate_limit());
    }

    #[test]
    fn test_classify_rate_limit_substring() {
        let err = classify_provider_error(400, "Rate Limit reached for model");
        assert!(err.is_rate_limit());

        let err = classify_provider_error(503, "rate limit exceeded");
        assert!(err.is_rate_limit());
    }

    #[test]
    fn test_classify_other_errors_are_unavailable() {
        let err = classify_provider_error(500, "internal server error");
        assert!(matches!(err, ChatError::Unavailable(_)));

        let err = classify_provider_error(401, "invalid api key");
        assert!(matches!(err, ChatError::Unavailable(_)));
    }

    #[test]
    fn test_missing_key_message_names_the_variable() {
        assert!(ChatError::MissingApiKey.to_string().contains("GROQ_API_KEY"));
    }
}
