//! Inference error types.
//!
//! All errors implement `std::error::Error` via `thiserror`. These are the
//! transport-level failures of a model call; they propagate to the caller of
//! the answer loop unchanged.

use thiserror::Error;

/// Errors that can occur while talking to the chat-completions endpoint.
#[derive(Debug, Error)]
pub enum InferenceError {
    /// TCP/HTTP connection to the model endpoint failed.
    #[error("connection failed to {endpoint}: {reason}")]
    ConnectionFailed {
        endpoint: String,
        reason: String,
    },

    /// The model endpoint did not respond within the configured timeout.
    #[error("inference timeout after {duration_secs}s")]
    Timeout {
        duration_secs: u64,
    },

    /// Non-2xx HTTP response from the model endpoint.
    #[error("HTTP {status}: {body}")]
    HttpError {
        status: u16,
        body: String,
    },

    /// The response body could not be decoded into a chat completion.
    #[error("response parse error: {reason}")]
    ResponseParse {
        reason: String,
    },

    /// Configuration loading or validation error.
    #[error("config error: {reason}")]
    ConfigError {
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_status() {
        let err = InferenceError::HttpError {
            status: 429,
            body: "rate limited".into(),
        };
        assert_eq!(err.to_string(), "HTTP 429: rate limited");
    }
}
