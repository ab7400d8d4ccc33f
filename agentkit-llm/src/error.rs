use thiserror::Error;

/// Errors raised while talking to a chat-completions endpoint
#[derive(Debug, Error)]
pub enum LlmError {
    /// Connection, TLS, timeout or body decoding failure
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status
    #[error("model endpoint returned {status}: {body}")]
    Api { status: u16, body: String },

    /// The endpoint answered without any choice to read
    #[error("model endpoint returned no choices")]
    EmptyResponse,

    /// The client could not be configured
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl LlmError {
    /// Whether retrying the same request may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::Transport(e) => e.is_connect() || e.is_timeout(),
            LlmError::Api { status, .. } => *status == 429 || *status >= 500,
            LlmError::EmptyResponse | LlmError::Config(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_and_server_errors_are_retryable() {
        let rate_limited = LlmError::Api { status: 429, body: String::new() };
        let unavailable = LlmError::Api { status: 503, body: String::new() };
        assert!(rate_limited.is_retryable());
        assert!(unavailable.is_retryable());
    }

    #[test]
    fn client_errors_are_not_retryable() {
        let unauthorized = LlmError::Api { status: 401, body: "bad key".into() };
        assert!(!unauthorized.is_retryable());
        assert!(!LlmError::EmptyResponse.is_retryable());
        assert!(!LlmError::Config("missing key".into()).is_retryable());
    }
}
