//! Error types for the urban assistant
//!
//! The router itself never returns errors: every condition resolves to a
//! `RoutingResult`. These types cover the layers around it (request decoding,
//! configuration, the HTTP server) and decide what an end user gets to see.

use thiserror::Error;

/// Message returned to clients for any failure that is not their input's fault
pub const GENERIC_FAILURE_MESSAGE: &str =
    "I encountered an error processing your request. Please try again.";

/// Message returned when a request carries no usable query
pub const MISSING_QUERY_MESSAGE: &str = "Query is required";

/// Main error type for assistant operations
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Malformed request: {message}")]
    MalformedRequest { message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Server error: {message}")]
    Server { message: String },
}

impl AssistantError {
    /// Create invalid input error
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create malformed request error
    pub fn malformed_request<S: Into<String>>(message: S) -> Self {
        Self::MalformedRequest {
            message: message.into(),
        }
    }

    /// Create server error
    pub fn server<S: Into<String>>(message: S) -> Self {
        Self::Server {
            message: message.into(),
        }
    }

    /// Missing or blank query
    pub fn missing_query() -> Self {
        Self::invalid_input(MISSING_QUERY_MESSAGE)
    }

    /// Message that may be shown to the end user.
    ///
    /// Input errors are reported verbatim. Everything else collapses to the
    /// generic apology so parser or I/O details never reach the chat window.
    pub fn client_message(&self) -> String {
        match self {
            AssistantError::InvalidInput { message } => message.clone(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

/// Result type for assistant operations
pub type AssistantResult<T> = Result<T, AssistantError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;

    #[test]
    fn test_invalid_input_constructor() {
        let error = AssistantError::invalid_input("missing field");
        assert!(matches!(error, AssistantError::InvalidInput { .. }));
        assert_eq!(error.to_string(), "Invalid input: missing field");
    }

    #[test]
    fn test_missing_query_message_is_passed_through() {
        let error = AssistantError::missing_query();
        assert_eq!(error.client_message(), "Query is required");
    }

    #[test]
    fn test_malformed_request_hides_details() {
        let error = AssistantError::malformed_request("expected value at line 1 column 1");
        assert_eq!(error.client_message(), GENERIC_FAILURE_MESSAGE);
        assert_eq!(
            error.to_string(),
            "Malformed request: expected value at line 1 column 1"
        );
    }

    #[test]
    fn test_config_error_is_server_side() {
        let error: AssistantError = ConfigError::InvalidConfig("bad".to_string()).into();

        assert_eq!(error.client_message(), GENERIC_FAILURE_MESSAGE);
        assert!(error.to_string().starts_with("Configuration error"));
    }

    #[test]
    fn test_server_error_constructor() {
        let error = AssistantError::server("address in use");
        assert_eq!(error.to_string(), "Server error: address in use");
    }
}
