//! Client error types.

use airhub_protocol::CodecError;
use thiserror::Error;

/// Result alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur when talking to the AirHub API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration could not be loaded or is inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The base URL does not parse as an http(s) URL.
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// Client ID or client secret is empty.
    #[error("Missing client ID or client secret")]
    MissingCredentials,

    /// A request argument was rejected before any I/O.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Connection, timeout or body read failure.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The response body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(#[source] CodecError),

    /// The request payload could not be encoded.
    #[error("Failed to encode request: {0}")]
    Encode(#[source] CodecError),
}

impl ClientError {
    /// The HTTP status behind this error, if there was a response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the server rejected the credentials or token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status_code(), Some(401 | 403))
    }

    /// Whether the error happened before anything was sent.
    pub fn is_client_side(&self) -> bool {
        matches!(
            self,
            ClientError::Config(_)
                | ClientError::InvalidBaseUrl { .. }
                | ClientError::MissingCredentials
                | ClientError::InvalidArgument(_)
                | ClientError::Encode(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let err = ClientError::Api {
            status: 404,
            message: "advisory not found".to_string(),
        };
        assert_eq!(err.status_code(), Some(404));
        assert!(!err.is_unauthorized());
        assert_eq!(ClientError::MissingCredentials.status_code(), None);
    }

    #[test]
    fn test_unauthorized() {
        for status in [401, 403] {
            let err = ClientError::Api {
                status,
                message: String::new(),
            };
            assert!(err.is_unauthorized());
        }
    }

    #[test]
    fn test_client_side_errors() {
        assert!(ClientError::InvalidArgument("advisory id".to_string()).is_client_side());
        assert!(ClientError::MissingCredentials.is_client_side());
        assert!(!ClientError::Api {
            status: 500,
            message: String::new()
        }
        .is_client_side());
    }

    #[test]
    fn test_error_display() {
        let err = ClientError::Api {
            status: 400,
            message: "something invalid happened".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("400"));
        assert!(display.contains("something invalid happened"));

        let err = ClientError::InvalidBaseUrl {
            url: "not a url".to_string(),
            reason: "relative URL without a base".to_string(),
        };
        assert!(err.to_string().contains("not a url"));
    }
}
