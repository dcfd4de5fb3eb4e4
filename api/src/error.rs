//! Error types for the access API client

use thiserror::Error;

/// Errors that can occur when interacting with the access API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No bearer credential is available
    #[error("Authentication token not found")]
    MissingCredential,

    /// The HTTP client could not be built
    #[error("Invalid client configuration: {0}")]
    Configuration(String),

    /// Request was sent but no response arrived (connection, timeout)
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Server responded with a non-success status
    #[error("API error (status {status}): {}", remote_detail(.message, .reason))]
    Remote {
        /// HTTP status code
        status: u16,
        /// `message` field from the response body, when present
        message: Option<String>,
        /// Canonical reason phrase for the status
        reason: Option<String>,
    },

    /// Response body could not be read or decoded
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),
}

fn remote_detail<'a>(message: &'a Option<String>, reason: &'a Option<String>) -> &'a str {
    message
        .as_deref()
        .or(reason.as_deref())
        .unwrap_or("no message")
}

impl ApiError {
    /// Build a remote error from a status and raw response body
    #[must_use]
    pub fn remote(status: reqwest::StatusCode, body: &str) -> Self {
        #[derive(serde::Deserialize)]
        struct ErrorBody {
            message: Option<String>,
        }

        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.is_empty());

        Self::Remote {
            status: status.as_u16(),
            message,
            reason: status.canonical_reason().map(str::to_string),
        }
    }

    /// Server-provided message, if the server sent one
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Remote { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}
