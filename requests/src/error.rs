//! Error taxonomy surfaced to the administrator, and the notifications that
//! render it.

use chrono::{DateTime, Utc};
use folder_access_api::ApiError;
use serde::Serialize;
use thiserror::Error;

/// Message shown when the grant form is incomplete
pub const INCOMPLETE_GRANT_FORM: &str = "Please fill in all fields.";

/// Errors raised while acting on access requests or grants
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// A required input is missing; nothing was sent
    #[error("Validation failed: {0}")]
    Validation(String),

    /// No bearer credential is available; nothing was sent
    #[error("Authentication token not found")]
    Authentication,

    /// The call was made but no response arrived
    #[error("No response from server: {0}")]
    Transport(String),

    /// The server answered with a non-success status
    #[error("Server rejected the call (status {status})")]
    Remote {
        /// HTTP status code
        status: u16,
        /// `message` from the response body
        message: Option<String>,
        /// HTTP reason phrase
        reason: Option<String>,
    },

    /// The call succeeded at the transport level but the body was not the
    /// expected confirmation
    #[error("Unexpected response from server")]
    UnexpectedResponse,
}

impl From<ApiError> for AccessError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::MissingCredential => Self::Authentication,
            ApiError::Configuration(detail) | ApiError::RequestFailed(detail) => {
                Self::Transport(detail)
            },
            ApiError::Remote {
                status,
                message,
                reason,
            } => Self::Remote {
                status,
                message,
                reason,
            },
            ApiError::ResponseParseFailed(_) => Self::UnexpectedResponse,
        }
    }
}

impl AccessError {
    /// Message for a request transition: the server's message, else `fallback`
    #[must_use]
    pub fn transition_message(&self, fallback: &str) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Remote {
                message: Some(message),
                ..
            } => message.clone(),
            Self::Authentication => "Authentication token not found.".to_string(),
            _ => fallback.to_string(),
        }
    }

    /// Message for a failed grant
    ///
    /// Remote errors show the body message, else the reason phrase, else a
    /// generic fallback. Transport errors never show their low-level detail.
    #[must_use]
    pub fn grant_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Authentication => "Authentication token not found.".to_string(),
            Self::Transport(_) => "No response from server".to_string(),
            Self::Remote {
                message, reason, ..
            } => message
                .as_deref()
                .or(reason.as_deref())
                .unwrap_or("Failed to grant access")
                .to_string(),
            Self::UnexpectedResponse => "Unexpected response from server".to_string(),
        }
    }
}

/// Severity of a [`Notification`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// The action completed
    Success,
    /// The action failed
    Error,
}

/// A blocking message for the administrator
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Severity
    pub kind: NotificationKind,
    /// Short heading
    pub title: String,
    /// Body text
    pub message: String,
    /// When it was raised
    pub raised_at: DateTime<Utc>,
}

impl Notification {
    /// A success notification
    #[must_use]
    pub fn success(
        title: impl Into<String>,
        message: impl Into<String>,
        raised_at: DateTime<Utc>,
    ) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: title.into(),
            message: message.into(),
            raised_at,
        }
    }

    /// An error notification titled `Error!`
    #[must_use]
    pub fn error(message: impl Into<String>, raised_at: DateTime<Utc>) -> Self {
        Self {
            kind: NotificationKind::Error,
            title: "Error!".to_string(),
            message: message.into(),
            raised_at,
        }
    }

    /// Whether this reports a failure
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }
}
