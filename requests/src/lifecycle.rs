//! Request lifecycle: approve, reject, delete.
//!
//! ```text
//!            approve
//! pending ─────────────▶ approved ─┐
//!    │                             │ delete
//!    │ reject                      ▼
//!    └───────────────▶ rejected ──▶ (gone)
//! ```
//!
//! Each transition is confirmed by the administrator first, then sent to
//! the remote API. The local store only changes through a
//! [`StoreMutation`], and one can only be obtained from a successful remote
//! result.

use crate::store::RequestStore;
use folder_access_api::{ApiError, RequestId, RequestStatus};
use serde::Serialize;

/// An administrator action on an existing request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
    /// Set status to `approved`
    Approve,
    /// Set status to `rejected`
    Reject,
    /// Remove the request, whatever its status
    Delete,
}

/// Icon shown on a confirmation prompt
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptIcon {
    /// Neutral question
    Question,
    /// Destructive or negative action
    Warning,
}

/// Yes/no dialog shown before a transition fires
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationPrompt {
    /// Dialog title
    pub title: &'static str,
    /// Dialog body
    pub text: &'static str,
    /// Dialog icon
    pub icon: PromptIcon,
    /// Label of the confirm button
    pub confirm_label: &'static str,
}

impl Transition {
    /// Status the request ends in, `None` for deletion
    #[must_use]
    pub const fn target_status(self) -> Option<RequestStatus> {
        match self {
            Self::Approve => Some(RequestStatus::Approved),
            Self::Reject => Some(RequestStatus::Rejected),
            Self::Delete => None,
        }
    }

    /// Confirmation dialog for this transition
    #[must_use]
    pub const fn prompt(self) -> ConfirmationPrompt {
        match self {
            Self::Approve => ConfirmationPrompt {
                title: "Accept Request?",
                text: "Are you sure you want to accept this request?",
                icon: PromptIcon::Question,
                confirm_label: "Yes, accept it!",
            },
            Self::Reject => ConfirmationPrompt {
                title: "Reject Request?",
                text: "Are you sure you want to reject this request?",
                icon: PromptIcon::Warning,
                confirm_label: "Yes, reject it!",
            },
            Self::Delete => ConfirmationPrompt {
                title: "Delete Request?",
                text: "Are you sure you want to delete this request?",
                icon: PromptIcon::Warning,
                confirm_label: "Yes, delete it!",
            },
        }
    }

    /// Title and message of the success notification
    #[must_use]
    pub const fn success_notice(self) -> (&'static str, &'static str) {
        match self {
            Self::Approve => ("Accepted!", "Request has been accepted."),
            Self::Reject => ("Rejected!", "Request has been rejected."),
            Self::Delete => ("Deleted!", "Request has been deleted."),
        }
    }

    /// Message shown when the server gives no reason for a failure
    #[must_use]
    pub const fn failure_fallback(self) -> &'static str {
        match self {
            Self::Approve => "Failed to accept request.",
            Self::Reject => "Failed to reject request.",
            Self::Delete => "Failed to delete request.",
        }
    }

    /// Lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Delete => "delete",
        }
    }
}

impl std::fmt::Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Transition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "approve" | "accept" => Ok(Self::Approve),
            "reject" => Ok(Self::Reject),
            "delete" => Ok(Self::Delete),
            other => Err(format!("Unknown transition: {other}")),
        }
    }
}

/// A transition waiting for the administrator's yes/no
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingConfirmation {
    /// Target request
    pub request_id: RequestId,
    /// Requested transition
    pub transition: Transition,
}

impl PendingConfirmation {
    /// Dialog to show
    #[must_use]
    pub const fn prompt(&self) -> ConfirmationPrompt {
        self.transition.prompt()
    }
}

/// Local store change licensed by a successful remote call
///
/// Only the transition effect can build one, from an `Ok` remote result.
/// Code outside this crate cannot forge a success:
///
/// ```compile_fail
/// use folder_access_api::RequestId;
/// use folder_access_requests::{StoreMutation, Transition};
///
/// let _ = StoreMutation::from_remote(RequestId::new("r1"), Transition::Delete, Ok(()));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreMutation {
    request_id: RequestId,
    transition: Transition,
}

impl StoreMutation {
    /// Turns a remote result into a mutation, or hands back the error
    ///
    /// # Errors
    ///
    /// Returns the remote error unchanged; the store must not be touched.
    pub(crate) fn from_remote(
        request_id: RequestId,
        transition: Transition,
        result: Result<(), ApiError>,
    ) -> Result<Self, ApiError> {
        result.map(|()| Self {
            request_id,
            transition,
        })
    }

    /// Target request
    #[must_use]
    pub const fn request_id(&self) -> &RequestId {
        &self.request_id
    }

    /// Transition that succeeded remotely
    #[must_use]
    pub const fn transition(&self) -> Transition {
        self.transition
    }

    /// Applies the change, returning how many entries it touched
    pub fn apply(&self, store: &mut RequestStore) -> usize {
        match self.transition.target_status() {
            Some(status) => store.apply_status(&self.request_id, status),
            None => store.apply_remove(&self.request_id),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use chrono::DateTime;
    use folder_access_api::{Folder, RequestRecord};

    fn store() -> RequestStore {
        RequestStore::load(&[Folder::new("F1", "Finance").with_request(RequestRecord {
            request_id: RequestId::new("r1"),
            employee: None,
            status: RequestStatus::Pending,
            reason: "month end".to_string(),
            created_at: DateTime::from_timestamp(0, 0),
        })])
    }

    #[test]
    fn prompts_are_distinct() {
        let approve = Transition::Approve.prompt();
        let reject = Transition::Reject.prompt();
        let delete = Transition::Delete.prompt();

        assert_eq!(approve.icon, PromptIcon::Question);
        assert_eq!(reject.icon, PromptIcon::Warning);
        assert_ne!(reject.title, delete.title);
        assert_eq!(delete.confirm_label, "Yes, delete it!");
    }

    #[test]
    fn failed_remote_yields_no_mutation() {
        let outcome = StoreMutation::from_remote(
            RequestId::new("r1"),
            Transition::Delete,
            Err(ApiError::RequestFailed("reset".into())),
        );

        assert!(outcome.is_err());
    }

    #[test]
    fn mutation_applies_target_status_or_removal() {
        let mut store = store();

        let approve =
            StoreMutation::from_remote(RequestId::new("r1"), Transition::Approve, Ok(())).unwrap();
        assert_eq!(approve.apply(&mut store), 1);
        assert_eq!(
            store.get(&RequestId::new("r1")).map(|r| r.status),
            Some(RequestStatus::Approved)
        );

        let delete =
            StoreMutation::from_remote(RequestId::new("r1"), Transition::Delete, Ok(())).unwrap();
        assert_eq!(delete.apply(&mut store), 1);
        assert!(store.is_empty());
        assert_eq!(delete.apply(&mut store), 0);
    }

    #[test]
    fn parses_cli_names() {
        assert_eq!("approve".parse::<Transition>(), Ok(Transition::Approve));
        assert_eq!("Accept".parse::<Transition>(), Ok(Transition::Approve));
        assert_eq!("delete".parse::<Transition>(), Ok(Transition::Delete));
        assert!("revert".parse::<Transition>().is_err());
    }
}
