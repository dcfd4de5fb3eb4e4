//! State and actions of the access-requests admin page.

use crate::catalog::DirectoryCatalog;
use crate::error::{AccessError, Notification};
use crate::grant::{GrantField, GrantWorkflow};
use crate::lifecycle::{PendingConfirmation, StoreMutation, Transition};
use crate::store::{AccessRequest, RequestStore};
use chrono::{DateTime, Utc};
use folder_access_api::{Employee, Folder, RequestId};
use std::collections::VecDeque;

/// Everything the page renders
#[derive(Clone, Debug, Default)]
pub struct RequestsState {
    /// Flattened requests
    pub requests: RequestStore,
    /// Employees and folders for the grant form
    pub catalog: DirectoryCatalog,
    /// Whether the request list is being (re)loaded
    pub is_loading: bool,
    /// When the request list was last loaded successfully
    pub last_loaded_at: Option<DateTime<Utc>>,
    /// Request shown in the detail view
    pub selected: Option<RequestId>,
    /// Transition awaiting confirmation
    pub pending_confirmation: Option<PendingConfirmation>,
    /// Grant dialog
    pub grant: GrantWorkflow,
    /// Notifications not yet dismissed, oldest first
    pub notifications: VecDeque<Notification>,
}

impl RequestsState {
    /// Creates an empty state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shown in the detail view, if it is still in the store
    #[must_use]
    pub fn selected_request(&self) -> Option<&AccessRequest> {
        self.selected.as_ref().and_then(|id| self.requests.get(id))
    }

    /// Oldest notification not yet dismissed
    #[must_use]
    pub fn notification(&self) -> Option<&Notification> {
        self.notifications.front()
    }

    /// Most recent notification
    #[must_use]
    pub fn last_notification(&self) -> Option<&Notification> {
        self.notifications.back()
    }
}

/// Actions for the access-requests page
///
/// Commands come from the administrator. Outcomes are fed back by
/// effects once a remote call settles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestsAction {
    // ========== Loading ==========
    /// Command: load requests, employees and folders independently
    Load,
    /// Command: reload only the request list
    ReloadRequests,
    /// Outcome: folders with their requests arrived
    RequestsLoaded {
        /// Folders in API order
        folders: Vec<Folder>,
    },
    /// Outcome: the request list could not be loaded
    RequestsLoadFailed {
        /// Cause
        error: AccessError,
    },
    /// Outcome: employee directory arrived
    EmployeesLoaded {
        /// Employees in API order
        employees: Vec<Employee>,
    },
    /// Outcome: employee directory could not be loaded
    EmployeesLoadFailed {
        /// Cause
        error: AccessError,
    },
    /// Outcome: folder directory arrived
    FoldersLoaded {
        /// Folders in API order
        folders: Vec<Folder>,
    },
    /// Outcome: folder directory could not be loaded
    FoldersLoadFailed {
        /// Cause
        error: AccessError,
    },

    // ========== Inspect ==========
    /// Command: open the detail view
    ViewRequest {
        /// Request to show
        request_id: RequestId,
    },
    /// Command: close the detail view
    CloseView,

    // ========== Lifecycle ==========
    /// Command: ask for confirmation of a transition
    RequestTransition {
        /// Target request
        request_id: RequestId,
        /// Requested transition
        transition: Transition,
    },
    /// Command: the administrator said yes
    ConfirmTransition,
    /// Command: the administrator said no
    CancelTransition,
    /// Outcome: the remote call succeeded
    TransitionSucceeded {
        /// Store change to apply
        mutation: StoreMutation,
    },
    /// Outcome: the remote call failed
    TransitionFailed {
        /// Target request
        request_id: RequestId,
        /// Attempted transition
        transition: Transition,
        /// Cause
        error: AccessError,
    },

    // ========== Grant ==========
    /// Command: open the grant dialog
    OpenGrantForm,
    /// Command: edit one field of the grant form
    UpdateGrantField {
        /// Edited field
        field: GrantField,
        /// New value
        value: String,
    },
    /// Command: close the grant dialog, discarding input
    CloseGrantForm,
    /// Command: validate and submit the grant form
    SubmitGrant,
    /// Outcome: the API confirmed the grant
    GrantSucceeded,
    /// Outcome: the grant was not confirmed
    GrantFailed {
        /// Cause
        error: AccessError,
    },

    // ========== Notifications ==========
    /// Command: dismiss the oldest notification
    DismissNotification,
}
