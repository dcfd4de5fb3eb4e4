//! Reducer for the access-requests page.
//!
//! Commands either change local UI state directly (selection, dialogs,
//! form input) or describe a remote call as an effect. The request store
//! is only ever changed by outcome actions fed back from those effects.

use crate::environment::RequestsEnvironment;
use crate::error::{AccessError, Notification};
use crate::lifecycle::{PendingConfirmation, Transition};
use crate::store::RequestStore;
use crate::types::{RequestsAction, RequestsState};
use folder_access_api::RequestId;
use folder_access_core::{effect::Effect, reducer::Reducer, SmallVec};
use smallvec::smallvec;

/// Reducer for the access-requests page
#[derive(Clone, Debug)]
pub struct RequestsReducer;

impl RequestsReducer {
    /// Creates a new `RequestsReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn notify_error(state: &mut RequestsState, env: &RequestsEnvironment, message: String) {
        state
            .notifications
            .push_back(Notification::error(message, env.clock.now()));
    }

    fn notify_success(
        state: &mut RequestsState,
        env: &RequestsEnvironment,
        title: &str,
        message: &str,
    ) {
        state
            .notifications
            .push_back(Notification::success(title, message, env.clock.now()));
    }

    fn request_transition(
        state: &mut RequestsState,
        env: &RequestsEnvironment,
        request_id: RequestId,
        transition: Transition,
    ) {
        let Some(request) = state.requests.get(&request_id) else {
            tracing::warn!(%request_id, %transition, "Transition requested for unknown request");
            state.pending_confirmation = None;
            Self::notify_error(state, env, format!("Request {request_id} not found."));
            return;
        };

        if let Some(target) = transition.target_status() {
            if !request.status.can_transition_to(target) {
                tracing::debug!(
                    %request_id,
                    status = %request.status,
                    %target,
                    "Transition requested outside the pending state"
                );
            }
        }

        // Confirming from the detail view closes it
        state.selected = None;
        state.pending_confirmation = Some(PendingConfirmation {
            request_id,
            transition,
        });
    }

    fn submit_grant(
        state: &mut RequestsState,
        env: &RequestsEnvironment,
    ) -> SmallVec<[Effect<RequestsAction>; 4]> {
        let grant = match state.grant.form.validate() {
            Ok(grant) => grant,
            Err(error) => {
                Self::notify_error(state, env, error.grant_message());
                return SmallVec::new();
            },
        };

        if !env.credentials.has_token() {
            tracing::warn!("Grant submitted without a credential");
            Self::notify_error(state, env, AccessError::Authentication.grant_message());
            return SmallVec::new();
        }

        tracing::info!(
            folder_id = %grant.folder_id,
            employee_id = %grant.employee_id,
            "Submitting access grant"
        );
        smallvec![env.submit_grant(grant)]
    }
}

impl Default for RequestsReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for RequestsReducer {
    type State = RequestsState;
    type Action = RequestsAction;
    type Environment = RequestsEnvironment;

    #[allow(clippy::too_many_lines)] // One arm per action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Loading ==========
            RequestsAction::Load => {
                state.is_loading = true;
                smallvec![Effect::merge(vec![
                    env.fetch_requests(),
                    env.fetch_employees(),
                    env.fetch_folders(),
                ])]
            },

            RequestsAction::ReloadRequests => {
                state.is_loading = true;
                smallvec![env.fetch_requests()]
            },

            RequestsAction::RequestsLoaded { folders } => {
                state.requests = RequestStore::load(&folders);
                state.is_loading = false;
                state.last_loaded_at = Some(env.clock.now());
                tracing::info!(
                    folders = folders.len(),
                    requests = state.requests.len(),
                    "Access requests loaded"
                );
                SmallVec::new()
            },

            RequestsAction::RequestsLoadFailed { error } => {
                tracing::warn!(%error, "Failed to load access requests");
                state.requests.clear();
                state.is_loading = false;
                Self::notify_error(state, env, "Failed to load folders and requests.".to_string());
                SmallVec::new()
            },

            RequestsAction::EmployeesLoaded { employees } => {
                tracing::debug!(employees = employees.len(), "Employee directory loaded");
                state.catalog.set_employees(employees);
                SmallVec::new()
            },

            RequestsAction::EmployeesLoadFailed { error } => {
                tracing::warn!(%error, "Failed to load employees");
                Self::notify_error(state, env, "Failed to load employees.".to_string());
                SmallVec::new()
            },

            RequestsAction::FoldersLoaded { folders } => {
                tracing::debug!(folders = folders.len(), "Folder directory loaded");
                state.catalog.set_folders(folders);
                SmallVec::new()
            },

            RequestsAction::FoldersLoadFailed { error } => {
                tracing::warn!(%error, "Failed to load folders");
                Self::notify_error(state, env, "Failed to load folders and files.".to_string());
                SmallVec::new()
            },

            // ========== Inspect ==========
            RequestsAction::ViewRequest { request_id } => {
                if state.requests.contains(&request_id) {
                    state.selected = Some(request_id);
                } else {
                    tracing::warn!(%request_id, "Cannot view unknown request");
                }
                SmallVec::new()
            },

            RequestsAction::CloseView => {
                state.selected = None;
                SmallVec::new()
            },

            // ========== Lifecycle ==========
            RequestsAction::RequestTransition {
                request_id,
                transition,
            } => {
                Self::request_transition(state, env, request_id, transition);
                SmallVec::new()
            },

            RequestsAction::ConfirmTransition => {
                let Some(pending) = state.pending_confirmation.take() else {
                    tracing::debug!("Nothing awaiting confirmation");
                    return SmallVec::new();
                };

                tracing::info!(
                    request_id = %pending.request_id,
                    transition = %pending.transition,
                    "Transition confirmed"
                );
                smallvec![env.submit_transition(pending.request_id, pending.transition)]
            },

            RequestsAction::CancelTransition => {
                state.pending_confirmation = None;
                SmallVec::new()
            },

            RequestsAction::TransitionSucceeded { mutation } => {
                let touched = mutation.apply(&mut state.requests);
                tracing::info!(
                    request_id = %mutation.request_id(),
                    transition = %mutation.transition(),
                    touched,
                    "Transition applied"
                );

                let (title, message) = mutation.transition().success_notice();
                Self::notify_success(state, env, title, message);
                SmallVec::new()
            },

            RequestsAction::TransitionFailed {
                request_id,
                transition,
                error,
            } => {
                tracing::warn!(%request_id, %transition, %error, "Transition failed");
                let message = error.transition_message(transition.failure_fallback());
                Self::notify_error(state, env, message);
                SmallVec::new()
            },

            // ========== Grant ==========
            RequestsAction::OpenGrantForm => {
                state.grant.open();
                SmallVec::new()
            },

            RequestsAction::UpdateGrantField { field, value } => {
                state.grant.form.set(field, value);
                SmallVec::new()
            },

            RequestsAction::CloseGrantForm => {
                state.grant.close();
                SmallVec::new()
            },

            RequestsAction::SubmitGrant => Self::submit_grant(state, env),

            RequestsAction::GrantSucceeded => {
                tracing::info!("Access granted, reloading requests");
                state.grant.close();
                Self::notify_success(state, env, "Success!", "Access has been granted.");
                state.is_loading = true;
                smallvec![env.fetch_requests()]
            },

            RequestsAction::GrantFailed { error } => {
                tracing::warn!(%error, "Grant failed");
                Self::notify_error(state, env, error.grant_message());
                SmallVec::new()
            },

            // ========== Notifications ==========
            RequestsAction::DismissNotification => {
                state.notifications.pop_front();
                SmallVec::new()
            },
        }
    }
}
