//! Dependencies of [`RequestsReducer`](crate::reducer::RequestsReducer) and the
//! effects that reach the remote API.
//!
//! Every remote call is wrapped in an [`Effect::Future`] whose feedback
//! action carries the outcome. The reducer never awaits anything itself.

use crate::error::AccessError;
use crate::lifecycle::{StoreMutation, Transition};
use crate::types::RequestsAction;
use folder_access_api::{AccessApi, CredentialSource, GrantAccess, RequestId};
use folder_access_core::effect::Effect;
use folder_access_core::environment::Clock;
use std::sync::Arc;

/// Environment dependencies for the requests reducer
#[derive(Clone)]
pub struct RequestsEnvironment {
    /// Remote access API
    pub api: Arc<dyn AccessApi>,
    /// Bearer credential, checked before grants
    pub credentials: Arc<dyn CredentialSource>,
    /// Clock for notification timestamps
    pub clock: Arc<dyn Clock>,
}

impl RequestsEnvironment {
    /// Creates a new `RequestsEnvironment`
    #[must_use]
    pub fn new(
        api: Arc<dyn AccessApi>,
        credentials: Arc<dyn CredentialSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            api,
            credentials,
            clock,
        }
    }

    /// Fetch folders with their requests
    #[must_use]
    pub fn fetch_requests(&self) -> Effect<RequestsAction> {
        let api = Arc::clone(&self.api);
        Effect::future(async move {
            Some(match api.list_access_requests().await {
                Ok(folders) => RequestsAction::RequestsLoaded { folders },
                Err(error) => RequestsAction::RequestsLoadFailed {
                    error: error.into(),
                },
            })
        })
    }

    /// Fetch the employee directory
    #[must_use]
    pub fn fetch_employees(&self) -> Effect<RequestsAction> {
        let api = Arc::clone(&self.api);
        Effect::future(async move {
            Some(match api.list_employees().await {
                Ok(employees) => RequestsAction::EmployeesLoaded { employees },
                Err(error) => RequestsAction::EmployeesLoadFailed {
                    error: error.into(),
                },
            })
        })
    }

    /// Fetch the folder directory
    #[must_use]
    pub fn fetch_folders(&self) -> Effect<RequestsAction> {
        let api = Arc::clone(&self.api);
        Effect::future(async move {
            Some(match api.list_folders().await {
                Ok(folders) => RequestsAction::FoldersLoaded { folders },
                Err(error) => RequestsAction::FoldersLoadFailed {
                    error: error.into(),
                },
            })
        })
    }

    /// Submit a confirmed transition
    ///
    /// Feeds back `TransitionSucceeded` only when the call resolved `Ok`.
    #[must_use]
    pub fn submit_transition(
        &self,
        request_id: RequestId,
        transition: Transition,
    ) -> Effect<RequestsAction> {
        let api = Arc::clone(&self.api);
        Effect::future(async move {
            let result = match transition.target_status() {
                Some(status) => api.update_request_status(request_id.clone(), status).await,
                None => api.delete_request(request_id.clone()).await,
            };

            Some(
                match StoreMutation::from_remote(request_id.clone(), transition, result) {
                    Ok(mutation) => RequestsAction::TransitionSucceeded { mutation },
                    Err(error) => RequestsAction::TransitionFailed {
                        request_id,
                        transition,
                        error: error.into(),
                    },
                },
            )
        })
    }

    /// Submit a validated grant
    ///
    /// Only a body carrying the exact confirmation message counts as
    /// success.
    #[must_use]
    pub fn submit_grant(&self, grant: GrantAccess) -> Effect<RequestsAction> {
        let api = Arc::clone(&self.api);
        Effect::future(async move {
            Some(match api.grant_access(grant).await {
                Ok(response) if response.is_confirmed() => RequestsAction::GrantSucceeded,
                Ok(response) => {
                    tracing::warn!(msg = ?response.msg, "Grant response lacks confirmation");
                    RequestsAction::GrantFailed {
                        error: AccessError::UnexpectedResponse,
                    }
                },
                Err(error) => RequestsAction::GrantFailed {
                    error: error.into(),
                },
            })
        })
    }
}

impl std::fmt::Debug for RequestsEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestsEnvironment")
            .field("has_token", &self.credentials.has_token())
            .finish_non_exhaustive()
    }
}
