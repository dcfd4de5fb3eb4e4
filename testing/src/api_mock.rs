//! Recording fake of the remote access API

use folder_access_api::{
    AccessApi, ApiError, ApiFuture, Employee, Folder, GrantAccess, GrantAccessResponse, RequestId,
    RequestStatus, GRANT_CONFIRMATION,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A call received by [`MockAccessApi`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiCall {
    /// `GET /user/employees`
    ListEmployees,
    /// `GET /file/getAllFolders`
    ListFolders,
    /// `GET /access/get-requests`
    ListAccessRequests,
    /// `PUT /access/update-request/{requestId}`
    UpdateRequestStatus {
        /// Target request
        request_id: RequestId,
        /// Submitted status
        status: RequestStatus,
    },
    /// `DELETE /access/access-requests/{requestId}`
    DeleteRequest {
        /// Target request
        request_id: RequestId,
    },
    /// `POST /access/GiveAccess`
    GrantAccess(GrantAccess),
}

#[derive(Debug)]
struct Responses {
    employees: Result<Vec<Employee>, ApiError>,
    folders: Result<Vec<Folder>, ApiError>,
    access_requests: Result<Vec<Folder>, ApiError>,
    update: Result<(), ApiError>,
    delete: Result<(), ApiError>,
    grant: Result<GrantAccessResponse, ApiError>,
    calls: Vec<ApiCall>,
}

/// In-memory [`AccessApi`] with canned responses and a call log
///
/// Clones share state, so a test can keep one handle and give another to
/// the environment.
///
/// # Example
///
/// ```
/// use folder_access_api::{AccessApi, ApiError};
/// use folder_access_testing::mocks::{ApiCall, MockAccessApi};
///
/// # tokio_test::block_on(async {
/// let api = MockAccessApi::new().fail_employees(ApiError::RequestFailed("offline".into()));
///
/// assert!(api.list_employees().await.is_err());
/// assert_eq!(api.calls(), vec![ApiCall::ListEmployees]);
/// # });
/// ```
#[derive(Clone, Debug)]
pub struct MockAccessApi {
    inner: Arc<Mutex<Responses>>,
}

impl Default for MockAccessApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAccessApi {
    /// Empty directory, no requests, every mutation succeeds, grants confirmed
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Responses {
                employees: Ok(Vec::new()),
                folders: Ok(Vec::new()),
                access_requests: Ok(Vec::new()),
                update: Ok(()),
                delete: Ok(()),
                grant: Ok(GrantAccessResponse {
                    msg: Some(GRANT_CONFIRMATION.to_string()),
                }),
                calls: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Responses> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Respond to `list_employees` with these employees
    #[must_use]
    pub fn with_employees(self, employees: Vec<Employee>) -> Self {
        self.lock().employees = Ok(employees);
        self
    }

    /// Respond to `list_folders` with these folders
    #[must_use]
    pub fn with_folders(self, folders: Vec<Folder>) -> Self {
        self.lock().folders = Ok(folders);
        self
    }

    /// Respond to `list_access_requests` with these folders
    #[must_use]
    pub fn with_access_requests(self, folders: Vec<Folder>) -> Self {
        self.set_access_requests(folders);
        self
    }

    /// Replace the folders returned by later `list_access_requests` calls
    pub fn set_access_requests(&self, folders: Vec<Folder>) {
        self.lock().access_requests = Ok(folders);
    }

    /// Fail `list_employees`
    #[must_use]
    pub fn fail_employees(self, error: ApiError) -> Self {
        self.lock().employees = Err(error);
        self
    }

    /// Fail `list_folders`
    #[must_use]
    pub fn fail_folders(self, error: ApiError) -> Self {
        self.lock().folders = Err(error);
        self
    }

    /// Fail `list_access_requests`
    #[must_use]
    pub fn fail_access_requests(self, error: ApiError) -> Self {
        self.lock().access_requests = Err(error);
        self
    }

    /// Fail `update_request_status`
    #[must_use]
    pub fn fail_update(self, error: ApiError) -> Self {
        self.lock().update = Err(error);
        self
    }

    /// Fail `delete_request`
    #[must_use]
    pub fn fail_delete(self, error: ApiError) -> Self {
        self.lock().delete = Err(error);
        self
    }

    /// Respond to `grant_access` with this body
    #[must_use]
    pub fn with_grant_response(self, response: GrantAccessResponse) -> Self {
        self.lock().grant = Ok(response);
        self
    }

    /// Fail `grant_access`
    #[must_use]
    pub fn fail_grant(self, error: ApiError) -> Self {
        self.lock().grant = Err(error);
        self
    }

    /// Every call received so far, in order
    #[must_use]
    pub fn calls(&self) -> Vec<ApiCall> {
        self.lock().calls.clone()
    }

    /// Number of calls matching `predicate`
    #[must_use]
    pub fn count_calls(&self, predicate: impl Fn(&ApiCall) -> bool) -> usize {
        self.lock().calls.iter().filter(|call| predicate(call)).count()
    }

    fn respond<T: Clone>(
        &self,
        call: ApiCall,
        pick: impl FnOnce(&Responses) -> &Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let mut guard = self.lock();
        guard.calls.push(call);
        pick(&*guard).clone()
    }
}

impl AccessApi for MockAccessApi {
    fn list_employees(&self) -> ApiFuture<'_, Vec<Employee>> {
        let result = self.respond(ApiCall::ListEmployees, |r| &r.employees);
        Box::pin(async move { result })
    }

    fn list_folders(&self) -> ApiFuture<'_, Vec<Folder>> {
        let result = self.respond(ApiCall::ListFolders, |r| &r.folders);
        Box::pin(async move { result })
    }

    fn list_access_requests(&self) -> ApiFuture<'_, Vec<Folder>> {
        let result = self.respond(ApiCall::ListAccessRequests, |r| &r.access_requests);
        Box::pin(async move { result })
    }

    fn update_request_status(
        &self,
        request_id: RequestId,
        status: RequestStatus,
    ) -> ApiFuture<'_, ()> {
        let result = self.respond(
            ApiCall::UpdateRequestStatus { request_id, status },
            |r| &r.update,
        );
        Box::pin(async move { result })
    }

    fn delete_request(&self, request_id: RequestId) -> ApiFuture<'_, ()> {
        let result = self.respond(ApiCall::DeleteRequest { request_id }, |r| &r.delete);
        Box::pin(async move { result })
    }

    fn grant_access(&self, grant: GrantAccess) -> ApiFuture<'_, GrantAccessResponse> {
        let result = self.respond(ApiCall::GrantAccess(grant), |r| &r.grant);
        Box::pin(async move { result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_calls_in_order() {
        let api = MockAccessApi::new();

        let _ = api.list_access_requests().await;
        let _ = api
            .update_request_status(RequestId::new("r1"), RequestStatus::Rejected)
            .await;

        assert_eq!(
            api.calls(),
            vec![
                ApiCall::ListAccessRequests,
                ApiCall::UpdateRequestStatus {
                    request_id: RequestId::new("r1"),
                    status: RequestStatus::Rejected,
                },
            ]
        );
    }

    #[tokio::test]
    async fn clones_share_responses() {
        let api = MockAccessApi::new();
        let handle = api.clone();

        handle.set_access_requests(vec![Folder::new("F1", "Finance")]);

        let folders = api.list_access_requests().await.unwrap_or_default();
        assert_eq!(folders.len(), 1);
    }

    #[tokio::test]
    async fn default_grant_is_confirmed() {
        let api = MockAccessApi::new();
        let response = api
            .grant_access(GrantAccess {
                folder_id: "F1".into(),
                employee_id: "E1".into(),
                reason: "audit".to_string(),
            })
            .await
            .unwrap_or_default();

        assert!(response.is_confirmed());
    }
}
