//! Access API client implementation

use crate::{
    credentials::CredentialSource,
    error::ApiError,
    types::{
        Employee, EmployeesEnvelope, Folder, FoldersEnvelope, GrantAccess, GrantAccessResponse,
        RequestId, RequestStatus, StatusUpdate,
    },
    AccessApi, ApiFuture,
};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// Access API client
#[derive(Clone)]
pub struct AccessApiClient {
    client: Client,
    base_url: String,
    credentials: Arc<dyn CredentialSource>,
}

impl AccessApiClient {
    /// Create a new client for `base_url`
    #[must_use]
    pub fn new(base_url: impl Into<String>, credentials: Arc<dyn CredentialSource>) -> Self {
        Self {
            client: Client::new(),
            base_url: trim_base(base_url.into()),
            credentials,
        }
    }

    /// Create a new client with a per-request timeout
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Configuration` if the HTTP client cannot be built
    pub fn with_timeout(
        base_url: impl Into<String>,
        credentials: Arc<dyn CredentialSource>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            base_url: trim_base(base_url.into()),
            credentials,
        })
    }

    /// Base URL requests are sent to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Base URL plus `segments`, each percent-encoded as one path segment
    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let invalid = |why: String| ApiError::Configuration(format!("base URL {}: {why}", self.base_url));

        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("cannot take a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Attach the bearer credential when one is available
    ///
    /// Calls without a token are still sent; the API rejects them itself.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.credentials.bearer_token() {
            Some(token) => request.bearer_auth(token),
            None => {
                tracing::debug!("No bearer token available, sending unauthenticated request");
                request
            },
        }
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = ApiError::remote(status, &body);
        tracing::warn!(status = status.as_u16(), error = %error, "Access API returned an error");
        Err(error)
    }

    async fn execute_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        self.execute(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ApiError::ResponseParseFailed(e.to_string()))
    }

    /// `GET /user/employees`
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, API errors, or parsing failures
    pub async fn employees(&self) -> Result<Vec<Employee>, ApiError> {
        tracing::debug!("Fetching employees");
        let envelope: EmployeesEnvelope = self
            .execute_json(self.client.get(self.url(&["user", "employees"])?))
            .await?;
        Ok(envelope.employees)
    }

    /// `GET /file/getAllFolders`
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, API errors, or parsing failures
    pub async fn folders(&self) -> Result<Vec<Folder>, ApiError> {
        tracing::debug!("Fetching all folders");
        let envelope: FoldersEnvelope = self
            .execute_json(self.client.get(self.url(&["file", "getAllFolders"])?))
            .await?;
        Ok(envelope.folders)
    }

    /// `GET /access/get-requests`
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, API errors, or parsing failures
    pub async fn access_requests(&self) -> Result<Vec<Folder>, ApiError> {
        tracing::debug!("Fetching folders with access requests");
        let envelope: FoldersEnvelope = self
            .execute_json(self.client.get(self.url(&["access", "get-requests"])?))
            .await?;
        Ok(envelope.folders)
    }

    /// `PUT /access/update-request/{requestId}`
    ///
    /// Any 2xx counts as success; the body is ignored.
    ///
    /// # Errors
    ///
    /// Returns errors for network failures or API errors
    pub async fn update_status(
        &self,
        request_id: &RequestId,
        status: RequestStatus,
    ) -> Result<(), ApiError> {
        tracing::debug!(request_id = %request_id, status = %status, "Updating request status");
        self.execute(
            self.client
                .put(self.url(&["access", "update-request", request_id.as_str()])?)
                .json(&StatusUpdate { status }),
        )
        .await?;
        Ok(())
    }

    /// `DELETE /access/access-requests/{requestId}`
    ///
    /// # Errors
    ///
    /// Returns errors for network failures or API errors
    pub async fn delete(&self, request_id: &RequestId) -> Result<(), ApiError> {
        tracing::debug!(request_id = %request_id, "Deleting request");
        self.execute(
            self.client
                .delete(self.url(&["access", "access-requests", request_id.as_str()])?),
        )
        .await?;
        Ok(())
    }

    /// `POST /access/GiveAccess`
    ///
    /// # Errors
    ///
    /// Returns `ApiError::MissingCredential` without sending anything when no
    /// token is available, otherwise errors for network failures, API errors,
    /// or parsing failures
    pub async fn give_access(&self, grant: &GrantAccess) -> Result<GrantAccessResponse, ApiError> {
        if !self.credentials.has_token() {
            return Err(ApiError::MissingCredential);
        }

        tracing::debug!(
            folder_id = %grant.folder_id,
            employee_id = %grant.employee_id,
            "Granting folder access"
        );
        self.execute_json(self.client.post(self.url(&["access", "GiveAccess"])?).json(grant))
            .await
    }
}

impl std::fmt::Debug for AccessApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl AccessApi for AccessApiClient {
    fn list_employees(&self) -> ApiFuture<'_, Vec<Employee>> {
        Box::pin(self.employees())
    }

    fn list_folders(&self) -> ApiFuture<'_, Vec<Folder>> {
        Box::pin(self.folders())
    }

    fn list_access_requests(&self) -> ApiFuture<'_, Vec<Folder>> {
        Box::pin(self.access_requests())
    }

    fn update_request_status(
        &self,
        request_id: RequestId,
        status: RequestStatus,
    ) -> ApiFuture<'_, ()> {
        Box::pin(async move { self.update_status(&request_id, status).await })
    }

    fn delete_request(&self, request_id: RequestId) -> ApiFuture<'_, ()> {
        Box::pin(async move { self.delete(&request_id).await })
    }

    fn grant_access(&self, grant: GrantAccess) -> ApiFuture<'_, GrantAccessResponse> {
        Box::pin(async move { self.give_access(&grant).await })
    }
}

fn trim_base(mut base_url: String) -> String {
    while base_url.ends_with('/') {
        base_url.pop();
    }
    base_url
}
