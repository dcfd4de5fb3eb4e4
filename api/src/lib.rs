//! # Folder Access API Client
//!
//! Rust client for the remote access-control API that owns folders,
//! employees and access requests.
//!
//! ## Example
//!
//! ```no_run
//! use folder_access_api::{AccessApi, AccessApiClient, EnvCredential};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Bearer token from ACCESS_API_TOKEN
//!     let client = AccessApiClient::new(
//!         "https://file-system-black.vercel.app",
//!         Arc::new(EnvCredential::default()),
//!     );
//!
//!     let folders = client.list_access_requests().await?;
//!     println!("{} folders with requests", folders.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Endpoints
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | GET | `/user/employees` | Employee directory |
//! | GET | `/file/getAllFolders` | Folder directory |
//! | GET | `/access/get-requests` | Folders with their access requests |
//! | PUT | `/access/update-request/{requestId}` | Approve or reject |
//! | DELETE | `/access/access-requests/{requestId}` | Delete a request |
//! | POST | `/access/GiveAccess` | Grant access directly |

pub mod client;
pub mod credentials;
pub mod error;
pub mod types;

use std::future::Future;
use std::pin::Pin;

// Re-export main types for convenience
pub use client::AccessApiClient;
pub use credentials::{CredentialSource, EnvCredential, StaticCredential};
pub use error::ApiError;
pub use types::{
    Employee, EmployeeId, Folder, FolderId, GrantAccess, GrantAccessResponse, RequestId,
    RequestRecord, RequestStatus, GRANT_CONFIRMATION,
};

/// Boxed future returned by [`AccessApi`] methods
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send + 'a>>;

/// The remote access-control API
///
/// Uses explicit `Pin<Box<dyn Future>>` returns instead of `async fn` so the
/// API can be shared as `Arc<dyn AccessApi>` and captured by effects.
pub trait AccessApi: Send + Sync {
    /// `GET /user/employees`
    fn list_employees(&self) -> ApiFuture<'_, Vec<Employee>>;

    /// `GET /file/getAllFolders`
    fn list_folders(&self) -> ApiFuture<'_, Vec<Folder>>;

    /// `GET /access/get-requests`, each folder carrying its access requests
    fn list_access_requests(&self) -> ApiFuture<'_, Vec<Folder>>;

    /// `PUT /access/update-request/{requestId}` with `{status}`
    fn update_request_status(
        &self,
        request_id: RequestId,
        status: RequestStatus,
    ) -> ApiFuture<'_, ()>;

    /// `DELETE /access/access-requests/{requestId}`
    fn delete_request(&self, request_id: RequestId) -> ApiFuture<'_, ()>;

    /// `POST /access/GiveAccess`
    ///
    /// Returns the raw response body. Whether it confirms the grant is for
    /// the caller to decide, see [`GrantAccessResponse::is_confirmed`].
    fn grant_access(&self, grant: GrantAccess) -> ApiFuture<'_, GrantAccessResponse>;
}
