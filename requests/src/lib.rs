//! # Folder Access Requests
//!
//! State, reducer and effects behind the folder access-request admin page.
//!
//! - [`store`]: flattened request list and its pure update operations
//! - [`catalog`]: employee and folder directories for the grant form
//! - [`lifecycle`]: approve / reject / delete with confirmation
//! - [`grant`]: direct access grants
//! - [`reducer`]: ties them together as a [`Reducer`](folder_access_core::reducer::Reducer)
//!
//! ## Example
//!
//! ```no_run
//! use folder_access_api::{AccessApiClient, EnvCredential};
//! use folder_access_core::environment::SystemClock;
//! use folder_access_requests::{RequestsAction, RequestsEnvironment, RequestsReducer, RequestsState};
//! use folder_access_runtime::Store;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let credentials = Arc::new(EnvCredential::default());
//! let api = AccessApiClient::new("https://file-system-black.vercel.app", credentials.clone());
//! let env = RequestsEnvironment::new(Arc::new(api), credentials, Arc::new(SystemClock));
//! let store = Store::new(RequestsState::new(), RequestsReducer::new(), env);
//!
//! store.send(RequestsAction::Load).await?;
//! store.wait_until_idle(Duration::from_secs(30)).await?;
//!
//! let pending = store.state(|s| s.requests.counts().pending).await;
//! println!("{pending} pending requests");
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod environment;
pub mod error;
pub mod grant;
pub mod lifecycle;
pub mod reducer;
pub mod store;
pub mod types;

pub use catalog::{DirectoryCatalog, SelectOption};
pub use config::{AdminConfig, ConfigError};
pub use environment::RequestsEnvironment;
pub use error::{AccessError, Notification, NotificationKind};
pub use grant::{GrantField, GrantForm, GrantWorkflow};
pub use lifecycle::{ConfirmationPrompt, PendingConfirmation, PromptIcon, StoreMutation, Transition};
pub use reducer::RequestsReducer;
pub use store::{AccessRequest, RequestStore, StatusCounts};
pub use types::{RequestsAction, RequestsState};
