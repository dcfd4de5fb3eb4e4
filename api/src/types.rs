//! Wire types for the access API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Exact `msg` the API returns when a direct grant succeeded
pub const GRANT_CONFIRMATION: &str = "Folder access granted to employee";

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier from any string-like value
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }
    };
}

string_id!(
    /// Identifier of an access request, stable across its lifetime
    RequestId
);
string_id!(
    /// Identifier of a folder
    FolderId
);
string_id!(
    /// Identifier of an employee
    EmployeeId
);

/// Status of an access request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Awaiting a decision (initial)
    Pending,
    /// Approved (terminal)
    Approved,
    /// Rejected (terminal)
    Rejected,
}

impl RequestStatus {
    /// Whether no further status transition is defined from this state
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// Whether `self → target` is a transition of the request lifecycle
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(self, Self::Pending) && target.is_terminal()
    }

    /// Wire name of the status
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Employee as returned by the directory
///
/// The API is inconsistent about id keys: some payloads carry `id`, some
/// `_id`, some both. [`Employee::id`] prefers `id`; the `_id` key is kept
/// separately because it is what the grant endpoint expects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "EmployeeWire")]
pub struct Employee {
    /// Employee identifier (`id`, else `_id`)
    pub id: EmployeeId,
    /// Document key (`_id`), when the payload carried one
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub object_id: Option<EmployeeId>,
    /// Login name
    pub username: Option<String>,
    /// Contact email
    pub email: Option<String>,
}

impl Employee {
    /// Creates an employee projection
    #[must_use]
    pub fn new(id: impl Into<String>, username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: EmployeeId::new(id),
            object_id: None,
            username: Some(username.into()),
            email: Some(email.into()),
        }
    }

    /// Sets the `_id` document key
    #[must_use]
    pub fn with_object_id(mut self, object_id: impl Into<String>) -> Self {
        self.object_id = Some(EmployeeId::new(object_id));
        self
    }

    /// Id submitted when granting access: `_id`, else `id`
    #[must_use]
    pub fn grant_id(&self) -> &EmployeeId {
        self.object_id.as_ref().unwrap_or(&self.id)
    }

    /// Whether `id` names this employee under either key
    #[must_use]
    pub fn is(&self, id: &EmployeeId) -> bool {
        &self.id == id || self.object_id.as_ref() == Some(id)
    }

    /// Label for selection inputs: username, else email, else id
    #[must_use]
    pub fn label(&self) -> &str {
        non_empty(self.username.as_deref())
            .or_else(|| non_empty(self.email.as_deref()))
            .unwrap_or_else(|| self.id.as_str())
    }
}

#[derive(Deserialize)]
struct EmployeeWire {
    id: Option<EmployeeId>,
    #[serde(rename = "_id")]
    object_id: Option<EmployeeId>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

impl From<EmployeeWire> for Employee {
    fn from(wire: EmployeeWire) -> Self {
        Self {
            id: wire
                .id
                .or_else(|| wire.object_id.clone())
                .unwrap_or_else(|| EmployeeId::new("")),
            object_id: wire.object_id,
            username: wire.username,
            email: wire.email,
        }
    }
}

/// A single access request as nested under its folder
///
/// Decoding is lenient where the API is loose: an employee reference that
/// was not populated (a bare id, or anything else that is not an object)
/// reads as `None`, and a missing or malformed `createdAt` reads as `None`.
/// One such record does not sink the whole listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestRecord {
    /// Request identifier
    pub request_id: RequestId,
    /// Requesting employee, when the API populated it
    #[serde(default, deserialize_with = "populated_employee")]
    pub employee: Option<Employee>,
    /// Current status
    pub status: RequestStatus,
    /// Free-text justification
    #[serde(default)]
    pub reason: String,
    /// Creation time, when the API sent a valid one
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EmployeeRef {
    Populated(Employee),
    Unresolved(serde::de::IgnoredAny),
}

fn populated_employee<'de, D>(deserializer: D) -> Result<Option<Employee>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<EmployeeRef>::deserialize(deserializer)? {
        Some(EmployeeRef::Populated(employee)) => Some(employee),
        Some(EmployeeRef::Unresolved(_)) | None => None,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TimestampRef {
    Valid(DateTime<Utc>),
    Invalid(serde::de::IgnoredAny),
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<TimestampRef>::deserialize(deserializer)? {
        Some(TimestampRef::Valid(at)) => Some(at),
        Some(TimestampRef::Invalid(_)) | None => None,
    })
}

/// Folder with (optionally) its access requests
///
/// Same id-key rules as [`Employee`]: [`Folder::id`] is what requests are
/// tagged with, [`Folder::grant_id`] is what the grant endpoint receives.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FolderWire")]
pub struct Folder {
    /// Folder identifier (`id`, else `_id`)
    pub id: FolderId,
    /// Document key (`_id`), when the payload carried one
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub object_id: Option<FolderId>,
    /// Display name
    pub name: String,
    /// Requests in the order the API returned them
    #[serde(rename = "accessRequests")]
    pub access_requests: Vec<RequestRecord>,
}

impl Folder {
    /// Creates a folder with no requests
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: FolderId::new(id),
            object_id: None,
            name: name.into(),
            access_requests: Vec::new(),
        }
    }

    /// Sets the `_id` document key
    #[must_use]
    pub fn with_object_id(mut self, object_id: impl Into<String>) -> Self {
        self.object_id = Some(FolderId::new(object_id));
        self
    }

    /// Adds a request to the folder
    #[must_use]
    pub fn with_request(mut self, request: RequestRecord) -> Self {
        self.access_requests.push(request);
        self
    }

    /// Id submitted when granting access: `_id`, else `id`
    #[must_use]
    pub fn grant_id(&self) -> &FolderId {
        self.object_id.as_ref().unwrap_or(&self.id)
    }

    /// Whether `id` names this folder under either key
    #[must_use]
    pub fn is(&self, id: &FolderId) -> bool {
        &self.id == id || self.object_id.as_ref() == Some(id)
    }
}

#[derive(Deserialize)]
struct FolderWire {
    id: Option<FolderId>,
    #[serde(rename = "_id")]
    object_id: Option<FolderId>,
    #[serde(default)]
    name: String,
    #[serde(default, rename = "accessRequests")]
    access_requests: Option<Vec<RequestRecord>>,
}

impl From<FolderWire> for Folder {
    fn from(wire: FolderWire) -> Self {
        Self {
            id: wire
                .id
                .or_else(|| wire.object_id.clone())
                .unwrap_or_else(|| FolderId::new("")),
            object_id: wire.object_id,
            name: wire.name,
            access_requests: wire.access_requests.unwrap_or_default(),
        }
    }
}

/// Body of `POST /access/GiveAccess`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantAccess {
    /// Folder to grant
    pub folder_id: FolderId,
    /// Employee receiving access
    pub employee_id: EmployeeId,
    /// Justification
    pub reason: String,
}

/// Response of `POST /access/GiveAccess`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantAccessResponse {
    /// Server message
    #[serde(default)]
    pub msg: Option<String>,
}

impl GrantAccessResponse {
    /// A 2xx alone is not proof of success; only the exact message is
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.msg.as_deref() == Some(GRANT_CONFIRMATION)
    }
}

#[derive(Deserialize)]
pub(crate) struct EmployeesEnvelope {
    #[serde(default)]
    pub employees: Vec<Employee>,
}

#[derive(Deserialize)]
pub(crate) struct FoldersEnvelope {
    #[serde(default)]
    pub folders: Vec<Folder>,
}

#[derive(Serialize)]
pub(crate) struct StatusUpdate {
    pub status: RequestStatus,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_lifecycle() {
        assert!(!RequestStatus::Pending.is_terminal());
        assert!(RequestStatus::Approved.is_terminal());
        assert!(RequestStatus::Pending.can_transition_to(RequestStatus::Rejected));
        assert!(!RequestStatus::Approved.can_transition_to(RequestStatus::Rejected));
        assert!(!RequestStatus::Rejected.can_transition_to(RequestStatus::Pending));
        assert!(!RequestStatus::Pending.can_transition_to(RequestStatus::Pending));
    }

    #[test]
    fn folder_accepts_either_id_key_and_missing_requests() {
        let folder: Folder = serde_json::from_value(json!({"_id": "f1", "name": "Reports"}))
            .unwrap_or_else(|e| panic!("folder should parse: {e}"));

        assert_eq!(folder.id, FolderId::new("f1"));
        assert!(folder.access_requests.is_empty());
    }

    #[test]
    fn employee_keeps_both_id_keys() {
        let employee: Employee = serde_json::from_value(json!({
            "id": "e1",
            "_id": "mongo-e1",
            "username": "ada"
        }))
        .unwrap_or_else(|e| panic!("employee should parse: {e}"));

        assert_eq!(employee.id, EmployeeId::new("e1"));
        assert_eq!(employee.grant_id(), &EmployeeId::new("mongo-e1"));
        assert!(employee.is(&EmployeeId::new("e1")));
        assert!(employee.is(&EmployeeId::new("mongo-e1")));
        assert_eq!(employee.email, None);
        assert_eq!(employee.label(), "ada");
    }

    #[test]
    fn folder_grant_id_prefers_object_id() {
        let both: Folder =
            serde_json::from_value(json!({"id": "f1", "_id": "mongo-f1", "name": "Reports"}))
                .unwrap_or_else(|e| panic!("folder should parse: {e}"));
        let plain = Folder::new("f2", "Audit");

        assert_eq!(both.id, FolderId::new("f1"));
        assert_eq!(both.grant_id(), &FolderId::new("mongo-f1"));
        assert_eq!(plain.grant_id(), &FolderId::new("f2"));
    }

    #[test]
    fn employee_label_falls_back() {
        let employee = Employee {
            id: EmployeeId::new("e9"),
            object_id: None,
            username: Some(String::new()),
            email: None,
        };
        assert_eq!(employee.label(), "e9");
    }

    #[test]
    fn request_record_parses_camel_case() {
        let record: RequestRecord = serde_json::from_value(json!({
            "requestId": "r1",
            "employee": {"_id": "e1", "username": "ada", "email": "ada@example.com"},
            "status": "pending",
            "reason": "quarterly audit",
            "createdAt": "2025-03-01T10:00:00Z"
        }))
        .unwrap_or_else(|e| panic!("record should parse: {e}"));

        assert_eq!(record.request_id, RequestId::new("r1"));
        assert_eq!(record.status, RequestStatus::Pending);
        assert_eq!(record.employee.map(|e| e.id), Some(EmployeeId::new("e1")));
        assert_eq!(
            record.created_at,
            DateTime::parse_from_rfc3339("2025-03-01T10:00:00Z")
                .ok()
                .map(|at| at.with_timezone(&Utc))
        );
    }

    #[test]
    fn loose_records_do_not_sink_the_folder() {
        let folder: Folder = serde_json::from_value(json!({
            "id": "f1",
            "name": "Finance",
            "accessRequests": [
                {
                    "requestId": "r1",
                    "employee": {"_id": "e1", "username": "ada"},
                    "status": "pending",
                    "reason": "close",
                    "createdAt": "2025-03-01T10:00:00Z"
                },
                {"requestId": "r2", "employee": "e2", "status": "approved"},
                {"requestId": "r3", "employee": null, "status": "rejected", "createdAt": "yesterday"}
            ]
        }))
        .unwrap_or_else(|e| panic!("folder should parse: {e}"));

        let summary: Vec<_> = folder
            .access_requests
            .iter()
            .map(|r| (r.request_id.as_str(), r.employee.is_some(), r.created_at.is_some()))
            .collect();
        assert_eq!(
            summary,
            vec![("r1", true, true), ("r2", false, false), ("r3", false, false)]
        );
    }

    #[test]
    fn grant_confirmation_is_exact() {
        let ok = GrantAccessResponse {
            msg: Some(GRANT_CONFIRMATION.to_string()),
        };
        let other = GrantAccessResponse {
            msg: Some("ok".to_string()),
        };

        assert!(ok.is_confirmed());
        assert!(!other.is_confirmed());
        assert!(!GrantAccessResponse::default().is_confirmed());
    }

    #[test]
    fn grant_body_is_camel_case() {
        let body = GrantAccess {
            folder_id: FolderId::new("F2"),
            employee_id: EmployeeId::new("E3"),
            reason: "audit".to_string(),
        };
        let value = serde_json::to_value(&body).unwrap_or_default();

        assert_eq!(
            value,
            json!({"folderId": "F2", "employeeId": "E3", "reason": "audit"})
        );
    }
}
