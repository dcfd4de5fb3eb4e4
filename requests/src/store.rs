//! Flattened, in-memory view of every access request across folders.
//!
//! The remote API nests requests under their folder. The admin page works
//! on one flat list, so [`RequestStore::load`] copies each folder's id and
//! name onto its requests. That copy is a snapshot: renaming a folder
//! remotely is not reflected until the next full reload.
//!
//! The store never talks to the network. Its update operations are the
//! local counterpart of a remote call that has already succeeded.

use chrono::{DateTime, NaiveDate, Utc};
use folder_access_api::{Employee, Folder, FolderId, RequestId, RequestRecord, RequestStatus};
use serde::Serialize;
use std::collections::HashMap;

/// Display name used when a request carries no employee
pub const UNKNOWN_EMPLOYEE: &str = "Unknown";

/// An access request annotated with its owning folder
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRequest {
    /// Request identifier
    pub request_id: RequestId,
    /// Owning folder at load time
    pub folder_id: FolderId,
    /// Owning folder name at load time
    pub folder_name: String,
    /// Requesting employee, when known
    pub employee: Option<Employee>,
    /// Current status
    pub status: RequestStatus,
    /// Justification
    pub reason: String,
    /// Creation time, if the API sent a valid one
    pub created_at: Option<DateTime<Utc>>,
}

impl AccessRequest {
    /// Copies a nested record out of its folder
    #[must_use]
    pub fn from_record(folder: &Folder, record: &RequestRecord) -> Self {
        Self {
            request_id: record.request_id.clone(),
            folder_id: folder.id.clone(),
            folder_name: folder.name.clone(),
            employee: record.employee.clone(),
            status: record.status,
            reason: record.reason.clone(),
            created_at: record.created_at,
        }
    }

    /// Employee username, or `"Unknown"`
    #[must_use]
    pub fn employee_name(&self) -> &str {
        self.employee
            .as_ref()
            .and_then(|e| e.username.as_deref())
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_EMPLOYEE)
    }

    /// Employee email, if any
    #[must_use]
    pub fn employee_email(&self) -> Option<&str> {
        self.employee.as_ref().and_then(|e| e.email.as_deref())
    }

    /// Calendar date the request was created
    #[must_use]
    pub fn created_on(&self) -> Option<NaiveDate> {
        self.created_at.map(|at| at.date_naive())
    }

    /// Whether the request still awaits a decision
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }
}

/// Tally of requests per status
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    /// Requests awaiting a decision
    pub pending: usize,
    /// Approved requests
    pub approved: usize,
    /// Rejected requests
    pub rejected: usize,
}

impl StatusCounts {
    /// Sum over every status
    #[must_use]
    pub const fn total(&self) -> usize {
        self.pending + self.approved + self.rejected
    }
}

/// The flattened request collection
///
/// Request ids are expected to be unique but this is not enforced: a
/// duplicated id is kept as two entries and every operation keyed by id
/// acts on all of them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RequestStore {
    requests: Vec<AccessRequest>,
}

impl RequestStore {
    /// Creates an empty store
    #[must_use]
    pub const fn new() -> Self {
        Self {
            requests: Vec::new(),
        }
    }

    /// Flattens folders into a store, folder order first, then request order
    #[must_use]
    pub fn load(folders: &[Folder]) -> Self {
        let requests: Vec<AccessRequest> = folders
            .iter()
            .flat_map(|folder| {
                folder
                    .access_requests
                    .iter()
                    .map(move |record| AccessRequest::from_record(folder, record))
            })
            .collect();

        let store = Self { requests };
        for id in store.duplicate_ids() {
            tracing::warn!(request_id = %id, "Request id appears more than once");
        }
        store
    }

    /// Copy of the store with every entry for `request_id` set to `status`
    #[must_use]
    pub fn replace_status(&self, request_id: &RequestId, status: RequestStatus) -> Self {
        let mut next = self.clone();
        next.apply_status(request_id, status);
        next
    }

    /// Copy of the store without the entries for `request_id`
    #[must_use]
    pub fn remove(&self, request_id: &RequestId) -> Self {
        let mut next = self.clone();
        next.apply_remove(request_id);
        next
    }

    /// In-place [`Self::replace_status`], returns how many entries matched
    pub fn apply_status(&mut self, request_id: &RequestId, status: RequestStatus) -> usize {
        let mut matched = 0;
        for request in self
            .requests
            .iter_mut()
            .filter(|r| &r.request_id == request_id)
        {
            request.status = status;
            matched += 1;
        }
        matched
    }

    /// In-place [`Self::remove`], returns how many entries were dropped
    pub fn apply_remove(&mut self, request_id: &RequestId) -> usize {
        let before = self.requests.len();
        self.requests.retain(|r| &r.request_id != request_id);
        before - self.requests.len()
    }

    /// Drops every entry
    pub fn clear(&mut self) {
        self.requests.clear();
    }

    /// First entry for `request_id`
    #[must_use]
    pub fn get(&self, request_id: &RequestId) -> Option<&AccessRequest> {
        self.requests.iter().find(|r| &r.request_id == request_id)
    }

    /// Whether any entry carries `request_id`
    #[must_use]
    pub fn contains(&self, request_id: &RequestId) -> bool {
        self.get(request_id).is_some()
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Whether the store holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Entries in load order
    pub fn iter(&self) -> impl Iterator<Item = &AccessRequest> {
        self.requests.iter()
    }

    /// Entries as a slice
    #[must_use]
    pub fn as_slice(&self) -> &[AccessRequest] {
        &self.requests
    }

    /// Entries with the given status
    pub fn with_status(&self, status: RequestStatus) -> impl Iterator<Item = &AccessRequest> {
        self.requests.iter().filter(move |r| r.status == status)
    }

    /// Per-status tallies
    #[must_use]
    pub fn counts(&self) -> StatusCounts {
        self.requests
            .iter()
            .fold(StatusCounts::default(), |mut counts, r| {
                match r.status {
                    RequestStatus::Pending => counts.pending += 1,
                    RequestStatus::Approved => counts.approved += 1,
                    RequestStatus::Rejected => counts.rejected += 1,
                }
                counts
            })
    }

    /// Ids carried by more than one entry, in first-seen order
    #[must_use]
    pub fn duplicate_ids(&self) -> Vec<RequestId> {
        let mut seen: HashMap<&RequestId, usize> = HashMap::new();
        for request in &self.requests {
            *seen.entry(&request.request_id).or_default() += 1;
        }

        let mut duplicates = Vec::new();
        for request in &self.requests {
            if seen.get(&request.request_id).copied().unwrap_or(0) > 1
                && !duplicates.contains(&request.request_id)
            {
                duplicates.push(request.request_id.clone());
            }
        }
        duplicates
    }
}

impl<'a> IntoIterator for &'a RequestStore {
    type Item = &'a AccessRequest;
    type IntoIter = std::slice::Iter<'a, AccessRequest>;

    fn into_iter(self) -> Self::IntoIter {
        self.requests.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(id: &str, status: RequestStatus) -> RequestRecord {
        RequestRecord {
            request_id: RequestId::new(id),
            employee: Some(Employee::new("E1", "ada", "ada@example.com")),
            status,
            reason: "quarterly close".to_string(),
            created_at: DateTime::from_timestamp(1_738_402_200, 0),
        }
    }

    fn sample_folders() -> Vec<Folder> {
        vec![
            Folder::new("F1", "Finance")
                .with_request(record("r1", RequestStatus::Pending))
                .with_request(record("r2", RequestStatus::Approved)),
            Folder::new("F2", "Legal"),
            Folder::new("F3", "Audit").with_request(record("r3", RequestStatus::Rejected)),
        ]
    }

    #[test]
    fn load_tags_requests_with_owning_folder() {
        let store = RequestStore::load(&sample_folders());

        let tagged: Vec<_> = store
            .iter()
            .map(|r| (r.request_id.as_str(), r.folder_id.as_str(), r.folder_name.as_str()))
            .collect();

        assert_eq!(
            tagged,
            vec![
                ("r1", "F1", "Finance"),
                ("r2", "F1", "Finance"),
                ("r3", "F3", "Audit"),
            ]
        );
    }

    #[test]
    fn load_keeps_duplicate_ids() {
        let folders = vec![
            Folder::new("F1", "Finance").with_request(record("r1", RequestStatus::Pending)),
            Folder::new("F2", "Legal").with_request(record("r1", RequestStatus::Pending)),
        ];

        let store = RequestStore::load(&folders);

        assert_eq!(store.len(), 2);
        assert_eq!(store.duplicate_ids(), vec![RequestId::new("r1")]);

        let approved = store.replace_status(&RequestId::new("r1"), RequestStatus::Approved);
        assert_eq!(approved.counts().approved, 2);
        assert!(approved.remove(&RequestId::new("r1")).is_empty());
    }

    #[test]
    fn replace_status_touches_only_status() {
        let store = RequestStore::load(&sample_folders());
        let id = RequestId::new("r1");

        let next = store.replace_status(&id, RequestStatus::Approved);

        let before = store.get(&id).unwrap();
        let after = next.get(&id).unwrap();
        assert_eq!(after.status, RequestStatus::Approved);
        assert_eq!(
            AccessRequest {
                status: before.status,
                ..after.clone()
            },
            *before
        );
        // Source is untouched
        assert_eq!(store.get(&id).unwrap().status, RequestStatus::Pending);
    }

    #[test]
    fn missing_id_is_a_no_op() {
        let store = RequestStore::load(&sample_folders());
        let missing = RequestId::new("nonexistent");

        assert_eq!(store.replace_status(&missing, RequestStatus::Approved), store);
        assert_eq!(store.remove(&missing), store);
    }

    #[test]
    fn remove_ignores_status() {
        let store = RequestStore::load(&sample_folders());

        let next = store
            .remove(&RequestId::new("r2"))
            .remove(&RequestId::new("r3"));

        assert_eq!(next.len(), 1);
        assert!(next.contains(&RequestId::new("r1")));
    }

    #[test]
    fn counts_and_status_filter() {
        let store = RequestStore::load(&sample_folders());

        assert_eq!(
            store.counts(),
            StatusCounts {
                pending: 1,
                approved: 1,
                rejected: 1
            }
        );
        assert_eq!(store.with_status(RequestStatus::Pending).count(), 1);
    }

    #[test]
    fn unknown_employee_name() {
        let mut folder = Folder::new("F1", "Finance").with_request(record("r1", RequestStatus::Pending));
        folder.access_requests[0].employee = None;

        let store = RequestStore::load(&[folder]);
        let request = store.get(&RequestId::new("r1")).unwrap();

        assert_eq!(request.employee_name(), UNKNOWN_EMPLOYEE);
        assert_eq!(request.employee_email(), None);
        assert_eq!(request.created_on().map(|d| d.to_string()).as_deref(), Some("2025-02-01"));
    }

    fn status_strategy() -> impl Strategy<Value = RequestStatus> {
        prop_oneof![
            Just(RequestStatus::Pending),
            Just(RequestStatus::Approved),
            Just(RequestStatus::Rejected),
        ]
    }

    fn folders_strategy() -> impl Strategy<Value = Vec<Folder>> {
        prop::collection::vec(prop::collection::vec(status_strategy(), 0..6), 0..8).prop_map(
            |folders| {
                folders
                    .into_iter()
                    .enumerate()
                    .map(|(f, statuses)| {
                        statuses.into_iter().enumerate().fold(
                            Folder::new(format!("F{f}"), format!("Folder {f}")),
                            |folder, (r, status)| folder.with_request(record(&format!("r{f}-{r}"), status)),
                        )
                    })
                    .collect()
            },
        )
    }

    proptest! {
        #[test]
        fn load_yields_one_entry_per_nested_request(folders in folders_strategy()) {
            let expected: usize = folders.iter().map(|f| f.access_requests.len()).sum();
            let store = RequestStore::load(&folders);

            prop_assert_eq!(store.len(), expected);
            prop_assert_eq!(store.counts().total(), expected);

            let order: Vec<_> = folders
                .iter()
                .flat_map(|f| f.access_requests.iter().map(move |r| (&f.id, &r.request_id)))
                .collect();
            let flattened: Vec<_> = store.iter().map(|r| (&r.folder_id, &r.request_id)).collect();
            prop_assert_eq!(flattened, order);
        }

        #[test]
        fn replace_status_is_idempotent(
            folders in folders_strategy(),
            pick in 0usize..64,
            status in status_strategy(),
        ) {
            let store = RequestStore::load(&folders);
            let id = store
                .iter()
                .nth(pick % store.len().max(1))
                .map_or_else(|| RequestId::new("absent"), |r| r.request_id.clone());

            let once = store.replace_status(&id, status);
            let twice = once.replace_status(&id, status);

            prop_assert_eq!(once, twice);
        }
    }
}
