//! Direct access grants, bypassing the request queue.

use crate::error::{AccessError, INCOMPLETE_GRANT_FORM};
use folder_access_api::{EmployeeId, FolderId, GrantAccess};
use serde::Serialize;

/// A field of the grant form
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GrantField {
    /// Selected folder id
    Folder,
    /// Selected employee id
    Employee,
    /// Free-text justification
    Reason,
}

/// Raw input of the grant form
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantForm {
    /// Selected folder id, empty when unset
    pub folder_id: String,
    /// Selected employee id, empty when unset
    pub employee_id: String,
    /// Justification
    pub reason: String,
}

impl GrantForm {
    /// A filled-in form
    #[must_use]
    pub fn new(
        folder_id: impl Into<String>,
        employee_id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            folder_id: folder_id.into(),
            employee_id: employee_id.into(),
            reason: reason.into(),
        }
    }

    /// Sets one field
    pub fn set(&mut self, field: GrantField, value: String) {
        match field {
            GrantField::Folder => self.folder_id = value,
            GrantField::Employee => self.employee_id = value,
            GrantField::Reason => self.reason = value,
        }
    }

    /// Clears every field
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether every field is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.folder_id.is_empty() && self.employee_id.is_empty() && self.reason.is_empty()
    }

    /// Checks every field is present and builds the request body
    ///
    /// Whitespace-only input counts as missing. Ids are trimmed; the reason
    /// is submitted as typed.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::Validation`] when a field is blank.
    pub fn validate(&self) -> Result<GrantAccess, AccessError> {
        let folder_id = self.folder_id.trim();
        let employee_id = self.employee_id.trim();

        if folder_id.is_empty() || employee_id.is_empty() || self.reason.trim().is_empty() {
            return Err(AccessError::Validation(INCOMPLETE_GRANT_FORM.to_string()));
        }

        Ok(GrantAccess {
            folder_id: FolderId::new(folder_id),
            employee_id: EmployeeId::new(employee_id),
            reason: self.reason.clone(),
        })
    }
}

/// Grant dialog state
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantWorkflow {
    /// Current input
    pub form: GrantForm,
    /// Whether the dialog is shown
    pub is_open: bool,
}

impl GrantWorkflow {
    /// Shows the dialog, keeping any previous input
    pub fn open(&mut self) {
        self.is_open = true;
    }

    /// Hides the dialog and discards its input
    pub fn close(&mut self) {
        self.is_open = false;
        self.form.reset();
    }
}
