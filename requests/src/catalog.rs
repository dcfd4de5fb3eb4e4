//! Read-only directory of employees and folders used to fill grant inputs.

use folder_access_api::{Employee, EmployeeId, Folder, FolderId};
use serde::Serialize;

/// An entry of a selection input
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    /// Submitted value (an id)
    pub value: String,
    /// Shown label
    pub label: String,
}

/// Cached employee and folder directories
///
/// Each side is replaced wholesale when its load completes; a failed load
/// leaves the previous snapshot in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirectoryCatalog {
    employees: Vec<Employee>,
    folders: Vec<Folder>,
}

impl DirectoryCatalog {
    /// Creates an empty catalog
    #[must_use]
    pub const fn new() -> Self {
        Self {
            employees: Vec::new(),
            folders: Vec::new(),
        }
    }

    /// Replaces the employee directory
    pub fn set_employees(&mut self, employees: Vec<Employee>) {
        self.employees = employees;
    }

    /// Replaces the folder directory
    pub fn set_folders(&mut self, folders: Vec<Folder>) {
        self.folders = folders;
    }

    /// All employees, in API order
    #[must_use]
    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    /// All folders, in API order
    #[must_use]
    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    /// Looks up an employee by either of its id keys
    #[must_use]
    pub fn employee(&self, id: &EmployeeId) -> Option<&Employee> {
        self.employees.iter().find(|e| e.is(id))
    }

    /// Looks up a folder by either of its id keys
    #[must_use]
    pub fn folder(&self, id: &FolderId) -> Option<&Folder> {
        self.folders.iter().find(|f| f.is(id))
    }

    /// Options for the employee selector
    ///
    /// Values are the ids the grant endpoint expects, see
    /// [`Employee::grant_id`].
    #[must_use]
    pub fn employee_options(&self) -> Vec<SelectOption> {
        self.employees
            .iter()
            .map(|e| SelectOption {
                value: e.grant_id().to_string(),
                label: e.label().to_string(),
            })
            .collect()
    }

    /// Options for the folder selector
    #[must_use]
    pub fn folder_options(&self) -> Vec<SelectOption> {
        self.folders
            .iter()
            .map(|f| SelectOption {
                value: f.grant_id().to_string(),
                label: f.name.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_prefer_username_then_email_then_id() {
        let mut catalog = DirectoryCatalog::new();
        catalog.set_employees(vec![
            Employee::new("E1", "ada", "ada@example.com"),
            Employee {
                id: EmployeeId::new("E2"),
                object_id: None,
                username: None,
                email: Some("grace@example.com".to_string()),
            },
            Employee {
                id: EmployeeId::new("E3"),
                object_id: None,
                username: None,
                email: None,
            },
        ]);

        let labels: Vec<_> = catalog
            .employee_options()
            .into_iter()
            .map(|o| o.label)
            .collect();

        assert_eq!(labels, vec!["ada", "grace@example.com", "E3"]);
    }

    #[test]
    fn lookups() {
        let mut catalog = DirectoryCatalog::new();
        catalog.set_folders(vec![Folder::new("F2", "Audit")]);

        assert_eq!(catalog.folder(&FolderId::new("F2")).map(|f| f.name.as_str()), Some("Audit"));
        assert!(catalog.folder(&FolderId::new("F9")).is_none());
        assert!(catalog.employee(&EmployeeId::new("E1")).is_none());
        assert_eq!(
            catalog.folder_options(),
            vec![SelectOption {
                value: "F2".to_string(),
                label: "Audit".to_string()
            }]
        );
    }

    #[test]
    fn option_values_use_document_keys() {
        let mut catalog = DirectoryCatalog::new();
        catalog.set_employees(vec![
            Employee::new("e1", "ada", "ada@example.com").with_object_id("mongo-e1"),
            Employee::new("e2", "grace", "grace@example.com"),
        ]);
        catalog.set_folders(vec![Folder::new("f1", "Reports").with_object_id("mongo-f1")]);

        let employees: Vec<_> = catalog
            .employee_options()
            .into_iter()
            .map(|o| o.value)
            .collect();
        assert_eq!(employees, vec!["mongo-e1", "e2"]);
        assert_eq!(catalog.folder_options()[0].value, "mongo-f1");

        // A submitted value resolves back to its entry
        assert_eq!(
            catalog.employee(&EmployeeId::new("mongo-e1")).map(|e| e.label()),
            Some("ada")
        );
        assert!(catalog.folder(&FolderId::new("f1")).is_some());
    }
}
