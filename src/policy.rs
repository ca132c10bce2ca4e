// src/policy.rs
//
// Who sees which complaint, and what they may do with it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::{Complaint, ALL_DEPARTMENTS};

// ───────────────────────────────────────
// Viewer
// ───────────────────────────────────────

/// Departments an administrator is responsible for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "departments", rename_all = "snake_case")]
pub enum DepartmentScope {
    All,
    Only(BTreeSet<String>),
}

impl DepartmentScope {
    /// Builds a scope from a stored grant. Any `ALL` entry widens to every
    /// department; an empty list yields an empty scope that covers nothing.
    pub fn from_grant<I, S>(departments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = departments.into_iter().map(Into::into).collect();
        if set.contains(ALL_DEPARTMENTS) {
            DepartmentScope::All
        } else {
            DepartmentScope::Only(set)
        }
    }

    /// Case-sensitive exact match; an absent department is never covered
    /// by a narrowed scope.
    pub fn covers(&self, department: Option<&str>) -> bool {
        match self {
            DepartmentScope::All => true,
            DepartmentScope::Only(set) => department.map_or(false, |d| set.contains(d)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Viewer {
    SuperAdmin { email: String },
    DepartmentAdmin { email: String, scope: DepartmentScope },
    Client { email: String },
}

impl Viewer {
    pub fn email(&self) -> &str {
        match self {
            Viewer::SuperAdmin { email }
            | Viewer::DepartmentAdmin { email, .. }
            | Viewer::Client { email } => email,
        }
    }

    pub fn role_name(&self) -> &'static str {
        match self {
            Viewer::SuperAdmin { .. } => "superadmin",
            Viewer::DepartmentAdmin { .. } => "admin",
            Viewer::Client { .. } => "client",
        }
    }

    pub fn is_super_admin(&self) -> bool {
        matches!(self, Viewer::SuperAdmin { .. })
    }

    /// Query shape the store should run for this viewer.
    pub fn fetch_shape(&self) -> FetchShape {
        match self {
            Viewer::SuperAdmin { .. } | Viewer::DepartmentAdmin { .. } => FetchShape::AllNewestFirst,
            Viewer::Client { email } => FetchShape::ByEmail(email.clone()),
        }
    }
}

/// How complaints are read from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchShape {
    /// Every complaint, `created_at` descending.
    AllNewestFirst,
    /// Complaints whose email equals the given value.
    ByEmail(String),
}

// ───────────────────────────────────────
// Inclusion
// ───────────────────────────────────────

/// Whether `complaint` belongs in `viewer`'s result set at all.
pub fn includes(viewer: &Viewer, complaint: &Complaint) -> bool {
    match viewer {
        Viewer::SuperAdmin { .. } => true,
        Viewer::DepartmentAdmin { scope, .. } => scope.covers(complaint.department.as_deref()),
        Viewer::Client { email } => complaint.email.as_deref() == Some(email.as_str()),
    }
}

/// Applies inclusion to a freshly fetched collection, keeping order.
pub fn retain_included(viewer: &Viewer, complaints: Vec<Complaint>) -> Vec<Complaint> {
    complaints.into_iter().filter(|c| includes(viewer, c)).collect()
}

// ───────────────────────────────────────
// Per-row actions
// ───────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Actions {
    pub update: bool,
    pub remove: bool,
}

impl Actions {
    pub const NONE: Actions = Actions { update: false, remove: false };
}

/// Which administrative actions `viewer` gets on `complaint`.
///
/// Independent of inclusion: it only ever gates rows, it never hides them.
pub fn actions_for(viewer: &Viewer, complaint: &Complaint) -> Actions {
    match viewer {
        Viewer::SuperAdmin { .. } => Actions { update: true, remove: true },
        Viewer::DepartmentAdmin { scope, .. } if scope.covers(complaint.department.as_deref()) => {
            Actions { update: true, remove: false }
        }
        // owners and everyone else read only
        _ => Actions::NONE,
    }
}
