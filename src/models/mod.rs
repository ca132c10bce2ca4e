// src/models/mod.rs

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ───────────────────────────────────────
// Departments
// ───────────────────────────────────────

/// Departments a complaint can be filed against.
pub const DEPARTMENTS: &[&str] = &[
    "Civil",
    "Mechanical",
    "Electrical",
    "Electronics & Telecommunication",
    "Computer Science",
    "Information Technology",
    "Administration",
];

/// Admin-scope sentinel granting every department. Never a complaint's own department.
pub const ALL_DEPARTMENTS: &str = "ALL";

pub fn is_known_department(name: &str) -> bool {
    DEPARTMENTS.contains(&name)
}

// ───────────────────────────────────────
// Status & priority
// ───────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplaintStatus {
    New,
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
    Closed,
}

impl ComplaintStatus {
    pub const ALL: [ComplaintStatus; 5] = [
        ComplaintStatus::New,
        ComplaintStatus::Pending,
        ComplaintStatus::InProgress,
        ComplaintStatus::Resolved,
        ComplaintStatus::Closed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ComplaintStatus::New => "New",
            ComplaintStatus::Pending => "Pending",
            ComplaintStatus::InProgress => "In Progress",
            ComplaintStatus::Resolved => "Resolved",
            ComplaintStatus::Closed => "Closed",
        }
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplaintStatus {
    type Err = String;

    // case-insensitive, matches how the status picker preselects the current value
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown complaint status '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(format!("unknown priority '{other}'")),
        }
    }
}

// ───────────────────────────────────────
// Complaints
// ───────────────────────────────────────

/// One reported issue.
///
/// Text fields are optional because stored records are not guaranteed to
/// carry all of them; every consumer treats an absent field as "no match".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Complaint {
    /// Empty until the record has been written once.
    #[serde(default)]
    pub id: String,
    pub department: Option<String>,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub complaint_type: Option<String>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub remarks: Option<String>,
    pub priority: Option<String>,
    pub location: Option<String>,
    /// Assigned by storage at write time.
    pub created_at: Option<DateTime<Utc>>,
}

/// Validated submission; see `Complaint::from_submission`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComplaint {
    pub department: String,
    pub complaint_type: String,
    pub contact_person: String,
    pub phone: String,
    pub email: String,
    pub description: String,
    pub priority: Priority,
    pub location: String,
}

impl Complaint {
    /// Unsaved complaint: status `New`, empty remarks, no id, no timestamp.
    pub fn from_submission(n: NewComplaint) -> Self {
        Complaint {
            id: String::new(),
            department: Some(n.department),
            complaint_type: Some(n.complaint_type),
            contact_person: Some(n.contact_person),
            phone: Some(n.phone),
            email: Some(n.email),
            description: Some(n.description),
            status: Some(ComplaintStatus::New.as_str().to_string()),
            remarks: Some(String::new()),
            priority: Some(n.priority.as_str().to_string()),
            location: Some(n.location),
            created_at: None,
        }
    }
}

// ───────────────────────────────────────
// Users & grants
// ───────────────────────────────────────

pub const ROLE_CLIENT: &str = "client";
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_SUPERADMIN: &str = "superadmin";
pub const USER_STATUS_PENDING: &str = "pending";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// `admin` and `superadmin` never show up in user management.
    pub fn is_reserved(&self) -> bool {
        self.role == ROLE_ADMIN || self.role == ROLE_SUPERADMIN
    }
}

/// Stored password material for one user.
#[derive(Debug, Clone, FromRow)]
pub struct Credentials {
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
}

/// Department scope granted to an administrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AdminGrant {
    pub email: String,
    pub departments: Vec<String>,
}

// ───────────────────────────────────────
// DTOs
// ───────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct Deleted {
    pub deleted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> NewComplaint {
        NewComplaint {
            department: "Civil".into(),
            complaint_type: "Plumbing".into(),
            contact_person: "Asha".into(),
            phone: "9999999999".into(),
            email: "a@x.com".into(),
            description: "Leaking pipe".into(),
            priority: Priority::High,
            location: "Block B".into(),
        }
    }

    #[test]
    fn new_complaint_defaults() {
        let c = Complaint::from_submission(submission());
        assert!(c.id.is_empty());
        assert_eq!(c.status.as_deref(), Some("New"));
        assert_eq!(c.remarks.as_deref(), Some(""));
        assert_eq!(c.priority.as_deref(), Some("High"));
        assert!(c.created_at.is_none());
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("in progress".parse::<ComplaintStatus>(), Ok(ComplaintStatus::InProgress));
        assert_eq!(" RESOLVED ".parse::<ComplaintStatus>(), Ok(ComplaintStatus::Resolved));
        assert!("done".parse::<ComplaintStatus>().is_err());
    }

    #[test]
    fn complaint_serializes_type_field() {
        let c = Complaint::from_submission(submission());
        let v = serde_json::to_value(&c).unwrap();
        assert_eq!(v["type"], "Plumbing");
        assert!(v.get("complaint_type").is_none());
    }

    #[test]
    fn sentinel_is_not_a_department() {
        assert!(!is_known_department(ALL_DEPARTMENTS));
        assert!(is_known_department("Electrical"));
    }
}
