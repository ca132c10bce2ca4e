// src/store/memory.rs

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AccountStore, ComplaintStore, NewAccount};
use crate::error::{DeskError, Result};
use crate::models::{
    AdminGrant, Complaint, ComplaintStatus, Credentials, User, ROLE_CLIENT, USER_STATUS_PENDING,
};
use crate::policy::FetchShape;

fn unavailable() -> DeskError {
    DeskError::Store(sqlx::Error::PoolTimedOut)
}

/// Complaint store kept in process memory.
#[derive(Default)]
pub struct MemoryComplaintStore {
    rows: RwLock<Vec<Complaint>>,
    fail_writes: AtomicBool,
}

impl MemoryComplaintStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds already-persisted complaints as-is.
    pub fn with_complaints(rows: Vec<Complaint>) -> Self {
        Self { rows: RwLock::new(rows), fail_writes: AtomicBool::new(false) }
    }

    /// Makes every subsequent write fail as if the backend were unreachable.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(())
    }
}

#[async_trait]
impl ComplaintStore for MemoryComplaintStore {
    async fn fetch(&self, shape: &FetchShape) -> Result<Vec<Complaint>> {
        let rows = self.rows.read().await;
        let out = match shape {
            FetchShape::AllNewestFirst => {
                let mut all = rows.clone();
                // Option orders None first, so reversing puts undated rows last
                all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                all
            }
            FetchShape::ByEmail(email) => rows
                .iter()
                .filter(|c| c.email.as_deref() == Some(email.as_str()))
                .cloned()
                .collect(),
        };
        Ok(out)
    }

    async fn exists_for(&self, email: &str, complaint_type: &str) -> Result<bool> {
        Ok(self.rows.read().await.iter().any(|c| {
            c.email.as_deref() == Some(email) && c.complaint_type.as_deref() == Some(complaint_type)
        }))
    }

    async fn insert(&self, mut complaint: Complaint) -> Result<Complaint> {
        self.check_writable()?;
        let mut rows = self.rows.write().await;
        // same (email, type) uniqueness as the Postgres index
        if rows
            .iter()
            .any(|c| c.email == complaint.email && c.complaint_type == complaint.complaint_type)
        {
            return Err(DeskError::conflict("complaint already registered"));
        }
        complaint.id = Uuid::new_v4().to_string();
        complaint.created_at = Some(Utc::now());
        rows.push(complaint.clone());
        Ok(complaint)
    }

    async fn update_status(&self, id: &str, status: ComplaintStatus, remarks: &str) -> Result<()> {
        self.check_writable()?;
        let mut rows = self.rows.write().await;
        let row = rows
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| DeskError::not_found("complaint", id))?;
        row.status = Some(status.as_str().to_string());
        row.remarks = Some(remarks.to_string());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.check_writable()?;
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|c| c.id != id);
        if rows.len() == before {
            return Err(DeskError::not_found("complaint", id));
        }
        Ok(())
    }
}

struct AccountRow {
    user: User,
    password_hash: String,
}

/// Accounts, admin grants and super-admin grants kept in process memory.
#[derive(Default)]
pub struct MemoryAccountStore {
    users: RwLock<Vec<AccountRow>>,
    admins: RwLock<Vec<AdminGrant>>,
    super_admins: RwLock<Vec<String>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn grant_admin(&self, email: &str, departments: &[&str]) {
        self.admins.write().await.push(AdminGrant {
            email: email.to_string(),
            departments: departments.iter().map(|d| d.to_string()).collect(),
        });
    }

    pub async fn grant_super_admin(&self, email: &str) {
        self.super_admins.write().await.push(email.to_string());
    }

    /// Inserts a user with an explicit role, bypassing registration.
    pub async fn insert_with_role(&self, account: NewAccount, role: &str) -> User {
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: account.name,
            email: account.email,
            phone: account.phone,
            role: role.to_string(),
            status: USER_STATUS_PENDING.to_string(),
            created_at: Utc::now(),
        };
        self.users.write().await.push(AccountRow {
            user: user.clone(),
            password_hash: account.password_hash,
        });
        user
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn create_user(&self, account: NewAccount) -> Result<User> {
        if self.users.read().await.iter().any(|r| r.user.email == account.email) {
            return Err(DeskError::conflict("email already registered"));
        }
        Ok(self.insert_with_role(account, ROLE_CLIENT).await)
    }

    async fn credentials_for(&self, email: &str) -> Result<Option<Credentials>> {
        Ok(self.users.read().await.iter().find(|r| r.user.email == email).map(|r| Credentials {
            email: r.user.email.clone(),
            password_hash: r.password_hash.clone(),
        }))
    }

    async fn is_super_admin(&self, email: &str) -> Result<bool> {
        Ok(self.super_admins.read().await.iter().any(|e| e == email))
    }

    async fn admin_grant(&self, email: &str) -> Result<Option<AdminGrant>> {
        Ok(self.admins.read().await.iter().find(|g| g.email == email).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let mut users: Vec<User> = self.users.read().await.iter().map(|r| r.user.clone()).collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn delete_user(&self, id: &str) -> Result<()> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|r| r.user.id != id);
        if users.len() == before {
            return Err(DeskError::not_found("user", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewComplaint, Priority};
    use chrono::{Duration, TimeZone};

    fn submission(email: &str, kind: &str) -> Complaint {
        Complaint::from_submission(NewComplaint {
            department: "Civil".into(),
            complaint_type: kind.into(),
            contact_person: "Asha".into(),
            phone: "9999999999".into(),
            email: email.into(),
            description: "Leaking pipe".into(),
            priority: Priority::Medium,
            location: "Block B".into(),
        })
    }

    #[tokio::test]
    async fn insert_assigns_id_and_timestamp() {
        let store = MemoryComplaintStore::new();
        let saved = store.insert(submission("a@x.com", "Plumbing")).await.unwrap();
        assert!(!saved.id.is_empty());
        assert!(saved.created_at.is_some());
        assert!(store.exists_for("a@x.com", "Plumbing").await.unwrap());
        assert!(!store.exists_for("a@x.com", "Wiring").await.unwrap());
    }

    #[tokio::test]
    async fn fetch_all_is_newest_first() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut rows = Vec::new();
        for (i, offset) in [1, 3, 2].into_iter().enumerate() {
            let mut c = submission("a@x.com", "Plumbing");
            c.id = format!("c{i}");
            c.created_at = Some(base + Duration::days(offset));
            rows.push(c);
        }
        let store = MemoryComplaintStore::with_complaints(rows);
        let ids: Vec<String> = store
            .fetch(&FetchShape::AllNewestFirst)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec!["c1", "c2", "c0"]);
    }

    #[tokio::test]
    async fn failed_write_leaves_rows_untouched() {
        let store = MemoryComplaintStore::new();
        let saved = store.insert(submission("a@x.com", "Plumbing")).await.unwrap();
        store.fail_writes(true);
        assert!(store.update_status(&saved.id, ComplaintStatus::Closed, "done").await.is_err());
        assert!(store.delete(&saved.id).await.is_err());
        let rows = store.fetch(&FetchShape::AllNewestFirst).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status.as_deref(), Some("New"));
    }

    #[tokio::test]
    async fn same_email_and_type_is_rejected_on_insert() {
        let store = MemoryComplaintStore::new();
        store.insert(submission("a@x.com", "Plumbing")).await.unwrap();

        let err = store.insert(submission("a@x.com", "Plumbing")).await.unwrap_err();
        assert!(matches!(err, DeskError::Conflict { .. }));
        assert_eq!(err.to_string(), "complaint already registered");

        store.insert(submission("a@x.com", "Wiring")).await.unwrap();
        store.insert(submission("b@x.com", "Plumbing")).await.unwrap();
        assert_eq!(store.fetch(&FetchShape::AllNewestFirst).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let store = MemoryAccountStore::new();
        let account = NewAccount {
            name: "Asha".into(),
            email: "a@x.com".into(),
            phone: "1".into(),
            password_hash: "h".into(),
        };
        store.create_user(account.clone()).await.unwrap();
        let err = store.create_user(account).await.unwrap_err();
        assert!(matches!(err, DeskError::Conflict { .. }));
    }
}
