// src/store/mod.rs
//
// Persistence seams. Handlers and the board only talk to these traits;
// `crate::db` provides the Postgres implementation, `memory` an in-process
// one for tests.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{AdminGrant, Complaint, ComplaintStatus, Credentials, User};
use crate::policy::FetchShape;

#[cfg(test)]
pub mod memory;

#[async_trait]
pub trait ComplaintStore: Send + Sync {
    /// Runs the given query shape. Ordering is the store's responsibility.
    async fn fetch(&self, shape: &FetchShape) -> Result<Vec<Complaint>>;

    /// Whether `email` already filed a complaint of this type.
    async fn exists_for(&self, email: &str, complaint_type: &str) -> Result<bool>;

    /// Writes an unsaved complaint, returning it with id and timestamp set.
    /// A second complaint with the same `(email, type)` is a `Conflict`.
    async fn insert(&self, complaint: Complaint) -> Result<Complaint>;

    /// Partial update of exactly `status` and `remarks`.
    async fn update_status(&self, id: &str, status: ComplaintStatus, remarks: &str) -> Result<()>;

    async fn delete(&self, id: &str) -> Result<()>;
}

/// New account row as written at registration.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Fails with `Conflict` when the email is taken.
    async fn create_user(&self, account: NewAccount) -> Result<User>;

    async fn credentials_for(&self, email: &str) -> Result<Option<Credentials>>;

    async fn is_super_admin(&self, email: &str) -> Result<bool>;

    async fn admin_grant(&self, email: &str) -> Result<Option<AdminGrant>>;

    /// Every user, newest first.
    async fn list_users(&self) -> Result<Vec<User>>;

    async fn delete_user(&self, id: &str) -> Result<()>;
}
