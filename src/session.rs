// src/session.rs
//
// Registration, login and the per-process session registry.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DeskError, Result};
use crate::models::User;
use crate::password::{hash_password_async, verify_password_async};
use crate::policy::{DepartmentScope, Viewer};
use crate::store::{AccountStore, NewAccount};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Identity and authorization attributes fixed at login.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    pub token: Uuid,
    pub viewer: Viewer,
    pub established_at: DateTime<Utc>,
}

impl Session {
    fn expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now - self.established_at >= ttl
    }
}

/// Live sessions keyed by bearer token. A session lives for `ttl` from
/// login; expired entries are dropped on lookup and swept on every login.
#[derive(Clone)]
pub struct SessionRegistry {
    inner: Arc<RwLock<HashMap<Uuid, Session>>>,
    ttl: Duration,
}

impl SessionRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self { inner: Arc::new(RwLock::new(HashMap::new())), ttl }
    }

    pub async fn open(&self, viewer: Viewer) -> Session {
        let now = Utc::now();
        let session = Session { token: Uuid::new_v4(), viewer, established_at: now };

        let mut map = self.inner.write().await;
        let before = map.len();
        map.retain(|_, s| !s.expired(self.ttl, now));
        if map.len() < before {
            debug!(swept = before - map.len(), "expired sessions dropped");
        }
        map.insert(session.token, session.clone());
        session
    }

    pub async fn get(&self, token: &Uuid) -> Option<Session> {
        let session = self.inner.read().await.get(token).cloned()?;
        if session.expired(self.ttl, Utc::now()) {
            self.inner.write().await.remove(token);
            return None;
        }
        Some(session)
    }

    /// Drops everything held for the token. Returns whether it existed.
    pub async fn close(&self, token: &Uuid) -> bool {
        self.inner.write().await.remove(token).is_some()
    }
}

// ───────────────────────────────────────
// Credentials
// ───────────────────────────────────────

/// `local@domain` where the local part is `[A-Za-z0-9+_.-]+` and the
/// domain is non-empty.
pub fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && local.chars().all(|c| c.is_ascii_alphanumeric() || "+_.-".contains(c))
                && !domain.is_empty()
        }
        None => false,
    }
}

#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

pub async fn register(accounts: &dyn AccountStore, r: Registration) -> Result<User> {
    let name = r.name.trim();
    let email = r.email.trim();
    let phone = r.phone.trim();
    let password = r.password.trim();

    if name.is_empty() || email.is_empty() || phone.is_empty() || password.is_empty() {
        return Err(DeskError::invalid_input("all fields are required"));
    }
    if !is_valid_email(email) {
        return Err(DeskError::invalid_input("please enter a valid email address"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DeskError::invalid_input(format!(
            "password should be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let password_hash = hash_password_async(password.to_string()).await?;
    let user = accounts
        .create_user(NewAccount {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            password_hash,
        })
        .await?;
    info!(email = %user.email, "client registered");
    Ok(user)
}

/// Resolves the viewer for an authenticated email: super-admin grant first,
/// then admin grant, otherwise client.
pub async fn resolve_viewer(accounts: &dyn AccountStore, email: &str) -> Result<Viewer> {
    if accounts.is_super_admin(email).await? {
        return Ok(Viewer::SuperAdmin { email: email.to_string() });
    }
    if let Some(grant) = accounts.admin_grant(email).await? {
        return Ok(Viewer::DepartmentAdmin {
            email: email.to_string(),
            scope: DepartmentScope::from_grant(grant.departments),
        });
    }
    Ok(Viewer::Client { email: email.to_string() })
}

pub async fn login(
    accounts: &dyn AccountStore,
    sessions: &SessionRegistry,
    email: &str,
    password: &str,
) -> Result<Session> {
    let email = email.trim();
    let password = password.trim();
    if email.is_empty() || password.is_empty() {
        return Err(DeskError::invalid_input("please enter email and password"));
    }

    let creds = accounts
        .credentials_for(email)
        .await?
        .ok_or_else(|| DeskError::unauthorized("invalid email or password"))?;
    if !verify_password_async(password.to_string(), creds.password_hash).await {
        return Err(DeskError::unauthorized("invalid email or password"));
    }

    let viewer = resolve_viewer(accounts, &creds.email).await?;
    let session = sessions.open(viewer).await;
    info!(email = %creds.email, role = session.viewer.role_name(), "session opened");
    Ok(session)
}
