// src/db/accounts.rs

use async_trait::async_trait;
use sqlx::{query, query_as, query_scalar, Pool, Postgres};
use uuid::Uuid;

use crate::error::{DeskError, Result};
use crate::models::{AdminGrant, Credentials, User, ROLE_CLIENT, USER_STATUS_PENDING};
use crate::store::{AccountStore, NewAccount};

pub struct PgAccountStore {
    pool: Pool<Postgres>,
}

impl PgAccountStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn create_user(&self, a: NewAccount) -> Result<User> {
        let res = query_as::<_, User>(
            r#"
            INSERT INTO public.users(id, name, email, phone, role, status, password_hash)
            VALUES ($1,$2,$3,$4,$5,$6,$7)
            RETURNING id, name, email, phone, role, status, created_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&a.name)
        .bind(&a.email)
        .bind(&a.phone)
        .bind(ROLE_CLIENT)
        .bind(USER_STATUS_PENDING)
        .bind(&a.password_hash)
        .fetch_one(&self.pool)
        .await;

        match res {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(DeskError::conflict("email already registered"))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn credentials_for(&self, email: &str) -> Result<Option<Credentials>> {
        let row = query_as::<_, Credentials>(
            r#"SELECT email, password_hash FROM public.users WHERE email = $1"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn is_super_admin(&self, email: &str) -> Result<bool> {
        let found = query_scalar::<_, bool>(
            r#"SELECT EXISTS(SELECT 1 FROM public.superadmins WHERE email = $1)"#,
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(found)
    }

    async fn admin_grant(&self, email: &str) -> Result<Option<AdminGrant>> {
        let row = query_as::<_, AdminGrant>(
            r#"SELECT email, departments FROM public.admins WHERE email = $1 LIMIT 1"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let rows = query_as::<_, User>(
            r#"SELECT id, name, email, phone, role, status, created_at
               FROM public.users ORDER BY created_at DESC"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn delete_user(&self, id: &str) -> Result<()> {
        let res = query(r#"DELETE FROM public.users WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(DeskError::not_found("user", id));
        }
        Ok(())
    }
}
