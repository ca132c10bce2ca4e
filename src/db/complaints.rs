// src/db/complaints.rs

use async_trait::async_trait;
use sqlx::{query, query_as, query_scalar, Pool, Postgres};
use uuid::Uuid;

use crate::error::{DeskError, Result};
use crate::models::{Complaint, ComplaintStatus};
use crate::policy::FetchShape;
use crate::store::ComplaintStore;

const COLUMNS: &str = "id, department, type, contact_person, phone, email, description, \
                       status, remarks, priority, location, created_at";

pub struct PgComplaintStore {
    pool: Pool<Postgres>,
}

impl PgComplaintStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ComplaintStore for PgComplaintStore {
    async fn fetch(&self, shape: &FetchShape) -> Result<Vec<Complaint>> {
        let rows = match shape {
            FetchShape::AllNewestFirst => {
                query_as::<_, Complaint>(&format!(
                    "SELECT {COLUMNS} FROM public.complaints ORDER BY created_at DESC NULLS LAST"
                ))
                .fetch_all(&self.pool)
                .await?
            }
            FetchShape::ByEmail(email) => {
                query_as::<_, Complaint>(&format!(
                    "SELECT {COLUMNS} FROM public.complaints WHERE email = $1"
                ))
                .bind(email)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }

    async fn exists_for(&self, email: &str, complaint_type: &str) -> Result<bool> {
        let found = query_scalar::<_, bool>(
            r#"SELECT EXISTS(SELECT 1 FROM public.complaints WHERE email = $1 AND type = $2)"#,
        )
        .bind(email)
        .bind(complaint_type)
        .fetch_one(&self.pool)
        .await?;
        Ok(found)
    }

    async fn insert(&self, c: Complaint) -> Result<Complaint> {
        let res = query_as::<_, Complaint>(&format!(
            r#"
            INSERT INTO public.complaints
              (id, department, type, contact_person, phone, email, description,
               status, remarks, priority, location)
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4().to_string())
        .bind(c.department)
        .bind(c.complaint_type)
        .bind(c.contact_person)
        .bind(c.phone)
        .bind(c.email)
        .bind(c.description)
        .bind(c.status)
        .bind(c.remarks)
        .bind(c.priority)
        .bind(c.location)
        .fetch_one(&self.pool)
        .await;

        match res {
            Ok(row) => Ok(row),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(DeskError::conflict("complaint already registered"))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update_status(&self, id: &str, status: ComplaintStatus, remarks: &str) -> Result<()> {
        let res = query(r#"UPDATE public.complaints SET status = $2, remarks = $3 WHERE id = $1"#)
            .bind(id)
            .bind(status.as_str())
            .bind(remarks)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(DeskError::not_found("complaint", id));
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let res = query(r#"DELETE FROM public.complaints WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(DeskError::not_found("complaint", id));
        }
        Ok(())
    }
}
