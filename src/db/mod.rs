// src/db/mod.rs

use sqlx::{Pool, Postgres};
use tracing::info;

use crate::config::Config;

mod accounts;
mod complaints;

pub use accounts::PgAccountStore;
pub use complaints::PgComplaintStore;

pub async fn connect(config: &Config) -> anyhow::Result<Pool<Postgres>> {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await?;
    info!(max_connections = config.db_max_connections, "connected to PostgreSQL");

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("schema migrations applied");
    Ok(pool)
}
