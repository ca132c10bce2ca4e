// src/config.rs

use std::env;

use anyhow::{anyhow, Context};
use chrono::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub session_ttl_hours: u32,
}

impl Config {
    /// Reads the process environment (after `.env` has been loaded).
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| anyhow!("DATABASE_URL must be set (see .env)"))?;

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().with_context(|| format!("invalid PORT '{raw}'"))?,
            None => 8080,
        };

        let db_max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("invalid DB_MAX_CONNECTIONS '{raw}'"))?,
            None => 10,
        };

        let session_ttl_hours = match lookup("SESSION_TTL_HOURS") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("invalid SESSION_TTL_HOURS '{raw}'"))?,
            None => 12,
        };

        Ok(Config { database_url, port, db_max_connections, session_ttl_hours })
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::hours(i64::from(self.session_ttl_hours))
    }
}
