//! # SQLite Database methods
//!
//! This module contains "low-level" SQLite database interactions.
//!
//! All these interactions are simple functions (rather than stateful structs) that accept a `&mut SqliteConnection`
//! argument. Callers can obtain a connection from a pool, or open a transaction when several writes must be atomic,
//! and call through to the functions without any other changes.
use std::{str::FromStr, time::Duration};

use log::*;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    Error as SqlxError,
    SqlitePool,
};

pub mod cart;
pub mod catalog;
pub mod order_lines;
pub mod orders;
pub mod tracking;

/// Connection pool settings. The timeout bounds both pool acquisition and the time SQLite waits on a locked database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DbSettings {
    pub max_connections: u32,
    pub timeout: Duration,
}

impl Default for DbSettings {
    fn default() -> Self {
        Self { max_connections: 10, timeout: Duration::from_secs(10) }
    }
}

pub async fn new_pool(url: &str, settings: DbSettings) -> Result<SqlitePool, SqlxError> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(settings.timeout);
    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.timeout)
        .connect_with(options)
        .await?;
    debug!("🗃️ Connection pool for {url} ready ({} connections max)", settings.max_connections);
    Ok(pool)
}
