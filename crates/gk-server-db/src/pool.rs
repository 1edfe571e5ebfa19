// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;
use std::time::Duration;

use crate::error::DbError;

/// Connection-pool limits, loaded from server configuration.
#[derive(Debug, Clone)]
pub struct PoolSettings {
	pub max_open_conns: u32,
	pub conn_max_lifetime: Duration,
	pub conn_max_idle_time: Duration,
	pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
	fn default() -> Self {
		Self {
			max_open_conns: 10,
			conn_max_lifetime: Duration::from_secs(30 * 60),
			conn_max_idle_time: Duration::from_secs(5 * 60),
			acquire_timeout: Duration::from_secs(5),
		}
	}
}

/// Create a SqlitePool with WAL mode and the configured limits.
///
/// # Arguments
/// * `database_url` - SQLite connection string (e.g., "sqlite:./gophkeeper.db")
#[tracing::instrument(skip(database_url, settings))]
pub async fn create_pool(database_url: &str, settings: &PoolSettings) -> Result<SqlitePool, DbError> {
	let options = SqliteConnectOptions::from_str(database_url)
		.map_err(|e| DbError::InvalidData(format!("invalid database URL: {e}")))?
		.journal_mode(SqliteJournalMode::Wal)
		.synchronous(SqliteSynchronous::Normal)
		.foreign_keys(true)
		.create_if_missing(true);

	let pool = SqlitePoolOptions::new()
		.max_connections(settings.max_open_conns)
		.max_lifetime(settings.conn_max_lifetime)
		.idle_timeout(settings.conn_max_idle_time)
		.acquire_timeout(settings.acquire_timeout)
		.connect_with(options)
		.await?;

	tracing::debug!("database pool created");
	Ok(pool)
}
