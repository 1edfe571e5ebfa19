// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Schema bootstrap.
//!
//! Sessions are never deleted: revoked rows stay behind for refresh-token
//! reuse detection. Secrets are keyed by (user_id, id) so a row can only
//! ever be addressed through its owner.

use sqlx::SqlitePool;

use crate::error::DbError;

const SCHEMA: &[&str] = &[
	r#"
	CREATE TABLE IF NOT EXISTS users (
		id TEXT PRIMARY KEY,
		email TEXT NOT NULL UNIQUE,
		password_hash TEXT NOT NULL,
		created_at TEXT NOT NULL
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS sessions (
		id TEXT PRIMARY KEY,
		user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
		refresh_hash BLOB NOT NULL UNIQUE,
		expires_at TEXT NOT NULL,
		revoked_at TEXT,
		replaced_by TEXT,
		created_at TEXT NOT NULL
	)
	"#,
	r#"
	CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS secrets (
		id TEXT NOT NULL,
		user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
		type TEXT NOT NULL,
		title TEXT NOT NULL,
		payload TEXT NOT NULL,
		meta TEXT,
		version INTEGER NOT NULL DEFAULT 1,
		created_at TEXT NOT NULL,
		updated_at TEXT NOT NULL,
		PRIMARY KEY (user_id, id)
	)
	"#,
	r#"
	CREATE INDEX IF NOT EXISTS idx_secrets_user_updated ON secrets(user_id, updated_at DESC)
	"#,
];

/// Apply the schema. Idempotent.
#[tracing::instrument(skip(pool))]
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
	for statement in SCHEMA {
		sqlx::query(statement).execute(pool).await?;
	}
	tracing::debug!("database schema ready");
	Ok(())
}
