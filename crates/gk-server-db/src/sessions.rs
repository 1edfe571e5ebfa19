// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Refresh-session storage.
//!
//! One row per issued refresh token, keyed by the token's SHA-256 digest.
//! Rotation revokes the old row and links it to its replacement in a single
//! UPDATE so the two fields become visible together. Rows are never deleted;
//! revoked sessions are the audit trail for reuse detection.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::instrument;

use gk_server_auth::{SessionId, UserId};

use crate::error::{DbError, Result};
use crate::time::{decode_ts, encode_ts, now_encoded};

/// One refresh session as stored.
#[derive(Debug, Clone)]
pub struct SessionRecord {
	pub id: SessionId,
	pub user_id: UserId,
	pub expires_at: DateTime<Utc>,
	pub revoked_at: Option<DateTime<Utc>>,
	pub replaced_by: Option<SessionId>,
}

#[derive(sqlx::FromRow)]
struct SessionRow {
	id: String,
	user_id: String,
	expires_at: String,
	revoked_at: Option<String>,
	replaced_by: Option<String>,
}

impl TryFrom<SessionRow> for SessionRecord {
	type Error = DbError;

	fn try_from(row: SessionRow) -> Result<Self> {
		Ok(SessionRecord {
			id: row
				.id
				.parse()
				.map_err(|_| DbError::InvalidData("invalid session id".into()))?,
			user_id: row
				.user_id
				.parse()
				.map_err(|_| DbError::InvalidData("invalid user id".into()))?,
			expires_at: decode_ts("expires_at", &row.expires_at)?,
			revoked_at: row
				.revoked_at
				.as_deref()
				.map(|raw| decode_ts("revoked_at", raw))
				.transpose()?,
			replaced_by: row
				.replaced_by
				.as_deref()
				.map(|raw| {
					raw
						.parse()
						.map_err(|_| DbError::InvalidData("invalid replaced_by".into()))
				})
				.transpose()?,
		})
	}
}

#[derive(Clone)]
pub struct SessionRepository {
	pool: SqlitePool,
}

impl SessionRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Store a new session for `user_id`. Only the token digest is persisted.
	#[instrument(skip(self, refresh_hash), fields(user_id = %user_id))]
	pub async fn create(
		&self,
		user_id: UserId,
		refresh_hash: &[u8],
		expires_at: DateTime<Utc>,
	) -> Result<SessionId> {
		let id = SessionId::generate();
		let (_, created_at) = now_encoded();

		let result = sqlx::query(
			r#"
			INSERT INTO sessions (id, user_id, refresh_hash, expires_at, created_at)
			VALUES (?, ?, ?, ?, ?)
			"#,
		)
		.bind(id.to_string())
		.bind(user_id.to_string())
		.bind(refresh_hash)
		.bind(encode_ts(expires_at))
		.bind(created_at)
		.execute(&self.pool)
		.await;

		match result {
			Ok(_) => Ok(id),
			Err(e) => {
				if e
					.as_database_error()
					.map(|d| d.is_unique_violation())
					.unwrap_or(false)
				{
					return Err(DbError::Conflict);
				}
				Err(e.into())
			}
		}
	}

	/// Look up a session by refresh-token digest.
	#[instrument(skip(self, refresh_hash))]
	pub async fn get_by_refresh_hash(&self, refresh_hash: &[u8]) -> Result<Option<SessionRecord>> {
		let row = sqlx::query_as::<_, SessionRow>(
			r#"
			SELECT id, user_id, expires_at, revoked_at, replaced_by
			FROM sessions
			WHERE refresh_hash = ?
			"#,
		)
		.bind(refresh_hash)
		.fetch_optional(&self.pool)
		.await?;

		row.map(TryInto::try_into).transpose()
	}

	/// Revoke `old` and link it to `new` atomically. No-op if `old` is
	/// already revoked.
	#[instrument(skip(self), fields(old = %old, new = %new))]
	pub async fn revoke_and_replace(&self, old: SessionId, new: SessionId) -> Result<()> {
		let (_, now) = now_encoded();
		sqlx::query(
			r#"
			UPDATE sessions
			SET revoked_at = ?, replaced_by = ?
			WHERE id = ? AND revoked_at IS NULL
			"#,
		)
		.bind(now)
		.bind(new.to_string())
		.bind(old.to_string())
		.execute(&self.pool)
		.await?;
		Ok(())
	}

	/// Revoke every active session of `user_id` (mass logout). Replacement
	/// links are deliberately left NULL.
	#[instrument(skip(self), fields(user_id = %user_id))]
	pub async fn revoke_all_for_user(&self, user_id: UserId) -> Result<u64> {
		let (_, now) = now_encoded();
		let result = sqlx::query(
			r#"
			UPDATE sessions
			SET revoked_at = ?
			WHERE user_id = ? AND revoked_at IS NULL
			"#,
		)
		.bind(now)
		.bind(user_id.to_string())
		.execute(&self.pool)
		.await?;
		Ok(result.rows_affected())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::create_test_pool;
	use crate::users::UserRepository;

	async fn setup() -> (SessionRepository, UserId) {
		let pool = create_test_pool().await;
		let user_id = UserRepository::new(pool.clone())
			.create("sess@example.com", "hash")
			.await
			.unwrap();
		(SessionRepository::new(pool), user_id)
	}

	#[tokio::test]
	async fn create_and_lookup_by_hash() {
		let (repo, user_id) = setup().await;
		let hash = [7u8; 32];
		let expires = Utc::now() + chrono::Duration::days(30);

		let id = repo.create(user_id, &hash, expires).await.unwrap();
		let record = repo
			.get_by_refresh_hash(&hash)
			.await
			.unwrap()
			.expect("session should exist");

		assert_eq!(record.id, id);
		assert_eq!(record.user_id, user_id);
		assert!(record.revoked_at.is_none());
		assert!(record.replaced_by.is_none());
	}

	#[tokio::test]
	async fn unknown_hash_is_none() {
		let (repo, _) = setup().await;
		assert!(repo.get_by_refresh_hash(&[9u8; 32]).await.unwrap().is_none());
	}

	#[tokio::test]
	async fn duplicate_hash_is_conflict() {
		let (repo, user_id) = setup().await;
		let hash = [1u8; 32];
		let expires = Utc::now() + chrono::Duration::days(1);
		repo.create(user_id, &hash, expires).await.unwrap();
		assert!(matches!(
			repo.create(user_id, &hash, expires).await,
			Err(DbError::Conflict)
		));
	}

	#[tokio::test]
	async fn revoke_and_replace_sets_both_fields_once() {
		let (repo, user_id) = setup().await;
		let expires = Utc::now() + chrono::Duration::days(1);
		let old = repo.create(user_id, &[2u8; 32], expires).await.unwrap();
		let new = repo.create(user_id, &[3u8; 32], expires).await.unwrap();

		repo.revoke_and_replace(old, new).await.unwrap();

		let record = repo.get_by_refresh_hash(&[2u8; 32]).await.unwrap().unwrap();
		assert!(record.revoked_at.is_some());
		assert_eq!(record.replaced_by, Some(new));

		// A second rotation attempt must not overwrite the link.
		let third = repo.create(user_id, &[4u8; 32], expires).await.unwrap();
		repo.revoke_and_replace(old, third).await.unwrap();
		let record = repo.get_by_refresh_hash(&[2u8; 32]).await.unwrap().unwrap();
		assert_eq!(record.replaced_by, Some(new));
	}

	#[tokio::test]
	async fn revoke_all_touches_only_active_sessions() {
		let (repo, user_id) = setup().await;
		let expires = Utc::now() + chrono::Duration::days(1);
		let a = repo.create(user_id, &[5u8; 32], expires).await.unwrap();
		let b = repo.create(user_id, &[6u8; 32], expires).await.unwrap();
		repo.revoke_and_replace(a, b).await.unwrap();

		let revoked = repo.revoke_all_for_user(user_id).await.unwrap();
		assert_eq!(revoked, 1);

		let b_rec = repo.get_by_refresh_hash(&[6u8; 32]).await.unwrap().unwrap();
		assert!(b_rec.revoked_at.is_some());
		assert!(b_rec.replaced_by.is_none());
	}
}
