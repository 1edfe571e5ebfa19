// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Versioned secret storage with optimistic concurrency.
//!
//! Every mutation is gated on `version = expected`. When the gated write
//! touches no row, an existence probe on (user_id, id) splits the outcome:
//! the row exists with another version (Conflict) or it is gone (NotFound).
//! Ownership failures are reported as NotFound so callers cannot probe other
//! users' rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::fmt;
use std::str::FromStr;
use tracing::instrument;

use gk_server_auth::{SecretId, UserId};

use crate::error::{DbError, Result};
use crate::time::{decode_ts, now_encoded};

/// Closed set of secret kinds. The payload itself is opaque ciphertext; the
/// tag only drives client-side presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecretType {
	LoginPassword,
	Text,
	Binary,
	BankCard,
	Otp,
}

impl SecretType {
	/// All known kinds, in wire spelling.
	pub fn all() -> &'static [SecretType] {
		&[
			SecretType::LoginPassword,
			SecretType::Text,
			SecretType::Binary,
			SecretType::BankCard,
			SecretType::Otp,
		]
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			SecretType::LoginPassword => "login_password",
			SecretType::Text => "text",
			SecretType::Binary => "binary",
			SecretType::BankCard => "bank_card",
			SecretType::Otp => "otp",
		}
	}
}

impl fmt::Display for SecretType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for SecretType {
	type Err = String;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s {
			"login_password" => Ok(SecretType::LoginPassword),
			"text" => Ok(SecretType::Text),
			"binary" => Ok(SecretType::Binary),
			"bank_card" => Ok(SecretType::BankCard),
			"otp" => Ok(SecretType::Otp),
			other => Err(format!("unknown secret type {other:?}")),
		}
	}
}

/// One secret as stored. `payload` is base64 of the client-sealed envelope;
/// the server never interprets it.
#[derive(Debug, Clone)]
pub struct SecretRecord {
	pub id: SecretId,
	pub user_id: UserId,
	pub kind: SecretType,
	pub title: String,
	pub payload: String,
	pub meta: Option<String>,
	pub version: i64,
	pub updated_at: DateTime<Utc>,
	pub created_at: DateTime<Utc>,
}

/// Result of inserting a secret.
#[derive(Debug, Clone, Copy)]
pub struct CreatedSecret {
	pub id: SecretId,
	pub version: i64,
	pub updated_at: DateTime<Utc>,
}

/// Partial update. A `Some` field was supplied by the client and overwrites
/// the column; `None` leaves it untouched.
#[derive(Debug, Clone, Default)]
pub struct SecretPatch {
	pub kind: Option<SecretType>,
	pub title: Option<String>,
	pub payload: Option<String>,
	pub meta: Option<String>,
}

#[derive(sqlx::FromRow)]
struct SecretRow {
	id: String,
	user_id: String,
	#[sqlx(rename = "type")]
	kind: String,
	title: String,
	payload: String,
	meta: Option<String>,
	version: i64,
	updated_at: String,
	created_at: String,
}

impl TryFrom<SecretRow> for SecretRecord {
	type Error = DbError;

	fn try_from(row: SecretRow) -> Result<Self> {
		Ok(SecretRecord {
			id: row
				.id
				.parse()
				.map_err(|_| DbError::InvalidData("invalid secret id".into()))?,
			user_id: row
				.user_id
				.parse()
				.map_err(|_| DbError::InvalidData("invalid user id".into()))?,
			kind: row
				.kind
				.parse()
				.map_err(|e: String| DbError::InvalidData(e))?,
			title: row.title,
			payload: row.payload,
			meta: row.meta,
			version: row.version,
			updated_at: decode_ts("updated_at", &row.updated_at)?,
			created_at: decode_ts("created_at", &row.created_at)?,
		})
	}
}

#[derive(Clone)]
pub struct SecretRepository {
	pool: SqlitePool,
}

impl SecretRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Insert a new secret at version 1.
	#[instrument(skip(self, payload, meta), fields(user_id = %user_id, kind = %kind))]
	pub async fn create(
		&self,
		user_id: UserId,
		kind: SecretType,
		title: &str,
		payload: &str,
		meta: Option<&str>,
	) -> Result<CreatedSecret> {
		let id = SecretId::generate();
		let (now, encoded_now) = now_encoded();

		sqlx::query(
			r#"
			INSERT INTO secrets (id, user_id, type, title, payload, meta, version, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?, 1, ?, ?)
			"#,
		)
		.bind(id.to_string())
		.bind(user_id.to_string())
		.bind(kind.as_str())
		.bind(title)
		.bind(payload)
		.bind(meta)
		.bind(&encoded_now)
		.bind(&encoded_now)
		.execute(&self.pool)
		.await?;

		Ok(CreatedSecret {
			id,
			version: 1,
			updated_at: now,
		})
	}

	/// All secrets of `user_id`, newest update first.
	#[instrument(skip(self), fields(user_id = %user_id))]
	pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<SecretRecord>> {
		let rows = sqlx::query_as::<_, SecretRow>(
			r#"
			SELECT id, user_id, type, title, payload, meta, version, updated_at, created_at
			FROM secrets
			WHERE user_id = ?
			ORDER BY updated_at DESC, id DESC
			"#,
		)
		.bind(user_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.into_iter().map(TryInto::try_into).collect()
	}

	/// Apply a partial update gated on `version = expected_version`. Bumps
	/// the version and refreshes `updated_at` together.
	#[instrument(skip(self, patch), fields(user_id = %user_id, id = %id, expected_version))]
	pub async fn update(
		&self,
		user_id: UserId,
		id: SecretId,
		patch: &SecretPatch,
		expected_version: i64,
	) -> Result<()> {
		let (_, now) = now_encoded();

		let result = sqlx::query(
			r#"
			UPDATE secrets
			SET type = COALESCE(?, type),
			    title = COALESCE(?, title),
			    payload = COALESCE(?, payload),
			    meta = COALESCE(?, meta),
			    version = version + 1,
			    updated_at = ?
			WHERE user_id = ? AND id = ? AND version = ?
			"#,
		)
		.bind(patch.kind.map(|k| k.as_str()))
		.bind(patch.title.as_deref())
		.bind(patch.payload.as_deref())
		.bind(patch.meta.as_deref())
		.bind(now)
		.bind(user_id.to_string())
		.bind(id.to_string())
		.bind(expected_version)
		.execute(&self.pool)
		.await?;

		if result.rows_affected() == 0 {
			return Err(self.losing_write_error(user_id, id).await?);
		}
		Ok(())
	}

	/// Delete gated on `version = expected_version`.
	#[instrument(skip(self), fields(user_id = %user_id, id = %id, expected_version))]
	pub async fn delete(&self, user_id: UserId, id: SecretId, expected_version: i64) -> Result<()> {
		let result = sqlx::query(
			r#"
			DELETE FROM secrets WHERE user_id = ? AND id = ? AND version = ?
			"#,
		)
		.bind(user_id.to_string())
		.bind(id.to_string())
		.bind(expected_version)
		.execute(&self.pool)
		.await?;

		if result.rows_affected() == 0 {
			return Err(self.losing_write_error(user_id, id).await?);
		}
		Ok(())
	}

	/// Existence probe deciding why a gated write lost: the row exists at
	/// another version (Conflict) or is absent/foreign (NotFound).
	async fn losing_write_error(&self, user_id: UserId, id: SecretId) -> Result<DbError> {
		let exists: Option<(i64,)> = sqlx::query_as(
			r#"
			SELECT 1 FROM secrets WHERE user_id = ? AND id = ?
			"#,
		)
		.bind(user_id.to_string())
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		Ok(if exists.is_some() {
			DbError::Conflict
		} else {
			DbError::NotFound
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::create_test_pool;
	use crate::users::UserRepository;

	async fn setup() -> (SecretRepository, UserId, UserId) {
		let pool = create_test_pool().await;
		let users = UserRepository::new(pool.clone());
		let owner = users.create("owner@example.com", "hash").await.unwrap();
		let other = users.create("other@example.com", "hash").await.unwrap();
		(SecretRepository::new(pool), owner, other)
	}

	#[tokio::test]
	async fn create_starts_at_version_one() {
		let (repo, owner, _) = setup().await;
		let created = repo
			.create(owner, SecretType::Text, "note", "Q0lQSEVSVEVYVA", None)
			.await
			.unwrap();
		assert_eq!(created.version, 1);

		let listed = repo.list_for_user(owner).await.unwrap();
		assert_eq!(listed.len(), 1);
		assert_eq!(listed[0].id, created.id);
		assert_eq!(listed[0].kind, SecretType::Text);
		assert_eq!(listed[0].payload, "Q0lQSEVSVEVYVA");
	}

	#[tokio::test]
	async fn list_is_scoped_to_owner_and_ordered() {
		let (repo, owner, other) = setup().await;
		let first = repo
			.create(owner, SecretType::Text, "first", "cGF5bG9hZDE", None)
			.await
			.unwrap();
		let second = repo
			.create(owner, SecretType::BankCard, "second", "cGF5bG9hZDI", None)
			.await
			.unwrap();
		repo
			.create(other, SecretType::Otp, "foreign", "cGF5bG9hZDM", None)
			.await
			.unwrap();

		// Touch the first secret so it becomes the most recently updated.
		repo
			.update(
				owner,
				first.id,
				&SecretPatch {
					title: Some("first-touched".into()),
					..Default::default()
				},
				1,
			)
			.await
			.unwrap();

		let listed = repo.list_for_user(owner).await.unwrap();
		assert_eq!(listed.len(), 2);
		assert_eq!(listed[0].id, first.id);
		assert_eq!(listed[0].version, 2);
		assert_eq!(listed[1].id, second.id);
	}

	#[tokio::test]
	async fn update_bumps_version_and_keeps_unpatched_fields() {
		let (repo, owner, _) = setup().await;
		let created = repo
			.create(
				owner,
				SecretType::LoginPassword,
				"gmail",
				"b2xkLXBheWxvYWQ",
				Some("site=mail.example.com"),
			)
			.await
			.unwrap();

		repo
			.update(
				owner,
				created.id,
				&SecretPatch {
					payload: Some("bmV3LXBheWxvYWQ".into()),
					..Default::default()
				},
				1,
			)
			.await
			.unwrap();

		let listed = repo.list_for_user(owner).await.unwrap();
		assert_eq!(listed[0].version, 2);
		assert_eq!(listed[0].payload, "bmV3LXBheWxvYWQ");
		assert_eq!(listed[0].title, "gmail");
		assert_eq!(listed[0].meta.as_deref(), Some("site=mail.example.com"));
	}

	#[tokio::test]
	async fn stale_version_is_conflict_missing_row_is_not_found() {
		let (repo, owner, _) = setup().await;
		let created = repo
			.create(owner, SecretType::Text, "note", "cGF5bG9hZA", None)
			.await
			.unwrap();

		let patch = SecretPatch {
			title: Some("renamed".into()),
			..Default::default()
		};
		repo.update(owner, created.id, &patch, 1).await.unwrap();

		assert!(matches!(
			repo.update(owner, created.id, &patch, 1).await,
			Err(DbError::Conflict)
		));
		assert!(matches!(
			repo.update(owner, SecretId::generate(), &patch, 1).await,
			Err(DbError::NotFound)
		));
	}

	#[tokio::test]
	async fn foreign_rows_read_as_not_found() {
		let (repo, owner, other) = setup().await;
		let created = repo
			.create(owner, SecretType::Text, "note", "cGF5bG9hZA", None)
			.await
			.unwrap();

		let patch = SecretPatch {
			title: Some("stolen".into()),
			..Default::default()
		};
		assert!(matches!(
			repo.update(other, created.id, &patch, 1).await,
			Err(DbError::NotFound)
		));
		assert!(matches!(
			repo.delete(other, created.id, 1).await,
			Err(DbError::NotFound)
		));
	}

	#[tokio::test]
	async fn delete_respects_version_gate() {
		let (repo, owner, _) = setup().await;
		let created = repo
			.create(owner, SecretType::Text, "note", "cGF5bG9hZA", None)
			.await
			.unwrap();

		assert!(matches!(
			repo.delete(owner, created.id, 99).await,
			Err(DbError::Conflict)
		));
		repo.delete(owner, created.id, 1).await.unwrap();
		assert!(matches!(
			repo.delete(owner, created.id, 1).await,
			Err(DbError::NotFound)
		));
	}

	#[tokio::test]
	async fn secret_type_wire_spelling_roundtrips() {
		for kind in SecretType::all() {
			let parsed: SecretType = kind.as_str().parse().unwrap();
			assert_eq!(parsed, *kind);
		}
		assert!("password".parse::<SecretType>().is_err());
	}
}
