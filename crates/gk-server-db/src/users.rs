// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User account storage.

use sqlx::SqlitePool;
use tracing::instrument;

use gk_server_auth::UserId;

use crate::error::{DbError, Result};
use crate::time::now_encoded;

#[derive(Clone)]
pub struct UserRepository {
	pool: SqlitePool,
}

impl UserRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Insert a new user. `password_hash` is the self-describing Argon2id
	/// verifier, never the password.
	///
	/// Returns [`DbError::AlreadyExists`] when the email is taken.
	#[instrument(skip(self, password_hash), fields(email = %email))]
	pub async fn create(&self, email: &str, password_hash: &str) -> Result<UserId> {
		let id = UserId::generate();
		let (_, created_at) = now_encoded();

		let result = sqlx::query(
			r#"
			INSERT INTO users (id, email, password_hash, created_at)
			VALUES (?, ?, ?, ?)
			"#,
		)
		.bind(id.to_string())
		.bind(email)
		.bind(password_hash)
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
					return Err(DbError::AlreadyExists);
				}
				Err(e.into())
			}
		}
	}

	/// Look up a user by (already normalised) email.
	///
	/// Returns the id and the stored password verifier.
	#[instrument(skip(self), fields(email = %email))]
	pub async fn get_by_email(&self, email: &str) -> Result<Option<(UserId, String)>> {
		let row: Option<(String, String)> = sqlx::query_as(
			r#"
			SELECT id, password_hash FROM users WHERE email = ?
			"#,
		)
		.bind(email)
		.fetch_optional(&self.pool)
		.await?;

		row
			.map(|(id, hash)| {
				let id = id
					.parse::<UserId>()
					.map_err(|_| DbError::InvalidData("invalid user id".into()))?;
				Ok((id, hash))
			})
			.transpose()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::create_test_pool;

	#[tokio::test]
	async fn create_and_fetch_by_email() {
		let pool = create_test_pool().await;
		let repo = UserRepository::new(pool);

		let id = repo.create("alice@example.com", "argon2id$v=19$…").await.unwrap();
		let (found, hash) = repo
			.get_by_email("alice@example.com")
			.await
			.unwrap()
			.expect("user should exist");
		assert_eq!(found, id);
		assert_eq!(hash, "argon2id$v=19$…");
	}

	#[tokio::test]
	async fn duplicate_email_is_already_exists() {
		let pool = create_test_pool().await;
		let repo = UserRepository::new(pool);

		repo.create("bob@example.com", "h1").await.unwrap();
		let err = repo.create("bob@example.com", "h2").await.unwrap_err();
		assert!(matches!(err, DbError::AlreadyExists));
	}

	#[tokio::test]
	async fn unknown_email_is_none() {
		let pool = create_test_pool().await;
		let repo = UserRepository::new(pool);
		assert!(repo.get_by_email("nobody@example.com").await.unwrap().is_none());
	}
}
