// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Registration, login and refresh-token rotation.
//!
//! Session state machine: active → (rotation) → revoked+replaced →
//! (reuse attempt) → every sibling session revoked. Terminal states are
//! revoked and expired. Reuse detection only needs the revoked flag on the
//! presented session; the replacement chain is never walked.

use chrono::Utc;
use regex::Regex;
use std::sync::LazyLock;
use tracing::instrument;

use gk_server_auth::{
	hash_password, hash_refresh_token, mint_access_token, new_refresh_token, verify_password,
	Argon2Params, JwtConfig, UserId,
};
use gk_server_config::ServerConfig;
use gk_server_db::{SessionRepository, UserRepository};

use crate::error::ServerError;

static EMAIL_REGEX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// Minimum account password length, in bytes.
const MIN_PASSWORD_LEN: usize = 8;

/// Access + refresh token pair handed to the client.
#[derive(Debug, Clone)]
pub struct TokenPair {
	pub access_token: String,
	pub refresh_token: String,
}

pub struct AuthService {
	users: UserRepository,
	sessions: SessionRepository,
	password_params: Argon2Params,
	jwt: JwtConfig,
	refresh_ttl: chrono::Duration,
	rotate_refresh: bool,
	reuse_detection: bool,
}

impl AuthService {
	pub fn new(users: UserRepository, sessions: SessionRepository, config: &ServerConfig) -> Self {
		Self {
			users,
			sessions,
			password_params: Argon2Params {
				time: config.password.argon2.time,
				memory_kib: config.password.argon2.memory_kib,
				threads: config.password.argon2.threads,
				key_len: config.password.argon2.key_len,
				salt_len: config.password.argon2.salt_len,
			},
			jwt: JwtConfig {
				issuer: config.auth.issuer.clone(),
				audience: config.auth.audience.clone(),
				signing_key: config.auth.jwt.signing_key.clone(),
				access_ttl: config.auth.access_ttl,
			},
			refresh_ttl: chrono::Duration::from_std(config.auth.refresh_ttl)
				.unwrap_or_else(|_| chrono::Duration::days(30)),
			rotate_refresh: config.auth.sessions.rotate_refresh,
			reuse_detection: config.auth.sessions.reuse_detection,
		}
	}

	/// Token verification parameters, shared with the HTTP middleware.
	pub fn jwt_config(&self) -> &JwtConfig {
		&self.jwt
	}

	/// Create a new account.
	///
	/// The email is trimmed and lowercased before validation and storage so
	/// lookups are case-insensitive.
	#[instrument(skip_all)]
	pub async fn register(&self, email: &str, password: &str) -> Result<UserId, ServerError> {
		let email = email.trim().to_lowercase();
		let password = password.trim();

		if email.is_empty()
			|| password.is_empty()
			|| !EMAIL_REGEX.is_match(&email)
			|| password.len() < MIN_PASSWORD_LEN
		{
			return Err(ServerError::InvalidInput);
		}

		let hash = hash_password(password, &self.password_params).map_err(|e| {
			tracing::error!(error = %e, "password hashing failed");
			ServerError::Internal
		})?;

		let user_id = self.users.create(&email, &hash).await?;
		tracing::info!(user_id = %user_id, "user registered");
		Ok(user_id)
	}

	/// Authenticate and issue a fresh token pair.
	///
	/// An unknown email and a wrong password both come back as
	/// `InvalidCredentials`; the account's existence is not disclosed.
	#[instrument(skip_all)]
	pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, ServerError> {
		let email = email.trim().to_lowercase();
		let password = password.trim();
		if email.is_empty() || password.is_empty() {
			return Err(ServerError::InvalidInput);
		}

		let (user_id, stored_hash) = self
			.users
			.get_by_email(&email)
			.await?
			.ok_or(ServerError::InvalidCredentials)?;

		let ok = verify_password(password, &stored_hash).map_err(|e| {
			tracing::error!(user_id = %user_id, error = %e, "stored verifier unreadable");
			ServerError::Internal
		})?;
		if !ok {
			return Err(ServerError::InvalidCredentials);
		}

		let pair = self.issue_pair(user_id).await?;
		tracing::info!(user_id = %user_id, "login successful");
		Ok(pair)
	}

	/// Exchange a refresh token for a new access token.
	///
	/// With rotation enabled the presented token is burned and replaced.
	/// Presenting an already-revoked token is treated as theft: when reuse
	/// detection is on, every active session of the user is revoked.
	#[instrument(skip_all)]
	pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, ServerError> {
		let refresh_token = refresh_token.trim();
		if refresh_token.is_empty() {
			return Err(ServerError::InvalidInput);
		}

		let hash = hash_refresh_token(refresh_token);
		let session = self
			.sessions
			.get_by_refresh_hash(&hash)
			.await?
			.ok_or(ServerError::Unauthorized)?;

		let now = Utc::now();
		if session.expires_at <= now {
			return Err(ServerError::Unauthorized);
		}

		if session.revoked_at.is_some() {
			if self.reuse_detection {
				let revoked = self.sessions.revoke_all_for_user(session.user_id).await?;
				tracing::warn!(
					user_id = %session.user_id,
					sessions_revoked = revoked,
					"refresh token reuse detected, user logged out everywhere"
				);
			}
			return Err(ServerError::Unauthorized);
		}

		let access_token = mint_access_token(session.user_id, &self.jwt).map_err(|e| {
			tracing::error!(user_id = %session.user_id, error = %e, "access token mint failed");
			ServerError::Internal
		})?;

		if !self.rotate_refresh {
			return Ok(TokenPair {
				access_token,
				refresh_token: refresh_token.to_string(),
			});
		}

		let new_refresh = new_refresh_token().map_err(|e| {
			tracing::error!(error = %e, "refresh token generation failed");
			ServerError::Internal
		})?;
		let new_hash = hash_refresh_token(&new_refresh);
		let new_id = self
			.sessions
			.create(session.user_id, &new_hash, now + self.refresh_ttl)
			.await?;
		self.sessions.revoke_and_replace(session.id, new_id).await?;

		Ok(TokenPair {
			access_token,
			refresh_token: new_refresh,
		})
	}

	async fn issue_pair(&self, user_id: UserId) -> Result<TokenPair, ServerError> {
		let access_token = mint_access_token(user_id, &self.jwt).map_err(|e| {
			tracing::error!(user_id = %user_id, error = %e, "access token mint failed");
			ServerError::Internal
		})?;
		let refresh_token = new_refresh_token().map_err(|e| {
			tracing::error!(error = %e, "refresh token generation failed");
			ServerError::Internal
		})?;
		let refresh_hash = hash_refresh_token(&refresh_token);
		self.sessions
			.create(user_id, &refresh_hash, Utc::now() + self.refresh_ttl)
			.await?;
		Ok(TokenPair {
			access_token,
			refresh_token,
		})
	}
}
