// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Secret collection business rules.
//!
//! Payloads arrive already sealed by the agent; the service only enforces
//! the storage policy (allow-listed types, size limits) and delegates the
//! optimistic-concurrency semantics to the repository.

use tracing::instrument;

use gk_server_auth::{SecretId, UserId};
use gk_server_config::SecretsConfig;
use gk_server_db::{CreatedSecret, SecretPatch, SecretRecord, SecretRepository, SecretType};

use crate::error::ServerError;

/// Client-supplied partial update, raw off the wire. `Some` means the field
/// was present in the request.
#[derive(Debug, Clone, Default)]
pub struct SecretUpdate {
	pub kind: Option<String>,
	pub title: Option<String>,
	pub payload: Option<String>,
	pub meta: Option<String>,
}

pub struct SecretsService {
	repo: SecretRepository,
	policy: SecretsConfig,
}

impl SecretsService {
	pub fn new(repo: SecretRepository, policy: SecretsConfig) -> Self {
		Self { repo, policy }
	}

	fn parse_allowed_type(&self, raw: &str) -> Result<SecretType, ServerError> {
		let kind: SecretType = raw.trim().parse().map_err(|_| ServerError::InvalidInput)?;
		if !self.policy.allowed_types.iter().any(|t| t == kind.as_str()) {
			return Err(ServerError::InvalidInput);
		}
		Ok(kind)
	}

	fn check_payload(&self, payload: &str) -> Result<(), ServerError> {
		if payload.is_empty() {
			return Err(ServerError::InvalidInput);
		}
		if payload.len() > self.policy.max_payload_bytes {
			return Err(ServerError::PayloadTooLarge);
		}
		Ok(())
	}

	fn check_meta(&self, meta: Option<&str>) -> Result<(), ServerError> {
		if let Some(meta) = meta {
			if meta.len() > self.policy.max_meta_bytes {
				return Err(ServerError::InvalidInput);
			}
		}
		Ok(())
	}

	/// Store a new secret. The payload must be the client's sealed envelope
	/// (base64); the server treats it as opaque bytes.
	#[instrument(skip(self, payload, meta), fields(user_id = %user_id))]
	pub async fn create(
		&self,
		user_id: UserId,
		kind: &str,
		title: &str,
		payload: &str,
		meta: Option<&str>,
	) -> Result<CreatedSecret, ServerError> {
		if user_id.as_uuid().is_nil() {
			return Err(ServerError::InvalidInput);
		}
		if title.is_empty() {
			return Err(ServerError::InvalidInput);
		}
		let kind = self.parse_allowed_type(kind)?;
		self.check_payload(payload)?;
		self.check_meta(meta)?;

		Ok(self.repo.create(user_id, kind, title, payload, meta).await?)
	}

	/// All secrets of the user, most recently updated first.
	#[instrument(skip(self), fields(user_id = %user_id))]
	pub async fn list(&self, user_id: UserId) -> Result<Vec<SecretRecord>, ServerError> {
		if user_id.as_uuid().is_nil() {
			return Err(ServerError::InvalidInput);
		}
		Ok(self.repo.list_for_user(user_id).await?)
	}

	/// Apply a partial update gated on the expected version.
	#[instrument(skip(self, update), fields(user_id = %user_id, id = %id, expected_version))]
	pub async fn update(
		&self,
		user_id: UserId,
		id: SecretId,
		update: SecretUpdate,
		expected_version: i64,
	) -> Result<(), ServerError> {
		if user_id.as_uuid().is_nil() || expected_version < 1 {
			return Err(ServerError::InvalidInput);
		}

		let kind = update
			.kind
			.as_deref()
			.map(|raw| self.parse_allowed_type(raw))
			.transpose()?;
		if let Some(title) = update.title.as_deref() {
			if title.is_empty() {
				return Err(ServerError::InvalidInput);
			}
		}
		if let Some(payload) = update.payload.as_deref() {
			self.check_payload(payload)?;
		}
		self.check_meta(update.meta.as_deref())?;

		let patch = SecretPatch {
			kind,
			title: update.title,
			payload: update.payload,
			meta: update.meta,
		};
		Ok(self.repo.update(user_id, id, &patch, expected_version).await?)
	}

	/// Delete gated on the expected version.
	#[instrument(skip(self), fields(user_id = %user_id, id = %id, expected_version))]
	pub async fn delete(
		&self,
		user_id: UserId,
		id: SecretId,
		expected_version: i64,
	) -> Result<(), ServerError> {
		if user_id.as_uuid().is_nil() || expected_version < 1 {
			return Err(ServerError::InvalidInput);
		}
		Ok(self.repo.delete(user_id, id, expected_version).await?)
	}
}
