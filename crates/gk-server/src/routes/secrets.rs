// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Secret CRUD endpoints. Everything here requires a bearer token; payloads
//! are opaque ciphertext and are returned exactly as stored.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gk_server_auth::SecretId;
use gk_server_db::SecretRecord;

use crate::api::AppState;
use crate::auth_middleware::RequireAuth;
use crate::error::ServerError;
use crate::services::secrets::SecretUpdate;

#[derive(Debug, Deserialize)]
pub struct CreateSecretRequest {
	#[serde(rename = "type")]
	pub kind: String,
	pub title: String,
	/// base64 of the client-sealed envelope.
	pub payload: String,
	#[serde(default)]
	pub meta: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateSecretResponse {
	pub id: String,
	pub version: i64,
	pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct SecretResponse {
	pub id: String,
	#[serde(rename = "type")]
	pub kind: String,
	pub title: String,
	pub payload: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub meta: Option<String>,
	pub version: i64,
	pub updated_at: DateTime<Utc>,
	pub created_at: DateTime<Utc>,
}

impl From<SecretRecord> for SecretResponse {
	fn from(record: SecretRecord) -> Self {
		Self {
			id: record.id.to_string(),
			kind: record.kind.to_string(),
			title: record.title,
			payload: record.payload,
			meta: record.meta,
			version: record.version,
			updated_at: record.updated_at,
			created_at: record.created_at,
		}
	}
}

#[derive(Debug, Serialize)]
pub struct ListSecretsResponse {
	pub secrets: Vec<SecretResponse>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSecretRequest {
	#[serde(rename = "type", default)]
	pub kind: Option<String>,
	#[serde(default)]
	pub title: Option<String>,
	#[serde(default)]
	pub payload: Option<String>,
	#[serde(default)]
	pub meta: Option<String>,
	pub version: i64,
}

#[derive(Debug, Deserialize)]
pub struct DeleteSecretParams {
	pub version: i64,
}

fn parse_secret_id(raw: &str) -> Result<SecretId, ServerError> {
	raw.parse().map_err(|_| ServerError::InvalidInput)
}

/// POST /secrets
#[tracing::instrument(skip_all, fields(user_id = %user_id))]
pub async fn create_secret(
	RequireAuth(user_id): RequireAuth,
	State(state): State<AppState>,
	payload: Result<Json<CreateSecretRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServerError> {
	let Json(req) = payload.map_err(|_| ServerError::BadJson)?;
	let created = state
		.secrets_service
		.create(user_id, &req.kind, &req.title, &req.payload, req.meta.as_deref())
		.await?;
	Ok((
		StatusCode::CREATED,
		Json(CreateSecretResponse {
			id: created.id.to_string(),
			version: created.version,
			updated_at: created.updated_at,
		}),
	))
}

/// GET /secrets
#[tracing::instrument(skip_all, fields(user_id = %user_id))]
pub async fn list_secrets(
	RequireAuth(user_id): RequireAuth,
	State(state): State<AppState>,
) -> Result<impl IntoResponse, ServerError> {
	let records = state.secrets_service.list(user_id).await?;
	Ok(Json(ListSecretsResponse {
		secrets: records.into_iter().map(Into::into).collect(),
	}))
}

/// PUT /secrets/{id}
#[tracing::instrument(skip_all, fields(user_id = %user_id, secret_id = %id))]
pub async fn update_secret(
	RequireAuth(user_id): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
	payload: Result<Json<UpdateSecretRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServerError> {
	let id = parse_secret_id(&id)?;
	let Json(req) = payload.map_err(|_| ServerError::BadJson)?;

	let update = SecretUpdate {
		kind: req.kind,
		title: req.title,
		payload: req.payload,
		meta: req.meta,
	};
	state
		.secrets_service
		.update(user_id, id, update, req.version)
		.await?;
	Ok(StatusCode::NO_CONTENT)
}

/// DELETE /secrets/{id}?version=N
#[tracing::instrument(skip_all, fields(user_id = %user_id, secret_id = %id))]
pub async fn delete_secret(
	RequireAuth(user_id): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
	params: Result<Query<DeleteSecretParams>, QueryRejection>,
) -> Result<impl IntoResponse, ServerError> {
	let id = parse_secret_id(&id)?;
	let Query(params) = params.map_err(|_| ServerError::InvalidInput)?;
	state
		.secrets_service
		.delete(user_id, id, params.version)
		.await?;
	Ok(StatusCode::NO_CONTENT)
}
