// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Secret CRUD and sync calls. Payloads are base64 of the sealed envelope
//! in both directions; the agent never uploads plaintext.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::JsonClient;
use crate::error::AgentError;
use crate::mirror::Secret;

#[derive(Debug, Serialize)]
pub struct CreateSecretRequest {
	#[serde(rename = "type")]
	pub kind: String,
	pub title: String,
	pub payload: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub meta: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSecretResponse {
	pub id: String,
	pub version: i64,
	pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize)]
pub struct UpdateSecretRequest {
	#[serde(rename = "type", skip_serializing_if = "Option::is_none")]
	pub kind: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub payload: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub meta: Option<String>,
	pub version: i64,
}

#[derive(Debug, Deserialize)]
struct SyncResponse {
	#[serde(default)]
	secrets: Vec<Secret>,
}

/// GET /secrets — the server's complete view for this user.
pub async fn sync(client: &JsonClient, access_token: &str) -> Result<Vec<Secret>, AgentError> {
	let resp: Option<SyncResponse> = client.get_json("/secrets", Some(access_token)).await?;
	Ok(resp.map(|r| r.secrets).unwrap_or_default())
}

/// POST /secrets
pub async fn create_secret(
	client: &JsonClient,
	access_token: &str,
	req: &CreateSecretRequest,
) -> Result<CreateSecretResponse, AgentError> {
	client
		.post_json("/secrets", Some(req), Some(access_token))
		.await?
		.ok_or_else(|| AgentError::Decode("server returned an empty body".to_string()))
}

/// PUT /secrets/{id} — the server answers 204 on success.
pub async fn update_secret(
	client: &JsonClient,
	access_token: &str,
	id: &str,
	req: &UpdateSecretRequest,
) -> Result<(), AgentError> {
	let _: Option<serde_json::Value> = client
		.put_json(&format!("/secrets/{id}"), Some(req), Some(access_token))
		.await?;
	Ok(())
}

/// DELETE /secrets/{id}?version=N
pub async fn delete_secret(
	client: &JsonClient,
	access_token: &str,
	id: &str,
	version: i64,
) -> Result<(), AgentError> {
	let _: Option<serde_json::Value> = client
		.delete_json(&format!("/secrets/{id}?version={version}"), Some(access_token))
		.await?;
	Ok(())
}
