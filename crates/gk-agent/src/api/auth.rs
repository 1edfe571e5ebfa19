// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication calls.

use serde::{Deserialize, Serialize};

use crate::api::JsonClient;
use crate::error::AgentError;

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
	email: &'a str,
	password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct RegisterResponse {
	pub user_id: String,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
	email: &'a str,
	password: &'a str,
}

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
	refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct TokenPairResponse {
	pub access_token: String,
	pub refresh_token: String,
}

fn require_body<T>(resp: Option<T>) -> Result<T, AgentError> {
	resp.ok_or_else(|| AgentError::Decode("server returned an empty body".to_string()))
}

/// POST /auth/register
pub async fn register(
	client: &JsonClient,
	email: &str,
	password: &str,
) -> Result<RegisterResponse, AgentError> {
	let req = RegisterRequest { email, password };
	require_body(client.post_json("/auth/register", Some(&req), None).await?)
}

/// POST /auth/login
pub async fn login(
	client: &JsonClient,
	email: &str,
	password: &str,
) -> Result<TokenPairResponse, AgentError> {
	let req = LoginRequest { email, password };
	require_body(client.post_json("/auth/login", Some(&req), None).await?)
}

/// POST /auth/refresh
pub async fn refresh(
	client: &JsonClient,
	refresh_token: &str,
) -> Result<TokenPairResponse, AgentError> {
	let req = RefreshRequest { refresh_token };
	require_body(client.post_json("/auth/refresh", Some(&req), None).await?)
}
