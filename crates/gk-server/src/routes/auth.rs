// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Public authentication endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::error::ServerError;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
	pub email: String,
	pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
	pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
	pub email: String,
	pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
	pub refresh_token: String,
}

/// Shared by login and refresh responses.
#[derive(Debug, Serialize)]
pub struct TokenPairResponse {
	pub access_token: String,
	pub refresh_token: String,
}

/// POST /auth/register
#[tracing::instrument(skip_all)]
pub async fn register(
	State(state): State<AppState>,
	payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServerError> {
	let Json(req) = payload.map_err(|_| ServerError::BadJson)?;
	let user_id = state.auth_service.register(&req.email, &req.password).await?;
	Ok((
		StatusCode::CREATED,
		Json(RegisterResponse {
			user_id: user_id.to_string(),
		}),
	))
}

/// POST /auth/login
#[tracing::instrument(skip_all)]
pub async fn login(
	State(state): State<AppState>,
	payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServerError> {
	let Json(req) = payload.map_err(|_| ServerError::BadJson)?;
	let pair = state.auth_service.login(&req.email, &req.password).await?;
	Ok(Json(TokenPairResponse {
		access_token: pair.access_token,
		refresh_token: pair.refresh_token,
	}))
}

/// POST /auth/refresh
#[tracing::instrument(skip_all)]
pub async fn refresh(
	State(state): State<AppState>,
	payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServerError> {
	let Json(req) = payload.map_err(|_| ServerError::BadJson)?;
	let pair = state.auth_service.refresh(&req.refresh_token).await?;
	Ok(Json(TokenPairResponse {
		access_token: pair.access_token,
		refresh_token: pair.refresh_token,
	}))
}
