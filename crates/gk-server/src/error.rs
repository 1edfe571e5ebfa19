// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! The single error taxonomy of the HTTP surface.
//!
//! Every kind maps to exactly one status code, and that mapping happens in
//! exactly one place: the [`IntoResponse`] impl below. Services return
//! `ServerError` directly; handlers never translate statuses themselves.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use gk_server_db::DbError;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	/// Request body is not parseable JSON.
	#[error("bad json")]
	BadJson,

	/// Syntactically valid but semantically rejected input.
	#[error("invalid input")]
	InvalidInput,

	/// Login-specific: wrong email and wrong password are indistinguishable.
	#[error("invalid credentials")]
	InvalidCredentials,

	/// Missing, malformed, expired or reused credential.
	#[error("unauthorized")]
	Unauthorized,

	/// Row absent, or owned by someone else.
	#[error("not found")]
	NotFound,

	#[error("already exists")]
	AlreadyExists,

	/// Optimistic-lock version mismatch.
	#[error("conflict")]
	Conflict,

	#[error("payload too large")]
	PayloadTooLarge,

	/// Fixed message on the wire; the details only ever go to the logs.
	#[error("internal error")]
	Internal,
}

/// Standard error body: `{"error": "<message>"}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
	pub error: String,
}

impl ServerError {
	pub fn status(&self) -> StatusCode {
		match self {
			ServerError::BadJson | ServerError::InvalidInput => StatusCode::BAD_REQUEST,
			ServerError::InvalidCredentials | ServerError::Unauthorized => StatusCode::UNAUTHORIZED,
			ServerError::NotFound => StatusCode::NOT_FOUND,
			ServerError::AlreadyExists | ServerError::Conflict => StatusCode::CONFLICT,
			ServerError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
			ServerError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		let body = ErrorResponse {
			error: self.to_string(),
		};
		(self.status(), Json(body)).into_response()
	}
}

impl From<DbError> for ServerError {
	fn from(e: DbError) -> Self {
		match e {
			DbError::NotFound => ServerError::NotFound,
			DbError::Conflict => ServerError::Conflict,
			DbError::AlreadyExists => ServerError::AlreadyExists,
			other => {
				tracing::error!(error = %other, "storage failure");
				ServerError::Internal
			}
		}
	}
}
