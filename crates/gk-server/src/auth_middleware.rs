// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Bearer-token authentication for protected routes.
//!
//! [`RequireAuth`] runs before any body extraction, so a request without a
//! valid access token is rejected with 401 before the handler sees it. The
//! JWT subject is normalised to a parsed [`UserId`] here; handlers never see
//! the raw claim string.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use gk_server_auth::{extract_bearer_token, verify_access_token, UserId};

use crate::api::AppState;
use crate::error::ServerError;

/// Extractor carrying the authenticated user id.
#[derive(Debug, Clone, Copy)]
pub struct RequireAuth(pub UserId);

impl FromRequestParts<AppState> for RequireAuth {
	type Rejection = ServerError;

	async fn from_request_parts(
		parts: &mut Parts,
		state: &AppState,
	) -> Result<Self, Self::Rejection> {
		let token = extract_bearer_token(&parts.headers).ok_or(ServerError::Unauthorized)?;
		let user_id = verify_access_token(&token, &state.jwt).map_err(|e| {
			tracing::debug!(error = %e, "access token rejected");
			ServerError::Unauthorized
		})?;
		Ok(RequireAuth(user_id))
	}
}
