// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Health check endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::api::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
	pub status: &'static str,
}

/// GET /healthz - liveness plus a database ping.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
	match sqlx::query("SELECT 1").execute(&state.pool).await {
		Ok(_) => (StatusCode::OK, Json(HealthResponse { status: "ok" })),
		Err(e) => {
			tracing::error!(error = %e, "health check failed");
			(
				StatusCode::SERVICE_UNAVAILABLE,
				Json(HealthResponse { status: "degraded" }),
			)
		}
	}
}
