// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Application state and router assembly.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post, put};
use axum::Router;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

use gk_server_auth::JwtConfig;
use gk_server_config::ServerConfig;
use gk_server_db::{SecretRepository, SessionRepository, UserRepository};

use crate::rate_limit::{rate_limit_middleware, RateLimiter};
use crate::routes;
use crate::services::auth::AuthService;
use crate::services::secrets::SecretsService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
	pub config: Arc<ServerConfig>,
	pub auth_service: Arc<AuthService>,
	pub secrets_service: Arc<SecretsService>,
	/// Token verification parameters for the auth middleware.
	pub jwt: JwtConfig,
	pub rate_limiter: Option<Arc<RateLimiter>>,
	pub pool: SqlitePool,
}

/// Wire repositories and services onto a database pool.
pub fn create_app_state(pool: SqlitePool, config: ServerConfig) -> AppState {
	let users = UserRepository::new(pool.clone());
	let sessions = SessionRepository::new(pool.clone());
	let secrets = SecretRepository::new(pool.clone());

	let auth_service = AuthService::new(users, sessions, &config);
	let jwt = auth_service.jwt_config().clone();
	let secrets_service = SecretsService::new(secrets, config.secrets.clone());

	let rate_limit = &config.security.rate_limit;
	let rate_limiter = rate_limit
		.enabled
		.then(|| Arc::new(RateLimiter::new(rate_limit.rps, rate_limit.burst)));

	AppState {
		config: Arc::new(config),
		auth_service: Arc::new(auth_service),
		secrets_service: Arc::new(secrets_service),
		jwt,
		rate_limiter,
		pool,
	}
}

/// Build the HTTP router.
///
/// `/auth/*` is public; everything under `/secrets` authenticates through
/// the [`RequireAuth`](crate::auth_middleware::RequireAuth) extractor before
/// any body parsing happens.
pub fn create_router(state: AppState) -> Router {
	let max_body_bytes = state.config.server.max_body_bytes;

	Router::new()
		.route("/auth/register", post(routes::auth::register))
		.route("/auth/login", post(routes::auth::login))
		.route("/auth/refresh", post(routes::auth::refresh))
		.route(
			"/secrets",
			post(routes::secrets::create_secret).get(routes::secrets::list_secrets),
		)
		.route(
			"/secrets/{id}",
			put(routes::secrets::update_secret).delete(routes::secrets::delete_secret),
		)
		.route("/healthz", get(routes::health::health_check))
		.layer(middleware::from_fn_with_state(
			state.clone(),
			rate_limit_middleware,
		))
		.layer(DefaultBodyLimit::max(max_body_bytes))
		.layer(TraceLayer::new_for_http())
		.with_state(state)
}
