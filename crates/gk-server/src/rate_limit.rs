// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Token-bucket request rate limiting.
//!
//! One bucket per key (client IP or authenticated-user subject). Buckets
//! refill continuously at `rps` up to `burst`. In-memory only; a restart
//! starts everyone fresh.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::Instant;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

use gk_server_auth::{extract_bearer_token, verify_access_token};
use gk_server_config::RateLimitKey;

use crate::api::AppState;
use crate::error::ErrorResponse;

/// Bucket map size cap. Beyond this, stale buckets are evicted before new
/// ones are inserted.
const MAX_ENTRIES: usize = 10_000;

/// A bucket older than this without traffic is safe to drop: it would have
/// refilled to full anyway.
const STALE_AFTER_SECS: u64 = 60;

#[derive(Debug)]
struct Bucket {
	tokens: f64,
	last_seen: Instant,
}

#[derive(Debug)]
pub struct RateLimiter {
	buckets: Mutex<HashMap<String, Bucket>>,
	rps: f64,
	burst: f64,
}

impl RateLimiter {
	pub fn new(rps: f64, burst: u32) -> Self {
		Self {
			buckets: Mutex::new(HashMap::new()),
			rps,
			burst: f64::from(burst),
		}
	}

	/// Take one token for `key`. Returns false when the bucket is empty.
	pub fn allow(&self, key: &str) -> bool {
		let now = Instant::now();
		let mut buckets = match self.buckets.lock() {
			Ok(guard) => guard,
			Err(poisoned) => poisoned.into_inner(),
		};

		if buckets.len() >= MAX_ENTRIES && !buckets.contains_key(key) {
			buckets.retain(|_, b| now.duration_since(b.last_seen).as_secs() < STALE_AFTER_SECS);
		}

		let bucket = buckets.entry(key.to_string()).or_insert(Bucket {
			tokens: self.burst,
			last_seen: now,
		});

		let elapsed = now.duration_since(bucket.last_seen).as_secs_f64();
		bucket.tokens = (bucket.tokens + elapsed * self.rps).min(self.burst);
		bucket.last_seen = now;

		if bucket.tokens >= 1.0 {
			bucket.tokens -= 1.0;
			true
		} else {
			false
		}
	}
}

/// Axum middleware. Pass-through when the limiter is disabled.
pub async fn rate_limit_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
	let Some(limiter) = state.rate_limiter.as_ref() else {
		return next.run(request).await;
	};

	let key = match state.config.security.rate_limit.key {
		RateLimitKey::Ip => client_ip(&request),
		RateLimitKey::User => user_key(&state, &request).unwrap_or_else(|| client_ip(&request)),
	};

	if !limiter.allow(&key) {
		tracing::warn!(key = %key, "request rate limited");
		return (
			StatusCode::TOO_MANY_REQUESTS,
			Json(ErrorResponse {
				error: "too many requests".to_string(),
			}),
		)
			.into_response();
	}

	next.run(request).await
}

fn client_ip(request: &Request) -> String {
	request
		.extensions()
		.get::<ConnectInfo<SocketAddr>>()
		.map(|ConnectInfo(addr)| addr.ip().to_string())
		.unwrap_or_else(|| "unknown".to_string())
}

/// Key by authenticated user when the token verifies; anonymous traffic
/// falls back to the IP key.
fn user_key(state: &AppState, request: &Request) -> Option<String> {
	let token = extract_bearer_token(request.headers())?;
	verify_access_token(&token, &state.jwt)
		.ok()
		.map(|user_id| user_id.to_string())
}
