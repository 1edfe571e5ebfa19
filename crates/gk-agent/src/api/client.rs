// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! JSON HTTP client with uniform semantics for every verb:
//!
//! - `Accept: application/json` on every request
//! - `Content-Type: application/json` only when a body is actually sent
//! - bearer token attached when provided
//! - 204 No Content is success, no decode attempted
//! - an empty 2xx body is success when the caller can live without a value
//! - non-2xx becomes an error carrying the trimmed response body, falling
//!   back to the status line when the body is empty

use reqwest::header::ACCEPT;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::error::AgentError;

/// Per-call total timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct JsonClient {
	base_url: String,
	http: reqwest::Client,
}

impl JsonClient {
	/// `insecure` disables TLS certificate verification for self-signed
	/// development servers. Never use it against production.
	pub fn new(base_url: &str, insecure: bool) -> Self {
		let mut builder = gk_common_http::builder().timeout(REQUEST_TIMEOUT);
		if insecure {
			builder = builder.danger_accept_invalid_certs(true);
		}
		Self {
			base_url: base_url.trim_end_matches('/').to_string(),
			http: builder.build().expect("failed to build HTTP client"),
		}
	}

	pub async fn post_json<Req: Serialize, Resp: DeserializeOwned>(
		&self,
		path: &str,
		body: Option<&Req>,
		token: Option<&str>,
	) -> Result<Option<Resp>, AgentError> {
		self.request(Method::POST, path, body, token).await
	}

	pub async fn get_json<Resp: DeserializeOwned>(
		&self,
		path: &str,
		token: Option<&str>,
	) -> Result<Option<Resp>, AgentError> {
		self.request::<(), Resp>(Method::GET, path, None, token).await
	}

	pub async fn put_json<Req: Serialize, Resp: DeserializeOwned>(
		&self,
		path: &str,
		body: Option<&Req>,
		token: Option<&str>,
	) -> Result<Option<Resp>, AgentError> {
		self.request(Method::PUT, path, body, token).await
	}

	pub async fn delete_json<Resp: DeserializeOwned>(
		&self,
		path: &str,
		token: Option<&str>,
	) -> Result<Option<Resp>, AgentError> {
		self.request::<(), Resp>(Method::DELETE, path, None, token).await
	}

	async fn request<Req: Serialize, Resp: DeserializeOwned>(
		&self,
		method: Method,
		path: &str,
		body: Option<&Req>,
		token: Option<&str>,
	) -> Result<Option<Resp>, AgentError> {
		let url = format!("{}{}", self.base_url, path);
		let mut request = self.http.request(method, url).header(ACCEPT, "application/json");
		if let Some(body) = body {
			request = request.json(body);
		}
		if let Some(token) = token {
			request = request.bearer_auth(token);
		}

		let response = request.send().await?;
		let status = response.status();
		tracing::debug!(status = %status, path = %path, "server response");

		if !status.is_success() {
			let status_line = format!(
				"{} {}",
				status.as_u16(),
				status.canonical_reason().unwrap_or_default()
			);
			let body = response.text().await.unwrap_or_default();
			let message = body.trim();
			return Err(AgentError::Api(if message.is_empty() {
				status_line.trim_end().to_string()
			} else {
				message.to_string()
			}));
		}

		if status == StatusCode::NO_CONTENT {
			return Ok(None);
		}

		let bytes = response.bytes().await?;
		if bytes.is_empty() {
			return Ok(None);
		}
		serde_json::from_slice(&bytes)
			.map(Some)
			.map_err(|e| AgentError::Decode(e.to_string()))
	}
}
