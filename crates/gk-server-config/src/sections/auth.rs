// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication section: token lifetimes, JWT signing, session policy.

use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AuthConfig {
	pub issuer: String,
	pub audience: String,
	pub access_ttl: Duration,
	pub refresh_ttl: Duration,
	pub jwt: JwtSection,
	pub sessions: SessionsSection,
}

#[derive(Debug, Clone)]
pub struct JwtSection {
	/// Only HS256 is supported; validation rejects anything else.
	pub algorithm: String,
	/// Symmetric signing key; usually `${GK_JWT_SIGNING_KEY}` in the file.
	pub signing_key: String,
}

#[derive(Debug, Clone)]
pub struct SessionsSection {
	/// Only "db" is implemented.
	pub store: String,
	pub rotate_refresh: bool,
	pub reuse_detection: bool,
	pub max_sessions_per_user: u32,
}

impl Default for AuthConfig {
	fn default() -> Self {
		Self {
			issuer: "gophkeeper".to_string(),
			audience: "gophkeeper-agent".to_string(),
			access_ttl: Duration::from_secs(15 * 60),
			refresh_ttl: Duration::from_secs(30 * 24 * 60 * 60),
			jwt: JwtSection {
				algorithm: "HS256".to_string(),
				signing_key: String::new(),
			},
			sessions: SessionsSection {
				store: "db".to_string(),
				rotate_refresh: true,
				reuse_detection: true,
				max_sessions_per_user: 10,
			},
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JwtSectionLayer {
	#[serde(default)]
	pub algorithm: Option<String>,
	#[serde(default)]
	pub signing_key: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionsSectionLayer {
	#[serde(default)]
	pub store: Option<String>,
	#[serde(default)]
	pub rotate_refresh: Option<bool>,
	#[serde(default)]
	pub reuse_detection: Option<bool>,
	#[serde(default)]
	pub max_sessions_per_user: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfigLayer {
	#[serde(default)]
	pub issuer: Option<String>,
	#[serde(default)]
	pub audience: Option<String>,
	#[serde(default)]
	pub access_ttl_secs: Option<u64>,
	#[serde(default)]
	pub refresh_ttl_secs: Option<u64>,
	#[serde(default)]
	pub jwt: Option<JwtSectionLayer>,
	#[serde(default)]
	pub sessions: Option<SessionsSectionLayer>,
}

impl AuthConfigLayer {
	pub fn merge(&mut self, other: AuthConfigLayer) {
		if other.issuer.is_some() {
			self.issuer = other.issuer;
		}
		if other.audience.is_some() {
			self.audience = other.audience;
		}
		if other.access_ttl_secs.is_some() {
			self.access_ttl_secs = other.access_ttl_secs;
		}
		if other.refresh_ttl_secs.is_some() {
			self.refresh_ttl_secs = other.refresh_ttl_secs;
		}
		if let Some(incoming) = other.jwt {
			let jwt = self.jwt.get_or_insert_with(Default::default);
			if incoming.algorithm.is_some() {
				jwt.algorithm = incoming.algorithm;
			}
			if incoming.signing_key.is_some() {
				jwt.signing_key = incoming.signing_key;
			}
		}
		if let Some(incoming) = other.sessions {
			let sessions = self.sessions.get_or_insert_with(Default::default);
			if incoming.store.is_some() {
				sessions.store = incoming.store;
			}
			if incoming.rotate_refresh.is_some() {
				sessions.rotate_refresh = incoming.rotate_refresh;
			}
			if incoming.reuse_detection.is_some() {
				sessions.reuse_detection = incoming.reuse_detection;
			}
			if incoming.max_sessions_per_user.is_some() {
				sessions.max_sessions_per_user = incoming.max_sessions_per_user;
			}
		}
	}

	pub fn finalize(self) -> AuthConfig {
		let d = AuthConfig::default();
		let jwt = self.jwt.unwrap_or_default();
		let sessions = self.sessions.unwrap_or_default();
		AuthConfig {
			issuer: self.issuer.unwrap_or(d.issuer),
			audience: self.audience.unwrap_or(d.audience),
			access_ttl: self
				.access_ttl_secs
				.map(Duration::from_secs)
				.unwrap_or(d.access_ttl),
			refresh_ttl: self
				.refresh_ttl_secs
				.map(Duration::from_secs)
				.unwrap_or(d.refresh_ttl),
			jwt: JwtSection {
				algorithm: jwt.algorithm.unwrap_or(d.jwt.algorithm),
				signing_key: jwt.signing_key.unwrap_or(d.jwt.signing_key),
			},
			sessions: SessionsSection {
				store: sessions.store.unwrap_or(d.sessions.store),
				rotate_refresh: sessions.rotate_refresh.unwrap_or(d.sessions.rotate_refresh),
				reuse_detection: sessions
					.reuse_detection
					.unwrap_or(d.sessions.reuse_detection),
				max_sessions_per_user: sessions
					.max_sessions_per_user
					.unwrap_or(d.sessions.max_sessions_per_user),
			},
		}
	}
}
