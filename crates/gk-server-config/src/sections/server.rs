// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP server section.

use serde::Deserialize;
use std::time::Duration;

/// HTTP server settings (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct ServerSection {
	pub host: String,
	pub port: u16,
	/// Trust X-Forwarded-* headers from a fronting proxy.
	pub trust_proxy: bool,
	pub read_timeout: Duration,
	pub read_header_timeout: Duration,
	pub write_timeout: Duration,
	pub idle_timeout: Duration,
	pub shutdown_timeout: Duration,
	pub max_header_bytes: usize,
	pub max_body_bytes: usize,
}

impl Default for ServerSection {
	fn default() -> Self {
		Self {
			host: "127.0.0.1".to_string(),
			port: 8080,
			trust_proxy: false,
			read_timeout: Duration::from_secs(10),
			read_header_timeout: Duration::from_secs(5),
			write_timeout: Duration::from_secs(10),
			idle_timeout: Duration::from_secs(60),
			shutdown_timeout: Duration::from_secs(10),
			max_header_bytes: 64 * 1024,
			max_body_bytes: 2 * 1024 * 1024,
		}
	}
}

/// HTTP server section layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerSectionLayer {
	#[serde(default)]
	pub host: Option<String>,
	#[serde(default)]
	pub port: Option<u16>,
	#[serde(default)]
	pub trust_proxy: Option<bool>,
	#[serde(default)]
	pub read_timeout_secs: Option<u64>,
	#[serde(default)]
	pub read_header_timeout_secs: Option<u64>,
	#[serde(default)]
	pub write_timeout_secs: Option<u64>,
	#[serde(default)]
	pub idle_timeout_secs: Option<u64>,
	#[serde(default)]
	pub shutdown_timeout_secs: Option<u64>,
	#[serde(default)]
	pub max_header_bytes: Option<usize>,
	#[serde(default)]
	pub max_body_bytes: Option<usize>,
}

impl ServerSectionLayer {
	pub fn merge(&mut self, other: ServerSectionLayer) {
		if other.host.is_some() {
			self.host = other.host;
		}
		if other.port.is_some() {
			self.port = other.port;
		}
		if other.trust_proxy.is_some() {
			self.trust_proxy = other.trust_proxy;
		}
		if other.read_timeout_secs.is_some() {
			self.read_timeout_secs = other.read_timeout_secs;
		}
		if other.read_header_timeout_secs.is_some() {
			self.read_header_timeout_secs = other.read_header_timeout_secs;
		}
		if other.write_timeout_secs.is_some() {
			self.write_timeout_secs = other.write_timeout_secs;
		}
		if other.idle_timeout_secs.is_some() {
			self.idle_timeout_secs = other.idle_timeout_secs;
		}
		if other.shutdown_timeout_secs.is_some() {
			self.shutdown_timeout_secs = other.shutdown_timeout_secs;
		}
		if other.max_header_bytes.is_some() {
			self.max_header_bytes = other.max_header_bytes;
		}
		if other.max_body_bytes.is_some() {
			self.max_body_bytes = other.max_body_bytes;
		}
	}

	pub fn finalize(self) -> ServerSection {
		let d = ServerSection::default();
		ServerSection {
			host: self.host.unwrap_or(d.host),
			port: self.port.unwrap_or(d.port),
			trust_proxy: self.trust_proxy.unwrap_or(d.trust_proxy),
			read_timeout: self
				.read_timeout_secs
				.map(Duration::from_secs)
				.unwrap_or(d.read_timeout),
			read_header_timeout: self
				.read_header_timeout_secs
				.map(Duration::from_secs)
				.unwrap_or(d.read_header_timeout),
			write_timeout: self
				.write_timeout_secs
				.map(Duration::from_secs)
				.unwrap_or(d.write_timeout),
			idle_timeout: self
				.idle_timeout_secs
				.map(Duration::from_secs)
				.unwrap_or(d.idle_timeout),
			shutdown_timeout: self
				.shutdown_timeout_secs
				.map(Duration::from_secs)
				.unwrap_or(d.shutdown_timeout),
			max_header_bytes: self.max_header_bytes.unwrap_or(d.max_header_bytes),
			max_body_bytes: self.max_body_bytes.unwrap_or(d.max_body_bytes),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_bind_loopback() {
		let section = ServerSectionLayer::default().finalize();
		assert_eq!(section.host, "127.0.0.1");
		assert_eq!(section.port, 8080);
	}

	#[test]
	fn merge_prefers_incoming_fields() {
		let mut base = ServerSectionLayer {
			port: Some(8080),
			host: Some("0.0.0.0".into()),
			..Default::default()
		};
		base.merge(ServerSectionLayer {
			port: Some(9999),
			..Default::default()
		});
		let section = base.finalize();
		assert_eq!(section.port, 9999);
		assert_eq!(section.host, "0.0.0.0");
	}
}
