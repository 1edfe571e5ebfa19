// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! TLS section. Termination itself happens in front of the server; this
//! section exists so production deployments fail fast when it is missing.

use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct TlsConfig {
	pub enabled: bool,
	pub cert_file: Option<String>,
	pub key_file: Option<String>,
	/// "1.2" or "1.3". Anything older is rejected at validation.
	pub min_version: String,
}

impl Default for TlsConfig {
	fn default() -> Self {
		Self {
			enabled: false,
			cert_file: None,
			key_file: None,
			min_version: "1.3".to_string(),
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TlsConfigLayer {
	#[serde(default)]
	pub enabled: Option<bool>,
	#[serde(default)]
	pub cert_file: Option<String>,
	#[serde(default)]
	pub key_file: Option<String>,
	#[serde(default)]
	pub min_version: Option<String>,
}

impl TlsConfigLayer {
	pub fn merge(&mut self, other: TlsConfigLayer) {
		if other.enabled.is_some() {
			self.enabled = other.enabled;
		}
		if other.cert_file.is_some() {
			self.cert_file = other.cert_file;
		}
		if other.key_file.is_some() {
			self.key_file = other.key_file;
		}
		if other.min_version.is_some() {
			self.min_version = other.min_version;
		}
	}

	pub fn finalize(self) -> TlsConfig {
		let d = TlsConfig::default();
		TlsConfig {
			enabled: self.enabled.unwrap_or(d.enabled),
			cert_file: self.cert_file,
			key_file: self.key_file,
			min_version: self.min_version.unwrap_or(d.min_version),
		}
	}
}
