// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Secret storage policy section.

use serde::Deserialize;

/// The full closed set of secret kinds a deployment may allow.
pub const KNOWN_SECRET_TYPES: &[&str] = &["login_password", "text", "binary", "bank_card", "otp"];

#[derive(Debug, Clone)]
pub struct SecretsConfig {
	/// The server only ever stores client-sealed ciphertext.
	pub store_ciphertext: bool,
	pub max_payload_bytes: usize,
	pub max_meta_bytes: usize,
	pub allowed_types: Vec<String>,
}

impl Default for SecretsConfig {
	fn default() -> Self {
		Self {
			store_ciphertext: true,
			max_payload_bytes: 1024 * 1024,
			max_meta_bytes: 4 * 1024,
			allowed_types: KNOWN_SECRET_TYPES.iter().map(|t| t.to_string()).collect(),
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecretsConfigLayer {
	#[serde(default)]
	pub store_ciphertext: Option<bool>,
	#[serde(default)]
	pub max_payload_bytes: Option<usize>,
	#[serde(default)]
	pub max_meta_bytes: Option<usize>,
	#[serde(default)]
	pub allowed_types: Option<Vec<String>>,
}

impl SecretsConfigLayer {
	pub fn merge(&mut self, other: SecretsConfigLayer) {
		if other.store_ciphertext.is_some() {
			self.store_ciphertext = other.store_ciphertext;
		}
		if other.max_payload_bytes.is_some() {
			self.max_payload_bytes = other.max_payload_bytes;
		}
		if other.max_meta_bytes.is_some() {
			self.max_meta_bytes = other.max_meta_bytes;
		}
		if other.allowed_types.is_some() {
			self.allowed_types = other.allowed_types;
		}
	}

	pub fn finalize(self) -> SecretsConfig {
		let d = SecretsConfig::default();
		SecretsConfig {
			store_ciphertext: self.store_ciphertext.unwrap_or(d.store_ciphertext),
			max_payload_bytes: self.max_payload_bytes.unwrap_or(d.max_payload_bytes),
			max_meta_bytes: self.max_meta_bytes.unwrap_or(d.max_meta_bytes),
			allowed_types: self.allowed_types.unwrap_or(d.allowed_types),
		}
	}
}
