// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Logging section.

use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct LogConfig {
	pub level: String,
	/// "json" or "console".
	pub format: String,
	/// Field names that must never reach the log output.
	pub redact_fields: Vec<String>,
}

impl Default for LogConfig {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			format: "json".to_string(),
			redact_fields: vec![
				"password".to_string(),
				"payload".to_string(),
				"refresh_token".to_string(),
				"access_token".to_string(),
				"signing_key".to_string(),
			],
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedactLayer {
	#[serde(default)]
	pub fields: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogConfigLayer {
	#[serde(default)]
	pub level: Option<String>,
	#[serde(default)]
	pub format: Option<String>,
	#[serde(default)]
	pub redact: Option<RedactLayer>,
}

impl LogConfigLayer {
	pub fn merge(&mut self, other: LogConfigLayer) {
		if other.level.is_some() {
			self.level = other.level;
		}
		if other.format.is_some() {
			self.format = other.format;
		}
		if let Some(incoming) = other.redact {
			let redact = self.redact.get_or_insert_with(Default::default);
			if incoming.fields.is_some() {
				redact.fields = incoming.fields;
			}
		}
	}

	pub fn finalize(self) -> LogConfig {
		let d = LogConfig::default();
		LogConfig {
			level: self.level.unwrap_or(d.level),
			format: self.format.unwrap_or(d.format),
			redact_fields: self
				.redact
				.and_then(|r| r.fields)
				.unwrap_or(d.redact_fields),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn redact_list_is_non_empty_by_default() {
		let cfg = LogConfigLayer::default().finalize();
		assert!(!cfg.redact_fields.is_empty());
		assert!(cfg.redact_fields.contains(&"password".to_string()));
	}
}
