// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources.
//!
//! Precedence (highest wins): environment variables (`GK_SERVER_*`) over the
//! TOML file over built-in defaults. `${VAR}` placeholders inside the TOML
//! text are substituted from the environment before parsing, so secrets such
//! as the JWT signing key never live in the file itself.

use std::path::Path;

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;

/// Substitute every `${VAR}` occurrence from the environment.
///
/// Strict: an unset variable is an error, not an empty string. A config
/// that still carries placeholders must never reach validation.
pub fn expand_env_strict(raw: &str) -> Result<String, ConfigError> {
	let mut out = String::with_capacity(raw.len());
	let mut rest = raw;

	while let Some(start) = rest.find("${") {
		out.push_str(&rest[..start]);
		let tail = &rest[start + 2..];
		let Some(end) = tail.find('}') else {
			// Unterminated placeholder; keep the literal text and let
			// validation reject it.
			out.push_str(&rest[start..]);
			rest = "";
			break;
		};
		let name = &tail[..end];
		let value =
			std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))?;
		out.push_str(&value);
		rest = &tail[end + 1..];
	}
	out.push_str(rest);
	Ok(out)
}

/// Load the TOML file as a partial layer. A missing file yields an empty
/// layer so defaults apply.
pub fn load_toml_layer(path: &Path) -> Result<ServerConfigLayer, ConfigError> {
	let raw = match std::fs::read_to_string(path) {
		Ok(raw) => raw,
		Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
			tracing::debug!(path = %path.display(), "no config file, using defaults");
			return Ok(ServerConfigLayer::default());
		}
		Err(e) => {
			return Err(ConfigError::Io {
				path: path.display().to_string(),
				source: e,
			})
		}
	};

	let expanded = expand_env_strict(&raw)?;
	Ok(toml::from_str(&expanded)?)
}

/// Overrides from `GK_SERVER_*` environment variables.
///
/// Only the settings that make sense to flip per-deployment without touching
/// the file are exposed this way.
pub fn load_env_layer() -> ServerConfigLayer {
	let mut layer = ServerConfigLayer::default();

	if let Ok(host) = std::env::var("GK_SERVER_HOST") {
		layer.server.get_or_insert_with(Default::default).host = Some(host);
	}
	if let Ok(port) = std::env::var("GK_SERVER_PORT") {
		if let Ok(port) = port.parse() {
			layer.server.get_or_insert_with(Default::default).port = Some(port);
		}
	}
	if let Ok(url) = std::env::var("GK_SERVER_DATABASE_URL") {
		layer.db.get_or_insert_with(Default::default).dsn = Some(url);
	}
	if let Ok(key) = std::env::var("GK_SERVER_JWT_SIGNING_KEY") {
		layer
			.auth
			.get_or_insert_with(Default::default)
			.jwt
			.get_or_insert_with(Default::default)
			.signing_key = Some(key);
	}
	if let Ok(level) = std::env::var("GK_SERVER_LOG_LEVEL") {
		layer.log.get_or_insert_with(Default::default).level = Some(level);
	}

	layer
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn expands_placeholders_from_env() {
		std::env::set_var("GK_TEST_EXPAND_KEY", "super-secret");
		let out = expand_env_strict("signing_key = \"${GK_TEST_EXPAND_KEY}\"").unwrap();
		assert_eq!(out, "signing_key = \"super-secret\"");
		std::env::remove_var("GK_TEST_EXPAND_KEY");
	}

	#[test]
	fn missing_variable_is_an_error() {
		let err = expand_env_strict("key = \"${GK_TEST_DEFINITELY_UNSET}\"").unwrap_err();
		assert!(matches!(err, ConfigError::MissingEnvVar(name) if name == "GK_TEST_DEFINITELY_UNSET"));
	}

	#[test]
	fn unterminated_placeholder_passes_through() {
		let out = expand_env_strict("key = \"${BROKEN\"").unwrap();
		assert_eq!(out, "key = \"${BROKEN\"");
	}

	#[test]
	fn text_without_placeholders_is_untouched() {
		let out = expand_env_strict("plain = 1").unwrap();
		assert_eq!(out, "plain = 1");
	}
}
