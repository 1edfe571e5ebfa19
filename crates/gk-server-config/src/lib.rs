// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Centralized configuration management for the GophKeeper server.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file,
//!   environment)
//! - `${VAR}` substitution inside the config file, so secrets stay in the
//!   environment
//! - Startup validation that refuses to boot a server with a missing or
//!   weak signing key
//!
//! # Usage
//!
//! ```ignore
//! let config = gk_server_config::load_config_with_file("server.toml")?;
//! println!("listening on {}", config.socket_addr());
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::expand_env_strict;

use std::path::Path;

use sections::secrets::KNOWN_SECRET_TYPES;

/// Fully resolved server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
	/// Deployment environment: dev, stage or prod.
	pub env: String,
	pub server: ServerSection,
	pub tls: TlsConfig,
	pub db: DbConfig,
	pub auth: AuthConfig,
	pub password: PasswordConfig,
	pub secrets: SecretsConfig,
	pub security: SecurityConfig,
	pub log: LogConfig,
}

impl ServerConfig {
	/// Socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.server.host, self.server.port)
	}
}

/// Default config file path.
pub const DEFAULT_CONFIG_PATH: &str = "server.toml";

/// Load configuration with standard precedence: built-in defaults, then the
/// TOML file, then `GK_SERVER_*` environment overrides.
pub fn load_config_with_file(path: impl AsRef<Path>) -> Result<ServerConfig, ConfigError> {
	let mut merged = ServerConfigLayer::default();

	let file_layer = sources::load_toml_layer(path.as_ref())?;
	merged.merge(file_layer);
	merged.merge(sources::load_env_layer());

	finalize(merged)
}

/// Load configuration from the environment only (tests, trivial deployments).
pub fn load_config_from_env() -> Result<ServerConfig, ConfigError> {
	finalize(sources::load_env_layer())
}

fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let config = ServerConfig {
		env: layer.env.unwrap_or_else(|| "dev".to_string()),
		server: layer.server.unwrap_or_default().finalize(),
		tls: layer.tls.unwrap_or_default().finalize(),
		db: layer.db.unwrap_or_default().finalize(),
		auth: layer.auth.unwrap_or_default().finalize(),
		password: layer
			.password
			.unwrap_or_default()
			.finalize()
			.map_err(ConfigError::Invalid)?,
		secrets: layer.secrets.unwrap_or_default().finalize(),
		security: layer
			.security
			.unwrap_or_default()
			.finalize()
			.map_err(ConfigError::Invalid)?,
		log: layer.log.unwrap_or_default().finalize(),
	};

	validate(&config)?;

	tracing::debug!(
		env = %config.env,
		host = %config.server.host,
		port = config.server.port,
		"configuration resolved"
	);
	Ok(config)
}

fn validate(config: &ServerConfig) -> Result<(), ConfigError> {
	if !matches!(config.env.as_str(), "dev" | "stage" | "prod") {
		return Err(ConfigError::Invalid(format!("unknown env {:?}", config.env)));
	}

	if config.auth.jwt.algorithm != "HS256" {
		return Err(ConfigError::Invalid(format!(
			"jwt.algorithm must be HS256, got {:?}",
			config.auth.jwt.algorithm
		)));
	}
	let key = &config.auth.jwt.signing_key;
	if key.is_empty() {
		return Err(ConfigError::Invalid("jwt.signing_key is required".into()));
	}
	if key.contains("${") {
		return Err(ConfigError::Invalid(
			"jwt.signing_key still contains an unsubstituted ${VAR} placeholder".into(),
		));
	}
	if key.len() < 32 {
		return Err(ConfigError::Invalid(format!(
			"jwt.signing_key must be at least 32 bytes, got {}",
			key.len()
		)));
	}

	if config.auth.sessions.store != "db" {
		return Err(ConfigError::Invalid(format!(
			"sessions.store {:?} is not supported",
			config.auth.sessions.store
		)));
	}
	if config.auth.sessions.max_sessions_per_user == 0 {
		return Err(ConfigError::Invalid(
			"sessions.max_sessions_per_user must be > 0".into(),
		));
	}

	if config.env == "prod" && !config.tls.enabled {
		return Err(ConfigError::Invalid("tls must be enabled in prod".into()));
	}
	if config.tls.enabled {
		if !matches!(config.tls.min_version.as_str(), "1.2" | "1.3") {
			return Err(ConfigError::Invalid(format!(
				"tls.min_version must be 1.2 or 1.3, got {:?}",
				config.tls.min_version
			)));
		}
		if config.tls.cert_file.is_none() || config.tls.key_file.is_none() {
			return Err(ConfigError::Invalid(
				"tls.cert_file and tls.key_file are required when tls is enabled".into(),
			));
		}
	}

	if config.secrets.allowed_types.is_empty() {
		return Err(ConfigError::Invalid("secrets.allowed_types must not be empty".into()));
	}
	for kind in &config.secrets.allowed_types {
		if !KNOWN_SECRET_TYPES.contains(&kind.as_str()) {
			return Err(ConfigError::Invalid(format!(
				"secrets.allowed_types contains unknown type {kind:?}"
			)));
		}
	}

	let rl = &config.security.rate_limit;
	if rl.enabled && (rl.rps <= 0.0 || rl.burst == 0) {
		return Err(ConfigError::Invalid(
			"rate_limit.rps and rate_limit.burst must be > 0 when enabled".into(),
		));
	}

	if config.log.redact_fields.is_empty() {
		return Err(ConfigError::Invalid("log.redact.fields must not be empty".into()));
	}

	Ok(())
}
