// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("failed to read config file {path}: {source}")]
	Io {
		path: String,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to parse config file: {0}")]
	Parse(#[from] toml::de::Error),

	/// A `${VAR}` placeholder referenced an unset environment variable.
	#[error("environment variable {0} referenced in config is not set")]
	MissingEnvVar(String),

	#[error("invalid configuration: {0}")]
	Invalid(String),
}
