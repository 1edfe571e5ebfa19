// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
	/// Non-2xx response; the message is the server's response body (or the
	/// status line when the body was empty).
	#[error("{0}")]
	Api(String),

	#[error("http request failed: {0}")]
	Transport(#[from] reqwest::Error),

	#[error("failed to decode response: {0}")]
	Decode(String),

	#[error("{path}: {source}")]
	Io {
		path: String,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to parse {path}: {source}")]
	Parse {
		path: String,
		#[source]
		source: serde_json::Error,
	},

	#[error("could not determine home directory")]
	HomeDirNotFound,
}
