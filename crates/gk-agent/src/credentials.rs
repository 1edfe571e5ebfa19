// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Token storage for the agent.
//!
//! `~/.gophkeeper/credentials.json` holds the current access and refresh
//! tokens with the same owner-only permission policy as the mirror. Saves
//! are atomic so a crash cannot leave half a token on disk.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::AgentError;
use crate::mirror::write_private_atomic;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
	#[serde(default)]
	pub access_token: String,
	#[serde(default)]
	pub refresh_token: String,
}

impl Credentials {
	pub fn is_logged_in(&self) -> bool {
		!self.access_token.is_empty()
	}

	/// Load from disk; a missing file yields empty credentials.
	pub fn load(path: &Path) -> Result<Self, AgentError> {
		let raw = match std::fs::read(path) {
			Ok(raw) => raw,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
			Err(e) => {
				return Err(AgentError::Io {
					path: path.display().to_string(),
					source: e,
				})
			}
		};
		serde_json::from_slice(&raw).map_err(|e| AgentError::Parse {
			path: path.display().to_string(),
			source: e,
		})
	}

	pub fn save(&self, path: &Path) -> Result<(), AgentError> {
		let body = serde_json::to_vec_pretty(self).expect("credentials serialization cannot fail");
		write_private_atomic(path, &body)
	}
}
