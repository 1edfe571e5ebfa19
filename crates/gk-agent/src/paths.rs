// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Default on-disk locations for the agent's state.

use std::path::PathBuf;

use crate::error::AgentError;

/// `~/.gophkeeper`
pub fn default_dir() -> Result<PathBuf, AgentError> {
	dirs::home_dir()
		.map(|home| home.join(".gophkeeper"))
		.ok_or(AgentError::HomeDirNotFound)
}

/// `~/.gophkeeper/secrets.json`
pub fn default_mirror_path() -> Result<PathBuf, AgentError> {
	Ok(default_dir()?.join("secrets.json"))
}

/// `~/.gophkeeper/credentials.json`
pub fn default_credentials_path() -> Result<PathBuf, AgentError> {
	Ok(default_dir()?.join("credentials.json"))
}
