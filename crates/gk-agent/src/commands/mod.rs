// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! CLI command implementations.

pub mod create;
pub mod delete;
pub mod get;
pub mod login;
pub mod refresh;
pub mod register;
pub mod sync;
pub mod update;

use std::path::PathBuf;

use anyhow::bail;

use crate::api::JsonClient;
use crate::credentials::Credentials;

/// Everything a command needs: the HTTP client and where local state lives.
pub struct AgentContext {
	pub client: JsonClient,
	pub mirror_path: PathBuf,
	pub credentials_path: PathBuf,
}

impl AgentContext {
	/// Load stored credentials, requiring a prior login.
	pub fn require_credentials(&self) -> anyhow::Result<Credentials> {
		let creds = Credentials::load(&self.credentials_path)?;
		if !creds.is_logged_in() {
			bail!("not logged in, run `gk-agent login` first");
		}
		Ok(creds)
	}
}
