// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use anyhow::bail;

use crate::api;
use crate::commands::AgentContext;
use crate::mirror::{MirrorStore, Secret};

/// Replace the mirror with the server's view. The empty-id check is a
/// tripwire against silent model drift between agent and server.
pub fn apply_server_view(mirror: &MirrorStore, secrets: Vec<Secret>) -> anyhow::Result<()> {
	for secret in &secrets {
		if secret.id.trim().is_empty() {
			bail!("server returned a secret with an empty id");
		}
	}
	mirror.replace_all(secrets);
	Ok(())
}

pub async fn run(ctx: &AgentContext) -> anyhow::Result<()> {
	let creds = ctx.require_credentials()?;
	let mirror = MirrorStore::load(&ctx.mirror_path)?;

	let secrets = api::secrets::sync(&ctx.client, &creds.access_token).await?;
	let count = secrets.len();
	apply_server_view(&mirror, secrets)?;
	mirror.save(&ctx.mirror_path)?;

	println!("synced {count} secrets");
	Ok(())
}
