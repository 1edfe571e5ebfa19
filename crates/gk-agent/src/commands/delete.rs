// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use anyhow::anyhow;

use crate::api;
use crate::commands::AgentContext;
use crate::mirror::MirrorStore;

pub async fn run(ctx: &AgentContext, id: &str) -> anyhow::Result<()> {
	let creds = ctx.require_credentials()?;
	let mirror = MirrorStore::load(&ctx.mirror_path)?;

	let current = mirror
		.get(id)
		.ok_or_else(|| anyhow!("secret {id} not found locally, run `gk-agent sync` first"))?;

	api::secrets::delete_secret(&ctx.client, &creds.access_token, id, current.version).await?;

	mirror.remove(id);
	mirror.save(&ctx.mirror_path)?;

	println!("deleted secret {id}");
	Ok(())
}
