// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use anyhow::{anyhow, bail};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::api;
use crate::api::secrets::UpdateSecretRequest;
use crate::commands::sync::apply_server_view;
use crate::commands::AgentContext;
use crate::mirror::MirrorStore;
use crate::password::read_master_password;

pub struct UpdateArgs {
	pub id: String,
	pub kind: Option<String>,
	pub title: Option<String>,
	/// New plaintext; sealed before upload.
	pub data: Option<String>,
	pub meta: Option<String>,
}

pub async fn run(ctx: &AgentContext, args: UpdateArgs) -> anyhow::Result<()> {
	let creds = ctx.require_credentials()?;
	let mirror = MirrorStore::load(&ctx.mirror_path)?;

	let current = mirror
		.get(&args.id)
		.ok_or_else(|| anyhow!("secret {} not found locally, run `gk-agent sync` first", args.id))?;

	let payload = match args.data {
		Some(data) => {
			let master_password = read_master_password()?;
			let blob = gk_envelope::seal(&master_password, data.as_bytes())?;
			Some(STANDARD.encode(blob))
		}
		None => None,
	};

	// Only the flags the user actually supplied go on the wire.
	let request = UpdateSecretRequest {
		kind: args.kind,
		title: args.title,
		payload,
		meta: args.meta,
		version: current.version,
	};
	api::secrets::update_secret(&ctx.client, &creds.access_token, &args.id, &request).await?;

	// Converge on the server's view. On failure the mirror stays as it was;
	// the next sync will reconcile.
	match api::secrets::sync(&ctx.client, &creds.access_token).await {
		Ok(secrets) => {
			apply_server_view(&mirror, secrets)?;
			mirror.save(&ctx.mirror_path)?;
		}
		Err(e) => bail!("update ok, but sync failed: {e}"),
	}

	println!("updated secret {}", args.id);
	Ok(())
}
