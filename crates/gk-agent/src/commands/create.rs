// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::api;
use crate::api::secrets::CreateSecretRequest;
use crate::commands::AgentContext;
use crate::mirror::{MirrorStore, Secret};
use crate::password::read_master_password;

pub struct CreateArgs {
	pub kind: String,
	pub title: String,
	/// Plaintext to seal. Never sent to the server as-is.
	pub data: String,
	pub meta: Option<String>,
}

pub async fn run(ctx: &AgentContext, args: CreateArgs) -> anyhow::Result<()> {
	let creds = ctx.require_credentials()?;
	let mirror = MirrorStore::load(&ctx.mirror_path)?;

	let master_password = read_master_password()?;
	let blob = gk_envelope::seal(&master_password, args.data.as_bytes())?;
	let payload = STANDARD.encode(blob);

	let request = CreateSecretRequest {
		kind: args.kind.clone(),
		title: args.title.clone(),
		payload: payload.clone(),
		meta: args.meta.clone(),
	};
	let created = api::secrets::create_secret(&ctx.client, &creds.access_token, &request).await?;

	// The create response has no created_at; updated_at stands in until the
	// next sync replaces the mirror with the server's full view.
	mirror.insert(Secret {
		id: created.id.clone(),
		kind: args.kind,
		title: args.title,
		payload,
		meta: args.meta,
		version: created.version,
		updated_at: created.updated_at,
		created_at: created.updated_at,
	});
	mirror.save(&ctx.mirror_path)?;

	println!("created secret {} (v{})", created.id, created.version);
	Ok(())
}
