// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Local reads from the mirror. No network involved; what was synced is
//! what you get.

use anyhow::anyhow;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::commands::AgentContext;
use crate::mirror::MirrorStore;
use crate::password::read_master_password;

pub async fn run(ctx: &AgentContext, id: Option<String>, decrypt: bool) -> anyhow::Result<()> {
	let mirror = MirrorStore::load(&ctx.mirror_path)?;

	let Some(id) = id else {
		let mut secrets = mirror.list();
		secrets.sort_by(|a, b| a.id.cmp(&b.id));
		for secret in &secrets {
			println!(
				"{}  {}  {}  v{}  {}",
				secret.id,
				secret.kind,
				secret.title,
				secret.version,
				secret.updated_at.to_rfc3339()
			);
		}
		return Ok(());
	};

	let secret = mirror
		.get(&id)
		.ok_or_else(|| anyhow!("secret {id} not found locally, run `gk-agent sync` first"))?;

	println!("id:         {}", secret.id);
	println!("type:       {}", secret.kind);
	println!("title:      {}", secret.title);
	if let Some(meta) = &secret.meta {
		println!("meta:       {meta}");
	}
	println!("version:    {}", secret.version);
	println!("updated_at: {}", secret.updated_at.to_rfc3339());
	println!("created_at: {}", secret.created_at.to_rfc3339());

	if decrypt {
		let blob = STANDARD
			.decode(secret.payload.as_bytes())
			.map_err(|_| anyhow!("payload is not valid base64"))?;
		let master_password = read_master_password()?;
		let plaintext = gk_envelope::open(&master_password, &blob)?;
		println!("{}", String::from_utf8_lossy(&plaintext));
	}

	Ok(())
}
