// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use anyhow::bail;

use crate::api;
use crate::commands::AgentContext;
use crate::credentials::Credentials;

pub async fn run(ctx: &AgentContext) -> anyhow::Result<()> {
	let creds = Credentials::load(&ctx.credentials_path)?;
	if creds.refresh_token.is_empty() {
		bail!("no refresh token stored, run `gk-agent login` first");
	}

	let pair = api::auth::refresh(&ctx.client, &creds.refresh_token).await?;
	let creds = Credentials {
		access_token: pair.access_token,
		refresh_token: pair.refresh_token,
	};
	creds.save(&ctx.credentials_path)?;

	println!("tokens refreshed");
	Ok(())
}
