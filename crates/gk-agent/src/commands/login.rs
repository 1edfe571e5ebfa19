// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use crate::api;
use crate::commands::AgentContext;
use crate::credentials::Credentials;
use crate::password::read_account_password;

pub async fn run(ctx: &AgentContext, email: &str, password: Option<String>) -> anyhow::Result<()> {
	let password = match password {
		Some(password) => password,
		None => read_account_password()?,
	};

	let pair = api::auth::login(&ctx.client, email, &password).await?;
	let creds = Credentials {
		access_token: pair.access_token,
		refresh_token: pair.refresh_token,
	};
	creds.save(&ctx.credentials_path)?;

	println!("login successful");
	Ok(())
}
