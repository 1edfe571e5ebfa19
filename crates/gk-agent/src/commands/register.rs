// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use crate::api;
use crate::commands::AgentContext;
use crate::password::read_account_password;

pub async fn run(ctx: &AgentContext, email: &str, password: Option<String>) -> anyhow::Result<()> {
	let password = match password {
		Some(password) => password,
		None => read_account_password()?,
	};

	let resp = api::auth::register(&ctx.client, email, &password).await?;
	println!("registered user {}", resp.user_id);
	Ok(())
}
