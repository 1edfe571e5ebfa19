// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Master-password entry.

use std::io::{IsTerminal, Read};

/// Read the master password: from the terminal with echo suppressed, or a
/// single read-to-EOF when stdin is piped. Exactly one read either way.
pub fn read_master_password() -> anyhow::Result<String> {
	read_password_with_prompt("Master password: ")
}

/// Read an account password the same way.
pub fn read_account_password() -> anyhow::Result<String> {
	read_password_with_prompt("Password: ")
}

fn read_password_with_prompt(prompt: &str) -> anyhow::Result<String> {
	if std::io::stdin().is_terminal() {
		Ok(rpassword::prompt_password(prompt)?)
	} else {
		let mut buffer = String::new();
		std::io::stdin().read_to_string(&mut buffer)?;
		Ok(buffer.trim_end_matches(['\r', '\n']).to_string())
	}
}
