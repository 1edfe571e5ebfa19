// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Creates a new HTTP client with the standard GophKeeper User-Agent header.
///
/// The User-Agent format is: `gophkeeper/{version}/{platform}`
pub fn new_client() -> Client {
	builder().build().expect("failed to build HTTP client")
}

/// Creates a new HTTP client builder with the standard User-Agent header.
///
/// Use this when you need to customize the client (e.g., set timeout or
/// accept a self-signed development certificate).
///
/// # Example
/// ```ignore
/// let client = gk_common_http::builder()
///     .timeout(Duration::from_secs(10))
///     .build()?;
/// ```
pub fn builder() -> ClientBuilder {
	Client::builder().user_agent(user_agent())
}

/// Creates a new HTTP client with a custom timeout and the standard
/// User-Agent.
pub fn new_client_with_timeout(timeout: Duration) -> Client {
	builder()
		.timeout(timeout)
		.build()
		.expect("failed to build HTTP client")
}

/// Returns the standard GophKeeper User-Agent string.
pub fn user_agent() -> String {
	format!(
		"gophkeeper/{}/{}",
		env!("CARGO_PKG_VERSION"),
		std::env::consts::OS
	)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn user_agent_has_correct_format() {
		let ua = user_agent();
		assert!(ua.starts_with("gophkeeper/"));
		let parts: Vec<&str> = ua.split('/').collect();
		assert_eq!(parts.len(), 3);
		assert_eq!(parts[0], "gophkeeper");
	}

	#[test]
	fn builder_produces_a_client() {
		assert!(builder().build().is_ok());
	}
}
