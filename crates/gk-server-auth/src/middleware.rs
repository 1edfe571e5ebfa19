// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Header parsing helpers for the HTTP authentication middleware.

use http::header::AUTHORIZATION;
use http::HeaderMap;

/// Extract the bearer token from the Authorization header.
///
/// Expects `Authorization: Bearer <token>`. Returns `None` when the header
/// is absent or uses another scheme. The returned token is a secret; never
/// log it.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
	let auth_header = headers.get(AUTHORIZATION)?;
	let auth_str = auth_header.to_str().ok()?;
	auth_str
		.strip_prefix("Bearer ")
		.map(|token| token.trim().to_string())
		.filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
	use super::*;
	use http::header::HeaderValue;

	#[test]
	fn extracts_bearer_token() {
		let mut headers = HeaderMap::new();
		headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
		assert_eq!(extract_bearer_token(&headers), Some("abc.def.ghi".to_string()));
	}

	#[test]
	fn returns_none_without_header() {
		assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
	}

	#[test]
	fn returns_none_for_other_schemes() {
		let mut headers = HeaderMap::new();
		headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
		assert_eq!(extract_bearer_token(&headers), None);
	}

	#[test]
	fn returns_none_for_empty_token() {
		let mut headers = HeaderMap::new();
		headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
		assert_eq!(extract_bearer_token(&headers), None);
	}
}
