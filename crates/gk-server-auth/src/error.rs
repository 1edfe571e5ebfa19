// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
	#[error("invalid input: {0}")]
	InvalidInput(String),

	/// Stored password verifier could not be parsed.
	#[error("invalid verifier: {0}")]
	InvalidVerifier(String),

	#[error("token expired")]
	TokenExpired,

	/// Bad signature, wrong algorithm, wrong issuer/audience, or an
	/// unparseable subject. Collapsed on purpose; callers answer 401 either
	/// way.
	#[error("invalid token")]
	InvalidToken,

	#[error("hashing failed: {0}")]
	Hash(String),

	#[error("rng failure: {0}")]
	Rng(String),
}
