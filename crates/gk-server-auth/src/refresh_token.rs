// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Opaque refresh tokens.
//!
//! A refresh token is 256 bits from the OS RNG, handed to the client as
//! URL-safe base64. The server persists only the SHA-256 digest; session
//! lookup hashes the presented token and matches on the digest.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};

use crate::error::AuthError;

/// Size of the persisted refresh-token digest in bytes.
pub const REFRESH_HASH_SIZE: usize = 32;

/// Generate a fresh refresh token.
pub fn new_refresh_token() -> Result<String, AuthError> {
	let mut bytes = [0u8; 32];
	OsRng
		.try_fill_bytes(&mut bytes)
		.map_err(|e| AuthError::Rng(e.to_string()))?;
	Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Digest a refresh token for storage or lookup.
pub fn hash_refresh_token(token: &str) -> [u8; REFRESH_HASH_SIZE] {
	let mut out = [0u8; REFRESH_HASH_SIZE];
	out.copy_from_slice(&Sha256::digest(token.as_bytes()));
	out
}
