// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Account password hashing and verification.
//!
//! Passwords are hashed with Argon2id into a `$`-delimited self-describing
//! verifier string:
//!
//! ```text
//! argon2id$v=19$m=<memory_kib>,t=<time>,p=<threads>$<base64-salt>$<base64-tag>
//! ```
//!
//! The verifier carries everything needed to re-verify, so parameters can be
//! tuned in configuration without invalidating existing accounts.

use argon2::{Algorithm, Argon2, Params, Version};
use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use rand::{rngs::OsRng, RngCore};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::error::AuthError;

/// Argon2id cost parameters, loaded from server configuration.
#[derive(Debug, Clone, Copy)]
pub struct Argon2Params {
	/// Iteration count (CPU cost).
	pub time: u32,
	/// Memory cost in KiB.
	pub memory_kib: u32,
	/// Parallelism lanes.
	pub threads: u32,
	/// Derived tag length in bytes.
	pub key_len: u32,
	/// Salt length in bytes.
	pub salt_len: u32,
}

impl Default for Argon2Params {
	fn default() -> Self {
		Self {
			time: 1,
			memory_kib: 64 * 1024,
			threads: 1,
			key_len: 32,
			salt_len: 16,
		}
	}
}

fn derive(password: &str, salt: &[u8], p: &Argon2Params, out_len: usize) -> Result<Zeroizing<Vec<u8>>, AuthError> {
	let params = Params::new(p.memory_kib, p.time, p.threads, Some(out_len))
		.map_err(|e| AuthError::Hash(format!("invalid Argon2 params: {e}")))?;
	let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

	let mut tag = Zeroizing::new(vec![0u8; out_len]);
	argon2
		.hash_password_into(password.as_bytes(), salt, tag.as_mut())
		.map_err(|e| AuthError::Hash(format!("Argon2id failed: {e}")))?;
	Ok(tag)
}

/// Hash an account password into its verifier string.
///
/// Rejects empty (or all-whitespace) passwords; the service layer enforces
/// the real minimum-length policy before calling this.
pub fn hash_password(password: &str, p: &Argon2Params) -> Result<String, AuthError> {
	if password.trim().is_empty() {
		return Err(AuthError::InvalidInput("empty password".into()));
	}

	let mut salt = vec![0u8; p.salt_len as usize];
	OsRng
		.try_fill_bytes(&mut salt)
		.map_err(|e| AuthError::Rng(e.to_string()))?;

	let tag = derive(password, &salt, p, p.key_len as usize)?;

	Ok(format!(
		"argon2id$v=19$m={},t={},p={}${}${}",
		p.memory_kib,
		p.time,
		p.threads,
		STANDARD_NO_PAD.encode(&salt),
		STANDARD_NO_PAD.encode(tag.as_slice()),
	))
}

/// Verify a password against a stored verifier string.
///
/// Recomputes the tag with the parameters embedded in the verifier and
/// compares in constant time. Returns `Ok(false)` for a wrong password; an
/// error only signals a malformed verifier.
pub fn verify_password(password: &str, encoded: &str) -> Result<bool, AuthError> {
	let parts: Vec<&str> = encoded.split('$').collect();
	if parts.len() != 5 {
		return Err(AuthError::InvalidVerifier("wrong segment count".into()));
	}
	if parts[0] != "argon2id" {
		return Err(AuthError::InvalidVerifier(format!("unknown algorithm {:?}", parts[0])));
	}
	if parts[1] != "v=19" {
		return Err(AuthError::InvalidVerifier(format!("unknown version {:?}", parts[1])));
	}

	let (memory_kib, time, threads) = parse_cost_params(parts[2])?;

	let salt = STANDARD_NO_PAD
		.decode(parts[3])
		.map_err(|_| AuthError::InvalidVerifier("bad salt encoding".into()))?;
	let want = Zeroizing::new(
		STANDARD_NO_PAD
			.decode(parts[4])
			.map_err(|_| AuthError::InvalidVerifier("bad tag encoding".into()))?,
	);

	let p = Argon2Params {
		time,
		memory_kib,
		threads,
		key_len: want.len() as u32,
		salt_len: salt.len() as u32,
	};
	let got = derive(password, &salt, &p, want.len())?;

	Ok(got.as_slice().ct_eq(want.as_slice()).into())
}

/// Parse the `m=<m>,t=<t>,p=<p>` cost segment.
fn parse_cost_params(segment: &str) -> Result<(u32, u32, u32), AuthError> {
	let mut memory = None;
	let mut time = None;
	let mut threads = None;

	for field in segment.split(',') {
		let (key, value) = field
			.split_once('=')
			.ok_or_else(|| AuthError::InvalidVerifier("bad params format".into()))?;
		let value: u32 = value
			.parse()
			.map_err(|_| AuthError::InvalidVerifier("bad params format".into()))?;
		match key {
			"m" => memory = Some(value),
			"t" => time = Some(value),
			"p" => threads = Some(value),
			_ => return Err(AuthError::InvalidVerifier(format!("unknown param {key:?}"))),
		}
	}

	match (memory, time, threads) {
		(Some(m), Some(t), Some(p)) => Ok((m, t, p)),
		_ => Err(AuthError::InvalidVerifier("missing cost param".into())),
	}
}
