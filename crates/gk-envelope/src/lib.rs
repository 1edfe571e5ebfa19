// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Client-side envelope codec.
//!
//! A sealed envelope is a single self-describing blob:
//!
//! ```text
//! "gk1" | salt(16) | nonce(12) | AES-256-GCM ciphertext+tag
//! ```
//!
//! The symmetric key is derived from the master password with Argon2id and a
//! fresh random salt on every seal. The master password never leaves the
//! machine; the server only ever sees the blob (usually base64-encoded).
//!
//! The KDF parameters are fixed for format version 1 ("gk1"). Changing them
//! requires a new magic tag so old blobs stay decryptable.

use aes_gcm::{
	aead::{Aead, KeyInit},
	Aes256Gcm, Key, Nonce,
};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::{rngs::OsRng, RngCore};
use zeroize::Zeroizing;

/// Format signature prefixed to every sealed blob.
pub const FORMAT_MAGIC: &[u8; 3] = b"gk1";

/// Size of the Argon2id salt in bytes.
pub const SALT_SIZE: usize = 16;

/// Size of the AES-GCM nonce in bytes.
pub const NONCE_SIZE: usize = 12;

/// Size of the derived symmetric key in bytes (AES-256).
pub const KEY_SIZE: usize = 32;

/// Argon2id iterations for format v1.
const KDF_TIME: u32 = 2;

/// Argon2id memory cost in KiB for format v1 (64 MiB).
const KDF_MEMORY_KIB: u32 = 64 * 1024;

/// Argon2id lanes for format v1.
const KDF_LANES: u32 = 2;

/// Smallest blob that can carry magic, salt, nonce and at least one
/// ciphertext byte plus the GCM tag.
const MIN_BLOB_LEN: usize = FORMAT_MAGIC.len() + SALT_SIZE + NONCE_SIZE + 1;

#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
	/// Blob is too short to contain magic + salt + nonce + ciphertext.
	#[error("ciphertext too short")]
	TooShort,

	/// Blob does not match the expected "gk1" layout.
	#[error("invalid ciphertext format")]
	InvalidFormat,

	/// Decryption failed. Wrong password and corrupted data are deliberately
	/// indistinguishable.
	#[error("decryption failed (wrong password or corrupted data)")]
	AuthFailed,

	#[error("key derivation failed: {0}")]
	KeyDerivation(String),

	#[error("rng failure: {0}")]
	Rng(String),

	#[error("encryption failed: {0}")]
	Encryption(String),
}

/// Derive the 32-byte envelope key from the master password and salt.
fn derive_key(master_password: &str, salt: &[u8]) -> Result<Zeroizing<[u8; KEY_SIZE]>, EnvelopeError> {
	let params = Params::new(KDF_MEMORY_KIB, KDF_TIME, KDF_LANES, Some(KEY_SIZE))
		.map_err(|e| EnvelopeError::KeyDerivation(format!("invalid Argon2 params: {e}")))?;
	let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

	let mut key = Zeroizing::new([0u8; KEY_SIZE]);
	argon2
		.hash_password_into(master_password.as_bytes(), salt, key.as_mut())
		.map_err(|e| EnvelopeError::KeyDerivation(format!("Argon2id failed: {e}")))?;
	Ok(key)
}

/// Seal `plaintext` under `master_password` into a self-describing blob.
///
/// Every call draws a fresh salt and nonce from the OS RNG, so sealing the
/// same plaintext twice produces unrelated blobs.
pub fn seal(master_password: &str, plaintext: &[u8]) -> Result<Vec<u8>, EnvelopeError> {
	let mut salt = [0u8; SALT_SIZE];
	OsRng
		.try_fill_bytes(&mut salt)
		.map_err(|e| EnvelopeError::Rng(format!("salt: {e}")))?;

	let key = derive_key(master_password, &salt)?;

	let mut nonce_bytes = [0u8; NONCE_SIZE];
	OsRng
		.try_fill_bytes(&mut nonce_bytes)
		.map_err(|e| EnvelopeError::Rng(format!("nonce: {e}")))?;

	let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_ref()));
	let nonce = Nonce::from_slice(&nonce_bytes);
	let ciphertext = cipher
		.encrypt(nonce, plaintext)
		.map_err(|e| EnvelopeError::Encryption(e.to_string()))?;

	let mut blob = Vec::with_capacity(FORMAT_MAGIC.len() + SALT_SIZE + NONCE_SIZE + ciphertext.len());
	blob.extend_from_slice(FORMAT_MAGIC);
	blob.extend_from_slice(&salt);
	blob.extend_from_slice(&nonce_bytes);
	blob.extend_from_slice(&ciphertext);
	Ok(blob)
}

/// Open a blob produced by [`seal`].
///
/// Returns [`EnvelopeError::AuthFailed`] on any GCM verification failure;
/// callers cannot tell a wrong password from tampered data.
pub fn open(master_password: &str, blob: &[u8]) -> Result<Vec<u8>, EnvelopeError> {
	if blob.len() < MIN_BLOB_LEN {
		return Err(EnvelopeError::TooShort);
	}
	if &blob[..FORMAT_MAGIC.len()] != FORMAT_MAGIC {
		return Err(EnvelopeError::InvalidFormat);
	}

	let mut off = FORMAT_MAGIC.len();
	let salt = &blob[off..off + SALT_SIZE];
	off += SALT_SIZE;
	let nonce_bytes = &blob[off..off + NONCE_SIZE];
	off += NONCE_SIZE;
	let ciphertext = &blob[off..];
	if ciphertext.is_empty() {
		return Err(EnvelopeError::InvalidFormat);
	}

	let key = derive_key(master_password, salt)?;
	let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_ref()));
	let nonce = Nonce::from_slice(nonce_bytes);

	cipher
		.decrypt(nonce, ciphertext)
		.map_err(|_| EnvelopeError::AuthFailed)
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn seal_open_roundtrip() {
		let blob = seal("pw", b"{\"text\":\"hello\"}").unwrap();
		let plain = open("pw", &blob).unwrap();
		assert_eq!(plain, b"{\"text\":\"hello\"}");
	}

	#[test]
	fn wrong_password_fails_auth() {
		let blob = seal("pw", b"{\"text\":\"hello\"}").unwrap();
		let err = open("pw2", &blob).unwrap_err();
		assert!(matches!(err, EnvelopeError::AuthFailed));
	}

	#[test]
	fn two_seals_differ_in_salt_and_nonce() {
		let a = seal("pw", b"same payload").unwrap();
		let b = seal("pw", b"same payload").unwrap();

		let salt_range = FORMAT_MAGIC.len()..FORMAT_MAGIC.len() + SALT_SIZE;
		let nonce_range = FORMAT_MAGIC.len() + SALT_SIZE..FORMAT_MAGIC.len() + SALT_SIZE + NONCE_SIZE;
		assert_ne!(a[salt_range.clone()], b[salt_range]);
		assert_ne!(a[nonce_range.clone()], b[nonce_range]);
	}

	#[test]
	fn corrupted_magic_is_invalid_format() {
		let mut blob = seal("pw", b"{\"text\":\"hello\"}").unwrap();
		blob[0] ^= 0xff;
		let err = open("pw", &blob).unwrap_err();
		assert!(matches!(err, EnvelopeError::InvalidFormat));
	}

	#[test]
	fn corrupted_ciphertext_fails_auth() {
		let mut blob = seal("pw", b"some bytes").unwrap();
		let last = blob.len() - 1;
		blob[last] ^= 0xff;
		let err = open("pw", &blob).unwrap_err();
		assert!(matches!(err, EnvelopeError::AuthFailed));
	}

	#[test]
	fn short_blob_is_rejected() {
		let err = open("pw", b"gk1").unwrap_err();
		assert!(matches!(err, EnvelopeError::TooShort));

		let err = open("pw", &[0u8; MIN_BLOB_LEN - 1]).unwrap_err();
		assert!(matches!(err, EnvelopeError::TooShort));
	}

	#[test]
	fn blob_layout_has_expected_prefix_and_length() {
		let plaintext = b"abc";
		let blob = seal("pw", plaintext).unwrap();
		assert_eq!(&blob[..3], b"gk1");
		// magic + salt + nonce + plaintext + 16-byte GCM tag
		assert_eq!(
			blob.len(),
			FORMAT_MAGIC.len() + SALT_SIZE + NONCE_SIZE + plaintext.len() + 16
		);
	}

	#[test]
	fn plaintext_bytes_do_not_leak_into_blob() {
		let plaintext = b"super-unique-marker-0xDEADBEEF";
		let blob = seal("pw", plaintext).unwrap();
		let found = blob
			.windows(plaintext.len())
			.any(|w| w == plaintext.as_slice());
		assert!(!found);
	}

	proptest! {
		// The KDF dominates each case, keep the sample count small.
		#![proptest_config(ProptestConfig::with_cases(4))]

		#[test]
		fn prop_roundtrip(plaintext in proptest::collection::vec(any::<u8>(), 1..512)) {
			let blob = seal("prop-pw", &plaintext).unwrap();
			let opened = open("prop-pw", &blob).unwrap();
			prop_assert_eq!(opened, plaintext);
		}

		#[test]
		fn prop_tampered_ciphertext_fails(
			plaintext in proptest::collection::vec(any::<u8>(), 1..256),
			tamper in any::<usize>(),
		) {
			let mut blob = seal("prop-pw", &plaintext).unwrap();
			let ct_start = FORMAT_MAGIC.len() + SALT_SIZE + NONCE_SIZE;
			let idx = ct_start + tamper % (blob.len() - ct_start);
			blob[idx] ^= 0x01;
			prop_assert!(matches!(open("prop-pw", &blob), Err(EnvelopeError::AuthFailed)));
		}
	}
}
