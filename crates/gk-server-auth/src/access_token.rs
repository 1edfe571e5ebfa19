// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HS256 access tokens.
//!
//! The access token is a short-lived bearer credential whose subject is the
//! user id. Verification pins the algorithm to HS256 and checks issuer,
//! audience and expiry; anything else is a 401 upstream.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::types::UserId;

/// Parameters for minting and verifying access tokens.
#[derive(Debug, Clone)]
pub struct JwtConfig {
	/// `iss` claim.
	pub issuer: String,
	/// `aud` claim.
	pub audience: String,
	/// HS256 signing key. Must be at least 32 bytes; enforced at config load.
	pub signing_key: String,
	/// Access token lifetime.
	pub access_ttl: Duration,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
	iss: String,
	aud: String,
	sub: String,
	iat: u64,
	exp: u64,
}

fn unix_now() -> Result<u64, AuthError> {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map(|d| d.as_secs())
		.map_err(|e| AuthError::Hash(format!("system time error: {e}")))
}

/// Mint a signed access token for `user_id`.
pub fn mint_access_token(user_id: UserId, cfg: &JwtConfig) -> Result<String, AuthError> {
	let now = unix_now()?;
	let claims = Claims {
		iss: cfg.issuer.clone(),
		aud: cfg.audience.clone(),
		sub: user_id.to_string(),
		iat: now,
		exp: now + cfg.access_ttl.as_secs(),
	};

	encode(
		&Header::new(Algorithm::HS256),
		&claims,
		&EncodingKey::from_secret(cfg.signing_key.as_bytes()),
	)
	.map_err(|e| AuthError::Hash(format!("jwt encode: {e}")))
}

/// Verify an access token and return its subject as a parsed [`UserId`].
///
/// Rejects tokens signed with any algorithm other than HS256, with a wrong
/// issuer or audience, expired, or carrying a subject that is not a UUID.
pub fn verify_access_token(token: &str, cfg: &JwtConfig) -> Result<UserId, AuthError> {
	let mut validation = Validation::new(Algorithm::HS256);
	validation.set_issuer(&[&cfg.issuer]);
	validation.set_audience(&[&cfg.audience]);
	validation.leeway = 0;

	let data = decode::<Claims>(
		token,
		&DecodingKey::from_secret(cfg.signing_key.as_bytes()),
		&validation,
	)
	.map_err(|e| match e.kind() {
		jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
		_ => AuthError::InvalidToken,
	})?;

	data.claims
		.sub
		.trim()
		.parse::<UserId>()
		.map_err(|_| AuthError::InvalidToken)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn test_config() -> JwtConfig {
		JwtConfig {
			issuer: "gophkeeper".to_string(),
			audience: "gophkeeper-agent".to_string(),
			signing_key: "0123456789abcdef0123456789abcdef".to_string(),
			access_ttl: Duration::from_secs(900),
		}
	}

	fn raw_token(claims: &Claims, alg: Algorithm, key: &str) -> String {
		encode(&Header::new(alg), claims, &EncodingKey::from_secret(key.as_bytes())).unwrap()
	}

	#[test]
	fn mint_then_verify_returns_subject() {
		let cfg = test_config();
		let user = UserId::generate();
		let token = mint_access_token(user, &cfg).unwrap();
		assert_eq!(verify_access_token(&token, &cfg).unwrap(), user);
	}

	#[test]
	fn wrong_signing_key_is_rejected() {
		let cfg = test_config();
		let token = mint_access_token(UserId::generate(), &cfg).unwrap();

		let mut other = cfg.clone();
		other.signing_key = "ffffffffffffffffffffffffffffffff".to_string();
		assert!(matches!(
			verify_access_token(&token, &other),
			Err(AuthError::InvalidToken)
		));
	}

	#[test]
	fn wrong_issuer_or_audience_is_rejected() {
		let cfg = test_config();
		let token = mint_access_token(UserId::generate(), &cfg).unwrap();

		let mut bad_iss = cfg.clone();
		bad_iss.issuer = "someone-else".to_string();
		assert!(verify_access_token(&token, &bad_iss).is_err());

		let mut bad_aud = cfg.clone();
		bad_aud.audience = "other-service".to_string();
		assert!(verify_access_token(&token, &bad_aud).is_err());
	}

	#[test]
	fn other_algorithms_are_rejected() {
		let cfg = test_config();
		let now = SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.unwrap()
			.as_secs();
		let claims = Claims {
			iss: cfg.issuer.clone(),
			aud: cfg.audience.clone(),
			sub: UserId::generate().to_string(),
			iat: now,
			exp: now + 600,
		};
		let token = raw_token(&claims, Algorithm::HS384, &cfg.signing_key);
		assert!(matches!(
			verify_access_token(&token, &cfg),
			Err(AuthError::InvalidToken)
		));
	}

	#[test]
	fn expired_token_is_rejected_as_expired() {
		let cfg = test_config();
		let now = SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.unwrap()
			.as_secs();
		let claims = Claims {
			iss: cfg.issuer.clone(),
			aud: cfg.audience.clone(),
			sub: UserId::generate().to_string(),
			iat: now - 1200,
			exp: now - 600,
		};
		let token = raw_token(&claims, Algorithm::HS256, &cfg.signing_key);
		assert!(matches!(
			verify_access_token(&token, &cfg),
			Err(AuthError::TokenExpired)
		));
	}

	#[test]
	fn non_uuid_subject_is_rejected() {
		let cfg = test_config();
		let now = SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.unwrap()
			.as_secs();
		let claims = Claims {
			iss: cfg.issuer.clone(),
			aud: cfg.audience.clone(),
			sub: "not-a-user-id".to_string(),
			iat: now,
			exp: now + 600,
		};
		let token = raw_token(&claims, Algorithm::HS256, &cfg.signing_key);
		assert!(matches!(
			verify_access_token(&token, &cfg),
			Err(AuthError::InvalidToken)
		));
	}
}
