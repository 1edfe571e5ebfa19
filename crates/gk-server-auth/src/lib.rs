// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication primitives for the GophKeeper server.
//!
//! This crate provides:
//! - **ID newtypes**: type-safe UUID wrappers ([`UserId`], [`SessionId`],
//!   [`SecretId`]) preventing accidental mixing
//! - **Password verifiers**: Argon2id hashing into a self-describing
//!   `argon2id$v=19$…` string with constant-time verification
//! - **Access tokens**: HS256 JWTs carrying issuer, audience, subject and
//!   expiry
//! - **Refresh tokens**: opaque high-entropy secrets of which only the
//!   SHA-256 digest is ever persisted
//! - Bearer-header extraction for the HTTP middleware

pub mod access_token;
pub mod error;
pub mod middleware;
pub mod password;
pub mod refresh_token;
pub mod types;

pub use access_token::{mint_access_token, verify_access_token, JwtConfig};
pub use error::AuthError;
pub use middleware::extract_bearer_token;
pub use password::{hash_password, verify_password, Argon2Params};
pub use refresh_token::{hash_refresh_token, new_refresh_token, REFRESH_HASH_SIZE};
pub use types::{SecretId, SessionId, UserId};
