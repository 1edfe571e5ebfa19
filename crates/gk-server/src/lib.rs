// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! GophKeeper vault server.
//!
//! The server stores only client-sealed ciphertext. It authenticates users
//! with Argon2id password verifiers, hands out short-lived HS256 access
//! tokens plus rotating refresh sessions, and keeps a per-user collection of
//! versioned secrets under optimistic concurrency control.

pub mod api;
pub mod auth_middleware;
pub mod error;
pub mod rate_limit;
pub mod routes;
pub mod services;

pub use api::{create_app_state, create_router, AppState};
pub use error::ServerError;
pub use services::auth::{AuthService, TokenPair};
pub use services::secrets::SecretsService;
