// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SQLite persistence layer for the GophKeeper server.
//!
//! Repositories never contain business logic; they map rows to domain types
//! and surface storage failures as [`DbError`]. Optimistic concurrency on
//! secrets lives here because it is a property of the write queries.

pub mod error;
pub mod migrations;
pub mod pool;
pub mod secrets;
pub mod sessions;
pub mod testing;
pub mod time;
pub mod users;

pub use error::{DbError, Result};
pub use migrations::run_migrations;
pub use pool::{create_pool, PoolSettings};
pub use secrets::{CreatedSecret, SecretPatch, SecretRecord, SecretRepository, SecretType};
pub use sessions::{SessionRecord, SessionRepository};
pub use users::UserRepository;
