// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

#[derive(Debug, thiserror::Error)]
pub enum DbError {
	#[error("database error: {0}")]
	Sqlx(#[from] sqlx::Error),

	#[error("not found")]
	NotFound,

	/// Optimistic-lock version mismatch.
	#[error("conflict")]
	Conflict,

	/// Unique-key collision (e.g. email already registered).
	#[error("already exists")]
	AlreadyExists,

	/// A stored row failed to map back to a domain type.
	#[error("invalid data: {0}")]
	InvalidData(String),
}

pub type Result<T> = std::result::Result<T, DbError>;
