// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Timestamp encoding for SQLite columns.
//!
//! Timestamps are stored as RFC 3339 text with fixed microsecond precision
//! so that lexicographic ordering in SQL matches chronological ordering.

use chrono::{DateTime, SecondsFormat, Timelike, Utc};

use crate::error::DbError;

/// Encode a timestamp for storage.
pub fn encode_ts(ts: DateTime<Utc>) -> String {
	ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Current time truncated to microseconds, pre-encoded for storage. The
/// truncation keeps the in-memory value identical to what a later read
/// will parse back.
pub fn now_encoded() -> (DateTime<Utc>, String) {
	let now = Utc::now();
	let now = now
		.with_nanosecond(now.nanosecond() / 1_000 * 1_000)
		.unwrap_or(now);
	let encoded = encode_ts(now);
	(now, encoded)
}

/// Decode a stored timestamp.
pub fn decode_ts(field: &str, raw: &str) -> Result<DateTime<Utc>, DbError> {
	DateTime::parse_from_rfc3339(raw)
		.map(|dt| dt.with_timezone(&Utc))
		.map_err(|e| DbError::InvalidData(format!("invalid {field}: {e}")))
}
