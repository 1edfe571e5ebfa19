// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Database section.

use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct DbConfig {
	pub dsn: String,
	pub max_open_conns: u32,
	pub max_idle_conns: u32,
	pub conn_max_lifetime: Duration,
	pub conn_max_idle_time: Duration,
	pub query_timeout: Duration,
}

impl Default for DbConfig {
	fn default() -> Self {
		Self {
			dsn: "sqlite:./gophkeeper.db".to_string(),
			max_open_conns: 10,
			max_idle_conns: 5,
			conn_max_lifetime: Duration::from_secs(30 * 60),
			conn_max_idle_time: Duration::from_secs(5 * 60),
			query_timeout: Duration::from_secs(5),
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DbConfigLayer {
	#[serde(default)]
	pub dsn: Option<String>,
	#[serde(default)]
	pub max_open_conns: Option<u32>,
	#[serde(default)]
	pub max_idle_conns: Option<u32>,
	#[serde(default)]
	pub conn_max_lifetime_secs: Option<u64>,
	#[serde(default)]
	pub conn_max_idle_time_secs: Option<u64>,
	#[serde(default)]
	pub query_timeout_secs: Option<u64>,
}

impl DbConfigLayer {
	pub fn merge(&mut self, other: DbConfigLayer) {
		if other.dsn.is_some() {
			self.dsn = other.dsn;
		}
		if other.max_open_conns.is_some() {
			self.max_open_conns = other.max_open_conns;
		}
		if other.max_idle_conns.is_some() {
			self.max_idle_conns = other.max_idle_conns;
		}
		if other.conn_max_lifetime_secs.is_some() {
			self.conn_max_lifetime_secs = other.conn_max_lifetime_secs;
		}
		if other.conn_max_idle_time_secs.is_some() {
			self.conn_max_idle_time_secs = other.conn_max_idle_time_secs;
		}
		if other.query_timeout_secs.is_some() {
			self.query_timeout_secs = other.query_timeout_secs;
		}
	}

	pub fn finalize(self) -> DbConfig {
		let d = DbConfig::default();
		DbConfig {
			dsn: self.dsn.unwrap_or(d.dsn),
			max_open_conns: self.max_open_conns.unwrap_or(d.max_open_conns),
			max_idle_conns: self.max_idle_conns.unwrap_or(d.max_idle_conns),
			conn_max_lifetime: self
				.conn_max_lifetime_secs
				.map(Duration::from_secs)
				.unwrap_or(d.conn_max_lifetime),
			conn_max_idle_time: self
				.conn_max_idle_time_secs
				.map(Duration::from_secs)
				.unwrap_or(d.conn_max_idle_time),
			query_timeout: self
				.query_timeout_secs
				.map(Duration::from_secs)
				.unwrap_or(d.query_timeout),
		}
	}
}
