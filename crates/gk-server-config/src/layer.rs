// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration as read from one source, before merging.

use serde::Deserialize;

use crate::sections::{
	auth::AuthConfigLayer, db::DbConfigLayer, log::LogConfigLayer, password::PasswordConfigLayer,
	secrets::SecretsConfigLayer, security::SecurityConfigLayer, server::ServerSectionLayer,
	tls::TlsConfigLayer,
};

/// One source's view of the configuration. Every field is optional; merging
/// lets later sources override earlier ones field by field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfigLayer {
	#[serde(default)]
	pub env: Option<String>,
	#[serde(default)]
	pub server: Option<ServerSectionLayer>,
	#[serde(default)]
	pub tls: Option<TlsConfigLayer>,
	#[serde(default)]
	pub db: Option<DbConfigLayer>,
	#[serde(default)]
	pub auth: Option<AuthConfigLayer>,
	#[serde(default)]
	pub password: Option<PasswordConfigLayer>,
	#[serde(default)]
	pub secrets: Option<SecretsConfigLayer>,
	#[serde(default)]
	pub security: Option<SecurityConfigLayer>,
	#[serde(default)]
	pub log: Option<LogConfigLayer>,
}

impl ServerConfigLayer {
	/// Merge `other` on top of `self`.
	pub fn merge(&mut self, other: ServerConfigLayer) {
		if other.env.is_some() {
			self.env = other.env;
		}
		merge_section(&mut self.server, other.server, ServerSectionLayer::merge);
		merge_section(&mut self.tls, other.tls, TlsConfigLayer::merge);
		merge_section(&mut self.db, other.db, DbConfigLayer::merge);
		merge_section(&mut self.auth, other.auth, AuthConfigLayer::merge);
		merge_section(&mut self.password, other.password, PasswordConfigLayer::merge);
		merge_section(&mut self.secrets, other.secrets, SecretsConfigLayer::merge);
		merge_section(&mut self.security, other.security, SecurityConfigLayer::merge);
		merge_section(&mut self.log, other.log, LogConfigLayer::merge);
	}
}

fn merge_section<T>(target: &mut Option<T>, incoming: Option<T>, merge: impl Fn(&mut T, T)) {
	match (target.as_mut(), incoming) {
		(Some(current), Some(incoming)) => merge(current, incoming),
		(None, Some(incoming)) => *target = Some(incoming),
		_ => {}
	}
}
