// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Security section: request rate limiting.

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitKey {
	Ip,
	User,
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
	pub enabled: bool,
	pub rps: f64,
	pub burst: u32,
	pub key: RateLimitKey,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
	pub rate_limit: RateLimitConfig,
}

impl Default for SecurityConfig {
	fn default() -> Self {
		Self {
			rate_limit: RateLimitConfig {
				enabled: false,
				rps: 10.0,
				burst: 20,
				key: RateLimitKey::Ip,
			},
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RateLimitConfigLayer {
	#[serde(default)]
	pub enabled: Option<bool>,
	#[serde(default)]
	pub rps: Option<f64>,
	#[serde(default)]
	pub burst: Option<u32>,
	#[serde(default)]
	pub key: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecurityConfigLayer {
	#[serde(default)]
	pub rate_limit: Option<RateLimitConfigLayer>,
}

impl SecurityConfigLayer {
	pub fn merge(&mut self, other: SecurityConfigLayer) {
		if let Some(incoming) = other.rate_limit {
			let rl = self.rate_limit.get_or_insert_with(Default::default);
			if incoming.enabled.is_some() {
				rl.enabled = incoming.enabled;
			}
			if incoming.rps.is_some() {
				rl.rps = incoming.rps;
			}
			if incoming.burst.is_some() {
				rl.burst = incoming.burst;
			}
			if incoming.key.is_some() {
				rl.key = incoming.key;
			}
		}
	}

	pub fn finalize(self) -> Result<SecurityConfig, String> {
		let d = SecurityConfig::default();
		let rl = self.rate_limit.unwrap_or_default();
		let key = match rl.key.as_deref() {
			None | Some("ip") => RateLimitKey::Ip,
			Some("user") => RateLimitKey::User,
			Some(other) => return Err(format!("unknown rate_limit.key {other:?}")),
		};
		Ok(SecurityConfig {
			rate_limit: RateLimitConfig {
				enabled: rl.enabled.unwrap_or(d.rate_limit.enabled),
				rps: rl.rps.unwrap_or(d.rate_limit.rps),
				burst: rl.burst.unwrap_or(d.rate_limit.burst),
				key,
			},
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rate_limit_defaults_off() {
		let cfg = SecurityConfigLayer::default().finalize().unwrap();
		assert!(!cfg.rate_limit.enabled);
		assert_eq!(cfg.rate_limit.key, RateLimitKey::Ip);
	}

	#[test]
	fn unknown_key_is_rejected() {
		let layer = SecurityConfigLayer {
			rate_limit: Some(RateLimitConfigLayer {
				key: Some("session".into()),
				..Default::default()
			}),
		};
		assert!(layer.finalize().is_err());
	}
}
