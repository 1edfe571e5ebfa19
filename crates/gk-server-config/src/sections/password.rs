// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Account-password hashing section.

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordHasher {
	Argon2id,
	Bcrypt,
}

#[derive(Debug, Clone)]
pub struct PasswordConfig {
	pub hasher: PasswordHasher,
	pub argon2: Argon2Section,
	pub bcrypt: BcryptSection,
}

#[derive(Debug, Clone, Copy)]
pub struct Argon2Section {
	pub time: u32,
	pub memory_kib: u32,
	pub threads: u32,
	pub key_len: u32,
	pub salt_len: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct BcryptSection {
	pub cost: u32,
}

impl Default for PasswordConfig {
	fn default() -> Self {
		Self {
			hasher: PasswordHasher::Argon2id,
			argon2: Argon2Section {
				time: 1,
				memory_kib: 64 * 1024,
				threads: 1,
				key_len: 32,
				salt_len: 16,
			},
			bcrypt: BcryptSection { cost: 12 },
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Argon2SectionLayer {
	#[serde(default)]
	pub time: Option<u32>,
	#[serde(default)]
	pub memory_kib: Option<u32>,
	#[serde(default)]
	pub threads: Option<u32>,
	#[serde(default)]
	pub key_len: Option<u32>,
	#[serde(default)]
	pub salt_len: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BcryptSectionLayer {
	#[serde(default)]
	pub cost: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PasswordConfigLayer {
	#[serde(default)]
	pub hasher: Option<String>,
	#[serde(default)]
	pub argon2: Option<Argon2SectionLayer>,
	#[serde(default)]
	pub bcrypt: Option<BcryptSectionLayer>,
}

impl PasswordConfigLayer {
	pub fn merge(&mut self, other: PasswordConfigLayer) {
		if other.hasher.is_some() {
			self.hasher = other.hasher;
		}
		if let Some(incoming) = other.argon2 {
			let argon2 = self.argon2.get_or_insert_with(Default::default);
			if incoming.time.is_some() {
				argon2.time = incoming.time;
			}
			if incoming.memory_kib.is_some() {
				argon2.memory_kib = incoming.memory_kib;
			}
			if incoming.threads.is_some() {
				argon2.threads = incoming.threads;
			}
			if incoming.key_len.is_some() {
				argon2.key_len = incoming.key_len;
			}
			if incoming.salt_len.is_some() {
				argon2.salt_len = incoming.salt_len;
			}
		}
		if let Some(incoming) = other.bcrypt {
			let bcrypt = self.bcrypt.get_or_insert_with(Default::default);
			if incoming.cost.is_some() {
				bcrypt.cost = incoming.cost;
			}
		}
	}

	/// Resolve into runtime config. An unknown hasher name is kept as a
	/// validation failure, not silently defaulted.
	pub fn finalize(self) -> Result<PasswordConfig, String> {
		let d = PasswordConfig::default();
		let hasher = match self.hasher.as_deref() {
			None | Some("argon2id") => PasswordHasher::Argon2id,
			Some("bcrypt") => PasswordHasher::Bcrypt,
			Some(other) => return Err(format!("unknown password.hasher {other:?}")),
		};
		let argon2 = self.argon2.unwrap_or_default();
		let bcrypt = self.bcrypt.unwrap_or_default();
		Ok(PasswordConfig {
			hasher,
			argon2: Argon2Section {
				time: argon2.time.unwrap_or(d.argon2.time),
				memory_kib: argon2.memory_kib.unwrap_or(d.argon2.memory_kib),
				threads: argon2.threads.unwrap_or(d.argon2.threads),
				key_len: argon2.key_len.unwrap_or(d.argon2.key_len),
				salt_len: argon2.salt_len.unwrap_or(d.argon2.salt_len),
			},
			bcrypt: BcryptSection {
				cost: bcrypt.cost.unwrap_or(d.bcrypt.cost),
			},
		})
	}
}
