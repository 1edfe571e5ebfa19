// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Local mirror of the server's secret collection.
//!
//! The mirror is replaced wholesale after every successful sync so the
//! local state is exactly the server's view. Payloads stay ciphertext
//! (base64 of the sealed envelope); plaintext never touches this file.
//!
//! On-disk format, 0o600 under a 0o700 directory:
//!
//! ```json
//! { "secrets": [ { "id": …, "type": …, "payload": …, "version": … } ] }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use crate::error::AgentError;

/// One secret as the server reports it. `payload` is base64 ciphertext.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Secret {
	pub id: String,
	#[serde(rename = "type")]
	pub kind: String,
	pub title: String,
	pub payload: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub meta: Option<String>,
	pub version: i64,
	pub updated_at: DateTime<Utc>,
	pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct MirrorDump {
	secrets: Vec<Secret>,
}

/// Thread-safe in-memory mirror. Readers see either the pre-sync or the
/// post-sync snapshot, never a partial replacement.
#[derive(Debug, Default)]
pub struct MirrorStore {
	secrets: RwLock<HashMap<String, Secret>>,
}

impl MirrorStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get(&self, id: &str) -> Option<Secret> {
		self.secrets.read().expect("mirror lock poisoned").get(id).cloned()
	}

	/// Snapshot of every secret. Order is unspecified.
	pub fn list(&self) -> Vec<Secret> {
		self
			.secrets
			.read()
			.expect("mirror lock poisoned")
			.values()
			.cloned()
			.collect()
	}

	pub fn insert(&self, secret: Secret) {
		self
			.secrets
			.write()
			.expect("mirror lock poisoned")
			.insert(secret.id.clone(), secret);
	}

	pub fn remove(&self, id: &str) -> bool {
		self
			.secrets
			.write()
			.expect("mirror lock poisoned")
			.remove(id)
			.is_some()
	}

	/// Replace the whole mirror with the server's view.
	pub fn replace_all(&self, secrets: Vec<Secret>) {
		let mut map = HashMap::with_capacity(secrets.len());
		for secret in secrets {
			map.insert(secret.id.clone(), secret);
		}
		*self.secrets.write().expect("mirror lock poisoned") = map;
	}

	/// Load a mirror from disk. A missing file is an empty mirror; a
	/// malformed file is an error and the mirror stays empty.
	pub fn load(path: &Path) -> Result<Self, AgentError> {
		let raw = match std::fs::read(path) {
			Ok(raw) => raw,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::new()),
			Err(e) => {
				return Err(AgentError::Io {
					path: path.display().to_string(),
					source: e,
				})
			}
		};

		let dump: MirrorDump = serde_json::from_slice(&raw).map_err(|e| AgentError::Parse {
			path: path.display().to_string(),
			source: e,
		})?;

		let store = Self::new();
		store.replace_all(dump.secrets);
		Ok(store)
	}

	/// Persist the mirror. Atomic: written to a sibling temp file and
	/// renamed into place.
	pub fn save(&self, path: &Path) -> Result<(), AgentError> {
		let dump = MirrorDump { secrets: self.list() };
		let body = serde_json::to_vec_pretty(&dump).expect("mirror serialization cannot fail");
		write_private_atomic(path, &body)
	}
}

/// Write `contents` to `path` with owner-only permissions (file 0o600,
/// parent directory 0o700), via temp file + rename.
pub fn write_private_atomic(path: &Path, contents: &[u8]) -> Result<(), AgentError> {
	let io_err = |e: std::io::Error| AgentError::Io {
		path: path.display().to_string(),
		source: e,
	};

	let dir = path.parent().ok_or_else(|| {
		io_err(std::io::Error::new(
			std::io::ErrorKind::InvalidInput,
			"path has no parent directory",
		))
	})?;
	std::fs::create_dir_all(dir).map_err(io_err)?;
	#[cfg(unix)]
	{
		use std::os::unix::fs::PermissionsExt;
		std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o700)).map_err(io_err)?;
	}

	let tmp = path.with_extension("tmp");
	std::fs::write(&tmp, contents).map_err(io_err)?;
	#[cfg(unix)]
	{
		use std::os::unix::fs::PermissionsExt;
		std::fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o600)).map_err(io_err)?;
	}
	std::fs::rename(&tmp, path).map_err(io_err)?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample(id: &str, version: i64) -> Secret {
		Secret {
			id: id.to_string(),
			kind: "text".to_string(),
			title: format!("secret {id}"),
			payload: "Z2sxc2VhbGVk".to_string(),
			meta: None,
			version,
			updated_at: Utc::now(),
			created_at: Utc::now(),
		}
	}

	#[test]
	fn replace_all_is_wholesale() {
		let store = MirrorStore::new();
		store.insert(sample("a", 1));
		store.insert(sample("b", 1));

		store.replace_all(vec![sample("c", 3)]);

		assert!(store.get("a").is_none());
		assert!(store.get("b").is_none());
		assert_eq!(store.get("c").unwrap().version, 3);
		assert_eq!(store.list().len(), 1);
	}

	#[test]
	fn save_then_load_roundtrip() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("state").join("secrets.json");

		let store = MirrorStore::new();
		store.insert(sample("roundtrip", 2));
		store.save(&path).unwrap();

		let loaded = MirrorStore::load(&path).unwrap();
		let secret = loaded.get("roundtrip").unwrap();
		assert_eq!(secret.version, 2);
		assert_eq!(secret.payload, "Z2sxc2VhbGVk");
	}

	#[test]
	fn load_missing_file_is_empty_mirror() {
		let dir = tempfile::tempdir().unwrap();
		let store = MirrorStore::load(&dir.path().join("nope.json")).unwrap();
		assert!(store.list().is_empty());
	}

	#[test]
	fn load_malformed_file_is_a_parse_error() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("broken.json");
		std::fs::write(&path, b"{oops").unwrap();
		assert!(matches!(
			MirrorStore::load(&path),
			Err(AgentError::Parse { .. })
		));
	}

	#[cfg(unix)]
	#[test]
	fn files_are_owner_only() {
		use std::os::unix::fs::PermissionsExt;

		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("vault").join("secrets.json");
		let store = MirrorStore::new();
		store.insert(sample("perm", 1));
		store.save(&path).unwrap();

		let file_mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
		let dir_mode = std::fs::metadata(path.parent().unwrap())
			.unwrap()
			.permissions()
			.mode() & 0o777;
		assert_eq!(file_mode, 0o600);
		assert_eq!(dir_mode, 0o700);
	}

	#[test]
	fn mirror_file_shape_matches_the_wire() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("secrets.json");
		let store = MirrorStore::new();
		store.insert(sample("shape", 1));
		store.save(&path).unwrap();

		let raw = std::fs::read_to_string(&path).unwrap();
		let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
		assert!(value["secrets"].is_array());
		assert_eq!(value["secrets"][0]["type"], "text");
		// meta is omitted entirely when absent
		assert!(value["secrets"][0].get("meta").is_none());
	}
}
