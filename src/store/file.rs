//! File-backed [`ProfileCache`] for desktop and terminal front ends.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	api::MemberProfile,
	store::{ProfileCache, StoreError, StoreFuture},
};

/// Persists the cached profile to a JSON file after each mutation.
#[derive(Clone, Debug)]
pub struct FileProfileCache {
	path: PathBuf,
	inner: Arc<RwLock<Option<MemberProfile>>>,
}
impl FileProfileCache {
	/// Opens (or creates) a cache at the provided path, eagerly loading existing data.
	///
	/// A corrupt snapshot is treated as empty; the profile is only a convenience cache.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot = Self::load_snapshot(&path).unwrap_or_else(|_e| {
			#[cfg(feature = "tracing")]
			tracing::warn!(path = %path.display(), error = %_e, "discarding unreadable profile cache");

			None
		});

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	/// Location of the backing file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn load_snapshot(path: &Path) -> Result<Option<MemberProfile>, StoreError> {
		if !path.exists() {
			return Ok(None);
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		if bytes.is_empty() {
			return Ok(None);
		}

		serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization {
			message: format!("Failed to parse {}: {e}", path.display()),
		})
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create cache directory {}: {e}", parent.display()),
			})?;
		}
		Ok(())
	}

	fn persist_locked(&self, contents: &Option<MemberProfile>) -> Result<(), StoreError> {
		let Some(profile) = contents else {
			return match fs::remove_file(&self.path) {
				Ok(()) => Ok(()),
				Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
				Err(e) => Err(StoreError::Backend {
					message: format!("Failed to remove {}: {e}", self.path.display()),
				}),
			};
		};

		Self::ensure_parent_exists(&self.path)?;

		let serialized =
			serde_json::to_vec_pretty(profile).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize cached profile: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl ProfileCache for FileProfileCache {
	fn save(&self, profile: MemberProfile) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			let mut guard = self.inner.write();

			*guard = Some(profile);
			self.persist_locked(&guard)
		})
	}

	fn load(&self) -> StoreFuture<'_, Option<MemberProfile>> {
		Box::pin(async move { Ok(self.inner.read().clone()) })
	}

	fn clear(&self) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			let mut guard = self.inner.write();

			*guard = None;
			self.persist_locked(&guard)
		})
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::{
		env, process,
		time::{SystemTime, UNIX_EPOCH},
	};
	// crates.io
	use tokio::runtime::Runtime;
	// self
	use super::*;

	fn temp_path() -> PathBuf {
		let nanos = SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.expect("System clock should be after the epoch.")
			.as_nanos();

		env::temp_dir().join(format!("blog_client_profile_{}_{nanos}.json", process::id()))
	}

	fn profile() -> MemberProfile {
		MemberProfile { id: 11, email: "reader@blog.example".into(), nickname: "reader".into() }
	}

	#[test]
	fn save_and_reload_round_trip() {
		let path = temp_path();
		let cache = FileProfileCache::open(&path).expect("Failed to open profile cache.");
		let rt = Runtime::new().expect("Failed to build Tokio runtime for profile cache test.");

		rt.block_on(cache.save(profile())).expect("Failed to save profile to file cache.");
		drop(cache);

		let reopened = FileProfileCache::open(&path).expect("Failed to reopen profile cache.");
		let loaded = rt
			.block_on(reopened.load())
			.expect("Failed to load profile from file cache.")
			.expect("File cache lost the profile after reopen.");

		assert_eq!(loaded, profile());

		rt.block_on(reopened.clear()).expect("Failed to clear file cache.");

		assert!(!path.exists(), "Clearing the cache should remove the backing file.");
	}

	#[test]
	fn corrupt_snapshot_is_treated_as_empty() {
		let path = temp_path();

		fs::write(&path, b"{not json").expect("Failed to write corrupt fixture.");

		let cache = FileProfileCache::open(&path).expect("Corrupt caches should still open.");
		let rt = Runtime::new().expect("Failed to build Tokio runtime for profile cache test.");

		assert!(rt.block_on(cache.load()).expect("Load should succeed.").is_none());

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary profile cache {}: {e}", path.display())
		});
	}
}
