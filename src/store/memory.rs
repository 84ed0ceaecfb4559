//! Thread-safe in-memory [`ProfileCache`] implementation for tests and headless clients.

// self
use crate::{
	_prelude::*,
	api::MemberProfile,
	store::{ProfileCache, StoreFuture},
};

/// Keeps the cached profile in-process.
#[derive(Clone, Debug, Default)]
pub struct MemoryProfileCache(Arc<RwLock<Option<MemberProfile>>>);
impl MemoryProfileCache {
	/// Creates a cache pre-seeded with `profile`.
	pub fn with_profile(profile: MemberProfile) -> Self {
		Self(Arc::new(RwLock::new(Some(profile))))
	}

	/// Returns the cached profile without going through the async contract.
	pub fn snapshot(&self) -> Option<MemberProfile> {
		self.0.read().clone()
	}
}
impl ProfileCache for MemoryProfileCache {
	fn save(&self, profile: MemberProfile) -> StoreFuture<'_, ()> {
		let slot = self.0.clone();

		Box::pin(async move {
			*slot.write() = Some(profile);

			Ok(())
		})
	}

	fn load(&self) -> StoreFuture<'_, Option<MemberProfile>> {
		let slot = self.0.clone();

		Box::pin(async move { Ok(slot.read().clone()) })
	}

	fn clear(&self) -> StoreFuture<'_, ()> {
		let slot = self.0.clone();

		Box::pin(async move {
			slot.write().take();

			Ok(())
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn profile() -> MemberProfile {
		MemberProfile { id: 7, email: "writer@blog.example".into(), nickname: "writer".into() }
	}

	#[tokio::test]
	async fn save_load_clear_cycle() {
		let cache = MemoryProfileCache::default();

		assert!(cache.load().await.expect("Empty load should succeed.").is_none());

		cache.save(profile()).await.expect("Save should succeed.");

		assert_eq!(cache.load().await.expect("Load should succeed."), Some(profile()));

		cache.clear().await.expect("Clear should succeed.");

		assert!(cache.snapshot().is_none());
	}
}
