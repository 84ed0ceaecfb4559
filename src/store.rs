//! Profile cache contracts and built-in cache implementations.
//!
//! The cache mirrors what a browser client keeps in local storage: the last signed-in member's
//! profile, used to paint the UI before the session is re-validated. It is never a source of
//! truth for authentication.

pub mod file;
pub mod memory;

pub use file::FileProfileCache;
pub use memory::MemoryProfileCache;

// self
use crate::{_prelude::*, api::MemberProfile};

/// Boxed future returned by [`ProfileCache`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract implemented by profile caches.
pub trait ProfileCache
where
	Self: Send + Sync,
{
	/// Persists or replaces the cached profile.
	fn save(&self, profile: MemberProfile) -> StoreFuture<'_, ()>;

	/// Loads the cached profile, if present.
	fn load(&self) -> StoreFuture<'_, Option<MemberProfile>>;

	/// Removes the cached profile.
	fn clear(&self) -> StoreFuture<'_, ()>;
}

/// Error type produced by [`ProfileCache`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::Error;

	#[test]
	fn store_error_converts_into_client_error_with_source() {
		let store_error = StoreError::Backend { message: "disk unavailable".into() };
		let client_error: Error = store_error.clone().into();

		assert!(matches!(client_error, Error::Storage(_)));
		assert!(client_error.to_string().contains("disk unavailable"));

		let source = StdError::source(&client_error)
			.expect("Client error should expose the original store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}
}
