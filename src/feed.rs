//! Observable state holders backing list and detail views.
//!
//! Each holder owns an [`ApiClient`](crate::client::ApiClient) clone, performs the fetches a
//! view needs, and exposes cloned snapshots so UI layers never hold a lock.

pub mod notifications;
pub mod posts;

pub use notifications::*;
pub use posts::*;

// std
use std::sync::atomic::{AtomicBool, Ordering};

/// Loading indicator that is raised for the lifetime of a [`LoadingGuard`].
#[derive(Debug, Default)]
pub(crate) struct LoadingFlag(AtomicBool);
impl LoadingFlag {
	pub(crate) fn get(&self) -> bool {
		self.0.load(Ordering::Acquire)
	}

	pub(crate) fn raise(&self) -> LoadingGuard<'_> {
		self.0.store(true, Ordering::Release);

		LoadingGuard(self)
	}
}

/// Lowers the flag on drop, covering early returns and errors.
pub(crate) struct LoadingGuard<'a>(&'a LoadingFlag);
impl Drop for LoadingGuard<'_> {
	fn drop(&mut self) {
		self.0.0.store(false, Ordering::Release);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn guard_lowers_flag_on_drop() {
		let flag = LoadingFlag::default();

		{
			let _guard = flag.raise();

			assert!(flag.get());
		}

		assert!(!flag.get());
	}
}
