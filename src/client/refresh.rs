//! Single-flight coordination of access-token refreshes.
//!
//! At most one refresh is in flight per coordinator. The coordinator owns the
//! refresh-in-progress flag and the queue of waiting callers. The first caller is admitted as
//! the leader and receives a [`RefreshLease`]; later callers receive a [`RefreshWaiter`] that
//! resolves once the leader settles. The flag is cleared and the queue emptied when the lease
//! drops, including when the leader is cancelled mid-refresh.

// crates.io
use tokio::sync::oneshot;
// self
use crate::{_prelude::*, obs::RefreshMetrics};

type Outcome = Result<(), Arc<Error>>;

#[derive(Debug, Default)]
struct CoordinatorState {
	refreshing: bool,
	pending: VecDeque<oneshot::Sender<Outcome>>,
}
impl CoordinatorState {
	fn drain(&mut self, outcome: &Outcome) {
		// Receivers dropped by cancelled callers are skipped.
		for waiter in self.pending.drain(..) {
			let _ = waiter.send(outcome.clone());
		}
	}
}

/// Owns the refresh-in-progress flag and the queue of callers waiting on it.
#[derive(Debug, Default)]
pub struct RefreshCoordinator {
	state: Mutex<CoordinatorState>,
	metrics: RefreshMetrics,
}
impl RefreshCoordinator {
	/// Admits a caller that observed an authorization failure.
	///
	/// Returns [`Admission::Leader`] when no refresh is in flight (the flag is set before this
	/// returns), otherwise enqueues the caller and returns [`Admission::Waiter`].
	pub fn admit(&self) -> Admission<'_> {
		let mut state = self.state.lock();

		if state.refreshing {
			let (tx, rx) = oneshot::channel();

			state.pending.push_back(tx);
			self.metrics.record_queued();

			Admission::Waiter(RefreshWaiter(rx))
		} else {
			state.refreshing = true;
			self.metrics.record_attempt();

			Admission::Leader(RefreshLease { coordinator: self, outcome: None })
		}
	}

	/// Returns `true` while a leader holds the refresh lease.
	pub fn is_refreshing(&self) -> bool {
		self.state.lock().refreshing
	}

	/// Number of callers currently queued behind the in-flight refresh.
	pub fn pending(&self) -> usize {
		self.state.lock().pending.len()
	}

	/// Refresh counters for this coordinator.
	pub fn metrics(&self) -> &RefreshMetrics {
		&self.metrics
	}
}

/// Result of [`RefreshCoordinator::admit`].
#[derive(Debug)]
pub enum Admission<'a> {
	/// The caller must perform the refresh and settle the lease.
	Leader(RefreshLease<'a>),
	/// A refresh is already in flight; wait for it to settle.
	Waiter(RefreshWaiter),
}

/// Exclusive right to perform the in-flight refresh.
///
/// Settling releases every queued waiter; dropping the lease clears the flag and releases any
/// waiter that queued after settlement with the same outcome (or with
/// [`Error::RefreshInterrupted`] when the lease was never settled).
#[derive(Debug)]
pub struct RefreshLease<'a> {
	coordinator: &'a RefreshCoordinator,
	outcome: Option<Outcome>,
}
impl RefreshLease<'_> {
	/// Marks the refresh successful and releases all queued waiters for replay.
	pub fn resolve(&mut self) {
		self.coordinator.metrics.record_success();
		self.settle(Ok(()));
	}

	/// Marks the refresh failed and rejects all queued waiters with `cause`.
	pub fn reject(&mut self, cause: Arc<Error>) {
		self.coordinator.metrics.record_failure();
		self.settle(Err(cause));
	}

	fn settle(&mut self, outcome: Outcome) {
		self.coordinator.state.lock().drain(&outcome);
		self.outcome = Some(outcome);
	}
}
impl Drop for RefreshLease<'_> {
	fn drop(&mut self) {
		let outcome = self.outcome.take().unwrap_or_else(|| {
			self.coordinator.metrics.record_failure();

			Err(Arc::new(Error::RefreshInterrupted))
		});
		let mut state = self.coordinator.state.lock();

		state.refreshing = false;
		state.drain(&outcome);
	}
}

/// Handle held by a caller queued behind an in-flight refresh.
#[derive(Debug)]
pub struct RefreshWaiter(oneshot::Receiver<Outcome>);
impl RefreshWaiter {
	/// Resolves once the leader settles; fails with the leader's refresh error.
	pub async fn wait(self) -> Result<()> {
		match self.0.await {
			Ok(Ok(())) => Ok(()),
			Ok(Err(cause)) => Err(Error::RefreshFailed(cause)),
			Err(_) => Err(Error::RefreshInterrupted),
		}
	}
}
