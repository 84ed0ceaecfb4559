//! Notification list, unread badge, and background badge polling.

// crates.io
use tokio::task::JoinHandle;
// self
use crate::{
	_prelude::*,
	api::{Notification, PageRequest},
	client::ApiClient,
	feed::LoadingFlag,
	http::ApiTransport,
	obs::{self, OpKind, OpOutcome},
};

/// Snapshot of [`NotificationCenter`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NotificationState {
	/// Loaded notifications, newest first.
	pub notifications: Vec<Notification>,
	/// Unread badge count.
	pub unread_count: u64,
	/// Page count for the loaded list.
	pub total_pages: u64,
	/// Whether a list fetch is in flight.
	pub loading: bool,
}

#[derive(Debug, Default)]
struct Inner {
	notifications: Vec<Notification>,
	unread_count: u64,
	total_pages: u64,
}

/// Notification list and unread badge for the signed-in member.
pub struct NotificationCenter<C>
where
	C: ?Sized + ApiTransport,
{
	api: ApiClient<C>,
	inner: RwLock<Inner>,
	loading: LoadingFlag,
	poller: Mutex<Option<JoinHandle<()>>>,
}
impl<C> NotificationCenter<C>
where
	C: ?Sized + ApiTransport,
{
	/// Default list page size.
	pub const DEFAULT_PAGE_SIZE: u32 = 15;
	/// Default badge polling interval.
	pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

	/// Creates an empty center.
	pub fn new(api: ApiClient<C>) -> Self {
		Self {
			api,
			inner: Default::default(),
			loading: Default::default(),
			poller: Default::default(),
		}
	}

	/// Refreshes the unread badge only. Failures leave the previous count in place.
	pub async fn fetch_unread_count(&self) {
		match self.api.unread_notification_count().await {
			Ok(count) => self.inner.write().unread_count = count,
			Err(_e) => {
				#[cfg(feature = "tracing")]
				tracing::debug!(error = %_e, "unread count fetch failed");
			},
		}
	}

	/// Loads one page of notifications, newest first.
	///
	/// Page 0 replaces the list; later pages append to it.
	pub async fn fetch_notifications(&self, page: u32, size: u32) -> Result<()> {
		let _loading = self.loading.raise();
		let paging = PageRequest::new(page, size).sorted_by("createdAt,desc");
		let fetched = self.api.notifications(&paging).await?;
		let total_pages = fetched.total_pages(size);
		let mut inner = self.inner.write();

		if page == 0 {
			inner.notifications = fetched.items;
		} else {
			inner.notifications.extend(fetched.items);
		}

		inner.total_pages = total_pages;

		Ok(())
	}

	/// Marks one notification read.
	///
	/// The server call is best effort; local state is updated regardless so the badge reacts
	/// immediately. The unread count only drops for a loaded, previously unread item.
	pub async fn mark_read(&self, id: i64) {
		if let Err(_e) = self.api.mark_notification_read(id).await {
			#[cfg(feature = "tracing")]
			tracing::debug!(id, error = %_e, "ignoring mark-read failure");
		}

		let mut inner = self.inner.write();
		let newly_read = match inner.notifications.iter_mut().find(|n| n.id == id) {
			Some(item) if !item.is_read => {
				item.is_read = true;

				true
			},
			_ => false,
		};

		if newly_read {
			inner.unread_count = inner.unread_count.saturating_sub(1);
		}
	}

	/// Marks everything read; best effort on the server, unconditional locally.
	pub async fn mark_all_read(&self) {
		if let Err(_e) = self.api.mark_all_notifications_read().await {
			#[cfg(feature = "tracing")]
			tracing::debug!(error = %_e, "ignoring mark-all-read failure");
		}

		let mut inner = self.inner.write();

		inner.notifications.iter_mut().for_each(|n| n.is_read = true);
		inner.unread_count = 0;
	}

	/// Whether a list fetch is in flight.
	pub fn is_loading(&self) -> bool {
		self.loading.get()
	}

	/// Copies the current state.
	pub fn snapshot(&self) -> NotificationState {
		let inner = self.inner.read();

		NotificationState {
			notifications: inner.notifications.clone(),
			unread_count: inner.unread_count,
			total_pages: inner.total_pages,
			loading: self.loading.get(),
		}
	}

	/// Polls the unread badge every `every`, starting immediately.
	///
	/// Replaces any poller already running. Must be called within a Tokio runtime. The task
	/// only holds a weak reference, so dropping the last `Arc` ends polling too.
	pub fn start_polling(self: &Arc<Self>, every: Duration) {
		let center = Arc::downgrade(self);
		let task = tokio::spawn(async move {
			let mut ticker = tokio::time::interval(every);

			ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

			loop {
				ticker.tick().await;

				let Some(center) = center.upgrade() else { break };

				obs::record_op_outcome(OpKind::Poll, OpOutcome::Attempt);
				center.fetch_unread_count().await;
			}
		});

		if let Some(previous) = self.poller.lock().replace(task) {
			previous.abort();
		}
	}

	/// Stops background polling, if running.
	pub fn stop_polling(&self) {
		if let Some(task) = self.poller.lock().take() {
			task.abort();
		}
	}

	/// Whether a poller is currently installed.
	pub fn is_polling(&self) -> bool {
		self.poller.lock().as_ref().is_some_and(|task| !task.is_finished())
	}
}
impl<C> Drop for NotificationCenter<C>
where
	C: ?Sized + ApiTransport,
{
	fn drop(&mut self) {
		self.stop_polling();
	}
}
impl<C> Debug for NotificationCenter<C>
where
	C: ?Sized + ApiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("NotificationCenter")
			.field("state", &self.snapshot())
			.field("polling", &self.is_polling())
			.finish()
	}
}
