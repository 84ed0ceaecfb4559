//! Post list and detail state.

// self
use crate::{
	_prelude::*,
	api::{Post, PostQuery},
	client::ApiClient,
	feed::LoadingFlag,
	http::ApiTransport,
};

/// Snapshot of [`PostFeed`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PostFeedState {
	/// Current search results.
	pub posts: Vec<Post>,
	/// Post opened in the detail view.
	pub current: Option<Post>,
	/// Page count for the last search.
	pub total_pages: u64,
	/// Whether a fetch is in flight.
	pub loading: bool,
}

/// Post search results plus the currently opened post.
pub struct PostFeed<C>
where
	C: ?Sized + ApiTransport,
{
	api: ApiClient<C>,
	posts: RwLock<Vec<Post>>,
	current: RwLock<Option<Post>>,
	total_pages: RwLock<u64>,
	loading: LoadingFlag,
}
impl<C> PostFeed<C>
where
	C: ?Sized + ApiTransport,
{
	/// Creates an empty feed.
	pub fn new(api: ApiClient<C>) -> Self {
		Self {
			api,
			posts: Default::default(),
			current: Default::default(),
			total_pages: Default::default(),
			loading: Default::default(),
		}
	}

	/// Runs a search, replacing the result list and page count.
	pub async fn fetch_posts(&self, query: &PostQuery) -> Result<()> {
		let _loading = self.loading.raise();
		let page = self.api.search_posts(query).await?;
		let total_pages = page.total_pages(query.page_size());

		*self.posts.write() = page.items;
		*self.total_pages.write() = total_pages;

		Ok(())
	}

	/// Loads one post into the detail slot.
	pub async fn fetch_post(&self, post_id: i64) -> Result<Post> {
		let _loading = self.loading.raise();
		let post = self.api.post(post_id).await?;

		*self.current.write() = Some(post.clone());

		Ok(post)
	}

	/// Whether a fetch is in flight.
	pub fn is_loading(&self) -> bool {
		self.loading.get()
	}

	/// Copies the current state.
	pub fn snapshot(&self) -> PostFeedState {
		PostFeedState {
			posts: self.posts.read().clone(),
			current: self.current.read().clone(),
			total_pages: *self.total_pages.read(),
			loading: self.loading.get(),
		}
	}
}
impl<C> Debug for PostFeed<C>
where
	C: ?Sized + ApiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PostFeed").field("state", &self.snapshot()).finish()
	}
}
