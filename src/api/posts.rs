//! Post endpoints: authoring, status transitions, lookup, and search.

// self
use crate::{
	_prelude::*,
	api::{Page, PageRequest},
	client::ApiClient,
	http::{ApiRequest, ApiTransport},
};

/// Publication state of a post.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostStatus {
	/// Saved but not visible to readers.
	Draft,
	/// Visible to readers.
	Published,
	/// Temporarily withdrawn.
	Hidden,
	/// Soft-deleted.
	Deleted,
}
impl PostStatus {
	/// Wire label, as used in query strings.
	pub const fn as_str(self) -> &'static str {
		match self {
			PostStatus::Draft => "DRAFT",
			PostStatus::Published => "PUBLISHED",
			PostStatus::Hidden => "HIDDEN",
			PostStatus::Deleted => "DELETED",
		}
	}
}
impl Display for PostStatus {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Post as returned by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
	/// Post identifier.
	pub post_id: i64,
	/// Author's member identifier.
	pub author_id: i64,
	/// Title.
	pub title: String,
	/// Markdown body.
	pub content: String,
	/// Publication state.
	pub post_status: PostStatus,
	/// Number of likes.
	#[serde(default)]
	pub like_count: u64,
	/// Whether the current member liked the post.
	#[serde(default)]
	pub is_liked_by_me: bool,
	/// Number of views.
	#[serde(default)]
	pub view_count: u64,
	/// Tag names.
	#[serde(default)]
	pub tags: Vec<String>,
}

/// Body of `POST /posts`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
	/// Title (at most 100 characters server-side).
	pub title: String,
	/// Markdown body.
	pub content: String,
	/// Initial publication state.
	pub post_status: PostStatus,
	/// Between one and ten tag names.
	pub tag_names: Vec<String>,
}

/// Body of `PUT /posts`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostUpdate {
	/// Post being modified.
	pub post_id: i64,
	/// New title.
	pub title: String,
	/// New markdown body.
	pub content: String,
	/// New publication state.
	pub post_status: PostStatus,
	/// Replacement tag names.
	pub tag_names: Vec<String>,
}

/// Search filters for `GET /posts`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PostQuery {
	/// Matched against title and content.
	pub keyword: Option<String>,
	/// Posts carrying any of these tags.
	pub tag_names: Vec<String>,
	/// Posts in any of these states.
	pub post_statuses: Vec<PostStatus>,
	/// Inclusive lower bound on creation time (ISO-8601 local date-time).
	pub created_from: Option<String>,
	/// Inclusive upper bound on creation time (ISO-8601 local date-time).
	pub created_to: Option<String>,
	/// Pagination.
	pub paging: PageRequest,
}
impl PostQuery {
	/// Page size assumed by the backend when none is sent.
	pub const DEFAULT_PAGE_SIZE: u32 = 10;

	/// Effective page size for page-count computations.
	pub fn page_size(&self) -> u32 {
		self.paging.size.unwrap_or(Self::DEFAULT_PAGE_SIZE)
	}

	pub(crate) fn apply(&self, request: ApiRequest) -> ApiRequest {
		let mut request = request.query_opt("keyword", self.keyword.as_deref());

		for tag in &self.tag_names {
			request = request.query("tagNames", tag);
		}
		for status in &self.post_statuses {
			request = request.query("postStatuses", status);
		}

		request = request
			.query_opt("createdFrom", self.created_from.as_deref())
			.query_opt("createdTo", self.created_to.as_deref());

		self.paging.apply(request)
	}
}

impl<C> ApiClient<C>
where
	C: ?Sized + ApiTransport,
{
	/// `POST /posts?memberId=`: creates a post authored by `member_id`.
	pub async fn create_post(&self, member_id: i64, post: &NewPost) -> Result<Post> {
		self.fetch_data(ApiRequest::post("posts").query("memberId", member_id).json(post)?).await
	}

	/// `PUT /posts?memberId=`: replaces a post's content.
	pub async fn update_post(&self, member_id: i64, update: &PostUpdate) -> Result<Post> {
		self.fetch_data(ApiRequest::put("posts").query("memberId", member_id).json(update)?).await
	}

	/// `GET /posts/{id}`.
	pub async fn post(&self, post_id: i64) -> Result<Post> {
		self.fetch_data(ApiRequest::get(format!("posts/{post_id}"))).await
	}

	/// `GET /posts`: filtered, paginated search.
	pub async fn search_posts(&self, query: &PostQuery) -> Result<Page<Post>> {
		self.fetch_page(query.apply(ApiRequest::get("posts"))).await
	}

	/// `POST /posts/{id}/publish`.
	pub async fn publish_post(&self, post_id: i64) -> Result<Post> {
		self.fetch_data(ApiRequest::post(format!("posts/{post_id}/publish"))).await
	}

	/// `POST /posts/{id}/hide`.
	pub async fn hide_post(&self, post_id: i64) -> Result<Post> {
		self.fetch_data(ApiRequest::post(format!("posts/{post_id}/hide"))).await
	}

	/// `POST /posts/{id}/delete`: soft delete.
	pub async fn delete_post(&self, post_id: i64) -> Result<Post> {
		self.fetch_data(ApiRequest::post(format!("posts/{post_id}/delete"))).await
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn query_repeats_list_filters() {
		let query = PostQuery {
			keyword: Some("rust".into()),
			tag_names: vec!["async".into(), "tokio".into()],
			post_statuses: vec![PostStatus::Published],
			paging: PageRequest::new(0, 20),
			..PostQuery::default()
		};
		let pairs: Vec<(String, String)> =
			query.apply(ApiRequest::get("posts")).query_pairs().to_vec();

		assert_eq!(
			pairs,
			[
				("keyword", "rust"),
				("tagNames", "async"),
				("tagNames", "tokio"),
				("postStatuses", "PUBLISHED"),
				("page", "0"),
				("size", "20"),
			]
			.map(|(k, v)| (k.to_owned(), v.to_owned()))
		);
		assert_eq!(query.page_size(), 20);
		assert_eq!(PostQuery::default().page_size(), 10);
	}

	#[test]
	fn post_decodes_backend_shape() {
		let raw = r##"{
			"postId": 5, "authorId": 2, "title": "Hello", "content": "# Hi",
			"postStatus": "PUBLISHED", "likeCount": 3, "isLikedByMe": true,
			"viewCount": 40, "tags": ["intro"]
		}"##;
		let post: Post = serde_json::from_str(raw).expect("Post should decode.");

		assert_eq!(post.post_status, PostStatus::Published);
		assert!(post.is_liked_by_me);
		assert_eq!(post.tags, vec!["intro".to_owned()]);
	}
}
