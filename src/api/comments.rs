//! Comment endpoints nested under a post.

// self
use crate::{
	_prelude::*,
	api::{Page, PageRequest},
	client::ApiClient,
	http::{ApiRequest, ApiTransport},
};

/// Moderation state of a comment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommentStatus {
	/// Visible.
	Active,
	/// Removed by its author or a moderator.
	Deleted,
	/// Any state this client does not know yet.
	#[serde(other)]
	Unknown,
}

/// Comment as returned by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
	/// Comment identifier.
	pub comment_id: i64,
	/// Owning post.
	pub post_id: i64,
	/// Author's member identifier.
	pub author_id: i64,
	/// Author's display name; only present on list views.
	#[serde(default)]
	pub author_nickname: Option<String>,
	/// Body text.
	pub content: String,
	/// Parent comment for replies.
	#[serde(default)]
	pub parent_id: Option<i64>,
	/// Moderation state.
	pub status: CommentStatus,
	/// Creation time as sent by the backend (ISO-8601 local date-time).
	#[serde(default)]
	pub created_at: Option<String>,
}

/// Body of `POST /posts/{id}/comments`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
	/// Body text (at most 1000 characters server-side).
	pub content: String,
	/// Parent comment when replying.
	pub parent_id: Option<i64>,
}

impl<C> ApiClient<C>
where
	C: ?Sized + ApiTransport,
{
	/// `GET /posts/{id}/comments`: paginated comments of a post.
	pub async fn comments(&self, post_id: i64, paging: &PageRequest) -> Result<Page<Comment>> {
		self.fetch_page(paging.apply(ApiRequest::get(format!("posts/{post_id}/comments")))).await
	}

	/// `GET /posts/{id}/comments/{commentId}`.
	pub async fn comment(&self, post_id: i64, comment_id: i64) -> Result<Comment> {
		self.fetch_data(ApiRequest::get(format!("posts/{post_id}/comments/{comment_id}"))).await
	}

	/// `POST /posts/{id}/comments`.
	pub async fn create_comment(&self, post_id: i64, comment: &NewComment) -> Result<Comment> {
		self.fetch_data(ApiRequest::post(format!("posts/{post_id}/comments")).json(comment)?).await
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn unknown_status_is_tolerated() {
		let raw = r#"{
			"commentId": 1, "postId": 2, "authorId": 3, "content": "nice",
			"parentId": null, "status": "PENDING_REVIEW"
		}"#;
		let comment: Comment = serde_json::from_str(raw).expect("Comment should decode.");

		assert_eq!(comment.status, CommentStatus::Unknown);
		assert!(comment.author_nickname.is_none());
	}
}
