//! Notification endpoints.

// self
use crate::{
	_prelude::*,
	api::{Page, PageRequest},
	client::ApiClient,
	http::{ApiRequest, ApiTransport},
};

/// Notification delivered to the signed-in member.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
	/// Notification identifier.
	pub id: i64,
	/// Event category, e.g. `COMMENT` or `LIKE`.
	#[serde(default, rename = "type")]
	pub kind: Option<String>,
	/// Rendered message.
	#[serde(default)]
	pub message: Option<String>,
	/// Post the notification refers to.
	#[serde(default)]
	pub post_id: Option<i64>,
	/// Read flag.
	#[serde(default)]
	pub is_read: bool,
	/// Creation time as sent by the backend.
	#[serde(default)]
	pub created_at: Option<String>,
}

impl<C> ApiClient<C>
where
	C: ?Sized + ApiTransport,
{
	/// `GET /notifications`: paginated notifications.
	pub async fn notifications(&self, paging: &PageRequest) -> Result<Page<Notification>> {
		self.fetch_page(paging.apply(ApiRequest::get("notifications"))).await
	}

	/// `GET /notifications/unread-count`; a null payload counts as zero.
	pub async fn unread_notification_count(&self) -> Result<u64> {
		let count: Option<u64> =
			self.fetch_optional(ApiRequest::get("notifications/unread-count")).await?;

		Ok(count.unwrap_or(0))
	}

	/// `PATCH /notifications/{id}/read`.
	pub async fn mark_notification_read(&self, id: i64) -> Result<()> {
		self.fetch_ack(ApiRequest::patch(format!("notifications/{id}/read"))).await
	}

	/// `PATCH /notifications/read-all`.
	pub async fn mark_all_notifications_read(&self) -> Result<()> {
		self.fetch_ack(ApiRequest::patch("notifications/read-all")).await
	}
}
