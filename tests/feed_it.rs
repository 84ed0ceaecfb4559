// std
use std::{
	sync::{
		Arc,
		atomic::{AtomicU64, AtomicUsize, Ordering},
	},
	time::Duration,
};
// crates.io
use http::{HeaderValue, StatusCode};
use parking_lot::Mutex;
use serde_json::{Value, json};
// self
use blog_client::{
	api::{PageRequest, PostQuery},
	auth::{AccessToken, SessionStore},
	client::{ApiClient, BlogClient},
	config::ClientConfig,
	feed::{NotificationCenter, PostFeed},
	http::{ApiResponse, ApiTransport, TOTAL_COUNT_HEADER, TransportFuture, TransportRequest},
	store::MemoryProfileCache,
	url::Url,
};

/// Serves a small, fixed blog: two pages of notifications and two posts.
#[derive(Default)]
struct FeedBackend {
	unread: AtomicU64,
	unread_calls: AtomicUsize,
	seen: Mutex<Vec<String>>,
}
impl FeedBackend {
	fn with_unread(count: u64) -> Arc<Self> {
		Arc::new(Self { unread: AtomicU64::new(count), ..Default::default() })
	}

	fn seen(&self) -> Vec<String> {
		self.seen.lock().clone()
	}

	fn respond(&self, request: &TransportRequest) -> ApiResponse {
		let path = request.path.as_str();
		let page = request
			.url
			.query_pairs()
			.find(|(key, _)| key == "page")
			.and_then(|(_, value)| value.parse::<u64>().ok())
			.unwrap_or(0);

		match path {
			"notifications" => paged(path, 4, json!([
				notification(page * 2 + 1, page > 0),
				notification(page * 2 + 2, true),
			])),
			"notifications/unread-count" => {
				self.unread_calls.fetch_add(1, Ordering::SeqCst);

				ok(path, json!(self.unread.load(Ordering::SeqCst)))
			},
			"notifications/read-all" => ok(path, Value::Null),
			path if path.starts_with("notifications/") =>
				ApiResponse::new(StatusCode::INTERNAL_SERVER_ERROR, path, r#"{"success":false}"#),
			"posts" => paged(path, 23, json!([post(1), post(2)])),
			"posts/2" => ok(path, post(2)),
			_ => ApiResponse::new(StatusCode::NOT_FOUND, path, ""),
		}
	}
}
impl ApiTransport for FeedBackend {
	fn execute(&self, request: TransportRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			self.seen.lock().push(request.url.to_string());

			Ok(self.respond(&request))
		})
	}
}

fn ok(path: &str, data: Value) -> ApiResponse {
	ApiResponse::new(StatusCode::OK, path, json!({ "success": true, "data": data }).to_string())
}

fn paged(path: &str, total: u64, data: Value) -> ApiResponse {
	let mut response = ok(path, data);

	response.headers.insert(TOTAL_COUNT_HEADER, HeaderValue::from(total));

	response
}

fn notification(id: u64, is_read: bool) -> Value {
	json!({ "id": id, "type": "COMMENT", "message": "New comment", "postId": 2, "isRead": is_read })
}

fn post(id: u64) -> Value {
	json!({
		"postId": id,
		"authorId": 7,
		"title": format!("Post {id}"),
		"content": "body",
		"postStatus": "PUBLISHED",
	})
}

fn api(backend: &Arc<FeedBackend>) -> ApiClient<FeedBackend> {
	let origin = Url::parse("https://blog.test").expect("Origin fixture should parse.");
	let config = ClientConfig::builder(origin).build().expect("Config fixture should build.");
	let client = BlogClient::new(config, backend.clone(), Arc::new(MemoryProfileCache::default()));

	SessionStore::set_token(client.session().as_ref(), AccessToken::new("signed-in"));

	client.api().clone()
}

#[tokio::test]
async fn post_feed_tracks_results_pages_and_detail() {
	let backend = FeedBackend::with_unread(0);
	let feed = PostFeed::new(api(&backend));
	let query = PostQuery { paging: PageRequest::new(0, 10), ..Default::default() };

	feed.fetch_posts(&query).await.expect("Search should succeed.");

	let state = feed.snapshot();

	assert_eq!(state.posts.len(), 2);
	assert_eq!(state.total_pages, 3);
	assert!(!state.loading);

	let opened = feed.fetch_post(2).await.expect("Detail fetch should succeed.");

	assert_eq!(opened.title, "Post 2");
	assert_eq!(feed.snapshot().current, Some(opened));
	assert!(feed.fetch_post(404).await.is_err());
	assert!(!feed.is_loading(), "loading flag should drop after a failed fetch");
}

#[tokio::test]
async fn notification_pages_replace_then_append() {
	let backend = FeedBackend::with_unread(0);
	let center = NotificationCenter::new(api(&backend));

	center.fetch_notifications(0, 2).await.expect("First page should load.");
	center.fetch_notifications(1, 2).await.expect("Second page should load.");

	let ids = center.snapshot().notifications.iter().map(|n| n.id).collect::<Vec<_>>();

	assert_eq!(ids, vec![1, 2, 3, 4]);
	assert_eq!(center.snapshot().total_pages, 2);

	center.fetch_notifications(0, 2).await.expect("Reload should succeed.");

	let ids = center.snapshot().notifications.iter().map(|n| n.id).collect::<Vec<_>>();

	assert_eq!(ids, vec![1, 2]);
	let pages = backend
		.seen()
		.into_iter()
		.filter(|url| url.contains("/notifications?"))
		.collect::<Vec<_>>();

	assert_eq!(pages.len(), 3);
	assert!(
		pages.iter().all(|url| url.contains("sort=createdAt%2Cdesc")),
		"notification pages should be sorted newest first: {pages:?}",
	);
}

#[tokio::test]
async fn mark_read_updates_local_state_even_when_server_fails() {
	let backend = FeedBackend::with_unread(5);
	let center = NotificationCenter::new(api(&backend));

	center.fetch_unread_count().await;
	center.fetch_notifications(0, 2).await.expect("First page should load.");

	assert_eq!(center.snapshot().unread_count, 5);

	// Item 1 is unread; the backend answers 500 for the mark-read call.
	center.mark_read(1).await;

	let state = center.snapshot();

	assert_eq!(state.unread_count, 4);
	assert!(state.notifications.iter().all(|n| n.is_read));

	// Already read, and not loaded: neither moves the badge.
	center.mark_read(2).await;
	center.mark_read(99).await;

	assert_eq!(center.snapshot().unread_count, 4);

	center.mark_all_read().await;

	assert_eq!(center.snapshot().unread_count, 0);
	assert!(backend.seen().iter().any(|url| url.ends_with("/notifications/read-all")));
}

#[tokio::test(start_paused = true)]
async fn polling_refreshes_badge_until_stopped() {
	let backend = FeedBackend::with_unread(3);
	let center = Arc::new(NotificationCenter::new(api(&backend)));

	center.start_polling(NotificationCenter::<FeedBackend>::DEFAULT_POLL_INTERVAL);

	assert!(center.is_polling());

	// Ticks at 0s, 30s and 60s.
	tokio::time::sleep(Duration::from_secs(61)).await;

	assert_eq!(backend.unread_calls.load(Ordering::SeqCst), 3);
	assert_eq!(center.snapshot().unread_count, 3);

	backend.unread.store(8, Ordering::SeqCst);
	tokio::time::sleep(Duration::from_secs(30)).await;

	assert_eq!(center.snapshot().unread_count, 8);

	center.stop_polling();
	tokio::time::sleep(Duration::from_secs(300)).await;

	assert_eq!(backend.unread_calls.load(Ordering::SeqCst), 4);
	assert!(!center.is_polling());
}
