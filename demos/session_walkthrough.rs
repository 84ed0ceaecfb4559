//! Walks through a signed-in session against a mocked blog backend.
//!
//! 1. Sign in and keep the returned access token in the session.
//! 2. Search posts and render the first body to sanitized HTML.
//! 3. Let the token expire: the next call refreshes once and replays transparently.
//! 4. Sign out.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
// self
use blog_client::{
	api::{PageRequest, PostQuery},
	client::BlogClient,
	config::ClientConfig,
	markdown,
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let member = json!({ "id": 1, "email": "demo@blog.test", "nickname": "demo" });

	server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v1/auth/login");
			then.status(200).json_body(json!({
				"success": true,
				"data": { "accessToken": "first", "user": member },
			}));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/posts").header("authorization", "Bearer first");
			then.status(200).header("x-total-count", "1").json_body(json!({
				"success": true,
				"data": [{
					"postId": 1,
					"authorId": 1,
					"title": "Hello",
					"content": "# Hello\nfirst line\n\n<script>alert('x')</script>",
					"postStatus": "PUBLISHED",
				}],
			}));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/members/me").header("authorization", "Bearer first");
			then.status(401).json_body(json!({ "success": false, "message": "Token expired" }));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v1/auth/refresh");
			then.status(200).json_body(json!({ "success": true, "data": { "accessToken": "second" } }));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/members/me").header("authorization", "Bearer second");
			then.status(200).json_body(json!({ "success": true, "data": member }));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v1/auth/logout");
			then.status(200).json_body(json!({ "success": true }));
		})
		.await;

	let config = ClientConfig::builder(Url::parse(&server.base_url())?).build()?;
	let client = BlogClient::connect(config)?;
	let profile = client.login("demo@blog.test", "demo-password").await?;

	println!("Signed in as {} <{}>.", profile.nickname, profile.email);

	let query = PostQuery { paging: PageRequest::new(0, 10), ..Default::default() };
	let page = client.search_posts(&query).await?;

	println!("Found {} post(s) across {} page(s).", page.total_count, page.total_pages(10));

	if let Some(post) = page.items.first() {
		println!("Rendered body of {:?}:\n{}", post.title, markdown::render_markdown(&post.content));
	}

	let me = client.fetch_me().await?;

	println!(
		"Fetched {} after {} refresh attempt(s).",
		me.nickname,
		client.coordinator().metrics().attempts()
	);

	client.logout().await;

	println!("Signed out: logged in = {}.", client.session().is_logged_in());

	Ok(())
}
