//! Transport primitives for blog API calls.
//!
//! The module exposes [`ApiTransport`] alongside the request/response value types so
//! downstream crates can plug in custom HTTP stacks (or deterministic fakes) without
//! touching the refresh interceptor. The client resolves URLs and decorates headers before a
//! [`TransportRequest`] reaches the transport, so implementations only move bytes.

// crates.io
use http::{
	HeaderMap, HeaderName, HeaderValue, Method, StatusCode,
	header::{AUTHORIZATION, CONTENT_TYPE},
};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, DecodeError, TransportError},
};
#[cfg(feature = "reqwest")] use crate::config::ClientConfig;

/// Header carrying the total element count of paginated list endpoints.
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// Boxed future returned by [`ApiTransport::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<ApiResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP stacks capable of executing blog API requests.
///
/// Implementations must return `Ok` for every HTTP response regardless of status; status
/// classification and the refresh protocol live in [`ApiClient`](crate::client::ApiClient).
/// Only failures that produced no response (DNS, TLS, timeouts) map to [`TransportError`].
pub trait ApiTransport
where
	Self: 'static + Send + Sync,
{
	/// Executes a fully-resolved request.
	fn execute(&self, request: TransportRequest) -> TransportFuture<'_>;
}

/// Retry marker consulted by the refresh interceptor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RetryState {
	/// Not yet replayed after a refresh.
	#[default]
	Fresh,
	/// Already went through refresh handling; another 401 propagates.
	Retrying,
}

/// Request expressed relative to the API base URL.
#[derive(Clone, Debug)]
pub struct ApiRequest {
	method: Method,
	path: String,
	query: Vec<(String, String)>,
	headers: HeaderMap,
	body: Option<Vec<u8>>,
	retry: RetryState,
}
impl ApiRequest {
	/// Creates a request for the provided method and API-relative path.
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self {
			method,
			path: path.into(),
			query: Vec::new(),
			headers: HeaderMap::new(),
			body: None,
			retry: RetryState::Fresh,
		}
	}

	/// Shorthand for a `GET` request.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::GET, path)
	}

	/// Shorthand for a `POST` request.
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::POST, path)
	}

	/// Shorthand for a `PUT` request.
	pub fn put(path: impl Into<String>) -> Self {
		Self::new(Method::PUT, path)
	}

	/// Shorthand for a `PATCH` request.
	pub fn patch(path: impl Into<String>) -> Self {
		Self::new(Method::PATCH, path)
	}

	/// Appends a query parameter.
	pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
		self.query.push((key.into(), value.to_string()));

		self
	}

	/// Appends a query parameter when a value is present.
	pub fn query_opt(self, key: impl Into<String>, value: Option<impl ToString>) -> Self {
		match value {
			Some(value) => self.query(key, value),
			None => self,
		}
	}

	/// Serializes `body` as the JSON payload.
	pub fn json<T>(mut self, body: &T) -> Result<Self, ConfigError>
	where
		T: ?Sized + Serialize,
	{
		let bytes = serde_json::to_vec(body).map_err(ConfigError::RequestBody)?;

		self.headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		self.body = Some(bytes);

		Ok(self)
	}

	/// Sets a header, replacing any previous value.
	pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(name, value);

		self
	}

	/// Sets an explicit bearer credential; the client will not override it.
	pub fn bearer(self, token: &str) -> Result<Self, ConfigError> {
		let value = bearer_value(token)?;

		Ok(self.header(AUTHORIZATION, value))
	}

	/// HTTP method.
	pub fn method(&self) -> &Method {
		&self.method
	}

	/// API-relative path.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Query parameters in insertion order.
	pub fn query_pairs(&self) -> &[(String, String)] {
		&self.query
	}

	/// Headers set on the request so far.
	pub fn headers(&self) -> &HeaderMap {
		&self.headers
	}

	/// Current retry marker.
	pub fn retry_state(&self) -> RetryState {
		self.retry
	}

	/// Returns `true` once the request went through refresh handling.
	pub fn is_retried(&self) -> bool {
		self.retry == RetryState::Retrying
	}

	pub(crate) fn mark_retried(&mut self) {
		self.retry = RetryState::Retrying;
	}

	/// Resolves the request against `url`, copying headers and body for dispatch.
	pub(crate) fn to_transport(&self, mut url: Url) -> TransportRequest {
		if !self.query.is_empty() {
			url.query_pairs_mut().extend_pairs(self.query.iter());
		}

		TransportRequest {
			method: self.method.clone(),
			path: self.path.clone(),
			url,
			headers: self.headers.clone(),
			body: self.body.clone(),
		}
	}
}

/// Fully-resolved request handed to an [`ApiTransport`].
#[derive(Clone, Debug)]
pub struct TransportRequest {
	/// HTTP method.
	pub method: Method,
	/// API-relative path, kept for diagnostics.
	pub path: String,
	/// Absolute URL including query parameters.
	pub url: Url,
	/// Final header set, including the bearer credential when one applies.
	pub headers: HeaderMap,
	/// Raw body bytes.
	pub body: Option<Vec<u8>>,
}
impl TransportRequest {
	/// Returns the bearer token attached to the request, if any.
	pub fn bearer_token(&self) -> Option<&str> {
		self.headers.get(AUTHORIZATION)?.to_str().ok()?.strip_prefix("Bearer ")
	}
}

/// Buffered HTTP response.
#[derive(Clone, Debug)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: StatusCode,
	/// Response headers.
	pub headers: HeaderMap,
	/// Raw body bytes.
	pub body: Vec<u8>,
	/// API-relative path of the originating request.
	pub path: String,
}
impl ApiResponse {
	/// Creates a response with an empty header map.
	pub fn new(status: StatusCode, path: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
		Self { status, headers: HeaderMap::new(), body: body.into(), path: path.into() }
	}

	/// Reads `x-total-count`; a missing or malformed header counts as zero.
	pub fn total_count(&self) -> u64 {
		self.headers
			.get(TOTAL_COUNT_HEADER)
			.and_then(|value| value.to_str().ok())
			.and_then(|raw| raw.trim().parse().ok())
			.unwrap_or(0)
	}

	/// Decodes the body as `T`, reporting the failing field path on mismatch.
	pub fn json<T>(&self) -> Result<T, DecodeError>
	where
		T: DeserializeOwned,
	{
		let de = &mut serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(de)
			.map_err(|source| DecodeError::Body { path: self.path.clone(), source })
	}

	/// Converts non-success statuses into [`Error::Api`].
	pub fn error_for_status(self) -> Result<Self> {
		if self.status.is_success() {
			return Ok(self);
		}

		Err(Error::Api {
			status: self.status.as_u16(),
			message: self.error_message(),
			path: self.path,
		})
	}

	fn error_message(&self) -> String {
		#[derive(Deserialize)]
		struct ErrorBody {
			message: Option<String>,
		}

		serde_json::from_slice::<ErrorBody>(&self.body)
			.ok()
			.and_then(|body| body.message)
			.filter(|message| !message.is_empty())
			.unwrap_or_else(|| {
				self.status.canonical_reason().unwrap_or("Unknown status").to_owned()
			})
	}
}

pub(crate) fn bearer_value(token: &str) -> Result<HeaderValue, ConfigError> {
	let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
		.map_err(|_| ConfigError::InvalidHeader { name: "authorization" })?;

	value.set_sensitive(true);

	Ok(value)
}

/// Thin wrapper around [`reqwest::Client`] so shared HTTP behavior lives in one place.
///
/// [`ReqwestTransport::from_config`] enables the cookie store: the backend keeps the refresh
/// credential in an HTTP-only cookie, so every call must carry cookies the same way a browser
/// does for credentialed cross-origin requests.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub reqwest::Client);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Builds a transport honoring the configured timeout and user agent.
	pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
		let mut builder = reqwest::Client::builder().timeout(config.timeout).cookie_store(true);

		if let Some(agent) = &config.user_agent {
			builder = builder.user_agent(agent.as_str());
		}

		Ok(Self(builder.build()?))
	}

	/// Wraps an existing reqwest client.
	pub fn with_client(client: reqwest::Client) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl ApiTransport for ReqwestTransport {
	fn execute(&self, request: TransportRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			let TransportRequest { method, path, url, headers, body } = request;
			let mut builder = self.0.request(method, url).headers(headers);

			if let Some(body) = body {
				builder = builder.body(body);
			}

			let response = builder.send().await.map_err(|e| map_reqwest_error(&path, e))?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let body = response.bytes().await.map_err(|e| map_reqwest_error(&path, e))?.to_vec();

			Ok(ApiResponse { status, headers, body, path })
		})
	}
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(path: &str, e: reqwest::Error) -> TransportError {
	if e.is_timeout() {
		TransportError::Timeout { path: path.to_owned() }
	} else {
		TransportError::network(path, e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn response_with_count(raw: &str) -> ApiResponse {
		let mut response = ApiResponse::new(StatusCode::OK, "posts", "{}");

		response.headers.insert(
			TOTAL_COUNT_HEADER,
			HeaderValue::from_str(raw).expect("Header fixture should be valid."),
		);

		response
	}

	#[test]
	fn total_count_defaults_to_zero() {
		assert_eq!(response_with_count("42").total_count(), 42);
		assert_eq!(response_with_count("not-a-number").total_count(), 0);
		assert_eq!(ApiResponse::new(StatusCode::OK, "posts", "{}").total_count(), 0);
	}

	#[test]
	fn error_for_status_prefers_envelope_message() {
		let body = r#"{"success":false,"message":"Post not found","data":null}"#;
		let err = ApiResponse::new(StatusCode::NOT_FOUND, "posts/9", body)
			.error_for_status()
			.expect_err("404 should surface as an error.");

		match err {
			Error::Api { status, path, message } => {
				assert_eq!(status, 404);
				assert_eq!(path, "posts/9");
				assert_eq!(message, "Post not found");
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}

		let err = ApiResponse::new(StatusCode::UNAUTHORIZED, "posts", "")
			.error_for_status()
			.expect_err("401 should surface as an error.");

		assert!(err.to_string().contains("Unauthorized"));
	}

	#[test]
	fn request_resolves_query_and_bearer() {
		let request = ApiRequest::get("notifications")
			.query("page", 0)
			.query_opt("keyword", None::<&str>)
			.query("sort", "createdAt,desc")
			.bearer("token-1")
			.expect("Bearer header should be valid.");
		let url = Url::parse("https://blog.example/api/v1/notifications")
			.expect("URL fixture should parse.");
		let resolved = request.to_transport(url);

		assert_eq!(
			resolved.url.as_str(),
			"https://blog.example/api/v1/notifications?page=0&sort=createdAt%2Cdesc"
		);
		assert_eq!(resolved.bearer_token(), Some("token-1"));
		assert_eq!(request.retry_state(), RetryState::Fresh);
	}

	#[test]
	fn json_body_sets_content_type() {
		let request = ApiRequest::post("auth/login")
			.json(&serde_json::json!({ "email": "a@b.c" }))
			.expect("JSON body should serialize.");

		assert_eq!(
			request.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok()),
			Some("application/json"),
		);
	}
}
