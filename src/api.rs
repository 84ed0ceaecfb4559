//! Typed wrappers over the blog REST endpoints.
//!
//! Every endpoint answers with an [`Envelope`] whose `data` field carries the payload; list
//! endpoints additionally report the total element count through `x-total-count`, surfaced as
//! [`Page::total_count`]. Wrappers live in `impl ApiClient` blocks per resource so each call
//! goes through the bearer decoration and refresh interceptor.

pub mod auth;
pub mod comments;
pub mod members;
pub mod notifications;
pub mod posts;

pub use auth::*;
pub use comments::*;
pub use members::*;
pub use notifications::*;
pub use posts::*;

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	client::ApiClient,
	error::DecodeError,
	http::{ApiRequest, ApiResponse, ApiTransport},
};

/// Response wrapper shared by every backend endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
	/// Backend success flag.
	#[serde(default)]
	pub success: bool,
	/// Human-readable status message.
	#[serde(default)]
	pub message: Option<String>,
	/// Actual payload.
	pub data: Option<T>,
}
impl<T> Envelope<T> {
	/// Unwraps the payload, treating a missing or null `data` field as a decode failure.
	pub fn into_data(self, path: &str) -> Result<T, DecodeError> {
		self.data.ok_or_else(|| DecodeError::MissingData { path: path.to_owned() })
	}
}

/// One page of a paginated list endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page<T> {
	/// Items on this page.
	pub items: Vec<T>,
	/// Total number of items across all pages, read from `x-total-count`.
	pub total_count: u64,
}
impl<T> Page<T> {
	/// Number of pages needed to show `total_count` items `size` at a time.
	pub fn total_pages(&self, size: u32) -> u64 {
		if size == 0 {
			return 0;
		}

		self.total_count.div_ceil(u64::from(size))
	}
}
impl<T> Default for Page<T> {
	fn default() -> Self {
		Self { items: Vec::new(), total_count: 0 }
	}
}

/// Offset pagination parameters understood by the backend (`page`, `size`, `sort`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageRequest {
	/// Zero-based page index.
	pub page: Option<u32>,
	/// Page size.
	pub size: Option<u32>,
	/// Sort expression, e.g. `createdAt,desc`.
	pub sort: Option<String>,
}
impl PageRequest {
	/// Creates a request for `page` of `size` items.
	pub fn new(page: u32, size: u32) -> Self {
		Self { page: Some(page), size: Some(size), sort: None }
	}

	/// Sets the sort expression.
	pub fn sorted_by(mut self, sort: impl Into<String>) -> Self {
		self.sort = Some(sort.into());

		self
	}

	pub(crate) fn apply(&self, request: ApiRequest) -> ApiRequest {
		request
			.query_opt("page", self.page)
			.query_opt("size", self.size)
			.query_opt("sort", self.sort.as_deref())
	}
}

pub(crate) fn decode_data<T>(response: &ApiResponse) -> Result<T>
where
	T: DeserializeOwned,
{
	let envelope: Envelope<T> = response.json()?;

	Ok(envelope.into_data(&response.path)?)
}

impl<C> ApiClient<C>
where
	C: ?Sized + ApiTransport,
{
	/// Sends `request` and unwraps the envelope payload.
	pub async fn fetch_data<T>(&self, request: ApiRequest) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let response = self.send(request).await?;

		decode_data(&response)
	}

	/// Sends `request` and returns the envelope payload, which may be absent.
	pub async fn fetch_optional<T>(&self, request: ApiRequest) -> Result<Option<T>>
	where
		T: DeserializeOwned,
	{
		let response = self.send(request).await?;
		let envelope: Envelope<T> = response.json()?;

		Ok(envelope.data)
	}

	/// Sends `request` and returns the payload list together with `x-total-count`.
	///
	/// A null or missing `data` field on a list endpoint is read as an empty page.
	pub async fn fetch_page<T>(&self, request: ApiRequest) -> Result<Page<T>>
	where
		T: DeserializeOwned,
	{
		let response = self.send(request).await?;
		let envelope: Envelope<Vec<T>> = response.json()?;

		Ok(Page { items: envelope.data.unwrap_or_default(), total_count: response.total_count() })
	}

	/// Sends `request` and discards the payload.
	pub async fn fetch_ack(&self, request: ApiRequest) -> Result<()> {
		self.send(request).await.map(|_| ())
	}
}
