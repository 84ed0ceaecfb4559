//! Client configuration: API base URL, request timeout, and transport identity.

// self
use crate::{_prelude::*, error::ConfigError};

/// Immutable settings shared by the transport, the session, and the API client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
	/// Absolute API base (always ends with `/`), e.g. `https://blog.example/api/v1/`.
	pub base_url: Url,
	/// Per-request timeout applied by the transport.
	pub timeout: Duration,
	/// Optional `User-Agent` sent with every request.
	pub user_agent: Option<String>,
}
impl ClientConfig {
	/// Default API prefix appended to the origin.
	pub const DEFAULT_API_PREFIX: &'static str = "/api/v1";
	/// Default per-request timeout.
	pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

	/// Starts a builder for the provided backend origin.
	pub fn builder(origin: Url) -> ClientConfigBuilder {
		ClientConfigBuilder::new(origin)
	}

	/// Resolves an API-relative path (e.g. `posts/7`) against the base URL.
	///
	/// Leading slashes are stripped so the API prefix is never discarded by the join.
	pub fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
		let relative = path.trim_start_matches('/');

		self.base_url
			.join(relative)
			.map_err(|source| ConfigError::InvalidPath { path: path.to_owned(), source })
	}
}

/// Builder for [`ClientConfig`] values.
#[derive(Debug)]
pub struct ClientConfigBuilder {
	/// Backend origin, e.g. `https://blog.example`.
	pub origin: Url,
	/// Path prefix of the REST API.
	pub api_prefix: String,
	/// Per-request timeout.
	pub timeout: Duration,
	/// Optional `User-Agent` header value.
	pub user_agent: Option<String>,
}
impl ClientConfigBuilder {
	/// Creates a new builder seeded with defaults for the provided origin.
	pub fn new(origin: Url) -> Self {
		Self {
			origin,
			api_prefix: ClientConfig::DEFAULT_API_PREFIX.into(),
			timeout: ClientConfig::DEFAULT_TIMEOUT,
			user_agent: None,
		}
	}

	/// Overrides the API prefix (defaults to `/api/v1`).
	pub fn api_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.api_prefix = prefix.into();

		self
	}

	/// Overrides the per-request timeout (defaults to 10 seconds).
	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Sets the `User-Agent` header value.
	pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = Some(user_agent.into());

		self
	}

	/// Validates the inputs and produces a [`ClientConfig`].
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		if !matches!(self.origin.scheme(), "http" | "https") {
			return Err(ConfigError::UnsupportedScheme { scheme: self.origin.scheme().into() });
		}
		if self.origin.cannot_be_a_base() {
			return Err(ConfigError::CannotBeABase { url: self.origin.to_string() });
		}
		if self.timeout.is_zero() {
			return Err(ConfigError::ZeroTimeout);
		}

		let prefix = self.api_prefix.trim_matches('/');
		let base = if prefix.is_empty() { String::from("/") } else { format!("/{prefix}/") };
		let base_url =
			self.origin.join(&base).map_err(|source| ConfigError::InvalidBaseUrl { source })?;

		Ok(ClientConfig { base_url, timeout: self.timeout, user_agent: self.user_agent })
	}
}
