//! Client-level error types shared across the session, transport, and endpoint layers.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Profile cache failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Response body did not match the expected envelope shape.
	#[error(transparent)]
	Decode(#[from] DecodeError),

	/// Backend answered with a non-success status.
	#[error("Request to {path} failed with status {status}: {message}.")]
	Api {
		/// HTTP status code returned by the backend.
		status: u16,
		/// Request path relative to the API base.
		path: String,
		/// Envelope message, or the canonical status reason when none was sent.
		message: String,
	},
	/// Token refresh failed; every request waiting on that refresh observes the same cause.
	#[error("Session refresh failed: {0}")]
	RefreshFailed(#[source] Arc<Error>),
	/// The refresh leader was dropped before the refresh settled.
	#[error("Session refresh was interrupted before it settled.")]
	RefreshInterrupted,
	/// The operation requires a signed-in session.
	#[error("No access token is available for this operation.")]
	Unauthenticated,
}
impl Error {
	/// Returns the HTTP status carried by the error, looking through refresh failures.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Api { status, .. } => Some(*status),
			Self::RefreshFailed(cause) => cause.status(),
			_ => None,
		}
	}

	/// Returns `true` when the backend rejected the credentials (HTTP 401).
	pub fn is_unauthorized(&self) -> bool {
		self.status() == Some(401)
	}
}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Origin or API prefix produced an invalid URL.
	#[error("Base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL uses a scheme other than http or https.
	#[error("Base URL must use http or https, got `{scheme}`.")]
	UnsupportedScheme {
		/// Offending scheme.
		scheme: String,
	},
	/// Base URL cannot carry path segments (e.g. `mailto:`).
	#[error("Base URL `{url}` cannot be used as a base.")]
	CannotBeABase {
		/// Offending URL.
		url: String,
	},
	/// Request timeout must be positive.
	#[error("Request timeout must be greater than zero.")]
	ZeroTimeout,
	/// Request path could not be joined onto the base URL.
	#[error("Request path `{path}` is invalid.")]
	InvalidPath {
		/// Offending path.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Request body could not be serialized.
	#[error("Request body could not be serialized.")]
	RequestBody(#[source] serde_json::Error),
	/// Header value contains characters HTTP does not allow.
	#[error("Header value for `{name}` is invalid.")]
	InvalidHeader {
		/// Header name.
		name: &'static str,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for ConfigError {
	fn from(e: reqwest::Error) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO, timeout).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {path}.")]
	Network {
		/// Request path relative to the API base.
		path: String,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The request did not complete within the configured timeout.
	#[error("Request to {path} timed out.")]
	Timeout {
		/// Request path relative to the API base.
		path: String,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred during transport.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(path: impl Into<String>, src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { path: path.into(), source: Box::new(src) }
	}
}

/// Response payload failed to decode.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Body is not the JSON shape the endpoint promises.
	#[error("Response from {path} did not match the expected shape.")]
	Body {
		/// Request path relative to the API base.
		path: String,
		/// Structured parsing failure pointing at the offending field.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Envelope decoded but its `data` field was absent or null.
	#[error("Response from {path} carried no data.")]
	MissingData {
		/// Request path relative to the API base.
		path: String,
	},
}
