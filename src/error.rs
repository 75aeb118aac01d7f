//! Client-level error types shared by the credential manager, executor, and pagination driver.

// self
use crate::{_prelude::*, classify::ApiError};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// Callers always receive one of: a structured API error carrying the remote diagnostic, a retry
/// exhaustion, a cancellation, or a local/transport failure with context.
#[derive(Debug, ThisError)]
pub enum Error {
	/// The service rejected the call with a non-retryable status.
	#[error(transparent)]
	Api(Box<ApiError>),
	/// The token endpoint rejected the refresh-token grant.
	#[error("Token refresh was rejected: {0}")]
	Refresh(Box<ApiError>),
	/// The retry budget ran out before a successful response.
	#[error(transparent)]
	RetryExhausted(#[from] RetryExhaustedError),
	/// The caller cancelled the operation.
	#[error("Operation was cancelled.")]
	Cancelled,
	/// Local configuration or request construction problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// A successful response body did not match the expected payload shape.
	#[error("Response body with status {status} could not be decoded.")]
	Decode {
		/// Path-aware decoding failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status of the decoded response.
		status: u16,
	},
}
impl Error {
	/// Returns the classified API error when the failure carries one.
	pub fn api_error(&self) -> Option<&ApiError> {
		match self {
			Self::Api(err) | Self::Refresh(err) => Some(err),
			Self::RetryExhausted(err) => err.last_error.as_deref(),
			_ => None,
		}
	}

	/// Returns `true` when the failure stems from cancellation.
	pub fn is_cancelled(&self) -> bool {
		matches!(self, Self::Cancelled)
	}
}
impl From<ApiError> for Error {
	fn from(e: ApiError) -> Self {
		Self::Api(Box::new(e))
	}
}

/// Raised when the attempt limit is reached without a successful response.
#[derive(Debug, ThisError)]
#[error(
	"SP-API retry budget exhausted after {attempts} attempts with {backoff:?} backoff{}",
	.last_error.as_ref().map(|e| format!(": {e}")).unwrap_or_default()
)]
pub struct RetryExhaustedError {
	/// Attempt limit that was exhausted.
	pub attempts: u32,
	/// Backoff slept between ordinary retries.
	pub backoff: StdDuration,
	/// Classified error returned by the final attempt, if any attempt was made.
	pub last_error: Option<Box<ApiError>>,
}

/// Configuration and request construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// A configured endpoint URL is invalid.
	#[error("Endpoint URL is invalid.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: oauth2::url::ParseError,
	},
	/// A request path could not be joined onto the API endpoint.
	#[error("Request path `{path}` cannot be joined onto the API endpoint.")]
	InvalidPath {
		/// Offending path.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A timestamp query parameter could not be formatted.
	#[error("Timestamp could not be formatted as RFC 3339.")]
	InvalidTimestamp(#[from] time::error::Format),
	/// Request body could not be serialized.
	#[error("Request body could not be serialized.")]
	EncodeBody(#[source] serde_json::Error),
	/// Client configuration failed validation.
	#[error(transparent)]
	Build(#[from] crate::config::ConfigBuildError),
	/// Token builder validation failed.
	#[error("Unable to build token.")]
	TokenBuild(#[from] crate::auth::TokenBuilderError),
	/// Token endpoint response omitted `expires_in`.
	#[error("Token endpoint response is missing expires_in.")]
	MissingExpiresIn,
	/// Token endpoint returned an excessively large `expires_in`.
	#[error("The expires_in value exceeds the supported range.")]
	ExpiresInOutOfRange,
	/// Token endpoint returned a non-positive duration.
	#[error("The expires_in value must be positive.")]
	NonPositiveExpiresIn,
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the service.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the service.")]
	Io(#[from] std::io::Error),
	/// Transport reported a failure without a typed source.
	#[error("HTTP client error occurred while calling the service: {message}.")]
	Other {
		/// Transport-supplied message.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
