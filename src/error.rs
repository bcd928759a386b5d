//! Gateway-level error types shared across the store, refresh, and request layers.

// self
use crate::_prelude::*;

/// Gateway-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;
type SharedError = Arc<dyn std::error::Error + Send + Sync>;

/// Canonical gateway error exposed by public APIs.
///
/// [`NoRefreshToken`](Error::NoRefreshToken), [`RefreshFailed`](Error::RefreshFailed), and
/// [`Unauthorized`](Error::Unauthorized) are terminal: the token store has already been cleared
/// when one of them reaches the caller. Every other variant leaves the session intact.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration or request construction problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Downstream response body could not be parsed as JSON.
	#[error("Response body with status {status} is not valid JSON.")]
	Decode {
		/// HTTP status code of the offending response.
		status: u16,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},

	/// A refresh was required but no refresh token is stored.
	#[error("No refresh token is available; the session has been cleared.")]
	NoRefreshToken,
	/// The refresh-token exchange failed.
	#[error("Refresh token exchange failed; the session has been cleared.")]
	RefreshFailed(#[source] RefreshError),
	/// The replayed request was rejected again after a successful refresh.
	#[error("Request was rejected after a token refresh; the session has been cleared.")]
	Unauthorized,
}
impl Error {
	/// Returns `true` when the error implies the session was cleared.
	pub fn is_terminal(&self) -> bool {
		matches!(self, Self::NoRefreshToken | Self::RefreshFailed(_) | Self::Unauthorized)
	}
}
impl From<RefreshError> for Error {
	fn from(e: RefreshError) -> Self {
		match e {
			RefreshError::NoRefreshToken => Self::NoRefreshToken,
			other => Self::RefreshFailed(other),
		}
	}
}

/// Configuration and request construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Request path cannot be joined onto the base URL.
	#[error("Request path `{path}` cannot be joined onto the base URL.")]
	InvalidPath {
		/// Path supplied by the caller.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Request path resolves outside the backend's origin or base path.
	#[error("Request path `{path}` resolves outside the backend base URL.")]
	OutsideBase {
		/// Path supplied by the caller.
		path: String,
	},
	/// Header name or value cannot be sent over HTTP.
	#[error("Header `{name}` is not a valid HTTP header.")]
	InvalidHeader {
		/// Offending header name.
		name: String,
	},
	/// JSON request body could not be serialized.
	#[error("Request body could not be serialized.")]
	SerializeBody(#[source] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO, timeouts).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the backend.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The transport gave up waiting for the backend.
	#[error("Request to the backend timed out.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the backend.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::timeout(e) } else { Self::network(e) }
	}
}

/// Outcome of a failed refresh cycle, shared verbatim with every caller that joined it.
#[derive(Clone, Debug, ThisError)]
pub enum RefreshError {
	/// The store holds no refresh token.
	#[error("No refresh token is stored.")]
	NoRefreshToken,
	/// Refresh endpoint answered with a non-success status.
	#[error("Refresh endpoint rejected the exchange with status {status}.")]
	Rejected {
		/// HTTP status code returned by the refresh endpoint.
		status: u16,
	},
	/// Refresh endpoint succeeded but the response carried no access token.
	#[error("Refresh response with status {status} did not carry an access token.")]
	MissingAccessToken {
		/// HTTP status code returned by the refresh endpoint.
		status: u16,
	},
	/// The exchange could not reach the refresh endpoint.
	#[error("Refresh exchange failed before a response was received.")]
	Transport {
		/// Underlying transport or request construction failure.
		#[source]
		source: SharedError,
	},
	/// Token store failed while reading or persisting tokens.
	#[error("Token store failed during refresh: {0}")]
	Storage(#[from] crate::store::StoreError),
}
impl RefreshError {
	/// Wraps a transport failure so it can be shared between joined callers.
	pub fn transport(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Transport { source: Arc::new(src) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::store::StoreError;

	#[test]
	fn refresh_errors_map_onto_the_terminal_taxonomy() {
		let missing: Error = RefreshError::NoRefreshToken.into();

		assert!(matches!(missing, Error::NoRefreshToken));
		assert!(missing.is_terminal());

		let rejected: Error = RefreshError::Rejected { status: 400 }.into();

		assert!(matches!(rejected, Error::RefreshFailed(RefreshError::Rejected { status: 400 })));
		assert!(rejected.is_terminal());
		assert!(Error::Unauthorized.is_terminal());
	}

	#[test]
	fn transport_and_storage_errors_are_not_terminal() {
		let io = std::io::Error::other("connection reset");

		assert!(!Error::from(TransportError::Io(io)).is_terminal());
		assert!(!Error::from(StoreError::Backend { message: "disk full".into() }).is_terminal());
	}

	#[test]
	fn shared_refresh_error_keeps_its_source() {
		let err = RefreshError::transport(std::io::Error::other("dns failure"));
		let cloned = err.clone();
		let source = std::error::Error::source(&cloned)
			.expect("Transport refresh errors should expose their source.");

		assert_eq!(source.to_string(), "dns failure");
	}
}
