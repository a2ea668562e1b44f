//! Broker-level error types shared by the exchange and aggregation flows.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical broker error exposed by public APIs.
///
/// The exchange flow never surfaces these to callers—its failures come back as data—so
/// every variant here belongs to the aggregation side: upstream rejections, success
/// responses missing an expected artifact, and the fatal identity lookup.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Upstream endpoint rejected the request with a non-success status.
	#[error("Upstream endpoint `{endpoint}` rejected the request with status {status}.")]
	Upstream {
		/// Endpoint label used in diagnostics.
		endpoint: &'static str,
		/// HTTP status code returned by the endpoint.
		status: u16,
		/// Truncated response body for diagnostics.
		body_preview: String,
	},
	/// Success response lacking an expected header or field.
	#[error("Response from `{endpoint}` is missing the expected {artifact}.")]
	MissingArtifact {
		/// Endpoint label used in diagnostics.
		endpoint: &'static str,
		/// Name of the absent header or field.
		artifact: &'static str,
	},
	/// Endpoint returned malformed JSON that could not be deserialized.
	#[error("Endpoint `{endpoint}` returned malformed JSON.")]
	BodyParse {
		/// Endpoint label used in diagnostics.
		endpoint: &'static str,
		/// HTTP status code carried by the malformed response.
		status: u16,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Account creation timestamp could not be parsed.
	#[error("Account creation timestamp could not be parsed.")]
	Timestamp(#[from] time::error::Parse),
	/// Account creation timestamp could not be rendered.
	#[error("Account creation timestamp could not be rendered.")]
	TimestampFormat(#[from] time::error::Format),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// The initial authenticated identity lookup failed; there is no meaningful partial
	/// profile without an identity, so aggregation terminates here.
	#[error("Authenticated identity lookup failed.")]
	Identity {
		/// Failure raised while calling the identity endpoint.
		#[source]
		source: Box<Error>,
	},
}
impl Error {
	const PREVIEW_LIMIT: usize = 256;

	/// Wraps a non-success response into [`Error::Upstream`] with a truncated body preview.
	pub(crate) fn upstream(endpoint: &'static str, status: u16, body: &[u8]) -> Self {
		let body_preview =
			String::from_utf8_lossy(body).chars().take(Self::PREVIEW_LIMIT).collect();

		Self::Upstream { endpoint, status, body_preview }
	}

	/// Marks a failure as fatal to aggregation by wrapping it into [`Error::Identity`].
	pub(crate) fn identity(source: Error) -> Self {
		Self::Identity { source: Box::new(source) }
	}
}
impl From<ReqwestError> for Error {
	fn from(e: ReqwestError) -> Self {
		TransportError::from(e).into()
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the upstream endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the upstream endpoint.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
