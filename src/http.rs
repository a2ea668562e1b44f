//! Transport primitives shared by the exchange and aggregation flows.
//!
//! [`AuthorizedClient`] is a thin wrapper around [`ReqwestClient`] that injects the
//! platform's session cookie into outbound calls. Its call primitives return an
//! [`ApiResponse`] for every HTTP-complete exchange, success or not: the exchange
//! protocol reads anti-forgery material off rejection headers, so a non-success status
//! is data here, never an error. Only transport faults (DNS, TCP, TLS) surface as
//! [`TransportError`].

// std
use std::{ops::Deref, time::Duration};
// crates.io
use reqwest::{
	Method,
	header::{CONTENT_TYPE, COOKIE},
};
use serde::de::DeserializeOwned;
// self
use crate::{_prelude::*, auth::SessionCredential, error::TransportError};

/// Bounded per-call timeout applied by the default client. A hung upstream would
/// otherwise hang the whole invocation; callers supplying their own client choose their
/// own bound.
const CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[derive(Clone)]
pub struct AuthorizedClient(pub ReqwestClient);
impl AuthorizedClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	///
	/// The crate's [`Default`] client applies a 30-second per-call timeout; a custom
	/// client should configure its own.
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Issues an authorized GET and captures the full response regardless of status.
	pub async fn get(
		&self,
		url: &str,
		credential: &SessionCredential,
	) -> Result<ApiResponse, TransportError> {
		self.dispatch(Method::GET, url, Some(credential), &[], None).await
	}

	/// Issues a POST with an optional session credential, extra headers, and a JSON
	/// body, capturing the full response regardless of status.
	pub async fn post(
		&self,
		url: &str,
		credential: Option<&SessionCredential>,
		headers: &[(&str, &str)],
		body: &serde_json::Value,
	) -> Result<ApiResponse, TransportError> {
		self.dispatch(Method::POST, url, credential, headers, Some(body)).await
	}

	/// Issues an authorized GET, requires a success status, and deserializes the body.
	///
	/// Non-success statuses map to [`Error::Upstream`] and malformed bodies to
	/// [`Error::BodyParse`] with the failing JSON path attached.
	pub async fn get_json<T>(
		&self,
		endpoint: &'static str,
		url: &str,
		credential: &SessionCredential,
	) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let response = self.get(url, credential).await?;

		if !response.status.is_success() {
			return Err(Error::upstream(endpoint, response.status.as_u16(), &response.body));
		}

		let mut deserializer = serde_json::Deserializer::from_slice(&response.body);

		serde_path_to_error::deserialize(&mut deserializer).map_err(|source| Error::BodyParse {
			endpoint,
			status: response.status.as_u16(),
			source,
		})
	}

	async fn dispatch(
		&self,
		method: Method,
		url: &str,
		credential: Option<&SessionCredential>,
		headers: &[(&str, &str)],
		body: Option<&serde_json::Value>,
	) -> Result<ApiResponse, TransportError> {
		let mut builder = self.0.request(method, url);

		if let Some(credential) = credential {
			builder = builder.header(COOKIE, credential.cookie_header());
		}

		for (name, value) in headers {
			builder = builder.header(*name, *value);
		}
		if let Some(body) = body {
			builder = builder.header(CONTENT_TYPE, "application/json").body(body.to_string());
		}

		let response = builder.send().await?;
		let status = response.status();
		let headers = response.headers().to_owned();
		let body = response.bytes().await?.to_vec();

		Ok(ApiResponse { status, headers, body })
	}
}
impl Default for AuthorizedClient {
	fn default() -> Self {
		// Builder construction only fails when the TLS backend cannot initialize.
		let client =
			ReqwestClient::builder().timeout(CALL_TIMEOUT).build().unwrap_or_default();

		Self(client)
	}
}
impl AsRef<ReqwestClient> for AuthorizedClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for AuthorizedClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

/// Captured HTTP exchange: status, headers, and raw body.
///
/// Present for failure responses too—callers downstream decide whether a non-success
/// status is an error or expected signal.
#[derive(Clone, Debug)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: StatusCode,
	/// Response headers, readable on success and failure alike.
	pub headers: HeaderMap,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Returns the named header as a string, when present and valid UTF-8.
	pub fn header_str(&self, name: &str) -> Option<&str> {
		self.headers.get(name)?.to_str().ok()
	}

	/// Parses the body as arbitrary JSON, when possible.
	pub fn json_body(&self) -> Option<serde_json::Value> {
		serde_json::from_slice(&self.body).ok()
	}
}
