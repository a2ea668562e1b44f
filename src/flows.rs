//! High-level flow orchestrators: credential exchange and account aggregation.

pub mod exchange;
pub mod profile;

pub use profile::{AccountAggregator, AccountIdentity, AccountProfile};

// self
use crate::{_prelude::*, http::AuthorizedClient, platform::PlatformEndpoints};

/// Coordinates the session/ticket exchange and profile aggregation flows against one
/// endpoint descriptor.
///
/// The broker owns the HTTP client and endpoint descriptor so flow implementations can
/// focus on protocol logic (anti-forgery bootstrap, ticket redemption, paginated
/// accumulation). Invocations share nothing beyond these handles: every exchange or
/// aggregation call is an independent sequential chain of awaited network operations,
/// attempted exactly once, with no locks and no retries.
#[derive(Clone)]
pub struct SessionBroker {
	/// HTTP client wrapper used for every outbound platform request.
	pub http_client: AuthorizedClient,
	/// Endpoint descriptor naming every upstream service.
	pub endpoints: PlatformEndpoints,
}
impl SessionBroker {
	/// Creates a broker that reuses the caller-provided transport.
	pub fn with_http_client(endpoints: PlatformEndpoints, http_client: AuthorizedClient) -> Self {
		Self { http_client, endpoints }
	}

	/// Creates a broker against the production hosts with the crate's default transport.
	pub fn new() -> Self {
		Self::with_http_client(PlatformEndpoints::default(), AuthorizedClient::default())
	}
}
impl Default for SessionBroker {
	fn default() -> Self {
		Self::new()
	}
}
impl Debug for SessionBroker {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SessionBroker").field("endpoints", &self.endpoints).finish()
	}
}
