//! Session/ticket exchange broker and account profile aggregator for the Roblox web
//! APIs—mint and redeem one-time authentication tickets from a session cookie, and fan
//! out to the account endpoints to assemble one composite profile per call.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod error;
pub mod flows;
pub mod format;
pub mod http;
pub mod obs;
pub mod platform;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{flows::SessionBroker, http::AuthorizedClient, platform::PlatformEndpoints};

	/// Builds an endpoint descriptor pointing every upstream service at one mock host.
	pub fn test_endpoints(base: &str) -> PlatformEndpoints {
		let base = Url::parse(base).expect("Failed to parse mock server base URL.");

		PlatformEndpoints::single_host(base)
	}

	/// Constructs a [`SessionBroker`] wired to a mock server base URL with the crate's
	/// default transport.
	pub fn build_test_broker(base: &str) -> SessionBroker {
		SessionBroker::with_http_client(test_endpoints(base), AuthorizedClient::default())
	}
}

mod _prelude {
	pub use std::{
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
	};

	pub use reqwest::{
		Client as ReqwestClient, Error as ReqwestError, StatusCode, header::HeaderMap,
	};
	pub use serde::Deserialize;
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use {httpmock as _, tokio as _};
