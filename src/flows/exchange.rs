//! Credential exchange protocol: anti-forgery bootstrap, ticket mint, and ticket
//! redemption.
//!
//! Every operation here is total. The protocol's normal operation depends on provoking
//! rejections—the anti-forgery token only appears on a rejected request—so failures are
//! expected signal and come back as data (`None`, [`TicketOutcome::Denied`],
//! [`Redemption::Rejected`]) instead of as error values. Each operation attempts
//! exactly once; a failed attempt ends the exchange for that invocation.

// std
use std::sync::LazyLock;
// crates.io
use regex::Regex;
use reqwest::header::SET_COOKIE;
// self
use crate::{
	auth::{AuthTicket, CsrfToken, Redemption, SessionCredential, TicketOutcome},
	flows::SessionBroker,
	obs::{FlowKind, FlowSpan},
};

/// Fixed referer value the ticket-issuance endpoint requires.
const TICKET_REFERER: &str = "https://www.roblox.com/camel";
/// Header carrying the anti-forgery token, on rejection responses and mint requests
/// alike.
const CSRF_HEADER: &str = "x-csrf-token";
/// Header carrying the minted ticket on a successful issuance response.
const TICKET_HEADER: &str = "rbx-authentication-ticket";
/// Negotiation header the redemption endpoint requires in place of a session cookie.
const NEGOTIATION_HEADER: (&str, &str) = ("RBXAuthenticationNegotiation", "1");

/// Refreshed-session-cookie pattern: the fixed literal warning prefix followed by an
/// alphanumeric token. Both the prefix and the character class are upstream contract.
static REFRESHED_COOKIE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(
		r"_\|WARNING:-DO-NOT-SHARE-THIS\.--Sharing-this-will-allow-someone-to-log-in-as-you-and-to-steal-your-ROBUX-and-items\.\|_[A-Za-z0-9]+",
	)
	.expect("Refreshed-cookie pattern should compile.")
});

impl SessionBroker {
	/// Derives an anti-forgery token by provoking the logout endpoint.
	///
	/// The platform exposes no "get token" endpoint. A state-changing call issued
	/// without a token is rejected under normal enforcement, and the rejection headers
	/// carry a fresh one. An unexpected success (no enforcement triggered) or a
	/// transport fault yields `None`—a valid absent-value outcome, not an error.
	pub async fn derive_csrf_token(&self, credential: &SessionCredential) -> Option<CsrfToken> {
		let span = FlowSpan::new(FlowKind::Exchange, "derive_csrf_token");

		span.instrument(async move {
			let response = self
				.http_client
				.post(&self.endpoints.logout(), Some(credential), &[], &serde_json::json!({}))
				.await
				.ok()?;

			if response.status.is_success() {
				return None;
			}

			response.header_str(CSRF_HEADER).map(CsrfToken::new)
		})
		.await
	}

	/// Mints a one-time authentication ticket against the session credential.
	///
	/// Attaches the derived anti-forgery token (forwarded as an empty header value when
	/// absent, which the upstream may reject) and the fixed referer. Rejection,
	/// transport fault, and missing ticket header all report as
	/// [`TicketOutcome::Denied`]; this operation never raises to its caller.
	pub async fn mint_ticket(&self, credential: &SessionCredential) -> TicketOutcome {
		let span = FlowSpan::new(FlowKind::Exchange, "mint_ticket");

		span.instrument(async move {
			let csrf = self.derive_csrf_token(credential).await;
			let csrf_value = csrf.as_ref().map(CsrfToken::as_str).unwrap_or_default();
			let headers = [(CSRF_HEADER, csrf_value), ("referer", TICKET_REFERER)];
			let Ok(response) = self
				.http_client
				.post(
					&self.endpoints.authentication_ticket(),
					Some(credential),
					&headers,
					&serde_json::json!({}),
				)
				.await
			else {
				return TicketOutcome::Denied;
			};

			if !response.status.is_success() {
				return TicketOutcome::Denied;
			}

			match response.header_str(TICKET_HEADER) {
				Some(ticket) => TicketOutcome::Issued(AuthTicket::new(ticket)),
				None => TicketOutcome::Denied,
			}
		})
		.await
	}

	/// Redeems a ticket outcome for a refreshed session cookie.
	///
	/// Redemption is ticket-authenticated: no session cookie is attached, only the
	/// negotiation header. A denied outcome is still submitted—its empty ticket value
	/// fails upstream, and that rejection's body becomes the debug payload. On success
	/// the `set-cookie` headers are scanned for the refreshed-cookie pattern.
	pub async fn redeem_ticket(&self, outcome: &TicketOutcome) -> Redemption {
		let span = FlowSpan::new(FlowKind::Exchange, "redeem_ticket");

		span.instrument(async move {
			let body = serde_json::json!({ "authenticationTicket": outcome.redemption_value() });
			let Ok(response) = self
				.http_client
				.post(&self.endpoints.ticket_redemption(), None, &[NEGOTIATION_HEADER], &body)
				.await
			else {
				return Redemption::Rejected { debug: None };
			};

			if !response.status.is_success() {
				return Redemption::Rejected { debug: response.json_body() };
			}

			let blob = response
				.headers
				.get_all(SET_COOKIE)
				.iter()
				.filter_map(|value| value.to_str().ok())
				.collect::<Vec<_>>()
				.join("; ");

			Redemption::Redeemed { refreshed_cookie: extract_refreshed_cookie(&blob) }
		})
		.await
	}

	/// Full exchange: mints a ticket, then redeems it.
	///
	/// The composition short-circuits naturally—redeeming a denied outcome fails
	/// upstream and surfaces through the same [`Redemption`] shape.
	pub async fn refresh_session(&self, credential: &SessionCredential) -> Redemption {
		let outcome = self.mint_ticket(credential).await;

		self.redeem_ticket(&outcome).await
	}
}

/// Scans a `set-cookie` blob for the refreshed-session-cookie pattern.
fn extract_refreshed_cookie(blob: &str) -> Option<SessionCredential> {
	REFRESHED_COOKIE.find(blob).map(|found| SessionCredential::new(found.as_str()))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	const WARNING_PREFIX: &str = "_|WARNING:-DO-NOT-SHARE-THIS.--Sharing-this-will-allow-someone-to-log-in-as-you-and-to-steal-your-ROBUX-and-items.|_";

	#[test]
	fn extraction_finds_the_cookie_in_a_multi_cookie_blob() {
		let blob = format!(
			"GuestData=UserID=-1; path=/; RBXEventTrackerV2=CreateDate=1; \
			.ROBLOSECURITY={WARNING_PREFIX}Fr3shT0ken9; path=/; secure; HttpOnly",
		);
		let cookie =
			extract_refreshed_cookie(&blob).expect("Blob should contain a refreshed cookie.");

		assert_eq!(cookie.expose(), format!("{WARNING_PREFIX}Fr3shT0ken9"));
	}

	#[test]
	fn extraction_requires_the_exact_literal_prefix() {
		let blob = ".ROBLOSECURITY=_|WARNING:-TRUNCATED-PREFIX|_Fr3shT0ken9; path=/";

		assert!(extract_refreshed_cookie(blob).is_none());
		assert!(extract_refreshed_cookie("").is_none());
	}

	#[test]
	fn extraction_stops_at_the_alphanumeric_boundary() {
		let blob = format!("{WARNING_PREFIX}AbC123; path=/");
		let cookie =
			extract_refreshed_cookie(&blob).expect("Blob should contain a refreshed cookie.");

		assert_eq!(cookie.expose(), format!("{WARNING_PREFIX}AbC123"));
	}
}
