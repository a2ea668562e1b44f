//! Credential and ticket value types with redacting formatters.

// self
use crate::_prelude::*;

/// Long-lived session credential, forwarded as a cookie header value and never parsed.
///
/// The wrapper keeps the raw cookie out of logs; callers reach for [`expose`] only at
/// the transport boundary.
///
/// [`expose`]: SessionCredential::expose
#[derive(Clone, PartialEq, Eq)]
pub struct SessionCredential(String);
impl SessionCredential {
	/// Wraps a raw session cookie value.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner cookie value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Renders the `Cookie` header value expected by authorized endpoints.
	pub fn cookie_header(&self) -> String {
		format!(".ROBLOSECURITY={}", self.0)
	}
}
impl AsRef<str> for SessionCredential {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for SessionCredential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("SessionCredential").field(&"<redacted>").finish()
	}
}
impl Display for SessionCredential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Short-lived anti-forgery token harvested from a provoked rejection.
///
/// Valid for one exchange attempt; never cached or reused across calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsrfToken(String);
impl CsrfToken {
	/// Wraps a token read off a rejection response's headers.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the token as the header value it is forwarded as.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

/// Single-use authentication ticket minted against a session credential.
///
/// Redacted in logs the same way as [`SessionCredential`]—a live ticket mints a fresh
/// session.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthTicket(String);
impl AuthTicket {
	/// Wraps a ticket value extracted from the mint response header.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner ticket value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl Debug for AuthTicket {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("AuthTicket").field(&"<redacted>").finish()
	}
}
impl Display for AuthTicket {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Outcome of a ticket mint attempt.
///
/// Minting never raises to its caller: rejection, transport fault, and missing ticket
/// header all collapse into [`TicketOutcome::Denied`], failure represented as data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TicketOutcome {
	/// Upstream issued a ticket.
	Issued(AuthTicket),
	/// Upstream withheld a ticket.
	Denied,
}
impl TicketOutcome {
	/// Ticket value submitted for redemption.
	///
	/// A denied outcome redeems as the empty string; the upstream rejects it and that
	/// rejection carries the debug payload surfaced to the caller.
	pub fn redemption_value(&self) -> &str {
		match self {
			Self::Issued(ticket) => ticket.expose(),
			Self::Denied => "",
		}
	}

	/// Returns the issued ticket, if any.
	pub fn ticket(&self) -> Option<&AuthTicket> {
		match self {
			Self::Issued(ticket) => Some(ticket),
			Self::Denied => None,
		}
	}

	/// True when the mint attempt failed.
	pub fn is_denied(&self) -> bool {
		matches!(self, Self::Denied)
	}
}

/// Result of redeeming a ticket for a refreshed session cookie.
///
/// The core owns no wire format; the route layer decides how to serialize this.
#[derive(Clone, Debug)]
pub enum Redemption {
	/// Upstream accepted the ticket.
	Redeemed {
		/// Refreshed session cookie scanned out of `set-cookie`, when the pattern
		/// matched.
		refreshed_cookie: Option<SessionCredential>,
	},
	/// Upstream rejected the ticket, or the transport failed before a response.
	Rejected {
		/// Upstream error body, when one was readable.
		debug: Option<serde_json::Value>,
	},
}
impl Redemption {
	/// True when the upstream accepted the ticket.
	pub fn is_success(&self) -> bool {
		matches!(self, Self::Redeemed { .. })
	}

	/// Refreshed cookie on the success path.
	pub fn refreshed_cookie(&self) -> Option<&SessionCredential> {
		match self {
			Self::Redeemed { refreshed_cookie } => refreshed_cookie.as_ref(),
			Self::Rejected { .. } => None,
		}
	}
}
