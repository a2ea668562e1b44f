//! Endpoint descriptor for the platform's per-service hosts.
//!
//! Each upstream concern lives on its own host in production; [`PlatformEndpoints`]
//! names them all in one place and builds the concrete request URLs the flows issue.
//! [`PlatformEndpoints::single_host`] collapses every service onto one base so tests
//! can drive a single mock server—the path shapes stay identical to production.

// self
use crate::_prelude::*;

/// Per-service base URLs for every upstream dependency of the broker.
#[derive(Clone, Debug)]
pub struct PlatformEndpoints {
	/// Authentication service (logout, ticket mint/redeem, account PIN).
	pub auth: Url,
	/// Users service (authenticated identity, user details).
	pub users: Url,
	/// Economy service (currency balance).
	pub economy: Url,
	/// Premium features service (subscription probe).
	pub premium_features: Url,
	/// Thumbnails service (avatar portrait).
	pub thumbnails: Url,
	/// Billing service (store credit).
	pub billing: Url,
	/// Two-step verification service (metadata).
	pub two_step: Url,
	/// Inventory service (collectible holdings).
	pub inventory: Url,
	/// Main site (account settings lookups).
	pub account_settings: Url,
}
impl PlatformEndpoints {
	/// Points every service at a single base, used to drive mock servers in tests.
	pub fn single_host(base: Url) -> Self {
		Self {
			auth: base.clone(),
			users: base.clone(),
			economy: base.clone(),
			premium_features: base.clone(),
			thumbnails: base.clone(),
			billing: base.clone(),
			two_step: base.clone(),
			inventory: base.clone(),
			account_settings: base,
		}
	}

	/// Logout endpoint, provoked deliberately to harvest an anti-forgery token.
	pub fn logout(&self) -> String {
		format!("{}v2/logout", self.auth)
	}

	/// Ticket-issuance endpoint.
	pub fn authentication_ticket(&self) -> String {
		format!("{}v1/authentication-ticket", self.auth)
	}

	/// Ticket-redemption endpoint.
	pub fn ticket_redemption(&self) -> String {
		format!("{}v1/authentication-ticket/redeem", self.auth)
	}

	/// Authenticated identity lookup.
	pub fn authenticated_user(&self) -> String {
		format!("{}v1/users/authenticated", self.users)
	}

	/// Public user details (creation timestamp).
	pub fn user_details(&self, user_id: u64) -> String {
		format!("{}v1/users/{user_id}", self.users)
	}

	/// Account country-of-origin lookup.
	pub fn account_country(&self) -> String {
		format!("{}account/settings/account-country", self.account_settings)
	}

	/// Currency balance lookup.
	pub fn currency(&self, user_id: u64) -> String {
		format!("{}v1/users/{user_id}/currency", self.economy)
	}

	/// Account PIN status lookup.
	pub fn account_pin(&self) -> String {
		format!("{}v1/account/pin", self.auth)
	}

	/// Two-step verification metadata lookup.
	pub fn two_step_metadata(&self) -> String {
		format!("{}v1/metadata", self.two_step)
	}

	/// Subscription-only endpoint probed to infer premium membership.
	pub fn subscriptions(&self, user_id: u64) -> String {
		format!("{}v1/users/{user_id}/subscriptions", self.premium_features)
	}

	/// Store-credit balance lookup.
	pub fn credit(&self) -> String {
		format!("{}v1/credit", self.billing)
	}

	/// Avatar portrait lookup, fixed to the 720x720 PNG rendition.
	pub fn avatar_thumbnail(&self, user_id: u64) -> String {
		format!(
			"{}v1/users/avatar?userIds={user_id}&size=720x720&format=Png&isCircular=false",
			self.thumbnails,
		)
	}

	/// One collectible-inventory page. An empty `cursor` requests the first page.
	pub fn collectibles(&self, user_id: u64, cursor: &str) -> String {
		format!(
			"{}v1/users/{user_id}/assets/collectibles?sortOrder=Asc&limit=100&cursor={cursor}",
			self.inventory,
		)
	}
}
impl Default for PlatformEndpoints {
	fn default() -> Self {
		Self {
			auth: known_host("https://auth.roblox.com"),
			users: known_host("https://users.roblox.com"),
			economy: known_host("https://economy.roblox.com"),
			premium_features: known_host("https://premiumfeatures.roblox.com"),
			thumbnails: known_host("https://thumbnails.roblox.com"),
			billing: known_host("https://billing.roblox.com"),
			two_step: known_host("https://twostepverification.roblox.com"),
			inventory: known_host("https://inventory.roblox.com"),
			account_settings: known_host("https://www.roblox.com"),
		}
	}
}

fn known_host(value: &'static str) -> Url {
	value.parse().expect("Hardcoded host URL should parse successfully.")
}
