//! Account aggregation: one authenticated identity lookup, then field-by-field fetches
//! folded into a single profile snapshot.
//!
//! Registration is the only step allowed to fail fatally—without an identity there is
//! no meaningful partial profile. Every field fetch afterwards propagates its failure
//! and aborts the aggregation, with one exception: the premium probe, whose rejection
//! is the signal that the account holds no subscription.

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::SessionCredential,
	flows::SessionBroker,
	format,
	obs::{FlowKind, FlowSpan},
};

impl SessionBroker {
	/// Performs the authenticated identity lookup and binds an aggregator to the
	/// credential.
	///
	/// This is the one required-to-succeed call of the aggregation flow; any failure
	/// here surfaces as [`Error::Identity`].
	pub async fn register(&self, credential: SessionCredential) -> Result<AccountAggregator> {
		let span = FlowSpan::new(FlowKind::Aggregate, "register");
		let user: AuthenticatedUser = span
			.instrument(self.http_client.get_json(
				"authenticated-user",
				&self.endpoints.authenticated_user(),
				&credential,
			))
			.await
			.map_err(Error::identity)?;

		Ok(AccountAggregator {
			broker: self.clone(),
			credential,
			identity: AccountIdentity {
				user_id: user.id,
				username: user.name,
				display_name: user.display_name,
			},
		})
	}
}

/// Canonical identity obtained from the required authenticated lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountIdentity {
	/// Canonical numeric user id, keying every id-scoped field fetch.
	pub user_id: u64,
	/// Account handle.
	pub username: String,
	/// Display name.
	pub display_name: String,
}

/// Aggregated account snapshot.
///
/// Constructed once per [`AccountAggregator::collect_profile`] call, immutable after
/// construction, never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct AccountProfile {
	/// Account handle.
	pub username: String,
	/// Canonical numeric user id.
	pub user_id: u64,
	/// Display name.
	pub display_name: String,
	/// Portrait URL of the first avatar thumbnail rendition.
	pub avatar_url: String,
	/// Account creation timestamp, rendered in the long `en-US` form.
	pub created_at: String,
	/// Country of origin.
	pub country: String,
	/// Currency balance in Robux.
	pub balance: i64,
	/// Whether two-step verification is enabled.
	pub two_step_enabled: bool,
	/// Whether an account PIN is enabled.
	pub pin_enabled: bool,
	/// Premium membership, inferred from the subscription probe.
	pub premium: bool,
	/// Store-credit balance, currency-formatted.
	pub credit_balance: String,
	/// Recent-average-price total across the full collectible inventory.
	pub rap: u64,
}

/// Aggregates one account's attributes under a single unit of work.
///
/// Obtained from [`SessionBroker::register`]. Holds the session credential for the
/// duration of the aggregation and nothing longer; the credential is never persisted.
#[derive(Clone, Debug)]
pub struct AccountAggregator {
	broker: SessionBroker,
	credential: SessionCredential,
	identity: AccountIdentity,
}
impl AccountAggregator {
	/// Identity captured at registration.
	pub fn identity(&self) -> &AccountIdentity {
		&self.identity
	}

	/// Assembles the complete profile, awaiting each field fetch in sequence.
	///
	/// Any failure on a required field fails the whole call—no partial profile is
	/// returned. Only the premium probe is absorbed, into `premium = false`.
	pub async fn collect_profile(&self) -> Result<AccountProfile> {
		let span = FlowSpan::new(FlowKind::Aggregate, "collect_profile");

		span.instrument(async move {
			let country = self.account_country().await?;
			let balance = self.currency_balance().await?;
			let pin_enabled = self.pin_enabled().await?;
			let two_step_enabled = self.two_step_enabled().await?;
			let premium = self.premium_status().await;
			let credit_balance = self.credit_balance().await?;
			let avatar_url = self.avatar_url().await?;
			let created_at = self.created_at().await?;
			let rap = self.collectibles_rap().await?;

			Ok(AccountProfile {
				username: self.identity.username.clone(),
				user_id: self.identity.user_id,
				display_name: self.identity.display_name.clone(),
				avatar_url,
				created_at,
				country,
				balance,
				two_step_enabled,
				pin_enabled,
				premium,
				credit_balance,
				rap,
			})
		})
		.await
	}

	async fn get_json<T>(&self, endpoint: &'static str, url: &str) -> Result<T>
	where
		T: DeserializeOwned,
	{
		self.broker.http_client.get_json(endpoint, url, &self.credential).await
	}

	async fn account_country(&self) -> Result<String> {
		let country: AccountCountry =
			self.get_json("account-country", &self.broker.endpoints.account_country()).await?;

		Ok(country.country_name)
	}

	async fn currency_balance(&self) -> Result<i64> {
		let currency: CurrencyBalance = self
			.get_json("currency", &self.broker.endpoints.currency(self.identity.user_id))
			.await?;

		Ok(currency.robux)
	}

	async fn pin_enabled(&self) -> Result<bool> {
		let pin: PinStatus =
			self.get_json("account-pin", &self.broker.endpoints.account_pin()).await?;

		Ok(pin.is_enabled)
	}

	async fn two_step_enabled(&self) -> Result<bool> {
		let metadata: TwoStepMetadata =
			self.get_json("two-step-metadata", &self.broker.endpoints.two_step_metadata()).await?;

		Ok(metadata.two_step_verification_enabled)
	}

	/// Probes the subscription-only endpoint; a success of any payload means premium.
	///
	/// Every failure reads as "not premium", including transport faults—a transient
	/// fault is indistinguishable from a genuine subscription absence here. That
	/// accuracy gap is inherited upstream behavior, kept rather than reclassified.
	async fn premium_status(&self) -> bool {
		let url = self.broker.endpoints.subscriptions(self.identity.user_id);

		match self.broker.http_client.get(&url, &self.credential).await {
			Ok(response) => response.status.is_success(),
			Err(_) => false,
		}
	}

	async fn credit_balance(&self) -> Result<String> {
		let credit: CreditBalance = self.get_json("credit", &self.broker.endpoints.credit()).await?;

		Ok(format::format_usd(credit.balance))
	}

	async fn avatar_url(&self) -> Result<String> {
		let thumbnails: AvatarThumbnails = self
			.get_json(
				"avatar-thumbnail",
				&self.broker.endpoints.avatar_thumbnail(self.identity.user_id),
			)
			.await?;

		thumbnails.data.into_iter().next().map(|thumbnail| thumbnail.image_url).ok_or(
			Error::MissingArtifact {
				endpoint: "avatar-thumbnail",
				artifact: "first thumbnail entry",
			},
		)
	}

	async fn created_at(&self) -> Result<String> {
		let details: UserDetails = self
			.get_json("user-details", &self.broker.endpoints.user_details(self.identity.user_id))
			.await?;

		format::format_long_datetime(&details.created)
	}

	/// Walks the collectible-inventory cursor chain exactly once, folding
	/// recent-average-price totals.
	async fn collectibles_rap(&self) -> Result<u64> {
		let mut total = 0_u64;
		let mut cursor = PageCursor::Start;

		while let Some(request_value) = cursor.request_value() {
			let url = self.broker.endpoints.collectibles(self.identity.user_id, request_value);
			let page: InventoryPage = self.get_json("collectibles", &url).await?;

			total += page.data.iter().map(|item| item.recent_average_price).sum::<u64>();
			cursor = PageCursor::advance(page.next_page_cursor);
		}

		Ok(total)
	}
}

/// Cursor state for the collectible-inventory walk.
///
/// The wire format overloads two empty-like values: an empty cursor string requests the
/// first page, while an absent next-cursor ends the walk. Keeping three states distinct
/// avoids both failure modes of conflating them—a skipped first page and an endless
/// loop.
#[derive(Clone, Debug, PartialEq, Eq)]
enum PageCursor {
	/// First page not yet requested; the wire value is the empty string.
	Start,
	/// An opaque cursor pointing at the next page.
	Next(String),
	/// The previous page carried no next-cursor.
	End,
}
impl PageCursor {
	/// Wire value for the next fetch, or `None` once the chain is exhausted.
	fn request_value(&self) -> Option<&str> {
		match self {
			Self::Start => Some(""),
			Self::Next(cursor) => Some(cursor),
			Self::End => None,
		}
	}

	fn advance(next: Option<String>) -> Self {
		match next {
			Some(cursor) => Self::Next(cursor),
			None => Self::End,
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthenticatedUser {
	id: u64,
	name: String,
	display_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountCountry {
	country_name: String,
}

#[derive(Debug, Deserialize)]
struct CurrencyBalance {
	robux: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PinStatus {
	is_enabled: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TwoStepMetadata {
	two_step_verification_enabled: bool,
}

#[derive(Debug, Deserialize)]
struct CreditBalance {
	balance: f64,
}

#[derive(Debug, Deserialize)]
struct AvatarThumbnails {
	data: Vec<AvatarThumbnail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AvatarThumbnail {
	image_url: String,
}

#[derive(Debug, Deserialize)]
struct UserDetails {
	created: String,
}

/// One transient inventory page; discarded once its totals are folded.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InventoryPage {
	next_page_cursor: Option<String>,
	data: Vec<CollectibleItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CollectibleItem {
	recent_average_price: u64,
}
