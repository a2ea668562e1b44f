// crates.io
use httpmock::{Mock, prelude::*};
// self
use rbx_session_broker::{
	auth::SessionCredential,
	error::Error,
	flows::{AccountProfile, SessionBroker},
	http::AuthorizedClient,
	platform::PlatformEndpoints,
	url::Url,
};

const COOKIE: &str = "aggregation-session-cookie";
const USER_ID: u64 = 1234;

fn build_broker(server: &MockServer) -> SessionBroker {
	let base = Url::parse(&server.base_url()).expect("Mock server base URL should parse.");

	SessionBroker::with_http_client(
		PlatformEndpoints::single_host(base),
		AuthorizedClient::default(),
	)
}

fn cookie_header() -> String {
	format!(".ROBLOSECURITY={COOKIE}")
}

async fn mock_identity(server: &MockServer) -> Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/users/authenticated").header("cookie", cookie_header());
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"id":1234,"name":"builderman","displayName":"Builderman"}"#);
		})
		.await
}

/// Mounts every single-lookup field endpoint; collectible pages are mounted per test.
async fn mount_field_fixture(server: &MockServer, country_status: u16, premium_status: u16) {
	server
		.mock_async(move |when, then| {
			when.method(GET).path("/account/settings/account-country");
			then.status(country_status)
				.header("content-type", "application/json")
				.body(r#"{"countryName":"United States"}"#);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path(format!("/v1/users/{USER_ID}/currency"));
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"robux":250}"#);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/account/pin");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"isEnabled":true}"#);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/metadata");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"twoStepVerificationEnabled":false}"#);
		})
		.await;
	server
		.mock_async(move |when, then| {
			when.method(GET).path(format!("/v1/users/{USER_ID}/subscriptions"));
			then.status(premium_status)
				.header("content-type", "application/json")
				.body(r#"{"subscriptionProductModel":null}"#);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/credit");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"balance":1234.5}"#);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/users/avatar").query_param("userIds", USER_ID.to_string());
			then.status(200).header("content-type", "application/json").body(
				r#"{"data":[{"targetId":1234,"state":"Completed","imageUrl":"https://tr.rbxcdn.com/avatar-720.png"}]}"#,
			);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path(format!("/v1/users/{USER_ID}"));
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"id":1234,"name":"builderman","created":"2006-06-02T15:04:05.000Z"}"#);
		})
		.await;
}

async fn mock_collectibles_page<'a>(
	server: &'a MockServer,
	cursor: &str,
	next: Option<&str>,
	prices: &[u64],
) -> Mock<'a> {
	let cursor = cursor.to_string();
	let next_value = next.map_or_else(|| "null".to_string(), |value| format!("\"{value}\""));
	let data = prices
		.iter()
		.map(|price| {
			format!(r#"{{"userAssetId":1,"assetId":10,"name":"Item","recentAveragePrice":{price}}}"#)
		})
		.collect::<Vec<_>>()
		.join(",");
	let body =
		format!(r#"{{"previousPageCursor":null,"nextPageCursor":{next_value},"data":[{data}]}}"#);

	server
		.mock_async(move |when, then| {
			when.method(GET)
				.path(format!("/v1/users/{USER_ID}/assets/collectibles"))
				.query_param("sortOrder", "Asc")
				.query_param("cursor", cursor);
			then.status(200).header("content-type", "application/json").body(body);
		})
		.await
}

#[tokio::test]
async fn aggregation_assembles_the_complete_profile() {
	let server = MockServer::start_async().await;
	let broker = build_broker(&server);
	let identity = mock_identity(&server).await;

	mount_field_fixture(&server, 200, 200).await;
	mock_collectibles_page(&server, "", Some("page-2"), &[100, 40]).await;
	mock_collectibles_page(&server, "page-2", None, &[60]).await;

	let aggregator = broker
		.register(SessionCredential::new(COOKIE))
		.await
		.expect("Registration should succeed against the identity fixture.");

	identity.assert_async().await;

	assert_eq!(aggregator.identity().user_id, USER_ID);

	let profile =
		aggregator.collect_profile().await.expect("Full aggregation fixture should succeed.");

	assert_eq!(
		profile,
		AccountProfile {
			username: "builderman".into(),
			user_id: USER_ID,
			display_name: "Builderman".into(),
			avatar_url: "https://tr.rbxcdn.com/avatar-720.png".into(),
			created_at: "June 2, 2006 at 3:04:05 PM UTC".into(),
			country: "United States".into(),
			balance: 250,
			two_step_enabled: false,
			pin_enabled: true,
			premium: true,
			credit_balance: "$1,234.50".into(),
			rap: 200,
		},
	);
}

#[tokio::test]
async fn pagination_walks_each_page_exactly_once() {
	let server = MockServer::start_async().await;
	let broker = build_broker(&server);

	mock_identity(&server).await;
	mount_field_fixture(&server, 200, 200).await;

	let first = mock_collectibles_page(&server, "", Some("page-2"), &[10]).await;
	let second = mock_collectibles_page(&server, "page-2", Some("page-3"), &[20, 30]).await;
	let third = mock_collectibles_page(&server, "page-3", None, &[40]).await;
	let profile = broker
		.register(SessionCredential::new(COOKIE))
		.await
		.expect("Registration should succeed against the identity fixture.")
		.collect_profile()
		.await
		.expect("Three-page aggregation fixture should succeed.");

	assert_eq!(profile.rap, 100);

	first.assert_calls_async(1).await;
	second.assert_calls_async(1).await;
	third.assert_calls_async(1).await;
}

#[tokio::test]
async fn empty_initial_cursor_still_fetches_the_first_page() {
	let server = MockServer::start_async().await;
	let broker = build_broker(&server);

	mock_identity(&server).await;
	mount_field_fixture(&server, 200, 200).await;

	let only_page = mock_collectibles_page(&server, "", None, &[]).await;
	let profile = broker
		.register(SessionCredential::new(COOKIE))
		.await
		.expect("Registration should succeed against the identity fixture.")
		.collect_profile()
		.await
		.expect("Single-empty-page aggregation fixture should succeed.");

	assert_eq!(profile.rap, 0);

	only_page.assert_calls_async(1).await;
}

#[tokio::test]
async fn premium_probe_failure_reads_as_not_premium() {
	let server = MockServer::start_async().await;
	let broker = build_broker(&server);

	mock_identity(&server).await;
	mount_field_fixture(&server, 200, 403).await;
	mock_collectibles_page(&server, "", None, &[25]).await;

	let profile = broker
		.register(SessionCredential::new(COOKIE))
		.await
		.expect("Registration should succeed against the identity fixture.")
		.collect_profile()
		.await
		.expect("A rejected premium probe must not fail the aggregation.");

	assert!(!profile.premium);
	assert_eq!(profile.rap, 25);
}

#[tokio::test]
async fn required_field_failure_fails_the_whole_aggregation() {
	let server = MockServer::start_async().await;
	let broker = build_broker(&server);

	mock_identity(&server).await;
	mount_field_fixture(&server, 500, 200).await;
	mock_collectibles_page(&server, "", None, &[]).await;

	let err = broker
		.register(SessionCredential::new(COOKIE))
		.await
		.expect("Registration should succeed against the identity fixture.")
		.collect_profile()
		.await
		.expect_err("A rejected required field must fail the aggregation.");

	assert!(matches!(
		err,
		Error::Upstream { endpoint: "account-country", status: 500, .. },
	));
}

#[tokio::test]
async fn identity_failure_is_fatal_to_aggregation() {
	let server = MockServer::start_async().await;
	let broker = build_broker(&server);
	let identity = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/users/authenticated");
			then.status(401)
				.header("content-type", "application/json")
				.body(r#"{"errors":[{"code":0,"message":"Authorization has been denied."}]}"#);
		})
		.await;

	let err = broker
		.register(SessionCredential::new(COOKIE))
		.await
		.expect_err("Identity rejection must be fatal.");

	identity.assert_async().await;

	assert!(matches!(err, Error::Identity { .. }));
}
