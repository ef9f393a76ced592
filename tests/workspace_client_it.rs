// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use azdbx_provision::{
	_preludet::*,
	auth::TokenSecret,
	client::{MANAGEMENT_TOKEN_HEADER, Verb, WORKSPACE_RESOURCE_ID_HEADER, WorkspaceClient},
	error::AuthenticationError,
	http::{PinnedHttpClient, TransportOptions},
	oauth::DATA_PLANE_AUDIENCE,
};

const TOKEN_PATH: &str = "/test-tenant/oauth2/token";

fn resolved_client(server: &MockServer) -> WorkspaceClient {
	let http = PinnedHttpClient::new(TransportOptions::default())
		.expect("Pinned client should build for dispatcher tests.");
	let base = Url::parse(&server.url("/api/2.0")).expect("Mock base URL should parse.");

	WorkspaceClient::from_resolved(
		http,
		base,
		&TokenSecret::new("T1"),
		&TokenSecret::new("T2"),
		&test_resource_id(),
	)
	.expect("Client should build from a resolved endpoint.")
}

#[tokio::test]
async fn construction_acquires_tokens_and_resolves_the_base_url() {
	let server = MockServer::start_async().await;
	let data_token_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(TOKEN_PATH)
				.body_includes(format!("resource={DATA_PLANE_AUDIENCE}"));
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"T1\"}");
		})
		.await;
	let management_token_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(TOKEN_PATH)
				.body_includes("resource=https%3A%2F%2Fmanagement.core.windows.net%2F");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"T2\"}");
		})
		.await;
	let lookup_mock = server
		.mock_async(|when, then| {
			when.method(GET).path(test_resource_id().as_ref());
			then.status(200).header("content-type", "application/json").body(
				"{\"properties\":{\"workspaceUrl\":\"adb-123.region.azuredatabricks.net\"}}",
			);
		})
		.await;
	let client = WorkspaceClient::connect(
		test_credential(),
		test_resource_id(),
		test_endpoints(&server.base_url()),
		TransportOptions::default(),
	)
	.await
	.expect("Construction should succeed against healthy mocks.");

	assert_eq!(client.base_url().as_str(), "https://adb-123.region.azuredatabricks.net/api/2.0");

	data_token_mock.assert_calls_async(1).await;
	management_token_mock.assert_calls_async(1).await;
	lookup_mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn construction_aborts_when_the_grant_is_rejected() {
	let server = MockServer::start_async().await;
	let _token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(401)
				.header("content-type", "application/json")
				.body("{\"error\":\"invalid_client\"}");
		})
		.await;
	let lookup_mock = server
		.mock_async(|when, then| {
			when.method(GET).path(test_resource_id().as_ref());
			then.status(200).header("content-type", "application/json").body("{}");
		})
		.await;
	let err = WorkspaceClient::connect(
		test_credential(),
		test_resource_id(),
		test_endpoints(&server.base_url()),
		TransportOptions::default(),
	)
	.await
	.expect_err("Construction should abort on a rejected grant.");

	assert!(matches!(
		err,
		Error::Authentication(AuthenticationError::GrantRejected { status: 401, .. })
	));

	lookup_mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn invoke_sends_exactly_the_fixed_header_set() {
	let server = MockServer::start_async().await;
	let client = resolved_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/2.0/preview/scim/v2/Users")
				.header("authorization", "Bearer T1")
				.header(MANAGEMENT_TOKEN_HEADER, "T2")
				.header(WORKSPACE_RESOURCE_ID_HEADER, test_resource_id().as_ref());
			then.status(201)
				.header("content-type", "application/json")
				.body("{\"id\":\"42\"}");
		})
		.await;
	let body = client
		.invoke(Verb::Post, "/preview/scim/v2/Users", &json!({ "userName": "a.g@example.com" }))
		.await
		.expect("Dispatch should succeed.");

	assert_eq!(body, json!({ "id": "42" }));

	mock.assert_async().await;
}

#[tokio::test]
async fn invoke_returns_error_bodies_without_interpreting_status() {
	let server = MockServer::start_async().await;
	let client = resolved_client(&server);
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/2.0/clusters/get");
			then.status(404).header("content-type", "application/json").body(
				"{\"error_code\":\"RESOURCE_DOES_NOT_EXIST\",\"message\":\"No such cluster.\"}",
			);
		})
		.await;
	let body = client
		.invoke(Verb::Get, "/clusters/get", &json!({ "cluster_id": "nope" }))
		.await
		.expect("A 404 with a JSON body should still decode.");

	assert_eq!(body["error_code"], "RESOURCE_DOES_NOT_EXIST");
}

#[tokio::test]
async fn invoke_fails_with_decode_error_on_non_json_bodies() {
	let server = MockServer::start_async().await;
	let client = resolved_client(&server);
	let _html_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/2.0/clusters/list");
			then.status(200).header("content-type", "text/html").body("<html>oops</html>");
		})
		.await;
	let err = client
		.invoke(Verb::Get, "/clusters/list", &json!({}))
		.await
		.expect_err("A non-JSON body should fail to decode.");

	let Error::Decode(decode) = err else {
		panic!("Unexpected error variant: {err:?}.");
	};

	assert_eq!(decode.status, 200);

	// The failure must not poison the client; a healthy endpoint still works.
	let _json_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/2.0/jobs/list");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"jobs\":[]}");
		})
		.await;
	let body = client
		.invoke(Verb::Get, "/jobs/list", &json!({}))
		.await
		.expect("The client should stay usable after a decode failure.");

	assert_eq!(body, json!({ "jobs": [] }));
}

#[tokio::test]
async fn invoke_fails_with_transport_error_when_the_endpoint_is_dead() {
	let http = PinnedHttpClient::new(TransportOptions::default())
		.expect("Pinned client should build for the dead endpoint test.");
	let base = Url::parse("http://127.0.0.1:1/api/2.0").expect("Dead base URL should parse.");
	let client = WorkspaceClient::from_resolved(
		http,
		base,
		&TokenSecret::new("T1"),
		&TokenSecret::new("T2"),
		&test_resource_id(),
	)
	.expect("Client should build against an unreachable endpoint.");
	let err = client
		.invoke(Verb::Get, "/clusters/list", &json!({}))
		.await
		.expect_err("A dead endpoint should fail at the transport layer.");

	assert!(matches!(err, Error::Transport(_)));
}
