// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use azdbx_provision::{
	_preludet::*,
	auth::TokenSecret,
	client::WorkspaceClient,
	error::ProvisionError,
	http::{PinnedHttpClient, TransportOptions},
	provision::{AccessControlEntry, PermissionLevel},
};

fn resolved_client(server: &MockServer) -> WorkspaceClient {
	let http = PinnedHttpClient::new(TransportOptions::default())
		.expect("Pinned client should build for compute tests.");
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
async fn create_cluster_forwards_the_spec_and_returns_the_id() {
	let server = MockServer::start_async().await;
	let client = resolved_client(&server);
	let spec = json!({
		"cluster_name": "high-concurrency",
		"spark_version": "5.2.x-scala2.11",
		"node_type_id": "Standard_DS3_v2",
		"autoscale": { "min_workers": 2, "max_workers": 8 },
	});
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/2.0/clusters/create").json_body(spec.clone());
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"cluster_id\":\"0807-foxtrot\"}");
		})
		.await;
	let id = client.create_cluster(&spec).await.expect("Cluster creation should succeed.");

	assert_eq!(id, "0807-foxtrot");

	mock.assert_async().await;
}

#[tokio::test]
async fn create_job_normalizes_numeric_ids() {
	let server = MockServer::start_async().await;
	let client = resolved_client(&server);
	let spec = json!({ "name": "nightly-etl", "max_concurrent_runs": 1 });
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/2.0/jobs/create").json_body(spec.clone());
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"job_id\":1042}");
		})
		.await;
	let id = client.create_job(&spec).await.expect("Job creation should succeed.");

	assert_eq!(id, "1042");
}

#[tokio::test]
async fn create_cluster_without_an_id_in_the_response_fails() {
	let server = MockServer::start_async().await;
	let client = resolved_client(&server);
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/2.0/clusters/create");
			then.status(400)
				.header("content-type", "application/json")
				.body("{\"error_code\":\"INVALID_PARAMETER_VALUE\"}");
		})
		.await;
	let err = client
		.create_cluster(&json!({ "cluster_name": "broken" }))
		.await
		.expect_err("A response without a cluster id should fail.");

	assert!(matches!(
		err,
		Error::Provision(ProvisionError::MissingField { field: "cluster_id", .. })
	));
}

#[tokio::test]
async fn cluster_permissions_are_replaced_with_put() {
	let server = MockServer::start_async().await;
	let client = resolved_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(PUT)
				.path("/api/2.0/preview/permissions/clusters/0807-foxtrot")
				.json_body(json!({
					"access_control_list": [
						{ "user_name": "a.g@example.com", "permission_level": "CAN_MANAGE" },
						{ "user_name": "k.p@example.com", "permission_level": "CAN_ATTACH_TO" },
					],
				}));
			then.status(200).header("content-type", "application/json").body("{}");
		})
		.await;
	let acl = [
		AccessControlEntry::new("a.g@example.com", PermissionLevel::CanManage),
		AccessControlEntry::new("k.p@example.com", PermissionLevel::CanAttachTo),
	];

	client
		.set_cluster_permissions("0807-foxtrot", &acl)
		.await
		.expect("Setting cluster permissions should succeed.");

	mock.assert_async().await;
}

#[tokio::test]
async fn job_permissions_are_amended_with_patch() {
	let server = MockServer::start_async().await;
	let client = resolved_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(PATCH).path("/api/2.0/preview/permissions/jobs/1042").json_body(json!({
				"access_control_list": [
					{ "user_name": "k.p@example.com", "permission_level": "CAN_VIEW" },
				],
			}));
			then.status(200).header("content-type", "application/json").body("{}");
		})
		.await;
	let acl = [AccessControlEntry::new("k.p@example.com", PermissionLevel::CanView)];

	client
		.set_job_permissions("1042", &acl)
		.await
		.expect("Setting job permissions should succeed.");

	mock.assert_async().await;
}
