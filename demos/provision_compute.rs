//! Demonstrates the compute provisioning sequence against a mock workspace: create a cluster
//! and a job from spec documents, grant access on both, and drop a notebook into a sandbox.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
use url::Url;
// self
use azdbx_provision::{
	auth::{ClientId, ServicePrincipalCredential, TenantId, WorkspaceResourceId},
	client::WorkspaceClient,
	config::CloudEndpoints,
	http::{PinnedHttpClient, TransportOptions},
	oauth::TokenProvider,
	provision::{AccessControlEntry, NotebookFormat, NotebookLanguage, PermissionLevel},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let _token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/demo-tenant/oauth2/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"demo-token\"}");
		})
		.await;
	let _cluster_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/2.0/clusters/create");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"cluster_id\":\"0807-foxtrot\"}");
		})
		.await;
	let _job_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/2.0/jobs/create");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"job_id\":1042}");
		})
		.await;
	let _permissions_mock = server
		.mock_async(|when, then| {
			when.path_includes("/api/2.0/preview/permissions/");
			then.status(200).header("content-type", "application/json").body("{}");
		})
		.await;
	let _import_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/2.0/workspace/import");
			then.status(200).header("content-type", "application/json").body("{}");
		})
		.await;
	let mock_base = Url::parse(&server.base_url())?;
	let credential = ServicePrincipalCredential::new(
		TenantId::new("demo-tenant")?,
		ClientId::new("demo-client")?,
		"demo-secret",
	);
	let endpoints = CloudEndpoints { authority: mock_base.clone(), management: mock_base };
	let resource_id = WorkspaceResourceId::from_parts(
		"11111111-1111-1111-1111-111111111111",
		"my-adb-e2-rg",
		"demo-workspace",
	)?;
	let http = PinnedHttpClient::new(TransportOptions::default())?;
	let provider = TokenProvider::new(http.clone(), credential, endpoints);
	let access_token = provider.access_token().await?;
	let management_token = provider.management_token().await?;
	let client = WorkspaceClient::from_resolved(
		http,
		Url::parse(&server.url("/api/2.0"))?,
		&access_token,
		&management_token,
		&resource_id,
	)?;
	let cluster_spec = json!({
		"cluster_name": "high-concurrency",
		"spark_version": "5.2.x-scala2.11",
		"node_type_id": "Standard_DS3_v2",
		"autoscale": { "min_workers": 2, "max_workers": 8 },
	});
	let cluster_id = client.create_cluster(&cluster_spec).await?;

	client
		.set_cluster_permissions(&cluster_id, &[
			AccessControlEntry::new("a.g@example.com", PermissionLevel::CanManage),
			AccessControlEntry::new("k.p@example.com", PermissionLevel::CanAttachTo),
		])
		.await?;

	let job_spec = json!({ "name": "nightly-etl", "max_concurrent_runs": 1 });
	let job_id = client.create_job(&job_spec).await?;

	client
		.set_job_permissions(&job_id, &[AccessControlEntry::new(
			"k.p@example.com",
			PermissionLevel::CanView,
		)])
		.await?;
	client
		.import_notebook(
			"/Users/a.g@example.com/Smoke",
			NotebookLanguage::Python,
			NotebookFormat::Source,
			b"print(1)",
			false,
		)
		.await?;

	println!("Provisioned cluster {cluster_id} and job {job_id} with notebook imported.");

	Ok(())
}
