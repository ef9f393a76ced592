//! Demonstrates the user-and-group provisioning sequence against a mock workspace: acquire both
//! AAD tokens, look up the built-in admins group, create a group, and wire members into both.

// crates.io
use color_eyre::{Result, eyre::eyre};
use httpmock::prelude::*;
use url::Url;
// self
use azdbx_provision::{
	auth::{ClientId, ServicePrincipalCredential, TenantId},
	client::WorkspaceClient,
	config::{CloudEndpoints, DEFAULT_RESOURCE_GROUP, DEFAULT_SUBSCRIPTION_ID, Settings},
	http::{PinnedHttpClient, TransportOptions},
	oauth::TokenProvider,
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
	let _users_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/2.0/preview/scim/v2/Users");
			then.status(201)
				.header("content-type", "application/json")
				.body("{\"id\":\"101\"}");
		})
		.await;
	let _groups_listing_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/2.0/preview/scim/v2/Groups");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"Resources\":[{\"id\":\"210\",\"displayName\":\"admins\"}]}");
		})
		.await;
	let _groups_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/2.0/preview/scim/v2/Groups");
			then.status(201)
				.header("content-type", "application/json")
				.body("{\"id\":\"220\"}");
		})
		.await;
	let _membership_mock = server
		.mock_async(|when, then| {
			when.method(PATCH).path_includes("/api/2.0/preview/scim/v2/Groups/");
			then.status(200).header("content-type", "application/json").body("{}");
		})
		.await;
	let mock_base = Url::parse(&server.base_url())?;
	let settings = Settings {
		credential: ServicePrincipalCredential::new(
			TenantId::new("demo-tenant")?,
			ClientId::new("demo-client")?,
			"demo-secret",
		),
		subscription_id: DEFAULT_SUBSCRIPTION_ID.into(),
		resource_group: DEFAULT_RESOURCE_GROUP.into(),
		endpoints: CloudEndpoints { authority: mock_base.clone(), management: mock_base },
		transport: TransportOptions::default(),
	};
	let resource_id = settings.workspace_resource_id("demo-workspace")?;
	let http = PinnedHttpClient::new(settings.transport)?;
	let provider =
		TokenProvider::new(http.clone(), settings.credential.clone(), settings.endpoints.clone());
	let access_token = provider.access_token().await?;
	let management_token = provider.management_token().await?;
	let client = WorkspaceClient::from_resolved(
		http,
		Url::parse(&server.url("/api/2.0"))?,
		&access_token,
		&management_token,
		&resource_id,
	)?;
	let user_id = client.create_user("a.g@example.com", true).await?;
	let admin_group_id =
		client.admin_group().await?.ok_or_else(|| eyre!("The admins group should exist."))?;
	let team_group_id = client.create_group("data-engineers").await?;

	client.add_member(&admin_group_id, &user_id).await?;
	client.add_member(&team_group_id, &user_id).await?;

	println!("Provisioned user {user_id} into groups {admin_group_id} and {team_group_id}.");

	Ok(())
}
