//! Environment-sourced settings and cloud endpoint configuration.

// std
use std::env;
// self
use crate::{
	_prelude::*,
	auth::{IdentifierError, ServicePrincipalCredential, WorkspaceResourceId},
	error::ConfigError,
	http::TransportOptions,
};

/// Environment variable holding the Azure subscription id.
pub const SUBSCRIPTION_ID_VAR: &str = "AZURE_SUBSCRIPTION_ID";
/// Environment variable holding the resource group name.
pub const RESOURCE_GROUP_VAR: &str = "AZURE_RESOURCE_GROUP";
/// Fallback subscription id used when the environment does not provide one.
pub const DEFAULT_SUBSCRIPTION_ID: &str = "11111111-1111-1111-1111-111111111111";
/// Fallback resource group used when the environment does not provide one.
pub const DEFAULT_RESOURCE_GROUP: &str = "my-adb-e2-rg";

const PUBLIC_AUTHORITY: &str = "https://login.microsoftonline.com";
const PUBLIC_MANAGEMENT: &str = "https://management.azure.com";

/// Identity-provider authority and management-plane host the toolkit talks to.
///
/// Defaults to the public Azure cloud; overridable so tests can point both at a mock server.
#[derive(Clone, Debug)]
pub struct CloudEndpoints {
	/// Identity-provider authority issuing the tokens.
	pub authority: Url,
	/// Management-plane host answering resource lookups.
	pub management: Url,
}
impl Default for CloudEndpoints {
	fn default() -> Self {
		Self {
			authority: Url::parse(PUBLIC_AUTHORITY).expect("Hard-coded authority URL must parse."),
			management: Url::parse(PUBLIC_MANAGEMENT)
				.expect("Hard-coded management URL must parse."),
		}
	}
}

/// Everything needed to construct a workspace client, read once at startup.
#[derive(Clone, Debug)]
pub struct Settings {
	/// Service-principal identity used for both token grants.
	pub credential: ServicePrincipalCredential,
	/// Azure subscription owning the workspace.
	pub subscription_id: String,
	/// Resource group owning the workspace.
	pub resource_group: String,
	/// Identity-provider and management-plane hosts.
	pub endpoints: CloudEndpoints,
	/// Transport construction knobs.
	pub transport: TransportOptions,
}
impl Settings {
	/// Reads settings from the environment.
	///
	/// The credential variables are required; subscription and resource group fall back to the
	/// sample defaults so a freshly cloned deployment works against the reference template.
	pub fn from_env() -> Result<Self, ConfigError> {
		Ok(Self {
			credential: ServicePrincipalCredential::from_env()?,
			subscription_id: env::var(SUBSCRIPTION_ID_VAR)
				.unwrap_or_else(|_| DEFAULT_SUBSCRIPTION_ID.into()),
			resource_group: env::var(RESOURCE_GROUP_VAR)
				.unwrap_or_else(|_| DEFAULT_RESOURCE_GROUP.into()),
			endpoints: CloudEndpoints::default(),
			transport: TransportOptions::default(),
		})
	}

	/// Forms the full resource id of a workspace deployed under these settings.
	pub fn workspace_resource_id(
		&self,
		workspace_name: &str,
	) -> Result<WorkspaceResourceId, IdentifierError> {
		WorkspaceResourceId::from_parts(&self.subscription_id, &self.resource_group, workspace_name)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::{ClientId, TenantId};

	#[test]
	fn default_endpoints_target_the_public_cloud() {
		let endpoints = CloudEndpoints::default();

		assert_eq!(endpoints.authority.as_str(), "https://login.microsoftonline.com/");
		assert_eq!(endpoints.management.as_str(), "https://management.azure.com/");
	}

	#[test]
	fn settings_form_workspace_resource_ids() {
		let settings = Settings {
			credential: ServicePrincipalCredential::new(
				TenantId::new("tenant-1").expect("Tenant fixture should be valid."),
				ClientId::new("client-1").expect("Client fixture should be valid."),
				"secret",
			),
			subscription_id: DEFAULT_SUBSCRIPTION_ID.into(),
			resource_group: DEFAULT_RESOURCE_GROUP.into(),
			endpoints: CloudEndpoints::default(),
			transport: TransportOptions::default(),
		};
		let resource_id = settings
			.workspace_resource_id("my-adb-workspace")
			.expect("Workspace name should form a valid resource id.");

		assert_eq!(
			resource_id.as_ref(),
			"/subscriptions/11111111-1111-1111-1111-111111111111/resourceGroups/my-adb-e2-rg\
			/providers/Microsoft.Databricks/workspaces/my-adb-workspace",
		);
	}
}
