//! SCIM user and group provisioning.

// self
use crate::{
	_prelude::*,
	client::{Verb, WorkspaceClient},
	error::ProvisionError,
	provision::require_str,
};

/// Name of the built-in administrators group every workspace ships with.
pub const ADMIN_GROUP_NAME: &str = "admins";
/// Entitlement granting cluster-creation rights to a user.
pub const CLUSTER_CREATE_ENTITLEMENT: &str = "allow-cluster-create";

const USERS_PATH: &str = "/preview/scim/v2/Users";
const GROUPS_PATH: &str = "/preview/scim/v2/Groups";
const USER_SCHEMA: &str = "urn:ietf:params:scim:schemas:core:2.0:User";
const GROUP_SCHEMA: &str = "urn:ietf:params:scim:schemas:core:2.0:Group";
const PATCH_SCHEMA: &str = "urn:ietf:params:scim:api:messages:2.0:PatchOp";

#[derive(Serialize)]
struct ScimUser<'a> {
	schemas: [&'static str; 1],
	#[serde(rename = "userName")]
	user_name: &'a str,
	#[serde(skip_serializing_if = "Option::is_none")]
	entitlements: Option<[Entitlement; 1]>,
}
#[derive(Serialize)]
struct Entitlement {
	value: &'static str,
}

#[derive(Serialize)]
struct ScimGroup<'a> {
	schemas: [&'static str; 1],
	#[serde(rename = "displayName")]
	display_name: &'a str,
}

#[derive(Serialize)]
struct PatchOp {
	schemas: [&'static str; 1],
	#[serde(rename = "Operations")]
	operations: [PatchOperation; 1],
}
#[derive(Serialize)]
struct PatchOperation {
	op: &'static str,
	value: MemberList,
}
#[derive(Serialize)]
struct MemberList {
	members: [MemberRef; 1],
}
#[derive(Serialize)]
struct MemberRef {
	value: String,
}
impl PatchOp {
	fn add_member(member_id: &str) -> Self {
		Self {
			schemas: [PATCH_SCHEMA],
			operations: [PatchOperation {
				op: "add",
				value: MemberList { members: [MemberRef { value: member_id.to_owned() }] },
			}],
		}
	}
}

/// Summary row returned by the SCIM group listing.
#[derive(Clone, Debug, Deserialize)]
pub struct GroupSummary {
	/// Workspace-assigned group id.
	pub id: String,
	/// Human-facing group name.
	#[serde(rename = "displayName")]
	pub display_name: String,
}
#[derive(Deserialize)]
struct GroupList {
	#[serde(default, rename = "Resources")]
	resources: Vec<GroupSummary>,
}

impl WorkspaceClient {
	/// Provisions a user, optionally granting the cluster-create entitlement.
	///
	/// Returns the workspace-assigned user id.
	pub async fn create_user(&self, user_name: &str, allow_cluster_create: bool) -> Result<String> {
		let payload = ScimUser {
			schemas: [USER_SCHEMA],
			user_name,
			entitlements: allow_cluster_create
				.then_some([Entitlement { value: CLUSTER_CREATE_ENTITLEMENT }]),
		};
		let response = self.invoke(Verb::Post, USERS_PATH, &payload).await?;
		let id = require_str(&response, "id", "user creation")?.to_owned();

		tracing::info!(user_name, id, "Provisioned a workspace user.");

		Ok(id)
	}

	/// Provisions a group and returns its workspace-assigned id.
	pub async fn create_group(&self, display_name: &str) -> Result<String> {
		let payload = ScimGroup { schemas: [GROUP_SCHEMA], display_name };
		let response = self.invoke(Verb::Post, GROUPS_PATH, &payload).await?;
		let id = require_str(&response, "id", "group creation")?.to_owned();

		tracing::info!(display_name, id, "Provisioned a workspace group.");

		Ok(id)
	}

	/// Lists every group the workspace knows about.
	pub async fn list_groups(&self) -> Result<Vec<GroupSummary>> {
		let response = self.invoke(Verb::Get, GROUPS_PATH, &serde_json::json!({})).await?;
		let list = serde_json::from_value::<GroupList>(response)
			.map_err(|source| ProvisionError::UnexpectedShape { operation: "group listing", source })?;

		Ok(list.resources)
	}

	/// Finds a group id by display name, if the group exists.
	pub async fn find_group(&self, display_name: &str) -> Result<Option<String>> {
		Ok(self
			.list_groups()
			.await?
			.into_iter()
			.find(|group| group.display_name == display_name)
			.map(|group| group.id))
	}

	/// Looks up the built-in [`ADMIN_GROUP_NAME`] group.
	///
	/// The group exists in every workspace and cannot be created, so lookup is the only way to
	/// reference it.
	pub async fn admin_group(&self) -> Result<Option<String>> {
		self.find_group(ADMIN_GROUP_NAME).await
	}

	/// Adds a member (user or group id) to a group.
	pub async fn add_member(&self, group_id: &str, member_id: &str) -> Result<()> {
		let payload = PatchOp::add_member(member_id);

		self.invoke(Verb::Patch, &format!("{GROUPS_PATH}/{group_id}"), &payload).await?;

		tracing::info!(group_id, member_id, "Added a group member.");

		Ok(())
	}
}
