//! Cluster and job provisioning plus access-control assignment.

// self
use crate::{
	_prelude::*,
	client::{Verb, WorkspaceClient},
	provision::{require_id, require_str},
};

const CLUSTERS_CREATE_PATH: &str = "/clusters/create";
const JOBS_CREATE_PATH: &str = "/jobs/create";
const CLUSTER_PERMISSIONS_PATH: &str = "/preview/permissions/clusters";
const JOB_PERMISSIONS_PATH: &str = "/preview/permissions/jobs";

/// Access level grantable on clusters and jobs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PermissionLevel {
	/// Full control, including permission management.
	CanManage,
	/// Restart rights on a cluster.
	CanRestart,
	/// Attach-to rights on a cluster.
	CanAttachTo,
	/// Read-only visibility on a job.
	CanView,
	/// Run-management rights on a job.
	CanManageRun,
}
impl PermissionLevel {
	/// Returns the wire name of the permission level.
	pub fn as_str(self) -> &'static str {
		match self {
			PermissionLevel::CanManage => "CAN_MANAGE",
			PermissionLevel::CanRestart => "CAN_RESTART",
			PermissionLevel::CanAttachTo => "CAN_ATTACH_TO",
			PermissionLevel::CanView => "CAN_VIEW",
			PermissionLevel::CanManageRun => "CAN_MANAGE_RUN",
		}
	}
}
impl Display for PermissionLevel {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// One grant row in an access-control list.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AccessControlEntry {
	/// User the permission applies to.
	pub user_name: String,
	/// Level being granted.
	pub permission_level: PermissionLevel,
}
impl AccessControlEntry {
	/// Builds a grant for one user.
	pub fn new(user_name: impl Into<String>, permission_level: PermissionLevel) -> Self {
		Self { user_name: user_name.into(), permission_level }
	}
}

#[derive(Serialize)]
struct AccessControlRequest<'a> {
	access_control_list: &'a [AccessControlEntry],
}

impl WorkspaceClient {
	/// Creates a cluster from a caller-supplied spec document and returns its id.
	///
	/// The spec is the platform's cluster-create JSON, typically loaded from a file by the
	/// caller; this crate forwards it untouched.
	pub async fn create_cluster(&self, spec: &Json) -> Result<String> {
		let response = self.invoke(Verb::Post, CLUSTERS_CREATE_PATH, spec).await?;
		let id = require_str(&response, "cluster_id", "cluster creation")?.to_owned();

		tracing::info!(id, "Created a cluster.");

		Ok(id)
	}

	/// Creates a job from a caller-supplied spec document and returns its id.
	///
	/// Job ids arrive on the wire as numbers; they are normalized to strings so callers can
	/// splice them into permission paths.
	pub async fn create_job(&self, spec: &Json) -> Result<String> {
		let response = self.invoke(Verb::Post, JOBS_CREATE_PATH, spec).await?;
		let id = require_id(&response, "job_id", "job creation")?;

		tracing::info!(id, "Created a job.");

		Ok(id)
	}

	/// Replaces the access-control list on a cluster.
	pub async fn set_cluster_permissions(
		&self,
		cluster_id: &str,
		acl: &[AccessControlEntry],
	) -> Result<()> {
		self.invoke(
			Verb::Put,
			&format!("{CLUSTER_PERMISSIONS_PATH}/{cluster_id}"),
			&AccessControlRequest { access_control_list: acl },
		)
		.await?;

		tracing::info!(cluster_id, grants = acl.len(), "Applied cluster permissions.");

		Ok(())
	}

	/// Amends the access-control list on a job.
	///
	/// Jobs take PATCH where clusters take PUT: the platform merges job grants into the
	/// existing list instead of replacing it.
	pub async fn set_job_permissions(
		&self,
		job_id: &str,
		acl: &[AccessControlEntry],
	) -> Result<()> {
		self.invoke(
			Verb::Patch,
			&format!("{JOB_PERMISSIONS_PATH}/{job_id}"),
			&AccessControlRequest { access_control_list: acl },
		)
		.await?;

		tracing::info!(job_id, grants = acl.len(), "Applied job permissions.");

		Ok(())
	}
}
