//! Strongly typed identifiers enforced across the toolkit.

// std
use std::{borrow::Borrow, ops::Deref, str::FromStr};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_view($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 128;
const RESOURCE_ID_MAX_LEN: usize = 512;
const RESOURCE_ID_PREFIX: &str = "/subscriptions/";

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (tenant, client, workspace resource).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (tenant, client, workspace resource).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (tenant, client, workspace resource).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
	/// The identifier is not a subscription-rooted resource path.
	#[error("{kind} identifier must start with {prefix}.")]
	NotAResourcePath {
		/// Kind of identifier being validated.
		kind: &'static str,
		/// Required path prefix.
		prefix: &'static str,
	},
}

def_id! { TenantId, "AAD tenant (directory) identifier.", "Tenant" }
def_id! { ClientId, "Service-principal application (client) identifier.", "Client" }

/// Fully qualified Azure resource id of a Databricks workspace.
///
/// The path shape is
/// `/subscriptions/<sub>/resourceGroups/<rg>/providers/Microsoft.Databricks/workspaces/<name>`;
/// the management plane resolves it to the workspace host, and the data plane echoes it back in
/// a fixed request header.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WorkspaceResourceId(String);
impl WorkspaceResourceId {
	/// Creates a resource id from a raw path after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
		let view = value.as_ref();

		validate_resource_id(view)?;

		Ok(Self(view.to_owned()))
	}

	/// Forms the resource id from its subscription, resource group, and workspace name parts.
	pub fn from_parts(
		subscription_id: &str,
		resource_group: &str,
		workspace_name: &str,
	) -> Result<Self, IdentifierError> {
		Self::new(format!(
			"/subscriptions/{subscription_id}/resourceGroups/{resource_group}\
			/providers/Microsoft.Databricks/workspaces/{workspace_name}"
		))
	}
}
impl Deref for WorkspaceResourceId {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for WorkspaceResourceId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<WorkspaceResourceId> for String {
	fn from(value: WorkspaceResourceId) -> Self {
		value.0
	}
}
impl TryFrom<String> for WorkspaceResourceId {
	type Error = IdentifierError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_resource_id(&value)?;

		Ok(Self(value))
	}
}
impl Debug for WorkspaceResourceId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "WorkspaceResource({})", self.0)
	}
}
impl Display for WorkspaceResourceId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for WorkspaceResourceId {
	type Err = IdentifierError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

fn validate_resource_id(view: &str) -> Result<(), IdentifierError> {
	const KIND: &str = "Workspace resource";

	if view.is_empty() {
		return Err(IdentifierError::Empty { kind: KIND });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind: KIND });
	}
	if !view.starts_with(RESOURCE_ID_PREFIX) {
		return Err(IdentifierError::NotAResourcePath { kind: KIND, prefix: RESOURCE_ID_PREFIX });
	}
	if view.len() > RESOURCE_ID_MAX_LEN {
		return Err(IdentifierError::TooLong { kind: KIND, max: RESOURCE_ID_MAX_LEN });
	}

	Ok(())
}
