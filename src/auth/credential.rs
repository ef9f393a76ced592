//! Service-principal credential material, read once from the environment.

// std
use std::env;
// self
use crate::{
	_prelude::*,
	auth::{ClientId, TenantId, TokenSecret},
	error::ConfigError,
};

/// Environment variable holding the AAD tenant id.
pub const TENANT_ID_VAR: &str = "AZURE_TENANT_ID";
/// Environment variable holding the service-principal client id.
pub const CLIENT_ID_VAR: &str = "AZURE_CLIENT_ID";
/// Environment variable holding the service-principal client secret.
pub const CLIENT_SECRET_VAR: &str = "AZURE_CLIENT_SECRET";

/// Immutable service-principal identity used for every token grant.
///
/// Read once at construction and held for the process lifetime; never persisted anywhere by
/// this crate.
#[derive(Clone, Debug)]
pub struct ServicePrincipalCredential {
	/// AAD tenant the principal lives in.
	pub tenant: TenantId,
	/// Application (client) identifier.
	pub client_id: ClientId,
	/// Client secret; redacted in debug output.
	pub client_secret: TokenSecret,
}
impl ServicePrincipalCredential {
	/// Assembles a credential from already-validated parts.
	pub fn new(tenant: TenantId, client_id: ClientId, client_secret: impl Into<String>) -> Self {
		Self { tenant, client_id, client_secret: TokenSecret::new(client_secret) }
	}

	/// Reads the credential from the environment, failing fast on the first missing variable.
	pub fn from_env() -> Result<Self, ConfigError> {
		let tenant = TenantId::new(require_var(TENANT_ID_VAR)?)?;
		let client_id = ClientId::new(require_var(CLIENT_ID_VAR)?)?;
		let client_secret = require_var(CLIENT_SECRET_VAR)?;

		Ok(Self::new(tenant, client_id, client_secret))
	}
}

fn require_var(name: &'static str) -> Result<String, ConfigError> {
	env::var(name).map_err(|_| ConfigError::MissingEnv { name })
}
