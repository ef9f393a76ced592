//! AAD token acquisition and workspace endpoint resolution.

// self
use crate::{
	_prelude::*,
	auth::{ServicePrincipalCredential, TokenSecret, TokenSlot, WorkspaceResourceId},
	config::CloudEndpoints,
	error::{AuthenticationError, ConfigError, ResolutionError, TransportError, body_preview},
	http::PinnedHttpClient,
};

/// Token audience of the workspace data plane (the platform's first-party application id).
pub const DATA_PLANE_AUDIENCE: &str = "2ff814a6-3304-4ab8-85cb-cd0e6f879c1d";
/// Token audience of the Azure management plane.
pub const MANAGEMENT_AUDIENCE: &str = "https://management.core.windows.net/";
/// Management API version used for workspace lookups.
pub const WORKSPACE_API_VERSION: &str = "2018-04-01";

/// Acquires and caches the two bearer tokens a workspace operation needs, and resolves a
/// workspace's callable base URL.
///
/// Each token is fetched lazily on first use and then held for the provider's lifetime; there
/// is no expiry-aware refresh, which is safe because provisioning runs are short and
/// single-shot. Grant and lookup failures are terminal: the provider never retries.
#[derive(Debug)]
pub struct TokenProvider {
	http: PinnedHttpClient,
	credential: ServicePrincipalCredential,
	endpoints: CloudEndpoints,
	access_token: TokenSlot,
	management_token: TokenSlot,
}
impl TokenProvider {
	/// Creates a provider with empty token slots.
	pub fn new(
		http: PinnedHttpClient,
		credential: ServicePrincipalCredential,
		endpoints: CloudEndpoints,
	) -> Self {
		Self {
			http,
			credential,
			endpoints,
			access_token: TokenSlot::new(),
			management_token: TokenSlot::new(),
		}
	}

	/// Returns the data-plane token, acquiring it on first use.
	pub async fn access_token(&self) -> Result<TokenSecret> {
		self.access_token.get_or_acquire(|| self.request_token(DATA_PLANE_AUDIENCE)).await
	}

	/// Returns the management-plane token, acquiring it on first use.
	pub async fn management_token(&self) -> Result<TokenSecret> {
		self.management_token.get_or_acquire(|| self.request_token(MANAGEMENT_AUDIENCE)).await
	}

	/// Resolves the workspace's callable base URL from its resource id.
	///
	/// Implicitly acquires the management token if it is not cached yet. The returned URL pins
	/// the `/api/2.0` prefix every data-plane call builds on.
	pub async fn resolve_workspace_url(
		&self,
		resource_id: &WorkspaceResourceId,
		api_version: &str,
	) -> Result<Url> {
		let token = self.management_token().await?;
		let url = self.lookup_url(resource_id, api_version)?;
		let response = self
			.http
			.get(url.clone())
			.bearer_auth(token.expose())
			.send()
			.await
			.map_err(TransportError::from)?;
		let status = response.status();
		let body = response.text().await.map_err(TransportError::from)?;

		tracing::debug!(%url, status = status.as_u16(), "Management plane answered the lookup.");

		if !status.is_success() {
			return Err(ResolutionError::LookupRejected {
				status: status.as_u16(),
				body_preview: body_preview(&body),
			}
			.into());
		}

		let mut deserializer = serde_json::Deserializer::from_str(&body);
		let resource: WorkspaceResource = serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| ResolutionError::ResponseParse { source })?;
		let host = resource.properties.workspace_url.ok_or(ResolutionError::MissingWorkspaceHost)?;
		let base = Url::parse(&format!("https://{host}/api/2.0"))
			.map_err(|source| ResolutionError::InvalidWorkspaceHost { source })?;

		tracing::info!(%base, "Resolved the workspace endpoint.");

		Ok(base)
	}

	async fn request_token(&self, audience: &str) -> Result<TokenSecret> {
		let url = self.token_url()?;
		let form = [
			("grant_type", "client_credentials"),
			("client_id", self.credential.client_id.as_ref()),
			("client_secret", self.credential.client_secret.expose()),
			("resource", audience),
		];
		let response =
			self.http.post(url.clone()).form(&form).send().await.map_err(TransportError::from)?;
		let status = response.status();
		let body = response.text().await.map_err(TransportError::from)?;

		tracing::debug!(%url, status = status.as_u16(), audience, "Token endpoint answered.");

		if !status.is_success() {
			return Err(AuthenticationError::GrantRejected {
				status: status.as_u16(),
				body_preview: body_preview(&body),
			}
			.into());
		}

		let mut deserializer = serde_json::Deserializer::from_str(&body);
		let grant: TokenGrant = serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| AuthenticationError::ResponseParse { source })?;
		let token = grant.access_token.ok_or(AuthenticationError::MissingAccessToken)?;

		Ok(TokenSecret::new(token))
	}

	fn token_url(&self) -> Result<Url, ConfigError> {
		self.endpoints
			.authority
			.join(&format!("{}/oauth2/token", self.credential.tenant.as_ref()))
			.map_err(|source| ConfigError::InvalidEndpoint { source })
	}

	fn lookup_url(
		&self,
		resource_id: &WorkspaceResourceId,
		api_version: &str,
	) -> Result<Url, ConfigError> {
		let mut url = self
			.endpoints
			.management
			.join(resource_id.as_ref())
			.map_err(|source| ConfigError::InvalidEndpoint { source })?;

		url.query_pairs_mut().append_pair("api-version", api_version);

		Ok(url)
	}
}

/// Wire shape of the token endpoint response.
#[derive(Deserialize)]
struct TokenGrant {
	access_token: Option<String>,
}

/// Wire shape of the management-plane workspace resource.
#[derive(Deserialize)]
struct WorkspaceResource {
	#[serde(default)]
	properties: WorkspaceProperties,
}
#[derive(Default, Deserialize)]
struct WorkspaceProperties {
	#[serde(rename = "workspaceUrl")]
	workspace_url: Option<String>,
}
