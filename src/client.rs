//! The authenticated request dispatcher every provisioning operation builds on.

// crates.io
use reqwest::{
	Method,
	header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue},
};
// self
use crate::{
	_prelude::*,
	auth::{ServicePrincipalCredential, TokenSecret, WorkspaceResourceId},
	config::CloudEndpoints,
	error::{ConfigError, DecodeError, TransportError},
	http::{PinnedHttpClient, TransportOptions},
	oauth::{TokenProvider, WORKSPACE_API_VERSION},
};

/// Header carrying the management-plane token on data-plane calls.
pub const MANAGEMENT_TOKEN_HEADER: &str = "x-databricks-azure-sp-management-token";
/// Header carrying the workspace resource id on data-plane calls.
pub const WORKSPACE_RESOURCE_ID_HEADER: &str = "x-databricks-azure-workspace-resource-id";

/// HTTP verbs the dispatcher accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verb {
	/// Fetch a resource or listing.
	Get,
	/// Create a resource.
	Post,
	/// Replace a resource or setting.
	Put,
	/// Amend a resource in place.
	Patch,
	/// Remove a resource.
	Delete,
}
impl Verb {
	/// Returns the wire name of the verb.
	pub fn as_str(self) -> &'static str {
		match self {
			Verb::Get => "GET",
			Verb::Post => "POST",
			Verb::Put => "PUT",
			Verb::Patch => "PATCH",
			Verb::Delete => "DELETE",
		}
	}

	fn as_method(self) -> Method {
		match self {
			Verb::Get => Method::GET,
			Verb::Post => Method::POST,
			Verb::Put => Method::PUT,
			Verb::Patch => Method::PATCH,
			Verb::Delete => Method::DELETE,
		}
	}
}
impl Display for Verb {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Authenticated dispatcher bound to one resolved workspace.
///
/// Construction acquires both tokens and resolves the workspace URL, so a client that exists is
/// always fully usable; there is no partial or degraded mode. The session, the fixed header
/// set, and the base URL never change afterward, which makes sharing a client across tasks
/// safe.
pub struct WorkspaceClient {
	http: PinnedHttpClient,
	base_url: Url,
	headers: HeaderMap,
}
impl WorkspaceClient {
	/// Connects to the workspace named by `resource_id`.
	///
	/// Ordering is fixed: data-plane token, then management token, then the workspace lookup
	/// (which needs the management token), then the fixed header set. Any failure aborts
	/// construction.
	pub async fn connect(
		credential: ServicePrincipalCredential,
		resource_id: WorkspaceResourceId,
		endpoints: CloudEndpoints,
		options: TransportOptions,
	) -> Result<Self> {
		let http = PinnedHttpClient::new(options)?;
		let provider = TokenProvider::new(http.clone(), credential, endpoints);
		let access_token = provider.access_token().await?;
		let management_token = provider.management_token().await?;
		let base_url = provider.resolve_workspace_url(&resource_id, WORKSPACE_API_VERSION).await?;

		Self::from_resolved(http, base_url, &access_token, &management_token, &resource_id)
	}

	/// Builds a client from an already-resolved endpoint and token pair.
	///
	/// [`WorkspaceClient::connect`] ends up here; it is also the entry point when the workspace
	/// URL is already known and the management lookup would be wasted. `base_url` should carry
	/// the `/api/2.0` prefix and no trailing slash.
	pub fn from_resolved(
		http: PinnedHttpClient,
		base_url: Url,
		access_token: &TokenSecret,
		management_token: &TokenSecret,
		resource_id: &WorkspaceResourceId,
	) -> Result<Self> {
		let headers = fixed_headers(access_token, management_token, resource_id)?;

		Ok(Self { http, base_url, headers })
	}

	/// Issues one API call against the resolved base URL and returns the decoded JSON body.
	///
	/// The body is returned regardless of HTTP status: this layer does not interpret status
	/// codes, and callers inspect the body shape instead. The status only surfaces through
	/// tracing events and inside [`DecodeError`] when the body is not JSON.
	pub async fn invoke<P>(&self, verb: Verb, api_path: &str, payload: &P) -> Result<Json>
	where
		P: ?Sized + Serialize,
	{
		let url = self.endpoint(api_path)?;
		let response = self
			.http
			.request(verb.as_method(), url.clone())
			.headers(self.headers.clone())
			.json(payload)
			.send()
			.await
			.map_err(TransportError::from)?;
		let status = response.status();
		let body = response.bytes().await.map_err(TransportError::from)?;

		tracing::debug!(verb = verb.as_str(), %url, status = status.as_u16(), "Workspace answered.");

		let mut deserializer = serde_json::Deserializer::from_slice(&body);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| DecodeError { status: status.as_u16(), source }.into())
	}

	/// Resolved workspace base URL, `/api/2.0` prefix included.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	fn endpoint(&self, api_path: &str) -> Result<Url, ConfigError> {
		Url::parse(&format!("{}{}", self.base_url, api_path))
			.map_err(|source| ConfigError::InvalidEndpoint { source })
	}
}
impl Debug for WorkspaceClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("WorkspaceClient").field("base_url", &self.base_url.as_str()).finish()
	}
}

fn fixed_headers(
	access_token: &TokenSecret,
	management_token: &TokenSecret,
	resource_id: &WorkspaceResourceId,
) -> Result<HeaderMap, ConfigError> {
	let invalid = |source| ConfigError::InvalidHeader { source };
	let mut headers = HeaderMap::with_capacity(3);
	let mut bearer = HeaderValue::from_str(&format!("Bearer {}", access_token.expose()))
		.map_err(invalid)?;
	let mut management = HeaderValue::from_str(management_token.expose()).map_err(invalid)?;

	bearer.set_sensitive(true);
	management.set_sensitive(true);
	headers.insert(AUTHORIZATION, bearer);
	headers.insert(HeaderName::from_static(MANAGEMENT_TOKEN_HEADER), management);
	headers.insert(
		HeaderName::from_static(WORKSPACE_RESOURCE_ID_HEADER),
		HeaderValue::from_str(resource_id.as_ref()).map_err(invalid)?,
	);

	Ok(headers)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn verbs_render_their_wire_names() {
		assert_eq!(Verb::Get.as_str(), "GET");
		assert_eq!(Verb::Patch.to_string(), "PATCH");
		assert_eq!(
			serde_json::to_string(&Verb::Delete).expect("Verb should serialize."),
			"\"DELETE\"",
		);
	}

	#[test]
	fn fixed_headers_hold_exactly_three_entries() {
		let resource_id = WorkspaceResourceId::new("/subscriptions/sub/resourceGroups/rg")
			.expect("Resource id fixture should be valid.");
		let headers = fixed_headers(
			&TokenSecret::new("T1"),
			&TokenSecret::new("T2"),
			&resource_id,
		)
		.expect("Fixed headers should build.");

		assert_eq!(headers.len(), 3);
		assert_eq!(headers[AUTHORIZATION], "Bearer T1");
		assert_eq!(headers[MANAGEMENT_TOKEN_HEADER], "T2");
		assert_eq!(headers[WORKSPACE_RESOURCE_ID_HEADER], "/subscriptions/sub/resourceGroups/rg");
	}
}
