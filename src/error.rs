//! Error taxonomy shared by the token provider, the dispatcher, and the provisioning layers.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;
type JsonPathError = serde_path_to_error::Error<serde_json::Error>;

const PREVIEW_LIMIT: usize = 256;

/// Canonical toolkit error exposed by public APIs.
///
/// Every variant is terminal to the operation that raised it: there is no retry layer, and a
/// failure midway through a provisioning sequence leaves the completed steps in place.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Identity provider rejected or mangled a credential grant.
	#[error(transparent)]
	Authentication(#[from] AuthenticationError),
	/// Workspace endpoint lookup failed or returned an unusable resource.
	#[error(transparent)]
	Resolution(#[from] ResolutionError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Workspace response body could not be decoded as JSON.
	#[error(transparent)]
	Decode(#[from] DecodeError),
	/// Provisioning response decoded but did not carry the expected shape.
	#[error(transparent)]
	Provision(#[from] ProvisionError),
}

/// Configuration and validation failures raised before any request is sent.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Required environment variable is absent.
	#[error("Environment variable {name} is not set.")]
	MissingEnv {
		/// Name of the missing variable.
		name: &'static str,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Endpoint URL could not be formed.
	#[error("Endpoint URL is invalid.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A token or resource id cannot be encoded as an HTTP header value.
	#[error("Header value contains characters that cannot be sent.")]
	InvalidHeader {
		/// Underlying header encoding failure.
		#[source]
		source: reqwest::header::InvalidHeaderValue,
	},
	/// Identifier validation failed.
	#[error(transparent)]
	Identifier(#[from] crate::auth::IdentifierError),
}
impl ConfigError {
	/// Wraps a transport builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Credential-grant failures from the identity-provider token endpoint.
#[derive(Debug, ThisError)]
pub enum AuthenticationError {
	/// Token endpoint answered the grant with a non-success status.
	#[error("Identity provider rejected the credential grant (status {status}): {body_preview}")]
	GrantRejected {
		/// HTTP status code of the rejection.
		status: u16,
		/// Truncated response body for diagnostics.
		body_preview: String,
	},
	/// Grant succeeded but the response carried no `access_token` field.
	#[error("Token endpoint response is missing the access_token field.")]
	MissingAccessToken,
	/// Token endpoint returned malformed JSON.
	#[error("Token endpoint returned malformed JSON.")]
	ResponseParse {
		/// Structured parsing failure.
		#[source]
		source: JsonPathError,
	},
}

/// Workspace lookup failures from the management plane.
#[derive(Debug, ThisError)]
pub enum ResolutionError {
	/// Management plane answered the lookup with a non-success status.
	#[error("Management plane rejected the workspace lookup (status {status}): {body_preview}")]
	LookupRejected {
		/// HTTP status code of the rejection.
		status: u16,
		/// Truncated response body for diagnostics.
		body_preview: String,
	},
	/// Resource was found but carries no `properties.workspaceUrl` field.
	#[error("Workspace resource is missing the properties.workspaceUrl field.")]
	MissingWorkspaceHost,
	/// Management plane returned malformed JSON.
	#[error("Management plane returned malformed JSON.")]
	ResponseParse {
		/// Structured parsing failure.
		#[source]
		source: JsonPathError,
	},
	/// Resolved workspace host does not form a valid base URL.
	#[error("Resolved workspace host does not form a valid URL.")]
	InvalidWorkspaceHost {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}

/// Transport-level failures (network, TLS, timeout).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the workspace platform.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Raised when a workspace response body is not valid JSON.
///
/// The dispatcher never interprets HTTP status codes, so the status is carried here purely as
/// diagnostic context for the undecodable body.
#[derive(Debug, ThisError)]
#[error("Response body is not valid JSON (status {status}).")]
pub struct DecodeError {
	/// HTTP status code of the undecodable response.
	pub status: u16,
	/// Structured parsing failure.
	#[source]
	pub source: JsonPathError,
}

/// Raised when a provisioning response decodes fine but lacks the expected shape.
///
/// The dispatcher returns bodies regardless of status; the typed provisioning wrappers are the
/// layer that decides whether a body actually answers the operation.
#[derive(Debug, ThisError)]
pub enum ProvisionError {
	/// Response did not carry the field the operation needs.
	#[error("Workspace response for {operation} is missing the {field} field.")]
	MissingField {
		/// Operation that issued the request.
		operation: &'static str,
		/// Field expected in the response body.
		field: &'static str,
	},
	/// Response decoded to a shape the operation cannot interpret.
	#[error("Workspace response for {operation} could not be interpreted.")]
	UnexpectedShape {
		/// Operation that issued the request.
		operation: &'static str,
		/// Underlying conversion failure.
		#[source]
		source: serde_json::Error,
	},
}

pub(crate) fn body_preview(body: &str) -> String {
	if body.chars().count() <= PREVIEW_LIMIT {
		body.to_owned()
	} else {
		let mut preview = body.chars().take(PREVIEW_LIMIT).collect::<String>();

		preview.push_str("...");

		preview
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn body_preview_truncates_long_bodies() {
		let short = "{\"error\":\"bad\"}";

		assert_eq!(body_preview(short), short);

		let long = "x".repeat(PREVIEW_LIMIT + 10);
		let preview = body_preview(&long);

		assert_eq!(preview.chars().count(), PREVIEW_LIMIT + 3);
		assert!(preview.ends_with("..."));
	}

	#[test]
	fn top_level_error_is_transparent_over_variants() {
		let err = Error::from(AuthenticationError::MissingAccessToken);

		assert_eq!(err.to_string(), "Token endpoint response is missing the access_token field.");
		assert!(matches!(err, Error::Authentication(_)));
	}
}
