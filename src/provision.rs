//! Typed provisioning operations layered on the workspace client.
//!
//! Each submodule hangs an `impl WorkspaceClient` block off the dispatcher, so the client stays
//! the only stateful object and every operation is a thin, typed wrapper over
//! [`invoke`](crate::client::WorkspaceClient::invoke). The dispatcher itself never interprets
//! HTTP status codes; these wrappers are the layer that checks whether a response body actually
//! answers the operation, and a sequence of them carries no transactional guarantee.

pub mod compute;
pub mod identity;
pub mod notebook;

pub use compute::*;
pub use identity::*;
pub use notebook::*;

// self
use crate::{_prelude::*, error::ProvisionError};

pub(crate) fn require_str<'a>(
	response: &'a Json,
	field: &'static str,
	operation: &'static str,
) -> Result<&'a str, ProvisionError> {
	response
		.get(field)
		.and_then(Json::as_str)
		.ok_or(ProvisionError::MissingField { operation, field })
}

/// Extracts an identifier that may arrive as either a JSON string or a JSON number.
pub(crate) fn require_id(
	response: &Json,
	field: &'static str,
	operation: &'static str,
) -> Result<String, ProvisionError> {
	match response.get(field) {
		Some(Json::String(value)) => Ok(value.clone()),
		Some(Json::Number(value)) => Ok(value.to_string()),
		_ => Err(ProvisionError::MissingField { operation, field }),
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn require_id_normalizes_numbers_to_strings() {
		let body = json!({ "job_id": 1042 });

		assert_eq!(
			require_id(&body, "job_id", "job creation").expect("Numeric id should be accepted."),
			"1042",
		);
		assert!(matches!(
			require_id(&body, "cluster_id", "cluster creation"),
			Err(ProvisionError::MissingField { field: "cluster_id", .. })
		));
	}

	#[test]
	fn require_str_rejects_non_string_fields() {
		let body = json!({ "id": 7 });

		assert!(require_str(&body, "id", "user creation").is_err());
		assert_eq!(
			require_str(&json!({ "id": "7" }), "id", "user creation")
				.expect("String id should be accepted."),
			"7",
		);
	}
}
