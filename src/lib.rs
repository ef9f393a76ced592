//! Authenticated Azure Databricks provisioning toolkit built around AAD service-principal
//! tokens, a TLS-pinned request dispatcher, and typed SCIM/cluster/job operations.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod oauth;
pub mod provision;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and fixtures for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{ClientId, ServicePrincipalCredential, TenantId, WorkspaceResourceId},
		config::CloudEndpoints,
	};

	/// Workspace resource id fixture shared by integration tests.
	pub fn test_resource_id() -> WorkspaceResourceId {
		WorkspaceResourceId::from_parts(
			"11111111-1111-1111-1111-111111111111",
			"my-adb-e2-rg",
			"my-adb-workspace",
		)
		.expect("Fixture resource id should be valid.")
	}

	/// Service-principal fixture shared by integration tests.
	pub fn test_credential() -> ServicePrincipalCredential {
		ServicePrincipalCredential::new(
			TenantId::new("test-tenant").expect("Fixture tenant should be valid."),
			ClientId::new("test-client").expect("Fixture client id should be valid."),
			"test-secret",
		)
	}

	/// Cloud endpoints with both the authority and the management plane pointed at a mock
	/// server base URL.
	pub fn test_endpoints(base: &str) -> CloudEndpoints {
		let url = Url::parse(base).expect("Mock server URL should parse.");

		CloudEndpoints { authority: url.clone(), management: url }
	}
}

mod _prelude {
	pub use std::{
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		time::Duration as StdDuration,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value as Json;
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
