//! TLS-pinned transport session shared by the token provider and the dispatcher.

// std
use std::ops::Deref;
// crates.io
use reqwest::tls::Version;
// self
use crate::{_prelude::*, error::ConfigError};

/// Default per-request timeout applied when [`TransportOptions`] does not override it.
pub const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(30);

/// Construction-time transport knobs.
///
/// The minimum TLS version is deliberately not among them: the workspace endpoints reject
/// anything below TLS 1.2, so the floor is pinned unconditionally by [`PinnedHttpClient::new`].
#[derive(Clone, Copy, Debug)]
pub struct TransportOptions {
	/// Per-request timeout covering connect, write, and read.
	pub timeout: StdDuration,
}
impl Default for TransportOptions {
	fn default() -> Self {
		Self { timeout: DEFAULT_TIMEOUT }
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared transport behavior lives in one place.
///
/// The constructor pins the connection pool to TLS 1.2 or newer, overriding platform SSL
/// defaults that may still negotiate protocol versions the server side rejects outright. The
/// wrapper is immutable after construction; clones share the underlying connection pool and are
/// safe to issue concurrent requests through.
#[derive(Clone, Debug)]
pub struct PinnedHttpClient(ReqwestClient);
impl PinnedHttpClient {
	/// Builds a TLS-pinned client with the provided transport options.
	pub fn new(options: TransportOptions) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder()
			.min_tls_version(Version::TLS_1_2)
			.timeout(options.timeout)
			.build()?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	///
	/// The caller is responsible for the TLS floor of a hand-built client.
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
impl AsRef<ReqwestClient> for PinnedHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for PinnedHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
