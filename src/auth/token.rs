//! Redacted token material and write-once acquisition slots.

// self
use crate::_prelude::*;

/// Redacted bearer-token wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Token value plus the instant it was acquired.
///
/// The instant is informational only: tokens are never refreshed within a provider's lifetime,
/// so nothing in the toolkit consults it for expiry.
#[derive(Clone, Debug)]
pub struct CachedToken {
	/// The bearer token itself.
	pub secret: TokenSecret,
	/// Acquisition instant.
	pub acquired_at: OffsetDateTime,
}

/// Write-once async slot holding one bearer token.
///
/// The slot starts empty and transitions to occupied exactly once; the transition is never
/// reversed within the owning provider's lifetime. Acquisition holds the slot lock for the
/// duration of the fetch, so concurrent first callers collapse into a single request instead of
/// stampeding the token endpoint. A failed fetch leaves the slot empty for the next caller.
#[derive(Debug, Default)]
pub struct TokenSlot(AsyncMutex<Option<CachedToken>>);
impl TokenSlot {
	/// Creates an empty slot.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the cached token, running `acquire` to fill the slot on first use.
	pub async fn get_or_acquire<F, Fut>(&self, acquire: F) -> Result<TokenSecret>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<TokenSecret>>,
	{
		let mut slot = self.0.lock().await;

		if let Some(held) = slot.as_ref() {
			return Ok(held.secret.clone());
		}

		let secret = acquire().await?;

		*slot = Some(CachedToken { secret: secret.clone(), acquired_at: OffsetDateTime::now_utc() });

		Ok(secret)
	}

	/// Returns a copy of the slot contents without triggering acquisition.
	pub async fn peek(&self) -> Option<CachedToken> {
		self.0.lock().await.clone()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// self
	use super::*;
	use crate::error::AuthenticationError;

	#[test]
	fn secret_formatters_redact() {
		let secret = TokenSecret::new("super-secret");

		assert_eq!(format!("{secret:?}"), "TokenSecret(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
	}

	#[tokio::test]
	async fn slot_acquires_once_and_caches() {
		let slot = TokenSlot::new();
		let calls = AtomicUsize::new(0);

		for _ in 0..3 {
			let token = slot
				.get_or_acquire(|| async {
					calls.fetch_add(1, Ordering::SeqCst);

					Ok(TokenSecret::new("T1"))
				})
				.await
				.expect("Slot acquisition should succeed.");

			assert_eq!(token.expose(), "T1");
		}

		assert_eq!(calls.load(Ordering::SeqCst), 1, "Only the first call may fetch.");
		assert!(slot.peek().await.is_some());
	}

	#[tokio::test]
	async fn failed_acquisition_leaves_the_slot_empty() {
		let slot = TokenSlot::new();
		let err = slot
			.get_or_acquire(|| async { Err(AuthenticationError::MissingAccessToken.into()) })
			.await
			.expect_err("Failing acquisition should surface the error.");

		assert!(matches!(err, Error::Authentication(_)));
		assert!(slot.peek().await.is_none(), "A failed fetch must not occupy the slot.");

		let token = slot
			.get_or_acquire(|| async { Ok(TokenSecret::new("T2")) })
			.await
			.expect("A later acquisition should succeed.");

		assert_eq!(token.expose(), "T2");
	}

	#[tokio::test]
	async fn concurrent_first_callers_share_one_fetch() {
		let slot = TokenSlot::new();
		let calls = AtomicUsize::new(0);
		let fetch = || {
			slot.get_or_acquire(|| async {
				calls.fetch_add(1, Ordering::SeqCst);

				Ok(TokenSecret::new("T1"))
			})
		};
		let (first, second) = tokio::join!(fetch(), fetch());

		assert_eq!(first.expect("First caller should succeed.").expose(), "T1");
		assert_eq!(second.expect("Second caller should succeed.").expose(), "T1");
		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}
}
