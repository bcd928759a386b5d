//! Storage contracts and built-in store implementations for the session credentials.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{Session, TokenSecret, TokenUpdate},
};

/// Boxed future returned by [`TokenStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Durable home of the credential pair.
///
/// Implementations must apply [`save_tokens`](TokenStore::save_tokens) and
/// [`clear`](TokenStore::clear) atomically with respect to concurrent reads: a reader observes
/// either the old or the new pair, never a mix.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Returns the current access token, if any.
	fn access_token(&self) -> StoreFuture<'_, Option<TokenSecret>>;

	/// Returns the current refresh token, if any.
	fn refresh_token(&self) -> StoreFuture<'_, Option<TokenSecret>>;

	/// Writes only the fields present in `update`.
	fn save_tokens(&self, update: TokenUpdate) -> StoreFuture<'_, ()>;

	/// Removes both tokens, the login flag, and the cached profile as one operation.
	fn clear(&self) -> StoreFuture<'_, ()>;

	/// Returns a snapshot of the whole persisted session.
	fn session(&self) -> StoreFuture<'_, Session>;

	/// Replaces the persisted session after a completed sign-in.
	fn login(&self, session: Session) -> StoreFuture<'_, ()>;
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
