//! Thread-safe in-memory [`TokenStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::{Session, TokenSecret, TokenUpdate},
	store::{StoreFuture, TokenStore},
};

type SessionCell = Arc<RwLock<Session>>;

/// Thread-safe storage backend that keeps the session in-process.
///
/// Clones share the same session.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(SessionCell);
impl MemoryStore {
	/// Creates a store seeded with `session`.
	pub fn with_session(session: Session) -> Self {
		Self(Arc::new(RwLock::new(session)))
	}

	fn read_now<T>(cell: SessionCell, f: impl FnOnce(&Session) -> T) -> T {
		f(&*cell.read())
	}
}
impl TokenStore for MemoryStore {
	fn access_token(&self) -> StoreFuture<'_, Option<TokenSecret>> {
		let cell = self.0.clone();

		Box::pin(async move { Ok(Self::read_now(cell, |s| s.credentials.access_token.clone())) })
	}

	fn refresh_token(&self) -> StoreFuture<'_, Option<TokenSecret>> {
		let cell = self.0.clone();

		Box::pin(async move { Ok(Self::read_now(cell, |s| s.credentials.refresh_token.clone())) })
	}

	fn save_tokens(&self, update: TokenUpdate) -> StoreFuture<'_, ()> {
		let cell = self.0.clone();

		Box::pin(async move {
			cell.write().apply(update);

			Ok(())
		})
	}

	fn clear(&self) -> StoreFuture<'_, ()> {
		let cell = self.0.clone();

		Box::pin(async move {
			*cell.write() = Session::default();

			Ok(())
		})
	}

	fn session(&self) -> StoreFuture<'_, Session> {
		let cell = self.0.clone();

		Box::pin(async move { Ok(Self::read_now(cell, Clone::clone)) })
	}

	fn login(&self, session: Session) -> StoreFuture<'_, ()> {
		let cell = self.0.clone();

		Box::pin(async move {
			*cell.write() = session;

			Ok(())
		})
	}
}
