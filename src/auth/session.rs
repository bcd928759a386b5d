//! Persisted session layout kept alongside the credential pair.

// self
use crate::{
	_prelude::*,
	auth::{CredentialPair, TokenUpdate},
};

/// Everything a token store persists for the signed-in user.
///
/// Only [`CredentialPair`] participates in the gateway contract; the login flag and cached
/// profile ride along so [`TokenStore::clear`](crate::store::TokenStore::clear) can drop the
/// whole group at once.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
	/// Access/refresh token pair.
	pub credentials: CredentialPair,
	/// Whether a user completed sign-in.
	pub logged_in: bool,
	/// Cached user profile returned by the backend at sign-in.
	pub profile: Option<serde_json::Value>,
	/// Instant the credentials were last written.
	#[serde(with = "time::serde::rfc3339::option")]
	pub updated_at: Option<OffsetDateTime>,
}
impl Session {
	/// Builds a signed-in session from a credential pair.
	pub fn signed_in(credentials: CredentialPair) -> Self {
		Self {
			credentials,
			logged_in: true,
			profile: None,
			updated_at: Some(OffsetDateTime::now_utc()),
		}
	}

	/// Attaches a cached user profile.
	pub fn with_profile(mut self, profile: serde_json::Value) -> Self {
		self.profile = Some(profile);

		self
	}

	/// Applies a token update and stamps the modification instant.
	pub fn apply(&mut self, update: TokenUpdate) {
		if update.is_empty() {
			return;
		}

		self.credentials.apply(update);
		self.updated_at = Some(OffsetDateTime::now_utc());
	}
}
