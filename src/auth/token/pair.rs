//! Access/refresh credential pair plus the partial updates applied to it.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Access and refresh tokens owned by a [`TokenStore`](crate::store::TokenStore).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialPair {
	/// Short-lived bearer credential presented on every authenticated request.
	pub access_token: Option<TokenSecret>,
	/// Longer-lived credential exchanged for a new access token.
	pub refresh_token: Option<TokenSecret>,
}
impl CredentialPair {
	/// Creates a pair holding both tokens.
	pub fn new(access_token: impl Into<TokenSecret>, refresh_token: impl Into<TokenSecret>) -> Self {
		Self { access_token: Some(access_token.into()), refresh_token: Some(refresh_token.into()) }
	}

	/// Returns `true` when neither token is present.
	pub fn is_empty(&self) -> bool {
		self.access_token.is_none() && self.refresh_token.is_none()
	}

	/// Applies a partial update, leaving omitted fields untouched.
	pub fn apply(&mut self, update: TokenUpdate) {
		if let Some(access) = update.access_token {
			self.access_token = Some(access);
		}
		if let Some(refresh) = update.refresh_token {
			self.refresh_token = Some(refresh);
		}
	}
}

/// Partial write against a [`CredentialPair`].
///
/// Fields left as `None` keep whatever the store currently holds; there is no way to erase a
/// single token through an update; use [`TokenStore::clear`](crate::store::TokenStore::clear).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenUpdate {
	/// Replacement access token, if any.
	pub access_token: Option<TokenSecret>,
	/// Replacement refresh token, if any.
	pub refresh_token: Option<TokenSecret>,
}
impl TokenUpdate {
	/// Update that only replaces the access token.
	pub fn access(token: impl Into<TokenSecret>) -> Self {
		Self { access_token: Some(token.into()), refresh_token: None }
	}

	/// Update that only replaces the refresh token.
	pub fn refresh(token: impl Into<TokenSecret>) -> Self {
		Self { access_token: None, refresh_token: Some(token.into()) }
	}

	/// Adds a replacement refresh token to the update.
	pub fn with_refresh_token(mut self, token: impl Into<TokenSecret>) -> Self {
		self.refresh_token = Some(token.into());

		self
	}

	/// Returns `true` when the update carries no fields.
	pub fn is_empty(&self) -> bool {
		self.access_token.is_none() && self.refresh_token.is_none()
	}
}
impl From<IssuedTokens> for TokenUpdate {
	fn from(issued: IssuedTokens) -> Self {
		Self { access_token: Some(issued.access_token), refresh_token: issued.refresh_token }
	}
}

/// Tokens returned by a successful refresh exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IssuedTokens {
	/// Newly minted access token.
	pub access_token: TokenSecret,
	/// Rotated refresh token, present only when the backend issued one.
	pub refresh_token: Option<TokenSecret>,
}
impl IssuedTokens {
	/// Creates a result carrying only a new access token.
	pub fn new(access_token: impl Into<TokenSecret>) -> Self {
		Self { access_token: access_token.into(), refresh_token: None }
	}

	/// Attaches a rotated refresh token.
	pub fn with_refresh_token(mut self, token: impl Into<TokenSecret>) -> Self {
		self.refresh_token = Some(token.into());

		self
	}
}
