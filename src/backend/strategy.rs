//! Session strategy hooks that customize expiry detection and token extraction.
//!
//! Implementations decide which downstream statuses mean "the access token expired" and how a
//! refresh response is read, without tying the gateway to any particular HTTP client.

// self
use crate::{
	_prelude::*,
	auth::IssuedTokens,
	backend::TokenLocations,
	http::HttpResponse,
};

/// Strategy hook that lets backends adjust refresh triggering and token extraction.
///
/// Implementors are required to be `Send + Sync`. Both hooks have defaults, so override only
/// what the backend contract needs.
pub trait SessionStrategy: Send + Sync {
	/// Returns `true` when a downstream status means the access token must be refreshed.
	///
	/// The default treats only `401 Unauthorized` as expiry. Backends that answer `403` for
	/// expired tokens should override this.
	fn requires_refresh(&self, status: u16) -> bool {
		status == 401
	}

	/// Reads the issued tokens from a successful refresh response.
	///
	/// The default consults the descriptor's configured [`TokenLocations`].
	fn extract_tokens(
		&self,
		locations: &TokenLocations,
		response: &HttpResponse,
	) -> Option<IssuedTokens> {
		locations.extract(response)
	}
}

/// Default strategy: `401` triggers a refresh, tokens are read from the configured locations.
#[derive(Debug, Default)]
pub struct DefaultSessionStrategy;
impl Display for DefaultSessionStrategy {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("default-session-strategy")
	}
}
impl SessionStrategy for DefaultSessionStrategy {}

/// Strategy for backends that answer either `401` or `403` when the access token expired.
#[derive(Debug, Default)]
pub struct ForbiddenAsExpiredStrategy;
impl SessionStrategy for ForbiddenAsExpiredStrategy {
	fn requires_refresh(&self, status: u16) -> bool {
		matches!(status, 401 | 403)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn default_strategy_only_refreshes_on_401() {
		let strategy = DefaultSessionStrategy;

		assert!(strategy.requires_refresh(401));
		assert!(!strategy.requires_refresh(403));
		assert!(!strategy.requires_refresh(500));
		assert_eq!(strategy.to_string(), "default-session-strategy");
	}

	#[test]
	fn forbidden_strategy_refreshes_on_403() {
		let strategy = ForbiddenAsExpiredStrategy;

		assert!(strategy.requires_refresh(401));
		assert!(strategy.requires_refresh(403));
		assert!(!strategy.requires_refresh(404));
	}

	#[test]
	fn custom_strategy_can_read_tokens_anywhere() {
		struct QueryStrategy;
		impl SessionStrategy for QueryStrategy {
			fn extract_tokens(
				&self,
				_locations: &TokenLocations,
				response: &HttpResponse,
			) -> Option<IssuedTokens> {
				let body = std::str::from_utf8(&response.body).ok()?;

				body.strip_prefix("token=").map(IssuedTokens::new)
			}
		}

		let response =
			HttpResponse { status: 200, headers: BTreeMap::new(), body: b"token=abc".to_vec() };
		let issued = QueryStrategy
			.extract_tokens(&TokenLocations::default(), &response)
			.expect("Custom strategy should extract the token.");

		assert_eq!(issued.access_token.expose(), "abc");
	}
}
