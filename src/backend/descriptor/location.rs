// self
use crate::{
	_prelude::*,
	auth::{IssuedTokens, TokenSecret},
	http::HttpResponse,
};

/// Where a refresh response carries a token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "in", content = "key", rename_all = "snake_case")]
pub enum TokenLocation {
	/// Response header, matched case-insensitively.
	Header(String),
	/// JSON pointer into the response body (e.g. `/data/accessToken`).
	Body(String),
}
impl TokenLocation {
	/// Token carried in the named response header.
	pub fn header(name: impl Into<String>) -> Self {
		Self::Header(name.into())
	}

	/// Token carried in the response body at the given JSON pointer.
	pub fn body(pointer: impl Into<String>) -> Self {
		Self::Body(pointer.into())
	}

	/// Reads the token from `response`; empty values count as absent.
	pub fn extract(&self, response: &HttpResponse) -> Option<TokenSecret> {
		let raw = match self {
			Self::Header(name) => response.header(name).map(str::to_owned),
			Self::Body(pointer) => {
				let body = serde_json::from_slice::<serde_json::Value>(&response.body).ok()?;

				body.pointer(pointer).and_then(serde_json::Value::as_str).map(str::to_owned)
			},
		}?;
		let trimmed = raw.trim();

		if trimmed.is_empty() { None } else { Some(TokenSecret::new(trimmed)) }
	}

	pub(crate) fn is_well_formed(&self) -> bool {
		match self {
			Self::Header(name) =>
				!name.is_empty()
					&& name.bytes().all(|b| b.is_ascii_alphanumeric() || b"-_.!#$%&'*+^`|~".contains(&b)),
			Self::Body(pointer) => pointer.starts_with('/'),
		}
	}
}

/// Token locations used when reading a refresh response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenLocations {
	/// Location of the new access token (required in every successful response).
	pub access_token: TokenLocation,
	/// Location of a rotated refresh token, if the backend ever issues one.
	pub refresh_token: Option<TokenLocation>,
}
impl TokenLocations {
	/// Reads issued tokens from a refresh response.
	///
	/// Returns `None` when the access token is missing; a missing refresh token only means the
	/// backend did not rotate it.
	pub fn extract(&self, response: &HttpResponse) -> Option<IssuedTokens> {
		let access_token = self.access_token.extract(response)?;
		let refresh_token = self.refresh_token.as_ref().and_then(|location| location.extract(response));

		Some(IssuedTokens { access_token, refresh_token })
	}
}
impl Default for TokenLocations {
	fn default() -> Self {
		Self {
			access_token: TokenLocation::header("accesstoken"),
			refresh_token: Some(TokenLocation::header("refreshtoken")),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn response(headers: &[(&str, &str)], body: &str) -> HttpResponse {
		HttpResponse {
			status: 200,
			headers: headers.iter().map(|(k, v)| (k.to_ascii_lowercase(), (*v).to_owned())).collect(),
			body: body.as_bytes().to_vec(),
		}
	}

	#[test]
	fn default_locations_read_lowercase_headers() {
		let issued = TokenLocations::default()
			.extract(&response(&[("AccessToken", "tok2"), ("refreshtoken", "ref2")], ""))
			.expect("Header tokens should be extracted.");

		assert_eq!(issued.access_token.expose(), "tok2");
		assert_eq!(issued.refresh_token.as_ref().map(TokenSecret::expose), Some("ref2"));
	}

	#[test]
	fn body_locations_follow_json_pointers() {
		let locations = TokenLocations {
			access_token: TokenLocation::body("/data/accessToken"),
			refresh_token: Some(TokenLocation::body("/data/refreshToken")),
		};
		let issued = locations
			.extract(&response(&[], r#"{"data":{"accessToken":"tok3"}}"#))
			.expect("Body token should be extracted.");

		assert_eq!(issued.access_token.expose(), "tok3");
		assert!(issued.refresh_token.is_none());
	}

	#[test]
	fn blank_or_missing_access_token_yields_nothing() {
		let locations = TokenLocations::default();

		assert!(locations.extract(&response(&[("accesstoken", "  ")], "")).is_none());
		assert!(locations.extract(&response(&[], r#"{"accesstoken":"x"}"#)).is_none());
	}

	#[test]
	fn well_formedness_rejects_bad_keys() {
		assert!(TokenLocation::header("accesstoken").is_well_formed());
		assert!(!TokenLocation::header("access token").is_well_formed());
		assert!(!TokenLocation::header("").is_well_formed());
		assert!(TokenLocation::body("/token").is_well_formed());
		assert!(!TokenLocation::body("token").is_well_formed());
	}
}
