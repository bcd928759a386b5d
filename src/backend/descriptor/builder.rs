// std
use std::iter::IntoIterator;
// self
use crate::{
	_prelude::*,
	backend::{BackendDescriptor, TokenLocation, TokenLocations},
};

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum BackendDescriptorError {
	/// Base URL must use HTTP or HTTPS.
	#[error("The base URL must use http or https: {url}.")]
	UnsupportedScheme {
		/// Base URL that failed validation.
		url: String,
	},
	/// Base URL cannot have relative paths joined onto it.
	#[error("The base URL cannot be used as a base: {url}.")]
	CannotBeABase {
		/// Base URL that failed validation.
		url: String,
	},
	/// Refresh path must not be blank.
	#[error("Refresh path must not be empty.")]
	EmptyRefreshPath,
	/// Token location is not a valid header name or JSON pointer.
	#[error("The {token} token location is invalid: {location:?}.")]
	InvalidTokenLocation {
		/// Which token the location belongs to.
		token: &'static str,
		/// Location that failed validation.
		location: TokenLocation,
	},
	/// Default header cannot be sent over HTTP.
	#[error("Default header `{name}` is invalid.")]
	InvalidDefaultHeader {
		/// Offending header name.
		name: String,
	},
}

/// Builder for [`BackendDescriptor`] values.
///
/// Also the wire shape of a serialized descriptor; omitted fields take the builder defaults.
#[derive(Debug, Deserialize)]
pub struct BackendDescriptorBuilder {
	/// Base URL for every request.
	pub base_url: Url,
	/// Refresh endpoint path relative to the base URL.
	#[serde(default = "default_refresh_path")]
	pub refresh_path: String,
	/// Token locations used when reading refresh responses.
	#[serde(default)]
	pub token_locations: TokenLocations,
	/// Headers attached to every request.
	#[serde(default)]
	pub default_headers: BTreeMap<String, String>,
	/// Optional transport timeout.
	#[serde(default)]
	pub request_timeout: Option<Duration>,
}
impl BackendDescriptorBuilder {
	/// Creates a new builder seeded with the provided base URL.
	pub fn new(base_url: Url) -> Self {
		Self {
			base_url,
			refresh_path: BackendDescriptor::DEFAULT_REFRESH_PATH.into(),
			token_locations: TokenLocations::default(),
			default_headers: BTreeMap::new(),
			request_timeout: None,
		}
	}

	/// Overrides the refresh endpoint path.
	pub fn refresh_path(mut self, path: impl Into<String>) -> Self {
		self.refresh_path = path.into();

		self
	}

	/// Overrides where the refresh response carries the new access token.
	pub fn access_token_location(mut self, location: TokenLocation) -> Self {
		self.token_locations.access_token = location;

		self
	}

	/// Overrides where the refresh response carries a rotated refresh token.
	///
	/// Pass `None` when the backend never rotates refresh tokens.
	pub fn refresh_token_location(mut self, location: Option<TokenLocation>) -> Self {
		self.token_locations.refresh_token = location;

		self
	}

	/// Adds a header sent with every request.
	pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.default_headers.insert(name.into(), value.into());

		self
	}

	/// Adds multiple default headers.
	pub fn default_headers<I, K, V>(mut self, headers: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		for (name, value) in headers.into_iter() {
			self.default_headers.insert(name.into(), value.into());
		}

		self
	}

	/// Sets the transport timeout applied to each HTTP call.
	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = Some(timeout);

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<BackendDescriptor, BackendDescriptorError> {
		let mut base_url = self.base_url;

		if !base_url.path().ends_with('/') {
			let path = format!("{}/", base_url.path());

			base_url.set_path(&path);
		}

		let descriptor = BackendDescriptor {
			base_url,
			refresh_path: self.refresh_path.trim().to_owned(),
			token_locations: self.token_locations,
			default_headers: self.default_headers,
			request_timeout: self.request_timeout,
		};

		descriptor.validate()?;

		Ok(descriptor)
	}
}
impl TryFrom<BackendDescriptorBuilder> for BackendDescriptor {
	type Error = BackendDescriptorError;

	fn try_from(builder: BackendDescriptorBuilder) -> Result<Self, Self::Error> {
		builder.build()
	}
}

impl BackendDescriptor {
	/// Validates invariants for the descriptor.
	fn validate(&self) -> Result<(), BackendDescriptorError> {
		if !matches!(self.base_url.scheme(), "http" | "https") {
			return Err(BackendDescriptorError::UnsupportedScheme {
				url: self.base_url.to_string(),
			});
		}
		if self.base_url.cannot_be_a_base() {
			return Err(BackendDescriptorError::CannotBeABase { url: self.base_url.to_string() });
		}
		if self.refresh_path.trim_start_matches('/').is_empty() {
			return Err(BackendDescriptorError::EmptyRefreshPath);
		}

		validate_location("access", &self.token_locations.access_token)?;

		if let Some(refresh) = self.token_locations.refresh_token.as_ref() {
			validate_location("refresh", refresh)?;
		}

		for (name, value) in &self.default_headers {
			validate_header(name, value)?;
		}

		Ok(())
	}
}

fn default_refresh_path() -> String {
	BackendDescriptor::DEFAULT_REFRESH_PATH.into()
}

fn validate_location(
	token: &'static str,
	location: &TokenLocation,
) -> Result<(), BackendDescriptorError> {
	if location.is_well_formed() {
		Ok(())
	} else {
		Err(BackendDescriptorError::InvalidTokenLocation { token, location: location.clone() })
	}
}

fn validate_header(name: &str, value: &str) -> Result<(), BackendDescriptorError> {
	let name_ok = TokenLocation::header(name).is_well_formed();
	let value_ok = value.bytes().all(|b| b == b'\t' || (b' '..=b'~').contains(&b));

	if name_ok && value_ok {
		Ok(())
	} else {
		Err(BackendDescriptorError::InvalidDefaultHeader { name: name.to_owned() })
	}
}
