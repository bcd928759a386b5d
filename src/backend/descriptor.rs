//! Backend descriptor data structures shared by the gateway and the refresh exchange.

/// Builder API for assembling backend descriptors.
pub mod builder;
/// Token location helpers for refresh responses.
pub mod location;

pub use builder::*;
pub use location::*;

// self
use crate::{_prelude::*, error::ConfigError};

/// Immutable backend descriptor consumed by gateways and refresh exchanges.
///
/// Deserialization goes through [`BackendDescriptorBuilder`], so decoded descriptors are
/// normalized and validated exactly like built ones.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BackendDescriptorBuilder")]
pub struct BackendDescriptor {
	/// Base URL every request path is joined onto; always ends with `/`.
	pub base_url: Url,
	/// Path of the refresh-token endpoint, relative to [`base_url`](Self::base_url).
	pub refresh_path: String,
	/// Where the refresh response carries the new tokens.
	pub token_locations: TokenLocations,
	/// Headers attached to every request unless the caller overrides them.
	pub default_headers: BTreeMap<String, String>,
	/// Transport timeout applied to each HTTP call.
	pub request_timeout: Option<Duration>,
}
impl BackendDescriptor {
	/// Path used for the refresh exchange unless overridden.
	pub const DEFAULT_REFRESH_PATH: &str = "refresh-token";

	/// Creates a new builder for the provided base URL.
	pub fn builder(base_url: Url) -> BackendDescriptorBuilder {
		BackendDescriptorBuilder::new(base_url)
	}

	/// Resolves a request path against the base URL.
	///
	/// Leading slashes are ignored so `"/foo"` and `"foo"` both land under the base path.
	/// Absolute URLs and paths climbing above the base path are rejected, so credentials never
	/// leave the configured backend.
	pub fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
		let relative = path.trim_start_matches('/');
		let url = self
			.base_url
			.join(relative)
			.map_err(|source| ConfigError::InvalidPath { path: path.to_owned(), source })?;

		if url.origin() != self.base_url.origin() || !url.path().starts_with(self.base_url.path())
		{
			return Err(ConfigError::OutsideBase { path: path.to_owned() });
		}

		Ok(url)
	}

	/// Resolves the refresh-token endpoint.
	pub fn refresh_endpoint(&self) -> Result<Url, ConfigError> {
		self.endpoint(&self.refresh_path)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn descriptor(base: &str) -> BackendDescriptor {
		BackendDescriptor::builder(Url::parse(base).expect("Fixture base URL should parse."))
			.build()
			.expect("Fixture descriptor should build.")
	}

	#[test]
	fn endpoint_keeps_the_base_path_prefix() {
		let descriptor = descriptor("https://api.example.com/v1");

		assert_eq!(
			descriptor.endpoint("/vendors").expect("Path should join.").as_str(),
			"https://api.example.com/v1/vendors"
		);
		assert_eq!(
			descriptor.endpoint("guests?event=4").expect("Path should join.").as_str(),
			"https://api.example.com/v1/guests?event=4"
		);
		assert_eq!(
			descriptor.refresh_endpoint().expect("Refresh path should join.").as_str(),
			"https://api.example.com/v1/refresh-token"
		);
	}

	#[test]
	fn endpoint_rejects_paths_leaving_the_backend() {
		let descriptor = descriptor("https://api.example.com/v1");

		for path in [
			"https://evil.example/steal",
			"http://api.example.com/v1/foo",
			"https://api.example.com:8443/v1/foo",
			"../admin",
			"%2e%2e/admin",
		] {
			let err = descriptor.endpoint(path).expect_err("Escaping paths should be rejected.");

			assert!(
				matches!(&err, ConfigError::OutsideBase { path: rejected } if rejected == path),
				"Unexpected error for {path}: {err:?}."
			);
		}

		assert_eq!(
			descriptor.endpoint("//evil.example/steal").expect("Path should join.").as_str(),
			"https://api.example.com/v1/evil.example/steal"
		);
	}
}
