//! Parsed downstream responses.

// self
use crate::{_prelude::*, http::HttpResponse};

/// Response returned by [`Gateway::request`](crate::gateway::Gateway::request).
///
/// Non-2xx statuses other than the refresh trigger are returned as-is; backends often encode
/// business failures in the JSON body, so interpreting them is up to the caller.
#[derive(Clone, Debug, PartialEq)]
pub struct GatewayResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response headers keyed by lowercase name.
	pub headers: BTreeMap<String, String>,
	/// Parsed JSON body; `None` when the body was empty.
	pub body: Option<serde_json::Value>,
}
impl GatewayResponse {
	pub(crate) fn from_http(response: HttpResponse) -> Result<Self> {
		let HttpResponse { status, headers, body } = response;
		let body = if body.iter().all(u8::is_ascii_whitespace) {
			None
		} else {
			let mut deserializer = serde_json::Deserializer::from_slice(&body);
			let value = serde_path_to_error::deserialize(&mut deserializer)
				.map_err(|source| Error::Decode { status, source })?;

			Some(value)
		};

		Ok(Self { status, headers, body })
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Returns the value of a header, matched case-insensitively.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
	}

	/// Decodes the body into `T`; an empty body decodes from JSON `null`.
	pub fn json<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let value = self.body.clone().unwrap_or(serde_json::Value::Null);

		serde_path_to_error::deserialize(value)
			.map_err(|source| Error::Decode { status: self.status, source })
	}
}
