//! Caller-facing request descriptors.

// self
use crate::{_prelude::*, error::ConfigError, http::Method};

/// Body attached to a [`RequestDescriptor`].
#[derive(Clone, Debug, PartialEq)]
pub enum RequestBody {
	/// JSON document sent as `application/json`.
	Json(serde_json::Value),
	/// Pre-encoded payload (multipart forms, uploads) with its own content type.
	Bytes {
		/// Value for the `Content-Type` header.
		content_type: String,
		/// Encoded payload.
		data: Vec<u8>,
	},
}
impl RequestBody {
	pub(crate) fn content_type(&self) -> Option<&str> {
		match self {
			Self::Json(_) => None,
			Self::Bytes { content_type, .. } => Some(content_type),
		}
	}

	pub(crate) fn encode(&self) -> Result<Vec<u8>, ConfigError> {
		match self {
			Self::Json(value) => serde_json::to_vec(value).map_err(ConfigError::SerializeBody),
			Self::Bytes { data, .. } => Ok(data.clone()),
		}
	}
}

/// One logical request issued through the [`Gateway`](crate::gateway::Gateway).
///
/// The gateway only borrows descriptors, so the same value can be replayed after a refresh or
/// reused by the caller.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestDescriptor {
	/// Path relative to the backend base URL; may carry a query string.
	pub path: String,
	/// Request method.
	pub method: Method,
	/// Caller headers, overriding gateway defaults case-insensitively.
	pub headers: Vec<(String, String)>,
	/// Optional request body.
	pub body: Option<RequestBody>,
}
impl RequestDescriptor {
	/// Creates a descriptor for `method` + `path`.
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self { path: path.into(), method, headers: Vec::new(), body: None }
	}

	/// Shorthand for a `GET` descriptor.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::Get, path)
	}

	/// Shorthand for a `POST` descriptor.
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::Post, path)
	}

	/// Shorthand for a `PUT` descriptor.
	pub fn put(path: impl Into<String>) -> Self {
		Self::new(Method::Put, path)
	}

	/// Shorthand for a `PATCH` descriptor.
	pub fn patch(path: impl Into<String>) -> Self {
		Self::new(Method::Patch, path)
	}

	/// Shorthand for a `DELETE` descriptor.
	pub fn delete(path: impl Into<String>) -> Self {
		Self::new(Method::Delete, path)
	}

	/// Adds a caller header.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}

	/// Attaches a JSON body.
	pub fn json(mut self, value: serde_json::Value) -> Self {
		self.body = Some(RequestBody::Json(value));

		self
	}

	/// Serializes `value` into a JSON body.
	pub fn try_json<T>(self, value: &T) -> Result<Self, ConfigError>
	where
		T: ?Sized + Serialize,
	{
		let value = serde_json::to_value(value).map_err(ConfigError::SerializeBody)?;

		Ok(self.json(value))
	}

	/// Attaches a pre-encoded body with its own content type.
	pub fn bytes(mut self, content_type: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
		self.body = Some(RequestBody::Bytes { content_type: content_type.into(), data: data.into() });

		self
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[derive(Serialize)]
	struct Guest<'a> {
		name: &'a str,
		plus_ones: u8,
	}

	#[test]
	fn try_json_serializes_structs() {
		let descriptor = RequestDescriptor::post("/guests")
			.try_json(&Guest { name: "Ada", plus_ones: 2 })
			.expect("Guest should serialize.");

		assert_eq!(descriptor.method, Method::Post);
		assert_eq!(
			descriptor.body,
			Some(RequestBody::Json(serde_json::json!({ "name": "Ada", "plus_ones": 2 })))
		);
	}

	#[test]
	fn bytes_body_reports_its_content_type() {
		let body = RequestDescriptor::put("/avatar")
			.bytes("multipart/form-data; boundary=xyz", b"--xyz--".to_vec())
			.body
			.expect("Body should be attached.");

		assert_eq!(body.content_type(), Some("multipart/form-data; boundary=xyz"));
		assert_eq!(body.encode().expect("Bytes always encode."), b"--xyz--".to_vec());
	}
}
