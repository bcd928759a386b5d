//! Transport primitives for authenticated requests and refresh exchanges.
//!
//! The module exposes [`GatewayHttpClient`] alongside crate-owned [`HttpRequest`],
//! [`HttpResponse`], and [`Method`] values so downstream crates can plug in any HTTP stack
//! without the gateway depending on its types. Implementations translate transport failures
//! into [`TransportError`](crate::error::TransportError) (timeouts included) and never
//! interpret status codes; status handling belongs to the gateway.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// self
use crate::_prelude::*;
#[cfg(feature = "reqwest")]
use crate::error::{ConfigError, TransportError};

/// Boxed future returned by [`GatewayHttpClient::execute`].
pub type HttpFuture<'a> = Pin<Box<dyn Future<Output = Result<HttpResponse>> + 'a + Send>>;

/// Abstraction over HTTP transports used by the gateway and the refresh exchange.
///
/// The trait is the gateway's only dependency on an HTTP stack. Implementations must be
/// `Send + Sync + 'static` so one transport can be shared by several gateways behind an `Arc`.
pub trait GatewayHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and buffers the full response.
	///
	/// Any HTTP status, including 4xx/5xx, is a successful call; only failures to obtain a
	/// response are errors.
	fn execute(&self, request: HttpRequest) -> HttpFuture<'_>;
}

/// HTTP methods supported by the gateway.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
	#[default]
	/// `GET`.
	Get,
	/// `POST`.
	Post,
	/// `PUT`.
	Put,
	/// `PATCH`.
	Patch,
	/// `DELETE`.
	Delete,
	/// `HEAD`.
	Head,
	/// `OPTIONS`.
	Options,
}
impl Method {
	/// Returns the wire representation.
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
			Method::Put => "PUT",
			Method::Patch => "PATCH",
			Method::Delete => "DELETE",
			Method::Head => "HEAD",
			Method::Options => "OPTIONS",
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
#[cfg(feature = "reqwest")]
impl From<Method> for reqwest::Method {
	fn from(method: Method) -> Self {
		match method {
			Method::Get => reqwest::Method::GET,
			Method::Post => reqwest::Method::POST,
			Method::Put => reqwest::Method::PUT,
			Method::Patch => reqwest::Method::PATCH,
			Method::Delete => reqwest::Method::DELETE,
			Method::Head => reqwest::Method::HEAD,
			Method::Options => reqwest::Method::OPTIONS,
		}
	}
}

/// Fully resolved outbound request handed to a [`GatewayHttpClient`].
#[derive(Clone, PartialEq, Eq)]
pub struct HttpRequest {
	/// Request method.
	pub method: Method,
	/// Absolute request URL.
	pub url: Url,
	/// Header pairs in send order; names are unique case-insensitively.
	pub headers: Vec<(String, String)>,
	/// Encoded request body.
	pub body: Option<Vec<u8>>,
	/// Transport timeout for this call.
	pub timeout: Option<Duration>,
}
impl HttpRequest {
	/// Creates a request without headers or body.
	pub fn new(method: Method, url: Url) -> Self {
		Self { method, url, headers: Vec::new(), body: None, timeout: None }
	}

	/// Returns the value of a header, matched case-insensitively.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}

	/// Inserts or replaces a header, matched case-insensitively.
	pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
		let name = name.into();
		let value = value.into();

		match self.headers.iter_mut().find(|(key, _)| key.eq_ignore_ascii_case(&name)) {
			Some(slot) => *slot = (name, value),
			None => self.headers.push((name, value)),
		}
	}
}
impl Debug for HttpRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let headers = self
			.headers
			.iter()
			.map(|(name, value)| {
				if name.eq_ignore_ascii_case("authorization") {
					(name.as_str(), "<redacted>")
				} else {
					(name.as_str(), value.as_str())
				}
			})
			.collect::<Vec<_>>();

		f.debug_struct("HttpRequest")
			.field("method", &self.method)
			.field("url", &self.url.as_str())
			.field("headers", &headers)
			.field("body_len", &self.body.as_ref().map(Vec::len))
			.field("timeout", &self.timeout)
			.finish()
	}
}

/// Buffered response returned by a [`GatewayHttpClient`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HttpResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response headers keyed by lowercase name.
	pub headers: BTreeMap<String, String>,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl HttpResponse {
	/// Returns the value of a header, matched case-insensitively.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	fn build_request(&self, request: HttpRequest) -> Result<reqwest::Request> {
		let mut builder = self.0.request(request.method.into(), request.url);

		for (name, value) in &request.headers {
			let header_name = reqwest::header::HeaderName::from_bytes(name.as_bytes())
				.map_err(|_| ConfigError::InvalidHeader { name: name.clone() })?;
			let header_value = reqwest::header::HeaderValue::from_str(value)
				.map_err(|_| ConfigError::InvalidHeader { name: name.clone() })?;

			builder = builder.header(header_name, header_value);
		}
		if let Some(body) = request.body {
			builder = builder.body(body);
		}
		if let Some(timeout) = request.timeout {
			builder = builder.timeout(timeout);
		}

		builder.build().map_err(|e| ConfigError::from(e).into())
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl GatewayHttpClient for ReqwestHttpClient {
	fn execute(&self, request: HttpRequest) -> HttpFuture<'_> {
		Box::pin(async move {
			let request = self.build_request(request)?;
			let response = self.0.execute(request).await.map_err(TransportError::from)?;
			let status = response.status().as_u16();
			let headers = response
				.headers()
				.iter()
				.filter_map(|(name, value)| {
					value.to_str().ok().map(|value| (name.as_str().to_owned(), value.to_owned()))
				})
				.collect();
			let body = response.bytes().await.map_err(TransportError::from)?.to_vec();

			Ok(HttpResponse { status, headers, body })
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn request() -> HttpRequest {
		HttpRequest::new(
			Method::Post,
			Url::parse("https://api.example.com/v1/foo").expect("Fixture URL should parse."),
		)
	}

	#[test]
	fn set_header_replaces_case_insensitively() {
		let mut request = request();

		request.set_header("Content-Type", "application/json");
		request.set_header("content-type", "multipart/form-data; boundary=x");

		assert_eq!(request.headers.len(), 1);
		assert_eq!(request.header("CONTENT-TYPE"), Some("multipart/form-data; boundary=x"));
	}

	#[test]
	fn debug_output_redacts_authorization() {
		let mut request = request();

		request.set_header("Authorization", "Bearer secret-token");

		let rendered = format!("{request:?}");

		assert!(!rendered.contains("secret-token"));
		assert!(rendered.contains("<redacted>"));
	}

	#[test]
	fn response_header_lookup_ignores_case() {
		let response = HttpResponse {
			status: 204,
			headers: [("accesstoken".to_owned(), "tok".to_owned())].into_iter().collect(),
			body: Vec::new(),
		};

		assert_eq!(response.header("AccessToken"), Some("tok"));
		assert!(response.is_success());
	}

	#[test]
	fn method_serializes_uppercase() {
		assert_eq!(
			serde_json::to_string(&Method::Patch).expect("Method should serialize."),
			"\"PATCH\""
		);
		assert_eq!(Method::default(), Method::Get);
	}
}
