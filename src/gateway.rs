//! Authenticated request gateway with one replay after a token refresh.
//!
//! [`Gateway::request`] attaches the stored access token, sends the request, and when the
//! backend answers with a refresh-triggering status asks the shared
//! [`RefreshCoordinator`] for a new token and replays the request exactly once. A second
//! rejection clears the session and fails with [`Error::Unauthorized`]; a request is never
//! attempted more than twice.

pub mod request;
pub mod response;

pub use request::*;
pub use response::*;

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	backend::{BackendDescriptor, SessionStrategy},
	http::{GatewayHttpClient, HttpRequest, HttpResponse},
	obs::{self, OpKind, OpOutcome, OpSpan},
	refresh::{HttpRefreshExchange, RefreshCoordinator},
	store::TokenStore,
};
#[cfg(feature = "reqwest")]
use crate::{backend::DefaultSessionStrategy, http::ReqwestHttpClient};

#[cfg(feature = "reqwest")]
/// Gateway specialized for the crate's default reqwest transport.
pub type ReqwestGateway = Gateway<ReqwestHttpClient>;

/// Issues authenticated requests against a single backend.
///
/// The gateway owns the HTTP client, token store, descriptor, and strategy references, plus the
/// refresh coordinator that guards the refresh-token exchange. Clone it freely; clones share
/// every component, including the coordinator.
pub struct Gateway<C>
where
	C: ?Sized + GatewayHttpClient,
{
	/// HTTP client used for every outbound request.
	pub http_client: Arc<C>,
	/// Token store holding the session credentials.
	pub store: Arc<dyn TokenStore>,
	/// Backend descriptor resolving paths, defaults, and timeouts.
	pub descriptor: BackendDescriptor,
	/// Strategy deciding which statuses trigger a refresh.
	pub strategy: Arc<dyn SessionStrategy>,
	/// Single-flight refresh coordinator for this backend session.
	pub coordinator: Arc<RefreshCoordinator>,
}
impl<C> Gateway<C>
where
	C: ?Sized + GatewayHttpClient,
{
	/// Creates a gateway that reuses the caller-provided transport and strategy.
	///
	/// A dedicated [`RefreshCoordinator`] backed by [`HttpRefreshExchange`] is created; use
	/// [`Gateway::with_coordinator`] to share one between gateways instead.
	pub fn with_http_client(
		store: Arc<dyn TokenStore>,
		descriptor: BackendDescriptor,
		strategy: Arc<dyn SessionStrategy>,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		let http_client = http_client.into();
		let exchange = HttpRefreshExchange::<C>::new(
			http_client.clone(),
			descriptor.clone(),
			strategy.clone(),
		);
		let coordinator = Arc::new(RefreshCoordinator::new(store.clone(), Arc::new(exchange)));

		Self { http_client, store, descriptor, strategy, coordinator }
	}

	/// Replaces the refresh coordinator, typically with one shared by sibling gateways.
	///
	/// The coordinator must persist into the same store as this gateway.
	pub fn with_coordinator(mut self, coordinator: Arc<RefreshCoordinator>) -> Self {
		self.coordinator = coordinator;

		self
	}

	/// Performs one logical authenticated request.
	///
	/// # Errors
	///
	/// - [`Error::Transport`] when either attempt fails to reach the backend; the session is kept.
	/// - [`Error::NoRefreshToken`] / [`Error::RefreshFailed`] when the refresh cycle fails.
	/// - [`Error::Unauthorized`] when the replay is rejected again.
	/// - [`Error::Decode`] when the response body is not JSON.
	pub async fn request(&self, request: &RequestDescriptor) -> Result<GatewayResponse> {
		const KIND: OpKind = OpKind::Request;

		let span = OpSpan::new(KIND, "request");

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let result = span
			.instrument(async {
				let token = self.store.access_token().await?;
				let response = self.dispatch(request, token.as_ref()).await?;

				if !self.strategy.requires_refresh(response.status) {
					return GatewayResponse::from_http(response);
				}

				let fresh = self.coordinator.refresh(token.as_ref()).await?;

				span.note("replay");

				let replayed = self.dispatch(request, Some(&fresh)).await?;

				if self.strategy.requires_refresh(replayed.status) {
					if let Err(e) = self.store.clear().await {
						span.warn("clear_failed", &e);
						self.coordinator.metrics().record_clear_failure();
					}

					return Err(Error::Unauthorized);
				}

				GatewayResponse::from_http(replayed)
			})
			.await;

		match &result {
			Ok(_) => obs::record_op_outcome(KIND, OpOutcome::Success),
			Err(_) => obs::record_op_outcome(KIND, OpOutcome::Failure),
		}

		result
	}

	/// Shorthand for a `GET` request.
	pub async fn get(&self, path: &str) -> Result<GatewayResponse> {
		self.request(&RequestDescriptor::get(path)).await
	}

	/// Shorthand for a `POST` request with a JSON body.
	pub async fn post(&self, path: &str, body: serde_json::Value) -> Result<GatewayResponse> {
		self.request(&RequestDescriptor::post(path).json(body)).await
	}

	/// Shorthand for a `PUT` request with a JSON body.
	pub async fn put(&self, path: &str, body: serde_json::Value) -> Result<GatewayResponse> {
		self.request(&RequestDescriptor::put(path).json(body)).await
	}

	/// Shorthand for a `PATCH` request with a JSON body.
	pub async fn patch(&self, path: &str, body: serde_json::Value) -> Result<GatewayResponse> {
		self.request(&RequestDescriptor::patch(path).json(body)).await
	}

	/// Shorthand for a `DELETE` request.
	pub async fn delete(&self, path: &str) -> Result<GatewayResponse> {
		self.request(&RequestDescriptor::delete(path)).await
	}

	/// Clears the stored session.
	pub async fn logout(&self) -> Result<()> {
		self.store.clear().await?;

		Ok(())
	}

	async fn dispatch(
		&self,
		request: &RequestDescriptor,
		token: Option<&TokenSecret>,
	) -> Result<HttpResponse> {
		let outbound = self.build_request(request, token)?;

		self.http_client.execute(outbound).await
	}

	fn build_request(
		&self,
		request: &RequestDescriptor,
		token: Option<&TokenSecret>,
	) -> Result<HttpRequest> {
		let url = self.descriptor.endpoint(&request.path)?;
		let mut outbound = HttpRequest::new(request.method, url);

		outbound.set_header("Content-Type", "application/json");

		for (name, value) in &self.descriptor.default_headers {
			outbound.set_header(name.as_str(), value.as_str());
		}
		if let Some(body) = request.body.as_ref() {
			if let Some(content_type) = body.content_type() {
				outbound.set_header("Content-Type", content_type);
			}

			outbound.body = Some(body.encode()?);
		}
		for (name, value) in &request.headers {
			outbound.set_header(name.as_str(), value.as_str());
		}
		if let Some(token) = token {
			outbound.set_header("Authorization", token.bearer());
		}

		outbound.timeout = self.descriptor.request_timeout;

		Ok(outbound)
	}
}
#[cfg(feature = "reqwest")]
impl Gateway<ReqwestHttpClient> {
	/// Creates a new gateway for the provided descriptor.
	///
	/// The gateway provisions its own reqwest-backed transport and the default session strategy
	/// (`401` triggers a refresh).
	pub fn new(store: Arc<dyn TokenStore>, descriptor: BackendDescriptor) -> Self {
		Self::with_http_client(
			store,
			descriptor,
			Arc::new(DefaultSessionStrategy),
			ReqwestHttpClient::default(),
		)
	}
}
impl<C> Clone for Gateway<C>
where
	C: ?Sized + GatewayHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			store: self.store.clone(),
			descriptor: self.descriptor.clone(),
			strategy: self.strategy.clone(),
			coordinator: self.coordinator.clone(),
		}
	}
}
impl<C> Debug for Gateway<C>
where
	C: ?Sized + GatewayHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Gateway")
			.field("descriptor", &self.descriptor)
			.field("coordinator", &self.coordinator)
			.finish()
	}
}
