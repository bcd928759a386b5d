//! Refresh-token exchange contract and its HTTP implementation.

// self
use crate::{
	_prelude::*,
	auth::{IssuedTokens, TokenSecret},
	backend::{BackendDescriptor, SessionStrategy},
	error::RefreshError,
	http::{GatewayHttpClient, HttpRequest, Method},
};

/// Boxed future returned by [`RefreshExchange::exchange`].
pub type ExchangeFuture<'a> =
	Pin<Box<dyn Future<Output = Result<IssuedTokens, RefreshError>> + 'a + Send>>;

/// Performs one refresh-token exchange against the backend.
///
/// Implementations only talk to the backend; persisting the issued tokens and clearing the
/// session on failure is the [`RefreshCoordinator`](crate::refresh::RefreshCoordinator)'s job.
pub trait RefreshExchange
where
	Self: Send + Sync,
{
	/// Exchanges `refresh_token` for a new access token.
	fn exchange<'a>(&'a self, refresh_token: &'a TokenSecret) -> ExchangeFuture<'a>;
}

/// [`RefreshExchange`] that posts to the descriptor's refresh endpoint.
///
/// The refresh token travels as `Authorization: Bearer <refresh>`; the response is read through
/// [`SessionStrategy::extract_tokens`].
pub struct HttpRefreshExchange<C>
where
	C: ?Sized + GatewayHttpClient,
{
	http_client: Arc<C>,
	descriptor: BackendDescriptor,
	strategy: Arc<dyn SessionStrategy>,
}
impl<C> HttpRefreshExchange<C>
where
	C: ?Sized + GatewayHttpClient,
{
	/// Creates an exchange for the provided backend.
	pub fn new(
		http_client: impl Into<Arc<C>>,
		descriptor: BackendDescriptor,
		strategy: Arc<dyn SessionStrategy>,
	) -> Self {
		Self { http_client: http_client.into(), descriptor, strategy }
	}

	fn build_request(&self, refresh_token: &TokenSecret) -> Result<HttpRequest, RefreshError> {
		let url = self.descriptor.refresh_endpoint().map_err(RefreshError::transport)?;
		let mut request = HttpRequest::new(Method::Post, url);

		for (name, value) in &self.descriptor.default_headers {
			request.set_header(name.as_str(), value.as_str());
		}

		request.set_header("Authorization", refresh_token.bearer());
		request.timeout = self.descriptor.request_timeout;

		Ok(request)
	}
}
impl<C> RefreshExchange for HttpRefreshExchange<C>
where
	C: ?Sized + GatewayHttpClient,
{
	fn exchange<'a>(&'a self, refresh_token: &'a TokenSecret) -> ExchangeFuture<'a> {
		Box::pin(async move {
			let request = self.build_request(refresh_token)?;
			let response =
				self.http_client.execute(request).await.map_err(RefreshError::transport)?;

			if !response.is_success() {
				return Err(RefreshError::Rejected { status: response.status });
			}

			self.strategy
				.extract_tokens(&self.descriptor.token_locations, &response)
				.ok_or(RefreshError::MissingAccessToken { status: response.status })
		})
	}
}
impl<C> Debug for HttpRefreshExchange<C>
where
	C: ?Sized + GatewayHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("HttpRefreshExchange")
			.field("refresh_path", &self.descriptor.refresh_path)
			.field("token_locations", &self.descriptor.token_locations)
			.finish()
	}
}
