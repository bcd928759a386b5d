//! Demonstrates plugging a custom transport into the gateway and recovering from an expired
//! access token without touching the network.
//!
//! 1. Implement [`GatewayHttpClient`] for a scripted in-process backend.
//! 2. Seed a [`MemoryStore`] with an expired access token and a valid refresh token.
//! 3. Issue a request; the gateway refreshes once and replays it with the new token.

// std
use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};
// crates.io
use color_eyre::Result;
// self
use bearer_gateway::{
	auth::{CredentialPair, Session},
	backend::{BackendDescriptor, DefaultSessionStrategy},
	gateway::Gateway,
	http::{GatewayHttpClient, HttpFuture, HttpRequest, HttpResponse, Method},
	store::{MemoryStore, TokenStore},
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let store = Arc::new(MemoryStore::with_session(Session::signed_in(CredentialPair::new(
		"expired", "refresh-1",
	))));
	let descriptor = BackendDescriptor::builder(Url::parse("https://api.example.com/v1")?)
		.default_header("X-Client", "demo")
		.build()?;
	let transport = Arc::new(ScriptedBackend::default());
	let gateway: Gateway<ScriptedBackend> = Gateway::with_http_client(
		store.clone(),
		descriptor,
		Arc::new(DefaultSessionStrategy),
		transport.clone(),
	);
	let response = gateway.get("/events").await?;

	println!("Status {} with body {:?}.", response.status, response.body);
	println!("Backend saw {} calls.", transport.calls.load(Ordering::SeqCst));
	println!(
		"Stored access token rotated: {}.",
		store.access_token().await?.is_some_and(|token| token.expose() == "tok2")
	);

	Ok(())
}

/// Backend that expires `expired`, accepts `tok2`, and issues `tok2` on refresh.
#[derive(Default)]
struct ScriptedBackend {
	calls: AtomicUsize,
}
impl GatewayHttpClient for ScriptedBackend {
	fn execute(&self, request: HttpRequest) -> HttpFuture<'_> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		Box::pin(async move {
			let authorization = request.header("Authorization").unwrap_or_default();
			let response = match (request.method, request.url.path(), authorization) {
				(Method::Post, "/v1/refresh-token", "Bearer refresh-1") => HttpResponse {
					status: 200,
					headers: [("accesstoken".to_owned(), "tok2".to_owned())].into_iter().collect(),
					body: Vec::new(),
				},
				(_, _, "Bearer tok2") => HttpResponse {
					status: 200,
					body: br#"[{"id":1,"title":"Launch"}]"#.to_vec(),
					..Default::default()
				},
				_ => HttpResponse { status: 401, ..Default::default() },
			};

			Ok(response)
		})
	}
}
