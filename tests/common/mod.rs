//! Helpers shared by the reqwest-backed integration tests.

#![allow(dead_code)]

// std
use std::sync::Arc;
// self
use bearer_gateway::{
	auth::{CredentialPair, Session},
	backend::{BackendDescriptor, BackendDescriptorBuilder, DefaultSessionStrategy, SessionStrategy},
	gateway::Gateway,
	http::ReqwestHttpClient,
	reqwest::Client as ReqwestClient,
	store::{MemoryStore, TokenStore},
	url::Url,
};

/// Gateway type alias used by reqwest-backed integration tests.
pub type ReqwestTestGateway = Gateway<ReqwestHttpClient>;

/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
/// `httpmock` during tests.
pub fn test_reqwest_http_client() -> ReqwestHttpClient {
	let client = ReqwestClient::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()
		.expect("Failed to build insecure Reqwest client for tests.");

	ReqwestHttpClient::with_client(client)
}

/// Starts a descriptor builder rooted at `base_url`.
pub fn descriptor_builder(base_url: &str) -> BackendDescriptorBuilder {
	BackendDescriptor::builder(Url::parse(base_url).expect("Test base URL should parse."))
}

/// Builds a descriptor rooted at `base_url` with default refresh path and token locations.
pub fn test_descriptor(base_url: &str) -> BackendDescriptor {
	descriptor_builder(base_url).build().expect("Test descriptor should build successfully.")
}

/// Creates an in-memory store holding the given tokens.
pub fn seeded_store(access_token: Option<&str>, refresh_token: Option<&str>) -> Arc<MemoryStore> {
	let credentials = CredentialPair {
		access_token: access_token.map(Into::into),
		refresh_token: refresh_token.map(Into::into),
	};

	Arc::new(MemoryStore::with_session(Session::signed_in(credentials)))
}

/// Constructs a [`Gateway`] backed by an in-memory store seeded with the given tokens, the
/// provided session strategy, and the reqwest transport used across integration tests.
pub fn build_gateway_with_strategy(
	descriptor: BackendDescriptor,
	strategy: Arc<dyn SessionStrategy>,
	access_token: Option<&str>,
	refresh_token: Option<&str>,
) -> (ReqwestTestGateway, Arc<MemoryStore>) {
	let store_backend = seeded_store(access_token, refresh_token);
	let store: Arc<dyn TokenStore> = store_backend.clone();
	let gateway: ReqwestTestGateway =
		Gateway::with_http_client(store, descriptor, strategy, test_reqwest_http_client());

	(gateway, store_backend)
}

/// [`build_gateway_with_strategy`] using the default strategy (`401` triggers a refresh).
pub fn build_reqwest_test_gateway(
	descriptor: BackendDescriptor,
	access_token: Option<&str>,
	refresh_token: Option<&str>,
) -> (ReqwestTestGateway, Arc<MemoryStore>) {
	build_gateway_with_strategy(
		descriptor,
		Arc::new(DefaultSessionStrategy),
		access_token,
		refresh_token,
	)
}

/// Reads both tokens from a store as plain strings.
pub async fn stored_tokens(store: &MemoryStore) -> (Option<String>, Option<String>) {
	let access = store.access_token().await.expect("Access token read should succeed.");
	let refresh = store.refresh_token().await.expect("Refresh token read should succeed.");

	(access.map(|t| t.expose().to_owned()), refresh.map(|t| t.expose().to_owned()))
}
