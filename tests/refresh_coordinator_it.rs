// std
use std::{
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration,
};
// self
use bearer_gateway::{
	auth::{CredentialPair, IssuedTokens, Session, TokenSecret},
	error::RefreshError,
	refresh::{ExchangeFuture, RefreshCoordinator, RefreshExchange, RefreshState},
	store::{MemoryStore, TokenStore},
};

const CALLERS: usize = 8;

struct SlowExchange {
	calls: AtomicUsize,
	delay: Duration,
	outcome: Result<IssuedTokens, RefreshError>,
}
impl SlowExchange {
	fn new(outcome: Result<IssuedTokens, RefreshError>) -> Arc<Self> {
		Arc::new(Self { calls: AtomicUsize::new(0), delay: Duration::from_millis(50), outcome })
	}

	fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}
impl RefreshExchange for SlowExchange {
	fn exchange<'a>(&'a self, refresh_token: &'a TokenSecret) -> ExchangeFuture<'a> {
		Box::pin(async move {
			assert_eq!(refresh_token.expose(), "refresh-1");

			self.calls.fetch_add(1, Ordering::SeqCst);
			tokio::time::sleep(self.delay).await;

			self.outcome.clone()
		})
	}
}

fn coordinator(exchange: Arc<SlowExchange>) -> (Arc<RefreshCoordinator>, MemoryStore) {
	let store = MemoryStore::with_session(
		Session::signed_in(CredentialPair::new("expired", "refresh-1"))
			.with_profile(serde_json::json!({ "id": 42 })),
	);
	let exchange: Arc<dyn RefreshExchange> = exchange;
	let coordinator = Arc::new(RefreshCoordinator::new(Arc::new(store.clone()), exchange));

	(coordinator, store)
}

async fn refresh_concurrently(
	coordinator: &Arc<RefreshCoordinator>,
) -> Vec<Result<TokenSecret, RefreshError>> {
	let handles = (0..CALLERS)
		.map(|_| {
			let coordinator = coordinator.clone();

			tokio::spawn(async move {
				coordinator.refresh(Some(&TokenSecret::new("expired"))).await
			})
		})
		.collect::<Vec<_>>();
	let mut outcomes = Vec::with_capacity(CALLERS);

	for handle in handles {
		outcomes.push(handle.await.expect("Refresh task should not panic."));
	}

	outcomes
}

#[tokio::test]
async fn concurrent_callers_share_one_exchange() {
	let exchange = SlowExchange::new(Ok(IssuedTokens::new("tok2")));
	let (coordinator, store) = coordinator(exchange.clone());
	let outcomes = refresh_concurrently(&coordinator).await;

	assert_eq!(exchange.calls(), 1);

	for outcome in outcomes {
		assert_eq!(outcome.expect("Every caller should receive the new token.").expose(), "tok2");
	}

	let metrics = coordinator.metrics();

	assert_eq!(metrics.exchanges(), 1);
	assert_eq!(metrics.joined(), (CALLERS - 1) as u64);
	assert_eq!(metrics.successes(), 1);
	assert_eq!(coordinator.state(), RefreshState::Idle);

	let session = store.session().await.expect("Session read should succeed.");

	assert_eq!(session.credentials, CredentialPair::new("tok2", "refresh-1"));
	assert_eq!(session.profile, Some(serde_json::json!({ "id": 42 })));
}

#[tokio::test]
async fn concurrent_callers_share_one_failure() {
	let exchange = SlowExchange::new(Err(RefreshError::Rejected { status: 401 }));
	let (coordinator, store) = coordinator(exchange.clone());
	let outcomes = refresh_concurrently(&coordinator).await;

	assert_eq!(exchange.calls(), 1);

	for outcome in outcomes {
		let err = outcome.expect_err("Every caller should observe the failed cycle.");

		assert!(matches!(err, RefreshError::Rejected { status: 401 }));
	}

	assert_eq!(coordinator.metrics().failures(), 1);
	assert_eq!(store.session().await.expect("Session read should succeed."), Session::default());
}

#[tokio::test]
async fn later_rejection_of_the_new_token_starts_a_new_cycle() {
	let exchange = SlowExchange::new(Ok(IssuedTokens::new("tok2").with_refresh_token("refresh-1")));
	let (coordinator, _store) = coordinator(exchange.clone());

	coordinator
		.refresh(Some(&TokenSecret::new("expired")))
		.await
		.expect("First cycle should succeed.");

	let stale = coordinator
		.refresh(Some(&TokenSecret::new("expired")))
		.await
		.expect("A late caller holding the old token should reuse the new one.");

	assert_eq!(stale.expose(), "tok2");
	assert_eq!(exchange.calls(), 1);
	assert_eq!(coordinator.metrics().reused(), 1);

	coordinator
		.refresh(Some(&TokenSecret::new("tok2")))
		.await
		.expect("Second cycle should succeed.");

	assert_eq!(exchange.calls(), 2);
}

#[tokio::test]
async fn cancelled_leader_leaves_the_coordinator_idle() {
	let exchange = SlowExchange::new(Ok(IssuedTokens::new("tok2")));
	let (coordinator, store) = coordinator(exchange.clone());
	let leader = {
		let coordinator = coordinator.clone();

		tokio::spawn(async move { coordinator.refresh(Some(&TokenSecret::new("expired"))).await })
	};

	tokio::task::yield_now().await;

	assert_eq!(coordinator.state(), RefreshState::Refreshing);

	leader.abort();

	assert!(leader.await.expect_err("Aborted leader should not complete.").is_cancelled());
	assert_eq!(coordinator.state(), RefreshState::Idle);

	let token = coordinator
		.refresh(Some(&TokenSecret::new("expired")))
		.await
		.expect("A new cycle should run after cancellation.");

	assert_eq!(token.expose(), "tok2");
	assert_eq!(exchange.calls(), 2);
	assert_eq!(
		store.access_token().await.expect("Read should succeed.").map(|t| t.expose().to_owned()),
		Some("tok2".to_owned())
	);
}
