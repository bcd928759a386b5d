//! Single-flight refresh-token coordination.
//!
//! [`RefreshCoordinator::refresh`] hands every caller a fresh access token while guaranteeing
//! that at most one refresh-token exchange is in flight. The first caller to pass the gate leads
//! a cycle; callers arriving while the cycle runs queue on the same gate and, once through,
//! receive the leader's outcome (the same token or the same error) without contacting the
//! backend. A failed cycle clears the token store before its outcome is published.

mod exchange;
mod metrics;

pub use exchange::*;
pub use metrics::RefreshMetrics;

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	error::RefreshError,
	obs::{self, OpKind, OpOutcome, OpSpan},
	store::TokenStore,
};

type RefreshOutcome = Result<TokenSecret, RefreshError>;

/// Observable state of a [`RefreshCoordinator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshState {
	/// No refresh-token exchange is running.
	Idle,
	/// A cycle is running; new callers queue behind it.
	Refreshing,
}

/// Serializes refresh-token exchanges for one backend session.
///
/// Share a single coordinator (behind `Arc`) between every gateway that talks to the same
/// backend with the same store, and give unrelated backends their own instance.
pub struct RefreshCoordinator {
	store: Arc<dyn TokenStore>,
	exchange: Arc<dyn RefreshExchange>,
	gate: AsyncMutex<()>,
	cycle: Mutex<Cycle>,
	metrics: RefreshMetrics,
}
impl RefreshCoordinator {
	/// Creates a coordinator persisting into `store` and refreshing through `exchange`.
	pub fn new(store: Arc<dyn TokenStore>, exchange: Arc<dyn RefreshExchange>) -> Self {
		Self {
			store,
			exchange,
			gate: AsyncMutex::new(()),
			cycle: Mutex::new(Cycle::default()),
			metrics: RefreshMetrics::default(),
		}
	}

	/// Returns whether a cycle is currently running.
	pub fn state(&self) -> RefreshState {
		if self.cycle.lock().refreshing { RefreshState::Refreshing } else { RefreshState::Idle }
	}

	/// Counters describing how cycles were resolved.
	pub fn metrics(&self) -> &RefreshMetrics {
		&self.metrics
	}

	/// Returns a fresh access token, leading or joining a refresh cycle.
	///
	/// `rejected` is the access token the caller's failed request carried. When the store already
	/// holds a different token by the time the caller leads a cycle, that token is returned
	/// without an exchange.
	///
	/// # Errors
	///
	/// Any [`RefreshError`]; the token store has been cleared before it is returned.
	pub async fn refresh(&self, rejected: Option<&TokenSecret>) -> RefreshOutcome {
		const KIND: OpKind = OpKind::Refresh;

		let span = OpSpan::new(KIND, "refresh");

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let result = span.instrument(self.join_or_lead(rejected, &span)).await;

		match &result {
			Ok(_) => obs::record_op_outcome(KIND, OpOutcome::Success),
			Err(_) => obs::record_op_outcome(KIND, OpOutcome::Failure),
		}

		result
	}

	async fn join_or_lead(&self, rejected: Option<&TokenSecret>, span: &OpSpan) -> RefreshOutcome {
		// Read before the first suspension point so a cycle already in flight counts as joined.
		let joined_at = self.cycle.lock().epoch;
		let _singleflight = self.gate.lock().await;

		if let Some(shared) = self.completed_since(joined_at) {
			span.note("joined");
			self.metrics.record_joined();

			return shared;
		}

		let refreshing = RefreshingGuard::enter(&self.cycle);
		let outcome = self.lead(rejected, span).await;

		refreshing.publish(outcome.clone());

		outcome
	}

	fn completed_since(&self, joined_at: u64) -> Option<RefreshOutcome> {
		let cycle = self.cycle.lock();

		if cycle.epoch == joined_at { None } else { cycle.last.clone() }
	}

	async fn lead(&self, rejected: Option<&TokenSecret>, span: &OpSpan) -> RefreshOutcome {
		let outcome = self.exchange_and_store(rejected, span).await;

		match &outcome {
			Ok(_) => self.metrics.record_success(),
			Err(_) => {
				self.metrics.record_failure();

				if let Err(e) = self.store.clear().await {
					span.warn("clear_failed", &e);
					self.metrics.record_clear_failure();
				}
			},
		}

		outcome
	}

	async fn exchange_and_store(
		&self,
		rejected: Option<&TokenSecret>,
		span: &OpSpan,
	) -> RefreshOutcome {
		let current = self.store.access_token().await?;

		if let Some(current) = current.filter(|token| Some(token) != rejected) {
			span.note("reused");
			self.metrics.record_reused();

			return Ok(current);
		}

		let refresh_token = self.store.refresh_token().await?.ok_or(RefreshError::NoRefreshToken)?;

		span.note("exchange");
		self.metrics.record_exchange();

		let issued = self.exchange.exchange(&refresh_token).await?;
		let access_token = issued.access_token.clone();

		self.store.save_tokens(issued.into()).await?;

		Ok(access_token)
	}
}
impl Debug for RefreshCoordinator {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RefreshCoordinator")
			.field("state", &self.state())
			.field("metrics", &self.metrics)
			.finish()
	}
}

#[derive(Debug, Default)]
struct Cycle {
	epoch: u64,
	refreshing: bool,
	last: Option<RefreshOutcome>,
}

/// Marks a cycle as running and resets the flag even if the leader is cancelled mid-flight.
struct RefreshingGuard<'a>(&'a Mutex<Cycle>);
impl<'a> RefreshingGuard<'a> {
	fn enter(cycle: &'a Mutex<Cycle>) -> Self {
		cycle.lock().refreshing = true;

		Self(cycle)
	}

	fn publish(self, outcome: RefreshOutcome) {
		let mut cycle = self.0.lock();

		cycle.epoch += 1;
		cycle.last = Some(outcome);
	}
}
impl Drop for RefreshingGuard<'_> {
	fn drop(&mut self) {
		self.0.lock().refreshing = false;
	}
}
