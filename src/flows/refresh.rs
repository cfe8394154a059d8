//! Refresh coordinator: decide between reuse, refresh, and failure for one tuple.
//!
//! [`RefreshCoordinator::evaluate`] never fails. Every problem is folded into the returned
//! tuple's [`SessionStatus`], while [`RefreshCoordinator::evaluate_detailed`] keeps the
//! underlying [`RefreshFailure`] for operators and tests. At most one
//! [`RefreshExchange::exchange`] call happens per evaluation and it is never retried.

mod metrics;

pub use metrics::RefreshMetrics;

// self
use crate::{
	_prelude::*,
	auth::{CredentialTuple, SessionStatus, TokenSecret, token::tuple::truncate_to_second},
	error::{ConfigError, RefreshFailure},
	ext::{IssuedTokens, RefreshExchange},
	flows::Materialization,
	obs::{self, EvaluationPath, EvaluationSpan, FlowOutcome},
};

/// Result of one coordinator evaluation.
#[derive(Debug)]
pub struct Evaluation {
	/// Tuple to persist and expose; always present.
	pub tuple: CredentialTuple,
	/// Branch the coordinator took.
	pub path: EvaluationPath,
	/// Why the tuple carries [`SessionStatus::RefreshError`], if it does.
	pub failure: Option<RefreshFailure>,
}
impl Evaluation {
	fn ok(tuple: CredentialTuple, path: EvaluationPath) -> Self {
		Self { tuple: tuple.with_status(SessionStatus::Ok), path, failure: None }
	}

	fn failed(tuple: CredentialTuple, failure: RefreshFailure) -> Self {
		Self {
			tuple: tuple.with_status(SessionStatus::RefreshError),
			path: EvaluationPath::Refresh,
			failure: Some(failure),
		}
	}

	/// Returns `true` when the tuple is usable.
	pub fn is_ok(&self) -> bool {
		self.failure.is_none()
	}
}

/// Pure decision procedure over credential tuples with an injected refresh exchange.
///
/// All provider configuration lives in the exchange implementation, so the coordinator itself
/// carries no client identity and reads nothing from the environment.
#[derive(Clone)]
pub struct RefreshCoordinator {
	/// Capability used to trade a refresh token for new tokens.
	pub exchange: Arc<dyn RefreshExchange>,
	/// Shared counters for evaluation outcomes.
	pub metrics: Arc<RefreshMetrics>,
}
impl RefreshCoordinator {
	/// Creates a coordinator around `exchange`.
	pub fn new(exchange: Arc<dyn RefreshExchange>) -> Self {
		Self { exchange, metrics: Default::default() }
	}

	/// Shares an existing metrics recorder.
	pub fn with_metrics(mut self, metrics: Arc<RefreshMetrics>) -> Self {
		self.metrics = metrics;

		self
	}

	/// Evaluates `input` at `now` and returns the tuple to persist.
	///
	/// A bare [`CredentialTuple`] is treated as [`Materialization::Stored`].
	pub async fn evaluate(
		&self,
		input: impl Into<Materialization>,
		now: OffsetDateTime,
	) -> CredentialTuple {
		self.evaluate_detailed(input, now).await.tuple
	}

	/// Evaluates `input` at `now`, keeping the branch taken and any failure cause.
	pub async fn evaluate_detailed(
		&self,
		input: impl Into<Materialization>,
		now: OffsetDateTime,
	) -> Evaluation {
		let input = input.into();
		let path = input.path_at(now);
		let span = EvaluationSpan::new(path);

		obs::record_evaluation(path, FlowOutcome::Attempt);
		self.metrics.record_attempt();

		let evaluation = span.instrument(self.decide(input, now)).await;

		match &evaluation.failure {
			None => obs::record_evaluation(path, FlowOutcome::Success),
			Some(failure) => {
				obs::record_evaluation(path, FlowOutcome::Failure);
				obs::log_refresh_failure(path, failure);
				self.metrics.record_failure();
			},
		}

		evaluation
	}

	async fn decide(&self, input: Materialization, now: OffsetDateTime) -> Evaluation {
		let tuple = match input {
			Materialization::Issued(tuple) => return Evaluation::ok(tuple, EvaluationPath::Bootstrap),
			Materialization::Stored(tuple) => tuple,
		};

		if !tuple.is_expired_at(now) {
			self.metrics.record_reuse();

			return Evaluation::ok(tuple, EvaluationPath::Reuse);
		}

		let Some(refresh_token) = tuple.refresh_token.clone() else {
			return Evaluation::failed(tuple, RefreshFailure::MissingRefreshCredential);
		};

		self.metrics.record_exchange();

		let issued = match self.exchange.exchange(&refresh_token).await {
			Ok(issued) => issued,
			Err(err) => return Evaluation::failed(tuple, RefreshFailure::ExchangeFailed(err)),
		};

		match renew(issued, refresh_token, now) {
			Ok(renewed) => {
				self.metrics.record_refresh();

				Evaluation::ok(renewed, EvaluationPath::Refresh)
			},
			Err(err) => Evaluation::failed(tuple, RefreshFailure::ExchangeFailed(err)),
		}
	}
}
impl Debug for RefreshCoordinator {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RefreshCoordinator").field("metrics", &self.metrics).finish()
	}
}

// A rotated refresh token replaces the prior one; otherwise the prior one carries over.
// The expiry is whole seconds, like its serialized form.
fn renew(
	issued: IssuedTokens,
	prior_refresh: TokenSecret,
	now: OffsetDateTime,
) -> Result<CredentialTuple> {
	if !issued.expires_in.is_positive() {
		return Err(ConfigError::NonPositiveExpiresIn.into());
	}

	let expires_at = now
		.checked_add(issued.expires_in)
		.map(truncate_to_second)
		.ok_or(ConfigError::ExpiresInOutOfRange)?;
	let refresh_token = issued.refresh_token.unwrap_or(prior_refresh);

	Ok(CredentialTuple::new(issued.access_token, expires_at).with_refresh_token(refresh_token))
}
