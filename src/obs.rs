//! Optional observability helpers for session evaluation.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `oauth2_session.evaluate` with a `path`
//!   field, plus `warn`-level events whenever a refresh fails. Error responses are logged as a
//!   preview capped at 256 characters and never reach the session. Unparseable success bodies
//!   are described by failing field and position only, since they may carry live tokens.
//! - Enable `metrics` to increment the `oauth2_session_evaluation_total` counter for every
//!   attempt/success/failure, labeled by `path` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::{
	_prelude::*,
	auth::ProviderId,
	error::RefreshFailure,
};

/// Branch taken by a single coordinator evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EvaluationPath {
	/// Freshly issued credentials were adopted verbatim.
	Bootstrap,
	/// The stored access token was still valid.
	Reuse,
	/// The access token had expired and a refresh was required.
	Refresh,
}
impl EvaluationPath {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			EvaluationPath::Bootstrap => "bootstrap",
			EvaluationPath::Reuse => "reuse",
			EvaluationPath::Refresh => "refresh",
		}
	}
}
impl Display for EvaluationPath {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to the coordinator.
	Attempt,
	/// Evaluation produced usable credentials.
	Success,
	/// Evaluation flagged the session with a refresh error.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Logs a rejected or unparseable token endpoint response.
///
/// `payload` is a truncated body preview for error responses and a parse location for
/// success responses.
pub fn log_provider_failure(provider: &ProviderId, status: Option<u16>, kind: &str, payload: &str) {
	#[cfg(feature = "tracing")]
	::tracing::warn!(provider = %provider, status, kind, payload, "Token endpoint rejected refresh.");

	#[cfg(not(feature = "tracing"))]
	{
		let _ = (provider, status, kind, payload);
	}
}

/// Logs a transport failure raised before the provider answered.
pub fn log_transport_failure(provider: &ProviderId, error: &Error) {
	#[cfg(feature = "tracing")]
	::tracing::warn!(provider = %provider, error = %error, "Token endpoint unreachable.");

	#[cfg(not(feature = "tracing"))]
	{
		let _ = (provider, error);
	}
}

/// Logs why an evaluation ended with a refresh error.
pub fn log_refresh_failure(path: EvaluationPath, failure: &RefreshFailure) {
	#[cfg(feature = "tracing")]
	::tracing::warn!(path = path.as_str(), error = %failure, "Session flagged with refresh error.");

	#[cfg(not(feature = "tracing"))]
	{
		let _ = (path, failure);
	}
}
