//! Shared helpers for session flows (materialization input, per-principal guards).

// self
use crate::{
	_prelude::*,
	auth::{CredentialTuple, PrincipalRef},
	flows::SessionMaterializer,
	obs::EvaluationPath,
};

/// Tuple handed to the coordinator, tagged with where it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Materialization {
	/// Credentials minted by the authorization-code exchange moments ago.
	///
	/// There is no prior access token to compare against, so the tuple is adopted as-is.
	Issued(CredentialTuple),
	/// Credentials loaded from a [`CredentialStore`](crate::store::CredentialStore).
	Stored(CredentialTuple),
}
impl Materialization {
	/// Returns the branch the coordinator takes for this input at `now`.
	pub fn path_at(&self, now: OffsetDateTime) -> EvaluationPath {
		match self {
			Materialization::Issued(_) => EvaluationPath::Bootstrap,
			Materialization::Stored(tuple) if !tuple.is_expired_at(now) => EvaluationPath::Reuse,
			Materialization::Stored(_) => EvaluationPath::Refresh,
		}
	}
}
impl From<CredentialTuple> for Materialization {
	fn from(tuple: CredentialTuple) -> Self {
		Materialization::Stored(tuple)
	}
}

/// Returns (and creates on demand) the serialization guard for a principal, if enabled.
pub(crate) fn principal_guard(
	materializer: &SessionMaterializer,
	principal: &PrincipalRef,
) -> Option<Arc<AsyncMutex<()>>> {
	let mut guards = materializer.principal_guards.as_ref()?.lock();

	Some(guards.entry(principal.to_owned()).or_insert_with(|| Arc::new(AsyncMutex::new(()))).clone())
}
