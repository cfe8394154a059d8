//! Principal references used to key durable credential records.

// self
use crate::{
	_prelude::*,
	auth::{PrincipalId, ProviderId},
};

/// Identifies whose credential tuple is being materialized.
///
/// Durable-record stores use the pair as the row key. The encoded-token strategy ignores it
/// because the tuple travels with the token itself.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrincipalRef {
	/// Authenticated user or account.
	pub principal: PrincipalId,
	/// Provider that issued the credentials.
	pub provider: ProviderId,
}
impl PrincipalRef {
	/// Creates a reference for the provided principal/provider pair.
	pub fn new(principal: PrincipalId, provider: ProviderId) -> Self {
		Self { principal, provider }
	}
}
impl Display for PrincipalRef {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}@{}", self.principal, self.provider)
	}
}
