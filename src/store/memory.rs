//! Thread-safe in-memory [`CredentialStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::{CredentialTuple, PrincipalRef},
	store::{CredentialStore, StoreFuture},
};

type StoreMap = Arc<RwLock<HashMap<PrincipalRef, CredentialTuple>>>;

/// Durable-record store that keeps tuples in-process for tests and demos.
///
/// Clones share the same map.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	/// Number of principals with a live tuple.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` when no tuple is stored.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}
}
impl CredentialStore for MemoryStore {
	fn load<'a>(&'a self, principal: &'a PrincipalRef) -> StoreFuture<'a, Option<CredentialTuple>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(map.read().get(principal).cloned()) })
	}

	fn save<'a>(
		&'a self,
		principal: &'a PrincipalRef,
		tuple: CredentialTuple,
	) -> StoreFuture<'a, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			map.write().insert(principal.to_owned(), tuple);

			Ok(())
		})
	}
}
