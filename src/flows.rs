//! Session materialization: load the stored tuple, evaluate it, persist the result.
//!
//! [`RefreshCoordinator`] holds the decision procedure and never touches storage.
//! [`SessionMaterializer`] is the caller-side glue that pairs it with a
//! [`CredentialStore`] and projects the outcome into a [`SessionView`].

pub mod common;
pub mod refresh;
pub mod session;

pub use common::*;
pub use refresh::*;
pub use session::*;

// self
use crate::{
	_prelude::*,
	auth::{CredentialTuple, PrincipalRef},
	store::CredentialStore,
};

/// Runs one materialization per call against a shared coordinator and store.
///
/// By default materializations for the same principal are not coordinated. Two concurrent
/// calls that both observe an expired tuple will both call the provider, and a provider that
/// rotates single-use refresh tokens will reject the second one. Enable
/// [`SessionMaterializer::with_principal_guards`] to serialize load, evaluate, and save per
/// principal within this process.
#[derive(Clone)]
pub struct SessionMaterializer {
	/// Decision procedure applied to every loaded tuple.
	pub coordinator: RefreshCoordinator,
	/// Backing store for credential tuples.
	pub store: Arc<dyn CredentialStore>,
	principal_guards: Option<Arc<Mutex<HashMap<PrincipalRef, Arc<AsyncMutex<()>>>>>>,
}
impl SessionMaterializer {
	/// Creates a materializer without per-principal serialization.
	pub fn new(coordinator: RefreshCoordinator, store: Arc<dyn CredentialStore>) -> Self {
		Self { coordinator, store, principal_guards: None }
	}

	/// Serializes materializations for the same principal within this process.
	pub fn with_principal_guards(mut self) -> Self {
		self.principal_guards = Some(Default::default());

		self
	}

	/// Materializes the session for `principal` at the current wall-clock time.
	///
	/// Pass `issued` right after the authorization-code exchange produced the first tuple;
	/// otherwise the stored tuple is evaluated. Returns `Ok(None)` when nothing is stored.
	pub async fn materialize(
		&self,
		principal: &PrincipalRef,
		issued: Option<CredentialTuple>,
	) -> Result<Option<SessionView>> {
		self.materialize_at(principal, issued, OffsetDateTime::now_utc()).await
	}

	/// Same as [`Self::materialize`] with an explicit evaluation instant.
	pub async fn materialize_at(
		&self,
		principal: &PrincipalRef,
		issued: Option<CredentialTuple>,
		now: OffsetDateTime,
	) -> Result<Option<SessionView>> {
		let guard = common::principal_guard(self, principal);
		let _serialized = match &guard {
			Some(guard) => Some(guard.lock().await),
			None => None,
		};
		let input = match issued {
			Some(tuple) => Materialization::Issued(tuple),
			None => match self.store.load(principal).await? {
				Some(tuple) => Materialization::Stored(tuple),
				None => return Ok(None),
			},
		};
		let tuple = self.coordinator.evaluate(input, now).await;

		self.store.save(principal, tuple.clone()).await?;

		Ok(Some(SessionView::new(principal.to_owned(), tuple)))
	}
}
impl Debug for SessionMaterializer {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SessionMaterializer")
			.field("coordinator", &self.coordinator)
			.field("principal_guards", &self.principal_guards.is_some())
			.finish()
	}
}
