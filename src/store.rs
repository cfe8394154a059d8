//! Storage contracts and built-in credential stores.
//!
//! Two persistence strategies share [`CredentialStore`]: durable records keyed by
//! [`PrincipalRef`] ([`MemoryStore`], [`FileStore`]) and an encoded session token the caller
//! already holds ([`EncodedTokenStore`]). Stores only read and write; every decision about a
//! tuple happens in the refresh coordinator.

pub mod encoded;
pub mod file;
pub mod memory;

pub use encoded::{EncodedTokenStore, SessionTokenCodec};
pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{CredentialTuple, PrincipalRef},
};

/// Boxed future returned by [`CredentialStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract for credential tuples.
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Returns the live tuple for `principal`, if one exists.
	fn load<'a>(&'a self, principal: &'a PrincipalRef) -> StoreFuture<'a, Option<CredentialTuple>>;

	/// Replaces the live tuple for `principal` whole.
	///
	/// Readers never observe a partially written tuple; concurrent writers resolve as
	/// last-writer-wins.
	fn save<'a>(&'a self, principal: &'a PrincipalRef, tuple: CredentialTuple)
	-> StoreFuture<'a, ()>;
}

/// Error type produced by [`CredentialStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
	/// Session token is malformed or its signature does not verify.
	#[error("Invalid session token: {message}.")]
	InvalidToken {
		/// Human-readable error payload.
		message: String,
	},
}
