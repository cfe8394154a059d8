//! Encoded-token [`CredentialStore`]: the tuple travels inside a signed session token.
//!
//! The caller already holds the token (typically a cookie). Loading decodes it, saving
//! re-encodes it, and [`EncodedTokenStore::token`] hands the current value back so the caller
//! can return it to the client. No external I/O happens in either direction.

mod codec;

pub use codec::SessionTokenCodec;

// self
use crate::{
	_prelude::*,
	auth::{CredentialTuple, PrincipalRef},
	store::{CredentialStore, StoreFuture},
};

/// Store backed by a single encoded session token.
///
/// The principal argument is ignored; each store instance wraps exactly one session.
#[derive(Clone, Debug)]
pub struct EncodedTokenStore {
	codec: SessionTokenCodec,
	token: Arc<RwLock<Option<String>>>,
}
impl EncodedTokenStore {
	/// Wraps the token presented by the client, if any.
	pub fn new(codec: SessionTokenCodec, token: Option<String>) -> Self {
		Self { codec, token: Arc::new(RwLock::new(token)) }
	}

	/// Returns the current encoded token.
	pub fn token(&self) -> Option<String> {
		self.token.read().clone()
	}
}
impl CredentialStore for EncodedTokenStore {
	fn load<'a>(&'a self, _principal: &'a PrincipalRef) -> StoreFuture<'a, Option<CredentialTuple>> {
		Box::pin(async move {
			match self.token.read().as_deref() {
				Some(token) => self.codec.decode(token).map(Some),
				None => Ok(None),
			}
		})
	}

	fn save<'a>(
		&'a self,
		_principal: &'a PrincipalRef,
		tuple: CredentialTuple,
	) -> StoreFuture<'a, ()> {
		Box::pin(async move {
			let encoded = self.codec.encode(&tuple)?;

			*self.token.write() = Some(encoded);

			Ok(())
		})
	}
}
