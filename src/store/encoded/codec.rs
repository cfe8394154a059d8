// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use sha2::Sha256;
// self
use crate::{_prelude::*, auth::CredentialTuple, error::ConfigError, store::StoreError};

type HmacSha256 = Hmac<Sha256>;

/// Signs and verifies session tokens carrying a [`CredentialTuple`].
///
/// Tokens take the form `base64url(json).base64url(hmac_sha256(key, base64url(json)))`.
/// The payload is signed, not encrypted: anyone holding the token can read the tuple, so it
/// must only travel over channels the principal already controls (e.g. an HTTP-only cookie).
#[derive(Clone)]
pub struct SessionTokenCodec {
	key: Arc<[u8]>,
}
impl SessionTokenCodec {
	/// Minimum accepted signing key length in bytes.
	pub const MIN_KEY_LEN: usize = 32;

	/// Creates a codec for `key`.
	pub fn new(key: impl AsRef<[u8]>) -> Result<Self, ConfigError> {
		let key = key.as_ref();

		if key.len() < Self::MIN_KEY_LEN {
			return Err(ConfigError::WeakSigningKey { min: Self::MIN_KEY_LEN });
		}

		Ok(Self { key: Arc::from(key) })
	}

	/// Serializes and signs `tuple`.
	pub fn encode(&self, tuple: &CredentialTuple) -> Result<String, StoreError> {
		let json = serde_json::to_vec(tuple).map_err(|e| StoreError::Serialization {
			message: format!("Failed to serialize session payload: {e}"),
		})?;
		let body = URL_SAFE_NO_PAD.encode(json);
		let signature = URL_SAFE_NO_PAD.encode(self.mac(&body)?.finalize().into_bytes());

		Ok(format!("{body}.{signature}"))
	}

	/// Verifies the signature of `token` and deserializes its tuple.
	pub fn decode(&self, token: &str) -> Result<CredentialTuple, StoreError> {
		let (body, signature) = token
			.split_once('.')
			.ok_or_else(|| invalid("token is missing its signature segment"))?;
		let signature =
			URL_SAFE_NO_PAD.decode(signature).map_err(|_| invalid("signature is not base64url"))?;

		self.mac(body)?
			.verify_slice(&signature)
			.map_err(|_| invalid("signature does not match payload"))?;

		let json = URL_SAFE_NO_PAD.decode(body).map_err(|_| invalid("payload is not base64url"))?;

		serde_json::from_slice(&json).map_err(|e| StoreError::Serialization {
			message: format!("Failed to parse session payload: {e}"),
		})
	}

	fn mac(&self, body: &str) -> Result<HmacSha256, StoreError> {
		let mut mac = HmacSha256::new_from_slice(&self.key)
			.map_err(|e| StoreError::Backend { message: format!("Failed to key HMAC: {e}") })?;

		mac.update(body.as_bytes());

		Ok(mac)
	}
}
impl Debug for SessionTokenCodec {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SessionTokenCodec").field("key", &"<redacted>").finish()
	}
}

fn invalid(message: &str) -> StoreError {
	StoreError::InvalidToken { message: message.into() }
}
