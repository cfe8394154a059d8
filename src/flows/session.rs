//! Session view handed back to the caller after each materialization.

// self
use crate::{
	_prelude::*,
	auth::{CredentialTuple, PrincipalRef, SessionStatus, TokenSecret},
};

/// Error tag attached to a session whose access token could not be renewed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionError {
	/// Refresh was impossible or failed; the caller should force re-authentication.
	RefreshAccessTokenError,
}

/// Caller-facing projection of a materialized tuple.
///
/// The crate never redirects or signs anyone out. UI code reads [`SessionView::error`] (or
/// [`SessionView::needs_reauthentication`]) and decides what to do.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
	/// Whose session this is.
	pub principal: PrincipalRef,
	/// Current access token; stale when `error` is set.
	pub access_token: TokenSecret,
	/// Expiry of `access_token`, as seconds since the epoch.
	#[serde(with = "time::serde::timestamp")]
	pub expires_at: OffsetDateTime,
	/// Present only when the last refresh failed.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<SessionError>,
}
impl SessionView {
	/// Projects `tuple` for `principal`.
	pub fn new(principal: PrincipalRef, tuple: CredentialTuple) -> Self {
		let error = match tuple.status {
			SessionStatus::Ok => None,
			SessionStatus::RefreshError => Some(SessionError::RefreshAccessTokenError),
		};

		Self { principal, access_token: tuple.access_token, expires_at: tuple.expires_at, error }
	}

	/// Returns `true` when the caller should send the principal through sign-in again.
	pub fn needs_reauthentication(&self) -> bool {
		self.error.is_some()
	}
}
