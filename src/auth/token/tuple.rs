//! The credential tuple persisted between materializations.

// self
use crate::{_prelude::*, auth::token::secret::TokenSecret};

/// Session-visible outcome of the most recent evaluation.
///
/// Set by the coordinator and never sent to the provider.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
	/// Credentials are usable (fresh sign-in, reuse, or successful refresh).
	#[default]
	Ok,
	/// The access token expired and could not be renewed.
	RefreshError,
}
impl SessionStatus {
	/// Returns a stable label suitable for logs and wire payloads.
	pub const fn as_str(self) -> &'static str {
		match self {
			SessionStatus::Ok => "ok",
			SessionStatus::RefreshError => "refresh_error",
		}
	}
}
impl Display for SessionStatus {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Access credential, its expiry, and the optional refresh credential for one principal.
///
/// Exactly one tuple per principal/provider pair is live at a time. A successful refresh
/// produces a new tuple that replaces the previous one whole.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialTuple {
	/// Bearer token presented to resource servers; callers must avoid logging it.
	pub access_token: TokenSecret,
	/// Instant the access token stops being valid, stored as seconds since the epoch.
	#[serde(with = "time::serde::timestamp")]
	pub expires_at: OffsetDateTime,
	/// Refresh token, if the provider issued one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub refresh_token: Option<TokenSecret>,
	/// Outcome of the last evaluation.
	#[serde(default)]
	pub status: SessionStatus,
}
impl CredentialTuple {
	/// Creates a tuple without a refresh token and with [`SessionStatus::Ok`].
	///
	/// `expires_at` is truncated to whole seconds, matching its serialized form.
	pub fn new(access_token: impl Into<TokenSecret>, expires_at: OffsetDateTime) -> Self {
		Self {
			access_token: access_token.into(),
			expires_at: truncate_to_second(expires_at),
			refresh_token: None,
			status: SessionStatus::Ok,
		}
	}

	/// Attaches a refresh token.
	pub fn with_refresh_token(mut self, token: impl Into<TokenSecret>) -> Self {
		self.refresh_token = Some(token.into());

		self
	}

	/// Overrides the status flag.
	pub fn with_status(mut self, status: SessionStatus) -> Self {
		self.status = status;

		self
	}

	/// Returns `true` once `instant` reaches the expiry instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		instant >= self.expires_at
	}
}
pub(crate) fn truncate_to_second(instant: OffsetDateTime) -> OffsetDateTime {
	instant - Duration::nanoseconds(i64::from(instant.nanosecond()))
}

impl Debug for CredentialTuple {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CredentialTuple")
			.field("access_token", &"<redacted>")
			.field("expires_at", &self.expires_at)
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("status", &self.status)
			.finish()
	}
}
