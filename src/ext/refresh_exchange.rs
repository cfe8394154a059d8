//! Refresh exchange capability injected into the coordinator.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Boxed future returned by [`RefreshExchange::exchange`].
pub type ExchangeFuture<'a> = Pin<Box<dyn Future<Output = Result<IssuedTokens>> + 'a + Send>>;

/// Trades a refresh token for a new access token.
///
/// Implementations perform at most one provider call per invocation and never retry; a failed
/// exchange is reported to the coordinator as-is.
pub trait RefreshExchange
where
	Self: Send + Sync,
{
	/// Presents `refresh_token` to the provider.
	fn exchange<'a>(&'a self, refresh_token: &'a TokenSecret) -> ExchangeFuture<'a>;
}

/// Tokens returned by a successful refresh exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IssuedTokens {
	/// Newly minted access token.
	pub access_token: TokenSecret,
	/// Lifetime of the new access token; always positive.
	pub expires_in: Duration,
	/// Rotated refresh token, when the provider issued one.
	pub refresh_token: Option<TokenSecret>,
}
impl IssuedTokens {
	/// Creates a payload without a rotated refresh token.
	pub fn new(access_token: impl Into<TokenSecret>, expires_in: Duration) -> Self {
		Self { access_token: access_token.into(), expires_in, refresh_token: None }
	}

	/// Attaches the rotated refresh token.
	pub fn with_refresh_token(mut self, token: impl Into<TokenSecret>) -> Self {
		self.refresh_token = Some(token.into());

		self
	}
}
