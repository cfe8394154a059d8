//! Fixtures shared by the integration tests.

#![allow(dead_code)]

// std
use std::{
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration as StdDuration,
};
// crates.io
use parking_lot::Mutex;
use time::{Duration, OffsetDateTime};
use url::Url;
// self
use oauth2_session::{
	auth::{PrincipalId, PrincipalRef, ProviderId, TokenSecret},
	error::Error,
	ext::{ExchangeFuture, IssuedTokens, RefreshExchange},
	provider::{ClientAuthMethod, ProviderDescriptor},
};
#[cfg(feature = "reqwest")]
use oauth2_session::{
	http::ReqwestHttpClient,
	oauth::{ReqwestTokenEndpointClient, ReqwestTransportErrorMapper, TokenEndpointClient},
	provider::{ClientCredentials, DefaultProviderStrategy},
	reqwest::Client,
};

pub fn unix(secs: i64) -> OffsetDateTime {
	OffsetDateTime::from_unix_timestamp(secs).expect("Timestamp fixture should be in range.")
}

pub fn principal(name: &str) -> PrincipalRef {
	PrincipalRef::new(
		PrincipalId::new(name).expect("Principal fixture should be valid."),
		ProviderId::new("mock-provider").expect("Provider fixture should be valid."),
	)
}

/// Builds a descriptor without HTTPS validation so it can target the local mock server.
pub fn descriptor(token_endpoint: &str, method: ClientAuthMethod) -> ProviderDescriptor {
	ProviderDescriptor {
		id: ProviderId::new("mock-provider").expect("Provider fixture should be valid."),
		token_endpoint: Url::parse(token_endpoint).expect("Token endpoint fixture should parse."),
		preferred_client_auth_method: method,
	}
}

/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
/// `httpmock` during tests.
#[cfg(feature = "reqwest")]
pub fn test_reqwest_http_client() -> ReqwestHttpClient {
	let client = Client::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()
		.expect("Failed to build insecure Reqwest client for tests.");

	ReqwestHttpClient::with_client(client)
}

#[cfg(feature = "reqwest")]
pub fn reqwest_token_client(
	descriptor: ProviderDescriptor,
	credentials: ClientCredentials,
) -> ReqwestTokenEndpointClient {
	TokenEndpointClient::with_http_client(
		descriptor,
		Arc::new(DefaultProviderStrategy),
		credentials,
		test_reqwest_http_client(),
		Arc::new(ReqwestTransportErrorMapper),
	)
}

/// Exchange that replays a fixed outcome and records every refresh token it receives.
pub struct ScriptedExchange {
	outcome: Result<IssuedTokens, String>,
	calls: AtomicUsize,
	presented: Mutex<Vec<String>>,
}
impl ScriptedExchange {
	pub fn issuing(issued: IssuedTokens) -> Arc<Self> {
		Arc::new(Self { outcome: Ok(issued), calls: AtomicUsize::new(0), presented: Default::default() })
	}

	pub fn rejecting(reason: &str) -> Arc<Self> {
		Arc::new(Self {
			outcome: Err(reason.to_owned()),
			calls: AtomicUsize::new(0),
			presented: Default::default(),
		})
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	pub fn presented(&self) -> Vec<String> {
		self.presented.lock().clone()
	}
}
impl RefreshExchange for ScriptedExchange {
	fn exchange<'a>(&'a self, refresh_token: &'a TokenSecret) -> ExchangeFuture<'a> {
		Box::pin(async move {
			self.calls.fetch_add(1, Ordering::SeqCst);
			self.presented.lock().push(refresh_token.expose().to_owned());

			match &self.outcome {
				Ok(issued) => Ok(issued.clone()),
				Err(reason) => Err(Error::InvalidGrant { reason: reason.clone() }),
			}
		})
	}
}

/// Provider double that honors each refresh token once and rotates it on success.
///
/// Every exchange waits before answering so concurrent callers overlap.
pub struct RotatingExchange {
	current: Mutex<String>,
	generation: AtomicUsize,
	calls: AtomicUsize,
	latency: StdDuration,
}
impl RotatingExchange {
	pub fn new(initial: &str) -> Arc<Self> {
		Arc::new(Self {
			current: Mutex::new(initial.to_owned()),
			generation: AtomicUsize::new(1),
			calls: AtomicUsize::new(0),
			latency: StdDuration::from_millis(50),
		})
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}
impl RefreshExchange for RotatingExchange {
	fn exchange<'a>(&'a self, refresh_token: &'a TokenSecret) -> ExchangeFuture<'a> {
		Box::pin(async move {
			self.calls.fetch_add(1, Ordering::SeqCst);

			tokio::time::sleep(self.latency).await;

			let mut current = self.current.lock();

			if *current != refresh_token.expose() {
				return Err(Error::InvalidGrant { reason: "refresh token already used".into() });
			}

			let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

			*current = format!("R{generation}");

			Ok(IssuedTokens::new(format!("A{generation}"), Duration::hours(1))
				.with_refresh_token(current.clone()))
		})
	}
}

/// Formatter sink that keeps every rendered event in memory.
#[cfg(feature = "tracing")]
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);
#[cfg(feature = "tracing")]
impl CapturedLogs {
	pub fn contents(&self) -> String {
		String::from_utf8_lossy(&self.0.lock()).into_owned()
	}
}
#[cfg(feature = "tracing")]
impl std::io::Write for CapturedLogs {
	fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
		self.0.lock().extend_from_slice(buf);

		Ok(buf.len())
	}

	fn flush(&mut self) -> std::io::Result<()> {
		Ok(())
	}
}
#[cfg(feature = "tracing")]
impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
	type Writer = Self;

	fn make_writer(&'a self) -> Self::Writer {
		self.clone()
	}
}
