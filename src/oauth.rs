//! OAuth 2.0 token endpoint client performing `grant_type=refresh_token` exchanges.
//!
//! [`TokenEndpointClient`] implements [`RefreshExchange`] on top of any [`TokenHttpClient`].
//! It posts a form-encoded refresh request, parses `{access_token, expires_in, refresh_token?}`
//! with path-aware errors, and maps every non-success response, malformed payload, or
//! transport failure into [`Error`] while writing the provider payload to the operator log.

pub use oauth2;

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use oauth2::{
	AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse,
	http::{
		Method, Request,
		header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
	},
};
use serde::{Deserializer, de};
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	error::{ConfigError, TransientError, TransportError},
	ext::{ExchangeFuture, IssuedTokens, RefreshExchange},
	http::{ResponseMetadata, ResponseMetadataSlot, TokenHttpClient},
	obs,
	provider::{
		ClientAuthMethod, ClientCredentials, ProviderDescriptor, ProviderErrorContext,
		ProviderErrorKind, ProviderStrategy, strategy,
	},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

const GRANT_TYPE_REFRESH: &str = "refresh_token";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_ACCEPT: &str = "application/json";

#[cfg(feature = "reqwest")]
/// Token endpoint client specialized for the crate's default reqwest transport stack.
pub type ReqwestTokenEndpointClient =
	TokenEndpointClient<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Maps HTTP transport failures into crate [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into an [`Error`].
	fn map_transport_error(
		&self,
		metadata: Option<&ResponseMetadata>,
		error: HttpClientError<E>,
	) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		meta: Option<&ResponseMetadata>,
		err: HttpClientError<ReqwestError>,
	) -> Error {
		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(meta, *inner),
			HttpClientError::Http(inner) => ConfigError::from(inner).into(),
			HttpClientError::Io(inner) => TransportError::Io(inner).into(),
			HttpClientError::Other(message) => map_generic_transport_error(meta, message),
			_ => map_generic_transport_error(meta, "unrecognized HTTP client error"),
		}
	}
}

/// Performs refresh exchanges against a single provider's token endpoint.
///
/// The client owns the HTTP transport, the transport error mapper, the provider descriptor,
/// the strategy, and the client identity. All of it is injected at construction so nothing
/// is read from ambient configuration.
#[derive(Clone)]
pub struct TokenEndpointClient<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP client wrapper used for every outbound provider request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors.
	pub transport_mapper: Arc<M>,
	/// Provider descriptor that defines the token endpoint and client auth method.
	pub descriptor: ProviderDescriptor,
	/// Strategy responsible for request decoration and failure classification.
	pub strategy: Arc<dyn ProviderStrategy>,
	/// OAuth client identity.
	pub credentials: ClientCredentials,
}
impl<C, M> TokenEndpointClient<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a client that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		descriptor: ProviderDescriptor,
		strategy: Arc<dyn ProviderStrategy>,
		credentials: ClientCredentials,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
			descriptor,
			strategy,
			credentials,
		}
	}

	/// Builds the form-encoded refresh request for `refresh_token`.
	pub fn build_refresh_request(&self, refresh_token: &TokenSecret) -> Result<HttpRequest> {
		let mut form = BTreeMap::new();
		let mut authorization = None;

		form.insert("grant_type".to_owned(), GRANT_TYPE_REFRESH.to_owned());
		form.insert("refresh_token".to_owned(), refresh_token.expose().to_owned());

		let ClientCredentials { client_id, client_secret } = &self.credentials;

		match (self.descriptor.preferred_client_auth_method, client_secret) {
			(ClientAuthMethod::ClientSecretBasic, Some(secret)) => {
				authorization = Some(basic_authorization(client_id, secret.expose()));
			},
			(ClientAuthMethod::ClientSecretPost, Some(secret)) => {
				form.insert("client_id".to_owned(), client_id.clone());
				form.insert("client_secret".to_owned(), secret.expose().to_owned());
			},
			_ => {
				form.insert("client_id".to_owned(), client_id.clone());
			},
		}

		self.strategy.augment_refresh_request(&mut form);

		let body = form_urlencoded::Serializer::new(String::new()).extend_pairs(form.iter()).finish();
		let mut builder = Request::builder()
			.method(Method::POST)
			.uri(self.descriptor.token_endpoint.as_str())
			.header(CONTENT_TYPE, FORM_CONTENT_TYPE)
			.header(ACCEPT, JSON_ACCEPT);

		if let Some(value) = authorization {
			builder = builder.header(AUTHORIZATION, value);
		}

		builder.body(body.into_bytes()).map_err(|e| ConfigError::from(e).into())
	}

	async fn refresh(&self, refresh_token: &TokenSecret) -> Result<IssuedTokens> {
		let meta = ResponseMetadataSlot::default();
		let handle = self.http_client.with_metadata(meta.clone());
		let request = self.build_refresh_request(refresh_token)?;
		let response = match handle.call(request).await {
			Ok(response) => response,
			Err(err) => {
				let err = self.transport_mapper.map_transport_error(meta.take().as_ref(), err);

				obs::log_transport_failure(&self.descriptor.id, &err);

				return Err(err);
			},
		};
		let meta = meta.take();

		if !response.status().is_success() {
			return Err(self.map_rejection(&response, meta.as_ref()));
		}

		let status = response.status().as_u16();
		// A 2xx body carries live tokens, so only the parse location is logged.
		let parsed = parse_json::<RefreshTokenResponse>(response.body()).map_err(|source| {
			obs::log_provider_failure(
				&self.descriptor.id,
				Some(status),
				"malformed",
				&describe_parse_error(&source),
			);

			Error::from(TransientError::TokenResponseParse { source, status: Some(status) })
		})?;

		parsed.into_issued().inspect_err(|err| {
			obs::log_provider_failure(
				&self.descriptor.id,
				Some(status),
				"malformed",
				&err.to_string(),
			);
		})
	}

	fn map_rejection(&self, response: &HttpResponse, meta: Option<&ResponseMetadata>) -> Error {
		let status = response.status().as_u16();
		let preview = body_preview(response.body());
		let mut ctx = ProviderErrorContext::new().with_http_status(status);

		if let Ok(body) = serde_json::from_slice::<OAuthErrorBody>(response.body()) {
			if let Some(error) = body.error {
				ctx = ctx.with_oauth_error(error);
			}
			if let Some(description) = body.error_description {
				ctx = ctx.with_error_description(description);
			}
		}

		ctx = ctx.with_body_preview(preview.clone());

		let kind = self.strategy.classify_token_error(&ctx);

		obs::log_provider_failure(&self.descriptor.id, Some(status), kind.as_str(), &preview);

		let reason = ctx
			.error_description
			.or(ctx.oauth_error)
			.unwrap_or_else(|| format!("HTTP {status}: {preview}"));

		match kind {
			ProviderErrorKind::InvalidGrant => Error::InvalidGrant { reason },
			ProviderErrorKind::InvalidClient => Error::InvalidClient { reason },
			ProviderErrorKind::Transient => TransientError::TokenEndpoint {
				message: reason,
				status: Some(status),
				retry_after: meta.and_then(|value| value.retry_after),
			}
			.into(),
		}
	}
}
#[cfg(feature = "reqwest")]
impl TokenEndpointClient<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a client that provisions its own reqwest-backed transport.
	pub fn new(
		descriptor: ProviderDescriptor,
		strategy: Arc<dyn ProviderStrategy>,
		credentials: ClientCredentials,
	) -> Self {
		Self::with_http_client(
			descriptor,
			strategy,
			credentials,
			ReqwestHttpClient::default(),
			Arc::new(ReqwestTransportErrorMapper),
		)
	}
}
impl<C, M> RefreshExchange for TokenEndpointClient<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn exchange<'a>(&'a self, refresh_token: &'a TokenSecret) -> ExchangeFuture<'a> {
		Box::pin(self.refresh(refresh_token))
	}
}
impl<C, M> Debug for TokenEndpointClient<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenEndpointClient")
			.field("descriptor", &self.descriptor)
			.field("client_id", &self.credentials.client_id)
			.field("client_secret_set", &self.credentials.client_secret.is_some())
			.finish()
	}
}

#[derive(Deserialize)]
struct RefreshTokenResponse {
	access_token: String,
	#[serde(default, deserialize_with = "deserialize_expires_in")]
	expires_in: Option<u64>,
	refresh_token: Option<String>,
}
impl RefreshTokenResponse {
	fn into_issued(self) -> Result<IssuedTokens> {
		let expires_in = self.expires_in.ok_or(ConfigError::MissingExpiresIn)?;
		let expires_in = i64::try_from(expires_in).map_err(|_| ConfigError::ExpiresInOutOfRange)?;

		if expires_in <= 0 {
			return Err(ConfigError::NonPositiveExpiresIn.into());
		}

		let mut issued = IssuedTokens::new(self.access_token, Duration::seconds(expires_in));

		if let Some(rotated) = self.refresh_token.filter(|value| !value.is_empty()) {
			issued = issued.with_refresh_token(rotated);
		}

		Ok(issued)
	}
}

#[derive(Deserialize)]
struct OAuthErrorBody {
	error: Option<String>,
	error_description: Option<String>,
}

fn parse_json<T>(body: &[u8]) -> Result<T, serde_path_to_error::Error<serde_json::Error>>
where
	T: for<'de> Deserialize<'de>,
{
	let mut deserializer = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut deserializer)
}

// Some providers send `"expires_in":"3600"`.
fn deserialize_expires_in<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum RawExpiresIn {
		Seconds(u64),
		Text(String),
	}

	match Option::<RawExpiresIn>::deserialize(deserializer)? {
		None => Ok(None),
		Some(RawExpiresIn::Seconds(secs)) => Ok(Some(secs)),
		Some(RawExpiresIn::Text(text)) => text
			.trim()
			.parse()
			.map(Some)
			.map_err(|_| de::Error::custom("expires_in is not a whole number of seconds")),
	}
}

// Never includes serde's message, which may quote the offending value.
fn describe_parse_error(err: &serde_path_to_error::Error<serde_json::Error>) -> String {
	let inner = err.inner();

	format!(
		"{:?} error at `{}` (line {}, column {})",
		inner.classify(),
		err.path(),
		inner.line(),
		inner.column()
	)
}

fn body_preview(body: &[u8]) -> String {
	strategy::truncate_preview(String::from_utf8_lossy(body).into_owned())
}

// RFC 6749 §2.3.1 form-encodes both halves before base64.
fn basic_authorization(client_id: &str, client_secret: &str) -> String {
	let id: String = form_urlencoded::byte_serialize(client_id.as_bytes()).collect();
	let secret: String = form_urlencoded::byte_serialize(client_secret.as_bytes()).collect();

	format!("Basic {}", STANDARD.encode(format!("{id}:{secret}")))
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(meta: Option<&ResponseMetadata>, err: ReqwestError) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}
	if err.is_timeout() {
		return TransientError::TokenEndpoint {
			message: "Request timed out while calling the token endpoint.".into(),
			status: meta_status(meta).or_else(|| err.status().map(|code| code.as_u16())),
			retry_after: meta_retry_after(meta),
		}
		.into();
	}

	TransportError::from(err).into()
}

#[cfg(feature = "reqwest")]
fn map_generic_transport_error(meta: Option<&ResponseMetadata>, message: impl Display) -> Error {
	TransientError::TokenEndpoint {
		message: format!("HTTP client error occurred while calling the token endpoint: {message}"),
		status: meta_status(meta),
		retry_after: meta_retry_after(meta),
	}
	.into()
}

#[cfg(feature = "reqwest")]
fn meta_status(meta: Option<&ResponseMetadata>) -> Option<u16> {
	meta.and_then(|value| value.status)
}

#[cfg(feature = "reqwest")]
fn meta_retry_after(meta: Option<&ResponseMetadata>) -> Option<Duration> {
	meta.and_then(|value| value.retry_after)
}
