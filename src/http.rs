//! Transport primitives for SDK requests.
//!
//! [`Transport`] is the crate's only dependency on an HTTP stack. Authentication schemes are
//! expressed as transports that decorate the request before delegating, so a transport
//! returned by an external credential tool plugs in the same way as [`BearerTransport`].

// crates.io
use oauth2::http::header::{AUTHORIZATION, HeaderValue, USER_AGENT};
// self
use crate::{_prelude::*, error::ConfigError, error::TransportError};

pub use oauth2::{HttpRequest, HttpResponse};

/// Boxed future returned by [`Transport::round_trip`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + 'a + Send>>;

/// Executes a single HTTP request and returns its response.
///
/// Implementations may add authentication headers and refresh tokens transparently. They are
/// shared as `Arc<dyn Transport>` between clients, so they must be `Send + Sync`.
pub trait Transport
where
	Self: Send + Sync,
{
	/// Sends `request` and resolves once the full response body is available.
	fn round_trip(&self, request: HttpRequest) -> TransportFuture<'_>;
}
impl<T> Transport for Arc<T>
where
	T: ?Sized + Transport,
{
	fn round_trip(&self, request: HttpRequest) -> TransportFuture<'_> {
		(**self).round_trip(request)
	}
}

/// Decorates an inner transport with an `Authorization: Bearer` header.
#[derive(Clone)]
pub struct BearerTransport {
	inner: Arc<dyn Transport>,
	header: HeaderValue,
}
impl BearerTransport {
	/// Wraps `inner`, rejecting tokens that are empty or cannot be carried in a header.
	pub fn new(inner: Arc<dyn Transport>, token: &str) -> Result<Self, ConfigError> {
		if token.is_empty() {
			return Err(ConfigError::EmptyToken);
		}

		let mut header = HeaderValue::from_str(&format!("Bearer {token}"))?;

		header.set_sensitive(true);

		Ok(Self { inner, header })
	}
}
impl Transport for BearerTransport {
	fn round_trip(&self, mut request: HttpRequest) -> TransportFuture<'_> {
		request.headers_mut().insert(AUTHORIZATION, self.header.clone());

		self.inner.round_trip(request)
	}
}
impl Debug for BearerTransport {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("BearerTransport").field("header", &"<redacted>").finish()
	}
}

/// Decorates an inner transport with a `User-Agent` header.
///
/// A `User-Agent` already present on the request is left untouched.
#[derive(Clone)]
pub struct UserAgentTransport {
	inner: Arc<dyn Transport>,
	header: HeaderValue,
}
impl UserAgentTransport {
	/// Wraps `inner`, rejecting user agents that are empty or cannot be carried in a header.
	pub fn new(inner: Arc<dyn Transport>, user_agent: &str) -> Result<Self, ConfigError> {
		if user_agent.is_empty() {
			return Err(ConfigError::EmptyUserAgent);
		}

		let header =
			HeaderValue::from_str(user_agent).map_err(|_| ConfigError::InvalidUserAgent)?;

		Ok(Self { inner, header })
	}
}
impl Transport for UserAgentTransport {
	fn round_trip(&self, mut request: HttpRequest) -> TransportFuture<'_> {
		request.headers_mut().entry(USER_AGENT).or_insert_with(|| self.header.clone());

		self.inner.round_trip(request)
	}
}
impl Debug for UserAgentTransport {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("UserAgentTransport").field("header", &self.header).finish()
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl Transport for ReqwestTransport {
	fn round_trip(&self, request: HttpRequest) -> TransportFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let request: reqwest::Request = request.try_into()?;
			let response = client.execute(request).await?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new = HttpResponse::new(response.bytes().await?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok::<_, TransportError>(response_new)
		})
	}
}
