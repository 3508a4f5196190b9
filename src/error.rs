//! Crate-level error types shared across configuration options and transports.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Boxed error used for causes supplied by external collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Authentication could not be configured.
	#[error(transparent)]
	Authentication(#[from] AuthenticationError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
}

/// Reason an [`AuthenticationError`] was raised.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuthErrorKind {
	/// No provider was supplied.
	MissingProvider,
	/// The provider reported that no usable credentials exist.
	NotAuthenticated,
	/// The provider failed to build its authenticated transport.
	FlowInitialization,
}
impl AuthErrorKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuthErrorKind::MissingProvider => "missing_provider",
			AuthErrorKind::NotAuthenticated => "not_authenticated",
			AuthErrorKind::FlowInitialization => "flow_initialization",
		}
	}
}
impl Display for AuthErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Authentication through an external credential provider failed.
///
/// Returned when no provider is supplied, when its credentials are missing, or when the
/// provider cannot initialize its transport. The provider's own failure, if any, is
/// available through [`StdError::source`] and can be downcast to its concrete type.
#[derive(Debug)]
pub struct AuthenticationError {
	kind: AuthErrorKind,
	message: String,
	source: Option<BoxError>,
}
impl AuthenticationError {
	/// Builds an error without an underlying cause.
	pub fn new(kind: AuthErrorKind, message: impl Into<String>) -> Self {
		Self { kind, message: message.into(), source: None }
	}

	/// Builds an error that wraps the provider's failure.
	pub fn with_source(
		kind: AuthErrorKind,
		message: impl Into<String>,
		source: impl Into<BoxError>,
	) -> Self {
		Self { kind, message: message.into(), source: Some(source.into()) }
	}

	/// Classification of the failure.
	pub fn kind(&self) -> AuthErrorKind {
		self.kind
	}

	/// Human-readable message, without the cause.
	pub fn message(&self) -> &str {
		&self.message
	}

	/// Consumes the error and returns the wrapped cause, if any.
	pub fn into_source(self) -> Option<BoxError> {
		self.source
	}
}
impl Display for AuthenticationError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match &self.source {
			Some(cause) => write!(f, "{}: {cause}", self.message),
			None => f.write_str(&self.message),
		}
	}
}
impl StdError for AuthenticationError {
	fn source(&self) -> Option<&(dyn StdError + 'static)> {
		self.source.as_deref().map(|cause| cause as &(dyn StdError + 'static))
	}
}

/// Configuration and validation failures raised while applying options.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Endpoint cannot be parsed.
	#[error("Endpoint `{endpoint}` is invalid.")]
	InvalidEndpoint {
		/// Raw endpoint supplied by the caller.
		endpoint: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Request path cannot be joined onto the endpoint.
	#[error("Path `{path}` cannot be joined onto the endpoint.")]
	InvalidPath {
		/// Raw path supplied by the caller.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Token cannot be carried in an `Authorization` header.
	#[error("Token contains characters that are not valid in an HTTP header.")]
	InvalidToken(#[from] oauth2::http::header::InvalidHeaderValue),

	/// Token option was given an empty token.
	#[error("Token cannot be empty.")]
	EmptyToken,
	/// Region option was given an empty region.
	#[error("Region cannot be empty.")]
	EmptyRegion,
	/// User agent cannot be carried in a `User-Agent` header.
	#[error("User agent contains characters that are not valid in an HTTP header.")]
	InvalidUserAgent,
	/// User agent option was given an empty value.
	#[error("User agent cannot be empty.")]
	EmptyUserAgent,
	/// No endpoint has been configured.
	#[error("No endpoint has been configured.")]
	MissingEndpoint,
	/// No transport is available for outbound requests.
	#[error("No transport is configured; enable the `reqwest` feature or use custom auth.")]
	MissingTransport,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while sending the request.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while sending the request.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[derive(Debug)]
	struct KeyringLocked;
	impl Display for KeyringLocked {
		fn fmt(&self, f: &mut Formatter) -> FmtResult {
			f.write_str("keyring is locked")
		}
	}
	impl StdError for KeyringLocked {}

	#[test]
	fn authentication_error_renders_message_alone_without_cause() {
		let err = AuthenticationError::new(AuthErrorKind::MissingProvider, "provider missing");

		assert_eq!(err.to_string(), "provider missing");
		assert!(StdError::source(&err).is_none());
	}

	#[test]
	fn authentication_error_appends_cause_and_exposes_it_as_source() {
		let err = AuthenticationError::with_source(
			AuthErrorKind::FlowInitialization,
			"failed to initialize",
			KeyringLocked,
		);

		assert_eq!(err.to_string(), "failed to initialize: keyring is locked");
		assert_eq!(err.kind(), AuthErrorKind::FlowInitialization);
		assert_eq!(err.message(), "failed to initialize");

		let source = StdError::source(&err).expect("Cause should be exposed as the source.");

		assert!(source.downcast_ref::<KeyringLocked>().is_some());
	}

	#[test]
	fn crate_error_is_transparent_over_authentication_error() {
		let err: Error = AuthenticationError::with_source(
			AuthErrorKind::FlowInitialization,
			"failed to initialize",
			KeyringLocked,
		)
		.into();

		assert_eq!(err.to_string(), "failed to initialize: keyring is locked");

		let source = StdError::source(&err)
			.expect("Transparent variant should forward the wrapped cause.");

		assert!(source.downcast_ref::<KeyringLocked>().is_some());
	}

	#[test]
	fn into_source_returns_the_boxed_cause() {
		let err = AuthenticationError::with_source(
			AuthErrorKind::FlowInitialization,
			"failed to initialize",
			KeyringLocked,
		);
		let cause = err.into_source().expect("Cause should be returned.");

		assert!(cause.downcast::<KeyringLocked>().is_ok());
	}
}
