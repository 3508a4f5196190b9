//! Client configuration and the options that build it.
//!
//! SDK clients are constructed from a list of [`ConfigurationOption`]s applied in order to a
//! default [`Configuration`]. Each option validates its input and returns an error instead of
//! leaving the configuration half-built; [`Configuration::new`] stops at the first failure.

pub mod cli_auth;

pub use cli_auth::*;

// self
use crate::{
	_prelude::*,
	error::ConfigError,
	http::{BearerTransport, Transport, UserAgentTransport},
	obs::{self, AuthMethod},
};
#[cfg(feature = "reqwest")] use {crate::http::ReqwestTransport, std::sync::OnceLock};

/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("sdk-core/", env!("CARGO_PKG_VERSION"));

/// Settings shared by every request an SDK client sends.
#[derive(Clone)]
pub struct Configuration {
	/// Base URL requests are resolved against.
	pub endpoint: Option<Url>,
	/// Region the client targets, if the service is regional.
	pub region: Option<String>,
	/// Value of the `User-Agent` header sent with every request.
	pub user_agent: String,
	/// Static bearer token applied by the default transport.
	pub token: Option<String>,
	/// Transport that authenticates every request; takes precedence over `token`.
	pub custom_auth: Option<Arc<dyn Transport>>,
	/// reqwest client backing the default transport.
	#[cfg(feature = "reqwest")]
	pub http_client: Option<ReqwestClient>,
	#[cfg(feature = "reqwest")]
	default_client: OnceLock<ReqwestClient>,
}
impl Configuration {
	/// Applies `options` in order to a default configuration.
	pub fn new<I>(options: I) -> Result<Self>
	where
		I: IntoIterator<Item = ConfigurationOption>,
	{
		let mut config = Self::default();

		for option in options {
			config.apply(&option)?;
		}

		Ok(config)
	}

	/// Applies a single option to this configuration.
	pub fn apply(&mut self, option: &ConfigurationOption) -> Result<()> {
		option.apply(self)
	}

	/// Resolves the transport requests should be sent through.
	///
	/// A custom auth transport wins. Otherwise the default reqwest transport is used, wrapped in
	/// a [`BearerTransport`] when a token is configured. Either way the result sends the
	/// configured user agent on requests that do not carry one.
	pub fn transport(&self) -> Result<Arc<dyn Transport>> {
		let base: Arc<dyn Transport> = match (&self.custom_auth, &self.token) {
			(Some(custom_auth), _) => Arc::clone(custom_auth),
			(None, Some(token)) => Arc::new(BearerTransport::new(self.default_transport()?, token)?),
			(None, None) => self.default_transport()?,
		};

		Ok(Arc::new(UserAgentTransport::new(base, &self.user_agent)?))
	}

	pub(crate) fn install_custom_auth(&mut self, transport: Arc<dyn Transport>) {
		self.custom_auth = Some(transport);
	}

	/// Joins `path` onto the configured endpoint.
	pub fn url_for(&self, path: &str) -> Result<Url> {
		let endpoint = self.endpoint.as_ref().ok_or(ConfigError::MissingEndpoint)?;
		let url = endpoint
			.join(path)
			.map_err(|source| ConfigError::InvalidPath { path: path.to_owned(), source })?;

		Ok(url)
	}

	#[cfg(feature = "reqwest")]
	fn default_transport(&self) -> Result<Arc<dyn Transport>> {
		let client = match (&self.http_client, self.default_client.get()) {
			(Some(client), _) | (None, Some(client)) => client.clone(),
			(None, None) => {
				let client = ReqwestClient::builder().build().map_err(ConfigError::from)?;

				// First writer wins; a losing client is dropped.
				let _ = self.default_client.set(client.clone());

				client
			},
		};

		Ok(Arc::new(ReqwestTransport::with_client(client)))
	}

	#[cfg(not(feature = "reqwest"))]
	fn default_transport(&self) -> Result<Arc<dyn Transport>> {
		Err(ConfigError::MissingTransport.into())
	}
}
impl Default for Configuration {
	fn default() -> Self {
		Self {
			endpoint: None,
			region: None,
			user_agent: DEFAULT_USER_AGENT.into(),
			token: None,
			custom_auth: None,
			#[cfg(feature = "reqwest")]
			http_client: None,
			#[cfg(feature = "reqwest")]
			default_client: OnceLock::new(),
		}
	}
}
impl Debug for Configuration {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Configuration")
			.field("endpoint", &self.endpoint.as_ref().map(Url::as_str))
			.field("region", &self.region)
			.field("user_agent", &self.user_agent)
			.field("token_set", &self.token.is_some())
			.field("custom_auth_set", &self.custom_auth.is_some())
			.finish()
	}
}

type ApplyFn = dyn Fn(&mut Configuration) -> Result<()> + Send + Sync;

/// Deferred mutation of a [`Configuration`].
///
/// Options are cheap to clone and may be applied more than once.
#[derive(Clone)]
pub struct ConfigurationOption(Arc<ApplyFn>);
impl ConfigurationOption {
	/// Wraps a closure as an option.
	pub fn new<F>(f: F) -> Self
	where
		F: 'static + Fn(&mut Configuration) -> Result<()> + Send + Sync,
	{
		Self(Arc::new(f))
	}

	/// Runs the option against `config`.
	pub fn apply(&self, config: &mut Configuration) -> Result<()> {
		(self.0)(config)
	}
}
impl Debug for ConfigurationOption {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("ConfigurationOption(..)")
	}
}

/// Authenticates every request through `transport`.
pub fn with_custom_auth(transport: Arc<dyn Transport>) -> ConfigurationOption {
	ConfigurationOption::new(move |config| {
		obs::observe(AuthMethod::CustomAuth, "with_custom_auth", || {
			config.install_custom_auth(Arc::clone(&transport));

			Ok(())
		})
	})
}

/// Authenticates requests on the default transport with a static bearer token.
pub fn with_token(token: impl Into<String>) -> ConfigurationOption {
	let token = token.into();

	ConfigurationOption::new(move |config| {
		obs::observe(AuthMethod::Token, "with_token", || {
			if token.is_empty() {
				return Err(ConfigError::EmptyToken.into());
			}

			// Must be representable as an `Authorization` header.
			oauth2::http::HeaderValue::from_str(&token).map_err(ConfigError::from)?;

			config.token = Some(token.clone());

			Ok(())
		})
	})
}

/// Sets the base URL requests are resolved against.
pub fn with_endpoint(endpoint: impl Into<String>) -> ConfigurationOption {
	let endpoint = endpoint.into();

	ConfigurationOption::new(move |config| {
		let url = Url::parse(&endpoint)
			.map_err(|source| ConfigError::InvalidEndpoint { endpoint: endpoint.clone(), source })?;

		config.endpoint = Some(url);

		Ok(())
	})
}

/// Sets the region for regional services.
pub fn with_region(region: impl Into<String>) -> ConfigurationOption {
	let region = region.into();

	ConfigurationOption::new(move |config| {
		let trimmed = region.trim();

		if trimmed.is_empty() {
			return Err(ConfigError::EmptyRegion.into());
		}

		config.region = Some(trimmed.to_owned());

		Ok(())
	})
}

/// Overrides the `User-Agent` header.
///
/// The header is applied by [`Configuration::transport`] whatever the transport's origin
/// (default, custom client, custom or CLI auth), unless the request already carries one.
pub fn with_user_agent(user_agent: impl Into<String>) -> ConfigurationOption {
	let user_agent = user_agent.into();

	ConfigurationOption::new(move |config| {
		if user_agent.is_empty() {
			return Err(ConfigError::EmptyUserAgent.into());
		}
		if oauth2::http::HeaderValue::from_str(&user_agent).is_err() {
			return Err(ConfigError::InvalidUserAgent.into());
		}

		config.user_agent = user_agent.clone();

		Ok(())
	})
}

/// Uses `client` for the default transport instead of building one.
///
/// The configured user agent is still sent; see [`with_user_agent`].
#[cfg(feature = "reqwest")]
pub fn with_http_client(client: ReqwestClient) -> ConfigurationOption {
	ConfigurationOption::new(move |config| {
		config.http_client = Some(client.clone());

		Ok(())
	})
}
