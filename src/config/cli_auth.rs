//! Delegation of authentication to credentials stored by an external CLI.
//!
//! The SDK never links against the CLI. Instead the consuming application writes a small
//! adapter implementing [`CliAuthProvider`] on top of the CLI's library and hands it to
//! [`with_cli_provider_auth`]:
//!
//! ```
//! use std::sync::Arc;
//!
//! use sdk_core::{
//! 	config::{CliAuthProvider, Configuration, with_cli_provider_auth},
//! 	error::BoxError,
//! 	http::Transport,
//! };
//!
//! struct LoggedOut;
//! impl CliAuthProvider for LoggedOut {
//! 	fn is_authenticated(&self) -> bool {
//! 		false
//! 	}
//!
//! 	fn auth_flow(&self) -> Result<Arc<dyn Transport>, BoxError> {
//! 		unreachable!("auth_flow is only consulted after a successful login check")
//! 	}
//! }
//!
//! let err = Configuration::new([with_cli_provider_auth(Some(Arc::new(LoggedOut)))])
//! 	.expect_err("a logged-out CLI cannot authenticate the client");
//!
//! assert!(err.to_string().contains("stackit auth provider login"));
//! ```
//!
//! The transport returned by the adapter is expected to refresh tokens on its own and to write
//! refreshed tokens back to the CLI's storage.

// self
use crate::{
	_prelude::*,
	config::ConfigurationOption,
	error::{AuthErrorKind, AuthenticationError},
	http::Transport,
	obs::{self, AuthMethod},
};

/// Message returned when no provider is supplied.
pub const MISSING_PROVIDER_MESSAGE: &str = "CLI auth provider cannot be nil";
/// Message returned when the provider reports no stored credentials.
pub const NOT_AUTHENTICATED_MESSAGE: &str = "not authenticated with CLI provider credentials: please run authentication command (e.g., 'stackit auth provider login')";
/// Message returned when the provider fails to build its transport.
pub const FLOW_INITIALIZATION_MESSAGE: &str = "failed to initialize CLI provider authentication";

/// Credentials stored by an external CLI, exposed as an authenticated transport.
pub trait CliAuthProvider
where
	Self: Send + Sync,
{
	/// Returns `true` when stored credentials exist and can be used.
	fn is_authenticated(&self) -> bool;

	/// Returns a transport that attaches the stored credentials and refreshes them as needed.
	fn auth_flow(&self) -> Result<Arc<dyn Transport>, BoxError>;
}

/// Authenticates the client with credentials stored by an external CLI.
///
/// When applied, the option fails with an [`AuthenticationError`] if `provider` is `None`, if
/// the provider reports no stored credentials (in which case [`CliAuthProvider::auth_flow`] is
/// not called), or if the provider cannot build its transport. On success the provider's
/// transport is installed as [`Configuration::custom_auth`](crate::config::Configuration).
pub fn with_cli_provider_auth(provider: Option<Arc<dyn CliAuthProvider>>) -> ConfigurationOption {
	ConfigurationOption::new(move |config| {
		obs::observe(AuthMethod::CliProvider, "with_cli_provider_auth", || {
			let transport = cli_auth_transport(provider.as_deref())?;

			config.install_custom_auth(transport);

			Ok(())
		})
	})
}

fn cli_auth_transport(
	provider: Option<&dyn CliAuthProvider>,
) -> Result<Arc<dyn Transport>, AuthenticationError> {
	let provider = provider.ok_or_else(|| {
		AuthenticationError::new(AuthErrorKind::MissingProvider, MISSING_PROVIDER_MESSAGE)
	})?;

	if !provider.is_authenticated() {
		return Err(AuthenticationError::new(
			AuthErrorKind::NotAuthenticated,
			NOT_AUTHENTICATED_MESSAGE,
		));
	}

	provider.auth_flow().map_err(|e| {
		AuthenticationError::with_source(
			AuthErrorKind::FlowInitialization,
			FLOW_INITIALIZATION_MESSAGE,
			e,
		)
	})
}
