//! Optional observability helpers for configuration options.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `sdk_core.auth` with the `method` (auth
//!   option) and `stage` (call site) fields.
//! - Enable `metrics` to increment the `sdk_core_auth_total` counter for every
//!   attempt/success/failure, labeled by `method` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Authentication options observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuthMethod {
	/// Delegation to credentials stored by an external CLI.
	CliProvider,
	/// Caller-supplied transport.
	CustomAuth,
	/// Static bearer token.
	Token,
}
impl AuthMethod {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuthMethod::CliProvider => "cli_provider",
			AuthMethod::CustomAuth => "custom_auth",
			AuthMethod::Token => "token",
		}
	}
}
impl Display for AuthMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuthOutcome {
	/// Entry to an option.
	Attempt,
	/// Option applied.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl AuthOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuthOutcome::Attempt => "attempt",
			AuthOutcome::Success => "success",
			AuthOutcome::Failure => "failure",
		}
	}
}
impl Display for AuthOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs `f` inside an auth span, recording attempt and outcome for `method`.
pub(crate) fn observe<T>(
	method: AuthMethod,
	stage: &'static str,
	f: impl FnOnce() -> Result<T>,
) -> Result<T> {
	let _guard = AuthSpan::new(method, stage).entered();

	record_auth_outcome(method, AuthOutcome::Attempt);

	match f() {
		Ok(value) => {
			record_auth_outcome(method, AuthOutcome::Success);

			Ok(value)
		},
		Err(e) => {
			record_auth_outcome(method, AuthOutcome::Failure);
			log_auth_failure(method, &e);

			Err(e)
		},
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::ConfigError;

	#[test]
	fn labels_are_stable() {
		assert_eq!(AuthMethod::CliProvider.to_string(), "cli_provider");
		assert_eq!(AuthMethod::CustomAuth.as_str(), "custom_auth");
		assert_eq!(AuthOutcome::Failure.to_string(), "failure");
	}

	#[test]
	fn observe_passes_results_through() {
		let ok = observe(AuthMethod::Token, "test", || Ok(7));

		assert_eq!(ok.expect("Successful closure should return its value."), 7);

		let err = observe::<()>(AuthMethod::Token, "test", || Err(ConfigError::EmptyToken.into()))
			.expect_err("Failing closure should return its error.");

		assert!(matches!(err, Error::Config(ConfigError::EmptyToken)));
	}
}
