// self
use crate::obs::{AuthMethod, AuthOutcome};

/// Records an auth option outcome via the global metrics recorder (when enabled).
pub fn record_auth_outcome(method: AuthMethod, outcome: AuthOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"sdk_core_auth_total",
			"method" => method.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (method, outcome);
	}
}
