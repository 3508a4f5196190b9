// self
use crate::{_prelude::*, obs::AuthMethod};

/// A span builder used by auth options.
#[derive(Clone, Debug)]
pub struct AuthSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl AuthSpan {
	/// Creates a new span tagged with the provided auth method + stage.
	pub fn new(method: AuthMethod, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("sdk_core.auth", method = method.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (method, stage);

			Self {}
		}
	}

	/// Enters the span for the duration of the returned guard.
	pub fn entered(self) -> AuthSpanGuard {
		#[cfg(feature = "tracing")]
		{
			AuthSpanGuard { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			AuthSpanGuard {}
		}
	}
}

/// RAII guard returned by [`AuthSpan::entered`].
pub struct AuthSpanGuard {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::EnteredSpan,
}
impl Debug for AuthSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("AuthSpanGuard(..)")
	}
}

/// Emits a warning event for a failed auth option (when enabled).
pub fn log_auth_failure(method: AuthMethod, error: &Error) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(method = method.as_str(), error = %error, "auth option failed");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (method, error);
	}
}
