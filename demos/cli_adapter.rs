//! Demonstrates wiring credentials stored by an external CLI into the client configuration.
//!
//! 1. Implement [`CliAuthProvider`] in the consuming application, on top of whatever the CLI
//!    exposes. Here the "CLI storage" is the `DEMO_CLI_ACCESS_TOKEN` environment variable.
//! 2. Pass the adapter to [`with_cli_provider_auth`] alongside the other options.
//! 3. Send requests through [`Configuration::transport`].
//!
//! Run with `DEMO_CLI_ACCESS_TOKEN=... cargo run --example cli_adapter`.

// std
use std::{env, sync::Arc};
// crates.io
use color_eyre::Result;
// self
use sdk_core::{
	config::{CliAuthProvider, Configuration, with_cli_provider_auth, with_endpoint},
	error::{BoxError, Error},
	http::{BearerTransport, ReqwestTransport, Transport},
	http_types::{Method, Request},
};

const TOKEN_VAR: &str = "DEMO_CLI_ACCESS_TOKEN";

struct EnvCliAdapter;
impl CliAuthProvider for EnvCliAdapter {
	fn is_authenticated(&self) -> bool {
		env::var(TOKEN_VAR).is_ok_and(|token| !token.is_empty())
	}

	fn auth_flow(&self) -> Result<Arc<dyn Transport>, BoxError> {
		let token = env::var(TOKEN_VAR)?;
		let transport = BearerTransport::new(Arc::new(ReqwestTransport::default()), &token)?;

		Ok(Arc::new(transport))
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = match Configuration::new([
		with_endpoint("https://httpbin.org/"),
		with_cli_provider_auth(Some(Arc::new(EnvCliAdapter))),
	]) {
		Ok(config) => config,
		Err(Error::Authentication(e)) => {
			println!("CLI credentials unavailable ({:?}): {e}.", e.kind());

			return Ok(());
		},
		Err(e) => return Err(e.into()),
	};

	println!("Configured client: {config:?}.");

	let request = Request::builder()
		.method(Method::GET)
		.uri(config.url_for("bearer")?.as_str())
		.body(Vec::new())?;
	let response = config.transport()?.round_trip(request).await?;

	println!("Server answered with status {}.", response.status());

	Ok(())
}
