// std
use std::{
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
	sync::{
		Arc,
		atomic::{AtomicBool, Ordering},
	},
};
// crates.io
use httpmock::prelude::*;
// self
use sdk_core::{
	config::{
		CliAuthProvider, Configuration, with_cli_provider_auth, with_endpoint, with_http_client,
		with_region, with_token, with_user_agent,
	},
	error::{AuthErrorKind, BoxError, Error},
	http::{BearerTransport, HttpRequest, ReqwestTransport, Transport},
	reqwest::Client as ReqwestClient,
	http_types::{Method, Request},
};

/// Stand-in for credentials written by `stackit auth provider login`.
struct CliCredentials {
	access_token: Option<&'static str>,
	flow_requested: AtomicBool,
}
impl CliCredentials {
	fn logged_in(access_token: &'static str) -> Arc<Self> {
		Arc::new(Self { access_token: Some(access_token), flow_requested: AtomicBool::new(false) })
	}

	fn logged_out() -> Arc<Self> {
		Arc::new(Self { access_token: None, flow_requested: AtomicBool::new(false) })
	}
}
impl CliAuthProvider for CliCredentials {
	fn is_authenticated(&self) -> bool {
		self.access_token.is_some()
	}

	fn auth_flow(&self) -> Result<Arc<dyn Transport>, BoxError> {
		self.flow_requested.store(true, Ordering::SeqCst);

		let token = self.access_token.ok_or(CredentialsMissing)?;
		let transport = BearerTransport::new(Arc::new(ReqwestTransport::default()), token)?;

		Ok(Arc::new(transport))
	}
}

#[derive(Debug)]
struct CredentialsMissing;
impl Display for CredentialsMissing {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("credentials file is missing")
	}
}
impl StdError for CredentialsMissing {}

fn get(config: &Configuration, path: &str) -> HttpRequest {
	let url = config.url_for(path).expect("Request path should join onto the endpoint.");

	Request::builder()
		.method(Method::GET)
		.uri(url.as_str())
		.body(Vec::new())
		.expect("Request fixture should build.")
}

#[tokio::test]
async fn cli_credentials_authenticate_outbound_requests() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/v1/projects/p-1/zones")
				.header("authorization", "Bearer cli-access-token");
			then.status(200).header("content-type", "application/json").body("{\"zones\":[]}");
		})
		.await;
	let provider = CliCredentials::logged_in("cli-access-token");
	let config = Configuration::new([
		with_endpoint(format!("{}/v1/", server.base_url())),
		with_region("eu01"),
		with_cli_provider_auth(Some(provider.clone())),
	])
	.expect("Logged-in CLI should configure the client.");

	assert!(provider.flow_requested.load(Ordering::SeqCst));

	let transport = config.transport().expect("Custom auth transport should resolve.");
	let response = transport
		.round_trip(get(&config, "projects/p-1/zones"))
		.await
		.expect("Request through the CLI transport should succeed.");

	assert_eq!(response.status().as_u16(), 200);
	assert_eq!(response.body().as_slice(), b"{\"zones\":[]}");

	mock.assert_async().await;
}

#[tokio::test]
async fn cli_auth_overrides_static_token() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/zones").header("authorization", "Bearer from-cli");
			then.status(204);
		})
		.await;
	let config = Configuration::new([
		with_endpoint(format!("{}/v1/", server.base_url())),
		with_token("static-token"),
		with_cli_provider_auth(Some(CliCredentials::logged_in("from-cli"))),
	])
	.expect("Options should apply.");
	let response = config
		.transport()
		.expect("Transport should resolve.")
		.round_trip(get(&config, "zones"))
		.await
		.expect("Request should succeed.");

	assert_eq!(response.status().as_u16(), 204);

	mock.assert_async().await;
}

#[tokio::test]
async fn static_token_and_user_agent_reach_the_server() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/v1/zones")
				.header("authorization", "Bearer static-token")
				.header("user-agent", "terraform-provider-example/1.0");
			then.status(200);
		})
		.await;
	let config = Configuration::new([
		with_endpoint(format!("{}/v1/", server.base_url())),
		with_user_agent("terraform-provider-example/1.0"),
		with_token("static-token"),
	])
	.expect("Options should apply.");
	let response = config
		.transport()
		.expect("Default transport should build.")
		.round_trip(get(&config, "zones"))
		.await
		.expect("Request should succeed.");

	assert_eq!(response.status().as_u16(), 200);

	mock.assert_async().await;
}

#[tokio::test]
async fn user_agent_applies_to_cli_auth_and_custom_clients() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/zones").header("user-agent", "terraform-provider-example/1.0");
			then.status(200);
		})
		.await;
	let endpoint = format!("{}/v1/", server.base_url());
	let configs = [
		Configuration::new([
			with_endpoint(endpoint.clone()),
			with_user_agent("terraform-provider-example/1.0"),
			with_cli_provider_auth(Some(CliCredentials::logged_in("from-cli"))),
		]),
		Configuration::new([
			with_endpoint(endpoint),
			with_http_client(ReqwestClient::new()),
			with_user_agent("terraform-provider-example/1.0"),
		]),
	];

	for config in configs {
		let config = config.expect("Options should apply.");
		let response = config
			.transport()
			.expect("Transport should resolve.")
			.round_trip(get(&config, "zones"))
			.await
			.expect("Request should succeed.");

		assert_eq!(response.status().as_u16(), 200);
	}

	mock.assert_calls_async(2).await;
}

#[test]
fn logged_out_cli_fails_client_construction() {
	let provider = CliCredentials::logged_out();
	let err = Configuration::new([
		with_endpoint("https://dns.api.example.com/v1/"),
		with_cli_provider_auth(Some(provider.clone())),
	])
	.expect_err("Logged-out CLI should fail construction.");

	match err {
		Error::Authentication(e) => {
			assert_eq!(e.kind(), AuthErrorKind::NotAuthenticated);
			assert!(e.to_string().contains("please run authentication command"));
		},
		other => panic!("Expected an authentication error, got {other:?}."),
	}

	assert!(!provider.flow_requested.load(Ordering::SeqCst));
}

#[test]
fn missing_provider_fails_client_construction() {
	let err = Configuration::new([with_cli_provider_auth(None)])
		.expect_err("Missing provider should fail construction.");

	assert!(matches!(
		&err,
		Error::Authentication(e) if e.kind() == AuthErrorKind::MissingProvider
	));
	assert_eq!(err.to_string(), "CLI auth provider cannot be nil");
}

#[tokio::test]
async fn unreachable_server_surfaces_transport_error() {
	let config = Configuration::new([
		with_endpoint("http://127.0.0.1:9/v1/"),
		with_cli_provider_auth(Some(CliCredentials::logged_in("token"))),
	])
	.expect("Options should apply.");
	let err = config
		.transport()
		.expect("Transport should resolve.")
		.round_trip(get(&config, "zones"))
		.await
		.expect_err("Nothing listens on the discard port.");
	let err: Error = err.into();

	assert!(matches!(err, Error::Transport(_)));
}
