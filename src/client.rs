//! SP-API client: owns the transport, credentials, and cancellation signal of one caller.

mod execute;
mod metrics;
mod paginate;

pub use metrics::CallMetrics;

// self
use crate::{
	_prelude::*,
	auth::{CredentialManager, Token},
	config::ClientConfig,
	error::ConfigError,
	http::ApiHttpClient,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestApiClient = Client<ReqwestHttpClient>;

/// Authenticated, retrying SP-API client.
///
/// Calls take `&mut self`: one logical call runs at a time per client, and the token cell it
/// owns needs no lock. Use one client per worker (or wrap it in an async mutex) for concurrency.
/// Cancelling the token returned by [`Client::cancellation`] aborts the call in flight at its
/// next suspension point.
pub struct Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// HTTP client wrapper used for token grants and API calls.
	pub http_client: Arc<C>,
	/// Validated configuration.
	pub config: ClientConfig,
	/// Always-on counters for executor activity.
	pub metrics: Arc<CallMetrics>,
	credentials: CredentialManager,
	cancellation: CancellationToken,
}
impl<C> Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a client over a caller-provided transport.
	pub fn with_http_client(config: ClientConfig, http_client: impl Into<Arc<C>>) -> Result<Self> {
		config.validate().map_err(ConfigError::from)?;

		Ok(Self {
			http_client: http_client.into(),
			credentials: CredentialManager::from_config(&config),
			config,
			metrics: Default::default(),
			cancellation: CancellationToken::new(),
		})
	}

	/// Replaces the cancellation signal, e.g. with a child of an application-wide token.
	pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
		self.cancellation = cancellation;

		self
	}

	/// Seeds a previously issued token so the first call can skip the refresh grant.
	pub fn with_token(mut self, token: Token) -> Self {
		self.credentials = CredentialManager::from_config(&self.config).with_token(token);

		self
	}

	/// Signal observed by every retry iteration, sleep, and network call.
	pub fn cancellation(&self) -> &CancellationToken {
		&self.cancellation
	}

	/// Credential state owned by this client.
	pub fn credentials(&self) -> &CredentialManager {
		&self.credentials
	}

	/// Base URL every request path resolves against.
	pub fn base_url(&self) -> &Url {
		&self.config.endpoint
	}
}
#[cfg(feature = "reqwest")]
impl Client<ReqwestHttpClient> {
	/// Creates a client with its own reqwest-backed transport.
	pub fn new(config: ClientConfig) -> Result<Self> {
		Self::with_http_client(config, ReqwestHttpClient::default())
	}
}
impl<C> Debug for Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("endpoint", &self.config.endpoint.as_str())
			.field("marketplace", &self.config.marketplace.id)
			.field("credentials", &self.credentials)
			.field("cancelled", &self.cancellation.is_cancelled())
			.finish()
	}
}

/// Races `fut` against `cancellation`; cancellation wins ties.
pub(crate) async fn until_cancelled<F, T>(cancellation: &CancellationToken, fut: F) -> Result<T>
where
	F: Future<Output = Result<T>>,
{
	tokio::select! {
		biased;
		_ = cancellation.cancelled() => Err(Error::Cancelled),
		result = fut => result,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_preludet::{ScriptedHttpClient, scripted_client, test_config};

	#[test]
	fn invalid_configuration_is_rejected() {
		let mut config = test_config();

		config.client_id = String::new();

		let transport = ScriptedHttpClient::new(config.token_endpoint.clone());
		let err = <Client<ScriptedHttpClient>>::with_http_client(config, transport)
			.expect_err("Blank client id fails.");

		assert!(matches!(err, Error::Config(ConfigError::Build(_))));
	}

	#[tokio::test]
	async fn seeded_token_skips_initial_refresh() {
		let (client, transport) = scripted_client();
		let token = Token::builder()
			.access_token("Atza|seeded")
			.refresh_token("Atzr|seeded")
			.expires_in(Duration::HOUR)
			.build()
			.expect("Seed token should build.");
		let mut client = client.with_token(token);
		let request = crate::request::PreparedRequest::get(
			crate::request::resolve(client.base_url(), "/sellers/v1/marketplaceParticipations")
				.expect("Path should resolve."),
		);

		transport.push_api(200, "{}");
		client
			.execute(&request, &crate::retry::RetryPolicy::short())
			.await
			.expect("Seeded call should succeed.");

		assert_eq!(transport.token_calls(), 0);
		assert_eq!(transport.api_requests()[0].access_token.as_deref(), Some("Atza|seeded"));
	}

	#[tokio::test]
	async fn cancellation_can_be_shared() {
		let parent = CancellationToken::new();
		let (client, _) = scripted_client();
		let client = client.with_cancellation(parent.child_token());

		parent.cancel();

		assert!(client.cancellation().is_cancelled());
		assert!(format!("{client:?}").contains("cancelled: true"));
	}
}
