//! Refresh-token credential lifecycle.

// self
use crate::{
	_prelude::*,
	auth::{Token, TokenBuilderError, TokenSecret},
	config::ClientConfig,
	error::ConfigError,
	http::ApiHttpClient,
	oauth::RefreshFacade,
	obs::{self, CallKind, CallOutcome, CallSpan},
};

/// Owns the current token pair for one client and refreshes it on demand.
///
/// Every method takes `&mut self`; the credential manager is never shared, so no lock guards the
/// token cell.
pub struct CredentialManager {
	client_id: String,
	client_secret: TokenSecret,
	token_endpoint: Url,
	refresh_token: TokenSecret,
	token: Option<Token>,
	refreshes: u64,
}
impl CredentialManager {
	/// Creates a manager that will obtain its first access token from `refresh_token`.
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<TokenSecret>,
		refresh_token: impl Into<TokenSecret>,
		token_endpoint: Url,
	) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: client_secret.into(),
			token_endpoint,
			refresh_token: refresh_token.into(),
			token: None,
			refreshes: 0,
		}
	}

	/// Creates a manager from validated client configuration.
	pub fn from_config(config: &ClientConfig) -> Self {
		Self::new(
			config.client_id.clone(),
			config.client_secret.clone(),
			config.refresh_token.clone(),
			config.token_endpoint.clone(),
		)
	}

	/// Seeds a previously issued token, e.g. one restored by the caller.
	pub fn with_token(mut self, token: Token) -> Self {
		self.refresh_token = token.refresh_token.clone();
		self.token = Some(token);

		self
	}

	/// Currently held token, if any grant has succeeded.
	pub fn token(&self) -> Option<&Token> {
		self.token.as_ref()
	}

	/// Number of refresh grants that completed successfully.
	pub fn refresh_count(&self) -> u64 {
		self.refreshes
	}

	/// Returns a usable token, refreshing only when none is held or the held one has expired.
	pub async fn ensure_valid_token<C>(&mut self, http_client: &C) -> Result<&Token>
	where
		C: ?Sized + ApiHttpClient,
	{
		let now = OffsetDateTime::now_utc();

		if !self.token.as_ref().is_some_and(|token| token.is_usable_at(now)) {
			self.refresh(http_client, "ensure_valid_token").await?;
		}

		self.current()
	}

	/// Performs the refresh grant unconditionally.
	pub async fn force_refresh<C>(&mut self, http_client: &C) -> Result<&Token>
	where
		C: ?Sized + ApiHttpClient,
	{
		self.refresh(http_client, "force_refresh").await?;

		self.current()
	}

	async fn refresh<C>(&mut self, http_client: &C, stage: &'static str) -> Result<()>
	where
		C: ?Sized + ApiHttpClient,
	{
		const KIND: CallKind = CallKind::Refresh;

		let span = CallSpan::new(KIND, stage);

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async {
				let facade =
					RefreshFacade::new(&self.client_id, &self.client_secret, &self.token_endpoint)?;

				facade.refresh(http_client, &self.refresh_token).await
			})
			.await;

		obs::record_call_outcome(KIND, CallOutcome::of(&result));

		let token = result?;

		self.refresh_token = token.refresh_token.clone();
		self.token = Some(token);
		self.refreshes += 1;

		Ok(())
	}

	fn current(&self) -> Result<&Token> {
		self.token
			.as_ref()
			.ok_or_else(|| ConfigError::TokenBuild(TokenBuilderError::MissingAccessToken).into())
	}
}
impl Debug for CredentialManager {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CredentialManager")
			.field("client_id", &self.client_id)
			.field("token_endpoint", &self.token_endpoint.as_str())
			.field("token", &self.token)
			.field("refreshes", &self.refreshes)
			.finish_non_exhaustive()
	}
}
