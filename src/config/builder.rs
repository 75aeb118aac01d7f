// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	config::{ClientConfig, DEFAULT_TOKEN_ENDPOINT},
	marketplace::Marketplace,
};

/// Errors raised while constructing or validating client configuration.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ConfigBuildError {
	/// Client identifier is mandatory.
	#[error("Missing client identifier.")]
	MissingClientId,
	/// Client secret is mandatory.
	#[error("Missing client secret.")]
	MissingClientSecret,
	/// Refresh token is mandatory.
	#[error("Missing refresh token.")]
	MissingRefreshToken,
	/// Endpoints must use HTTPS unless they point at a loopback host.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// A default endpoint literal failed to parse.
	#[error("The {endpoint} endpoint is not a valid URL.")]
	InvalidEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}

/// Builder for [`ClientConfig`] values.
#[derive(Clone, Debug, Default)]
pub struct ClientConfigBuilder {
	client_id: Option<String>,
	client_secret: Option<TokenSecret>,
	refresh_token: Option<TokenSecret>,
	marketplace: Marketplace,
	seller_id: Option<String>,
	endpoint: Option<Url>,
	token_endpoint: Option<Url>,
}
impl ClientConfigBuilder {
	/// Sets the LWA client identifier.
	pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
		self.client_id = Some(client_id.into());

		self
	}

	/// Sets the LWA client secret.
	pub fn client_secret(mut self, secret: impl Into<TokenSecret>) -> Self {
		self.client_secret = Some(secret.into());

		self
	}

	/// Sets the seller refresh token.
	pub fn refresh_token(mut self, token: impl Into<TokenSecret>) -> Self {
		self.refresh_token = Some(token.into());

		self
	}

	/// Selects the marketplace (defaults to US); also selects the default regional host.
	pub fn marketplace(mut self, marketplace: Marketplace) -> Self {
		self.marketplace = marketplace;

		self
	}

	/// Sets the selling partner identifier.
	pub fn seller_id(mut self, seller_id: impl Into<String>) -> Self {
		self.seller_id = Some(seller_id.into());

		self
	}

	/// Overrides the API base URL.
	pub fn endpoint(mut self, url: Url) -> Self {
		self.endpoint = Some(url);

		self
	}

	/// Overrides the token endpoint.
	pub fn token_endpoint(mut self, url: Url) -> Self {
		self.token_endpoint = Some(url);

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigBuildError> {
		let endpoint = match self.endpoint {
			Some(url) => url,
			None => Url::parse(self.marketplace.region.base_url())
				.map_err(|source| ConfigBuildError::InvalidEndpoint { endpoint: "api", source })?,
		};
		let token_endpoint = match self.token_endpoint {
			Some(url) => url,
			None => Url::parse(DEFAULT_TOKEN_ENDPOINT)
				.map_err(|source| ConfigBuildError::InvalidEndpoint { endpoint: "token", source })?,
		};
		let config = ClientConfig {
			client_id: self.client_id.unwrap_or_default(),
			client_secret: self.client_secret.unwrap_or_default(),
			refresh_token: self.refresh_token.unwrap_or_default(),
			marketplace: self.marketplace,
			seller_id: self.seller_id,
			endpoint,
			token_endpoint,
		};

		config.validate()?;

		Ok(config)
	}
}
