//! Refresh-token grant facade over the `oauth2` crate.

pub use oauth2;

// crates.io
use oauth2::{
	AuthType, ClientId, ClientSecret, EndpointNotSet, EndpointSet, HttpClientError, RefreshToken,
	RequestTokenError, TokenResponse, TokenUrl,
	basic::{BasicClient, BasicErrorResponse, BasicRequestTokenError, BasicTokenResponse},
};
// self
use crate::{
	_prelude::*,
	auth::{Token, TokenSecret},
	classify::ApiError,
	error::{ConfigError, TransportError},
	http::{self, ApiHttpClient, ResponseMetadata, ResponseMetadataSlot},
};

type ConfiguredBasicClient =
	BasicClient<EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Performs `grant_type=refresh_token` exchanges with client credentials in the request body.
pub(crate) struct RefreshFacade {
	oauth_client: ConfiguredBasicClient,
	token_url: Url,
}
impl RefreshFacade {
	pub(crate) fn new(
		client_id: &str,
		client_secret: &TokenSecret,
		token_endpoint: &Url,
	) -> Result<Self> {
		let token_url = TokenUrl::new(token_endpoint.to_string())
			.map_err(|source| ConfigError::InvalidEndpoint { source })?;
		let oauth_client = BasicClient::new(ClientId::new(client_id.to_owned()))
			.set_client_secret(ClientSecret::new(client_secret.expose().to_owned()))
			.set_token_uri(token_url)
			.set_auth_type(AuthType::RequestBody);

		Ok(Self { oauth_client, token_url: token_endpoint.clone() })
	}

	/// Exchanges `refresh_token` for a new token pair.
	///
	/// When the response omits a refresh token the supplied one is carried over.
	pub(crate) async fn refresh<C>(&self, http_client: &C, refresh_token: &TokenSecret) -> Result<Token>
	where
		C: ?Sized + ApiHttpClient,
	{
		let meta = ResponseMetadataSlot::default();
		let instrumented = http_client.with_metadata(meta.clone());
		let secret = RefreshToken::new(refresh_token.expose().to_owned());
		let response = self
			.oauth_client
			.exchange_refresh_token(&secret)
			.request_async(&instrumented)
			.await
			.map_err(|err| self.map_request_error(meta.take(), err))?;

		map_token_response(response, refresh_token)
	}

	fn map_request_error<E>(
		&self,
		meta: Option<ResponseMetadata>,
		err: BasicRequestTokenError<HttpClientError<E>>,
	) -> Error
	where
		E: 'static + Send + Sync + StdError,
	{
		// Any non-success reply is classified from the captured body, whatever oauth2 made of it.
		let status = meta.as_ref().and_then(|m| m.status);

		if let Some(status) = status.filter(|s| !(200..300).contains(s)) {
			let body = meta.and_then(|m| m.body).unwrap_or_default();

			return Error::Refresh(Box::new(ApiError::classify(
				status,
				body,
				self.token_url.clone(),
			)));
		}

		match err {
			RequestTokenError::ServerResponse(response) => self.rejection(response),
			RequestTokenError::Request(error) => http::map_transport_error(error),
			RequestTokenError::Parse(source, _body) =>
				Error::Decode { source, status: status.unwrap_or(200) },
			RequestTokenError::Other(message) => TransportError::Other {
				message: format!("Token endpoint returned an unexpected response: {message}"),
			}
			.into(),
		}
	}

	fn rejection(&self, response: BasicErrorResponse) -> Error {
		let body = serde_json::to_vec(&response).unwrap_or_default();

		Error::Refresh(Box::new(ApiError::classify(400, body, self.token_url.clone())))
	}
}

fn map_token_response(response: BasicTokenResponse, previous: &TokenSecret) -> Result<Token> {
	let expires_in = response.expires_in().ok_or(ConfigError::MissingExpiresIn)?.as_secs();
	let expires_in = i64::try_from(expires_in).map_err(|_| ConfigError::ExpiresInOutOfRange)?;

	if expires_in <= 0 {
		return Err(ConfigError::NonPositiveExpiresIn.into());
	}

	let refresh_token = match response.refresh_token() {
		Some(token) if !token.secret().is_empty() => TokenSecret::new(token.secret().to_owned()),
		_ => previous.clone(),
	};

	Token::builder()
		.access_token(response.access_token().secret().to_owned())
		.refresh_token(refresh_token)
		.token_type(AsRef::<str>::as_ref(response.token_type()))
		.issued_at(OffsetDateTime::now_utc())
		.expires_in(Duration::seconds(expires_in))
		.build()
		.map_err(|e| ConfigError::from(e).into())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_preludet::{ScriptedHttpClient, test_config};

	fn facade() -> (RefreshFacade, ScriptedHttpClient) {
		let config = test_config();
		let facade =
			RefreshFacade::new(&config.client_id, &config.client_secret, &config.token_endpoint)
				.expect("Facade should build from the test configuration.");

		(facade, ScriptedHttpClient::new(config.token_endpoint))
	}

	#[tokio::test]
	async fn refresh_posts_credentials_in_body() {
		let (facade, transport) = facade();
		let token = facade
			.refresh(&transport, &TokenSecret::new("refresh-seed"))
			.await
			.expect("Scripted refresh should succeed.");
		let recorded = transport.recorded();
		let form = String::from_utf8(recorded[0].body.clone()).expect("Form body should be UTF-8.");

		assert_eq!(recorded.len(), 1);
		assert_eq!(recorded[0].method, "POST");
		assert!(form.contains("grant_type=refresh_token"));
		assert!(form.contains("refresh_token=refresh-seed"));
		assert!(form.contains("client_id=client-test"));
		assert!(form.contains("client_secret=secret-test"));
		assert_eq!(token.access_token.expose(), "access-1");
		assert_eq!(token.refresh_token.expose(), "refresh-1");
		assert_eq!(token.token_type, "bearer");
		assert_eq!(token.expires_at - token.issued_at, Duration::seconds(3600));
	}

	#[tokio::test]
	async fn missing_refresh_token_keeps_previous() {
		let (facade, transport) = facade();

		transport.push_token(
			200,
			r#"{"access_token":"Atza|fresh","token_type":"bearer","expires_in":60}"#,
		);

		let token = facade
			.refresh(&transport, &TokenSecret::new("Atzr|kept"))
			.await
			.expect("Refresh without rotation should succeed.");

		assert_eq!(token.access_token.expose(), "Atza|fresh");
		assert_eq!(token.refresh_token.expose(), "Atzr|kept");
	}

	#[tokio::test]
	async fn rejection_is_classified_from_body() {
		let (facade, transport) = facade();

		transport.push_token(
			400,
			r#"{"error":"invalid_grant","error_description":"The request has an invalid grant parameter"}"#,
		);

		let err = facade
			.refresh(&transport, &TokenSecret::new("revoked"))
			.await
			.expect_err("Rejected refresh should fail.");

		match &err {
			Error::Refresh(api) => {
				assert_eq!(api.status, 400);
				assert_eq!(api.url, test_config().token_endpoint);
				assert_eq!(
					api.oauth.as_ref().map(|o| o.error.as_str()),
					Some("invalid_grant")
				);
				assert_eq!(api.message(), "invalid_grant The request has an invalid grant parameter");
			},
			other => panic!("Unexpected error: {other:?}"),
		}
	}

	#[tokio::test]
	async fn unstructured_rejection_keeps_raw_body() {
		let (facade, transport) = facade();

		transport.push_token(503, "upstream unavailable");

		let err = facade
			.refresh(&transport, &TokenSecret::new("seed"))
			.await
			.expect_err("Unavailable token endpoint should fail.");
		let api = err.api_error().expect("Refresh failures carry the classified error.");

		assert!(matches!(err, Error::Refresh(_)));
		assert_eq!(api.status, 503);
		assert_eq!(api.body_text(), "upstream unavailable");
	}

	#[tokio::test]
	async fn non_positive_expiry_is_rejected() {
		let (facade, transport) = facade();

		transport.push_token(
			200,
			r#"{"access_token":"a","refresh_token":"r","token_type":"bearer","expires_in":0}"#,
		);

		let err = facade
			.refresh(&transport, &TokenSecret::new("seed"))
			.await
			.expect_err("Zero expiry should be rejected.");

		assert!(matches!(err, Error::Config(ConfigError::NonPositiveExpiresIn)));
	}
}
