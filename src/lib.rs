//! Resilient Selling Partner API client core: refresh-token credential lifecycle, failure-aware
//! retries, and cursor pagination over a pluggable HTTP transport.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod marketplace;
pub mod oauth;
pub mod obs;
pub mod pagination;
pub mod request;
pub mod resources;
pub mod retry;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for tests; enabled via `cfg(test)` or the `test` crate
	//! feature.

	pub use crate::_prelude::*;

	// std
	use std::collections::VecDeque;
	// crates.io
	use oauth2::{
		AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse,
		http::{HeaderValue, StatusCode, header::CONTENT_TYPE},
	};
	// self
	#[cfg(feature = "reqwest")]
	use crate::{client::ReqwestApiClient, http::ReqwestHttpClient};
	use crate::{
		client::Client,
		config::ClientConfig,
		http::{ApiHttpClient, ResponseMetadata, ResponseMetadataSlot},
		request::ACCESS_TOKEN_HEADER,
	};

	/// Client type alias used by tests that drive the scripted transport.
	pub type ScriptedClient = Client<ScriptedHttpClient>;

	/// Transport error emitted once a script runs dry.
	#[derive(Debug, ThisError)]
	#[error("Scripted transport has no response left for {0}.")]
	pub struct ScriptExhausted(pub String);

	/// Request captured by [`ScriptedHttpClient`].
	#[derive(Clone, Debug)]
	pub struct RecordedRequest {
		/// HTTP method.
		pub method: String,
		/// Absolute request URL.
		pub url: Url,
		/// Value of the access-token header, if present.
		pub access_token: Option<String>,
		/// Raw body bytes.
		pub body: Vec<u8>,
	}

	#[derive(Default)]
	struct Script {
		token: VecDeque<(u16, String)>,
		api: VecDeque<(u16, String)>,
		recorded: Vec<RecordedRequest>,
		issued_tokens: usize,
	}

	/// In-process transport that replays scripted responses and records every request.
	///
	/// Calls against the configured token endpoint pop from the token script; when it is empty a
	/// fresh `access-<n>` token valid for one hour is issued. Every other call pops from the API
	/// script and fails with [`ScriptExhausted`] once it runs dry.
	#[derive(Clone)]
	pub struct ScriptedHttpClient {
		token_endpoint: Url,
		script: Arc<Mutex<Script>>,
	}
	impl ScriptedHttpClient {
		/// Creates an empty script for the given token endpoint.
		pub fn new(token_endpoint: Url) -> Self {
			Self { token_endpoint, script: Default::default() }
		}

		/// Queues an API response.
		pub fn push_api(&self, status: u16, body: impl Into<String>) -> &Self {
			self.script.lock().api.push_back((status, body.into()));

			self
		}

		/// Queues a token endpoint response.
		pub fn push_token(&self, status: u16, body: impl Into<String>) -> &Self {
			self.script.lock().token.push_back((status, body.into()));

			self
		}

		/// Returns every request observed so far (token and API calls).
		pub fn recorded(&self) -> Vec<RecordedRequest> {
			self.script.lock().recorded.clone()
		}

		/// Returns the API requests observed so far.
		pub fn api_requests(&self) -> Vec<RecordedRequest> {
			self.recorded().into_iter().filter(|req| req.url != self.token_endpoint).collect()
		}

		/// Returns how many token endpoint calls were made.
		pub fn token_calls(&self) -> usize {
			self.recorded().iter().filter(|req| req.url == self.token_endpoint).count()
		}

		fn respond(&self, request: &HttpRequest) -> Result<(u16, String), ScriptExhausted> {
			let url = Url::parse(&request.uri().to_string())
				.map_err(|_| ScriptExhausted(request.uri().to_string()))?;
			let access_token = request
				.headers()
				.get(ACCESS_TOKEN_HEADER)
				.and_then(|value| value.to_str().ok())
				.map(str::to_owned);
			let mut script = self.script.lock();

			script.recorded.push(RecordedRequest {
				method: request.method().to_string(),
				url: url.clone(),
				access_token,
				body: request.body().clone(),
			});

			if url == self.token_endpoint {
				if let Some(next) = script.token.pop_front() {
					return Ok(next);
				}

				script.issued_tokens += 1;

				let body = serde_json::json!({
					"access_token": format!("access-{}", script.issued_tokens),
					"refresh_token": format!("refresh-{}", script.issued_tokens),
					"token_type": "bearer",
					"expires_in": 3600,
				});

				return Ok((200, body.to_string()));
			}

			script.api.pop_front().ok_or_else(|| ScriptExhausted(url.to_string()))
		}
	}
	impl ApiHttpClient for ScriptedHttpClient {
		type Handle = ScriptedHandle;
		type TransportError = ScriptExhausted;

		fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle {
			ScriptedHandle { client: self.clone(), slot }
		}
	}

	/// Handle returned by [`ScriptedHttpClient::with_metadata`].
	pub struct ScriptedHandle {
		client: ScriptedHttpClient,
		slot: ResponseMetadataSlot,
	}
	impl<'c> AsyncHttpClient<'c> for ScriptedHandle {
		type Error = HttpClientError<ScriptExhausted>;
		type Future =
			Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send>>;

		fn call(&'c self, request: HttpRequest) -> Self::Future {
			Box::pin(async move {
				self.slot.take();

				let (status, body) =
					self.client.respond(&request).map_err(|e| HttpClientError::Reqwest(Box::new(e)))?;
				let body = body.into_bytes();
				let status_code = StatusCode::from_u16(status)
					.map_err(|e| HttpClientError::Other(e.to_string()))?;

				self.slot.store(ResponseMetadata {
					status: Some(status),
					body: (!status_code.is_success()).then(|| body.clone()),
				});

				let mut response = HttpResponse::new(body);

				*response.status_mut() = status_code;
				response
					.headers_mut()
					.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

				Ok(response)
			})
		}
	}

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	#[cfg(feature = "reqwest")]
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs a [`ReqwestApiClient`] for `config` over [`test_reqwest_http_client`].
	#[cfg(feature = "reqwest")]
	pub fn build_reqwest_test_client(config: ClientConfig) -> ReqwestApiClient {
		ReqwestApiClient::with_http_client(config, test_reqwest_http_client())
			.expect("Reqwest test client should build from a valid configuration.")
	}

	/// Default configuration used by scripted tests.
	pub fn test_config() -> ClientConfig {
		ClientConfig::builder()
			.client_id("client-test")
			.client_secret("secret-test")
			.refresh_token("refresh-seed")
			.build()
			.expect("Test configuration should be valid.")
	}

	/// Builds a client wired to a fresh [`ScriptedHttpClient`].
	pub fn scripted_client() -> (ScriptedClient, ScriptedHttpClient) {
		let config = test_config();
		let transport = ScriptedHttpClient::new(config.token_endpoint.clone());
		let client = ScriptedClient::with_http_client(config, transport.clone())
			.expect("Scripted client should build from the test configuration.");

		(client, transport)
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
		time::Duration as StdDuration,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use tokio_util::sync::CancellationToken;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use tokio_util::sync::CancellationToken;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
