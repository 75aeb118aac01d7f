//! Replayable request descriptions handed to the executor.

// crates.io
use oauth2::{
	HttpRequest,
	http::{HeaderValue, Method, header::CONTENT_TYPE},
};
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	error::{ConfigError, TransportError},
};

/// Header carrying the access token on every authenticated call.
pub const ACCESS_TOKEN_HEADER: &str = "x-amz-access-token";

/// A fully-built API request.
///
/// The body is captured once and every attempt of the same logical call sends exactly these
/// bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedRequest {
	method: Method,
	url: Url,
	body: Vec<u8>,
	content_type: Option<&'static str>,
}
impl PreparedRequest {
	/// Creates a body-less request.
	pub fn new(method: Method, url: Url) -> Self {
		Self { method, url, body: Vec::new(), content_type: None }
	}

	/// Shorthand for a `GET` request.
	pub fn get(url: Url) -> Self {
		Self::new(Method::GET, url)
	}

	/// Shorthand for a body-less `POST` request.
	pub fn post(url: Url) -> Self {
		Self::new(Method::POST, url)
	}

	/// Attaches a JSON body serialized from `payload`.
	pub fn with_json<T>(mut self, payload: &T) -> Result<Self>
	where
		T: ?Sized + Serialize,
	{
		self.body = serde_json::to_vec(payload).map_err(ConfigError::EncodeBody)?;
		self.content_type = Some("application/json");

		Ok(self)
	}

	/// Attaches raw body bytes.
	pub fn with_body(mut self, body: impl Into<Vec<u8>>, content_type: &'static str) -> Self {
		self.body = body.into();
		self.content_type = Some(content_type);

		self
	}

	/// HTTP method.
	pub fn method(&self) -> &Method {
		&self.method
	}

	/// Absolute URL including the query string.
	pub fn url(&self) -> &Url {
		&self.url
	}

	/// Body bytes (possibly empty).
	pub fn body(&self) -> &[u8] {
		&self.body
	}

	/// Builds the wire request for one attempt, authenticated with `access_token`.
	pub(crate) fn to_http_request(&self, access_token: &TokenSecret) -> Result<HttpRequest> {
		let token = HeaderValue::from_str(access_token.expose()).map_err(|_| {
			TransportError::Other { message: "Access token is not a valid header value.".into() }
		})?;
		let mut builder = oauth2::http::Request::builder()
			.method(self.method.clone())
			.uri(self.url.as_str())
			.header(ACCESS_TOKEN_HEADER, token);

		if let Some(content_type) = self.content_type {
			builder = builder.header(CONTENT_TYPE, content_type);
		}

		builder.body(self.body.clone()).map_err(|e| ConfigError::from(e).into())
	}
}

/// Resolves `path` against the API base URL.
pub fn resolve(base: &Url, path: &str) -> Result<Url> {
	base.join(path)
		.map_err(|source| ConfigError::InvalidPath { path: path.to_owned(), source }.into())
}

/// Successful response returned by the executor; the body is opaque until decoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
	/// HTTP status in `[200, 300)`.
	pub status: u16,
	/// Raw body bytes.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Decodes the body as JSON, reporting the failing path on mismatch.
	pub fn json<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let mut deserializer = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| Error::Decode { source, status: self.status })
	}
}
