//! Failure response classification.
//!
//! The service speaks two error envelopes: API calls answer with
//! `{"errors": [{"code", "message", "details"}]}` while the token endpoint answers with the OAuth
//! `{"error", "error_description"}` shape. [`ApiError::classify`] tries both and never fails; when
//! neither shape matches, the structured fields stay empty but the status, URL, and raw body are
//! always kept for diagnostics.

// self
use crate::_prelude::*;

/// Structured code the service uses for coarse quota exhaustion on `429` responses.
pub const QUOTA_EXCEEDED: &str = "QuotaExceeded";
/// Structured code a continuation request fails with once the result set is exhausted.
pub const INVALID_INPUT: &str = "InvalidInput";

/// Single entry of the API error envelope.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
	/// Machine-readable error code.
	#[serde(default)]
	pub code: String,
	/// Human-readable message.
	#[serde(default)]
	pub message: String,
	/// Additional details, often empty.
	#[serde(default)]
	pub details: String,
}

/// OAuth-style single-error envelope returned by the token endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthError {
	/// OAuth `error` code.
	#[serde(default)]
	pub error: String,
	/// OAuth `error_description`.
	#[serde(default)]
	pub error_description: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
	#[serde(default)]
	errors: Vec<ErrorDetail>,
}

/// Classified failure response.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiError {
	/// HTTP status code returned by the service.
	pub status: u16,
	/// Request URL (including query) that produced the failure.
	pub url: Url,
	/// Structured sub-errors in the order the service returned them.
	pub errors: Vec<ErrorDetail>,
	/// OAuth envelope, populated only when `errors` is empty and the body matched it.
	pub oauth: Option<OAuthError>,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl ApiError {
	/// Builds a classified error from a failure response.
	pub fn classify(status: u16, body: impl Into<Vec<u8>>, url: Url) -> Self {
		let body = body.into();
		let errors = serde_json::from_slice::<ErrorEnvelope>(&body)
			.map(|envelope| envelope.errors)
			.unwrap_or_default();
		let oauth = if errors.is_empty() {
			serde_json::from_slice::<OAuthError>(&body)
				.ok()
				.filter(|oauth| !oauth.error.is_empty() || !oauth.error_description.is_empty())
		} else {
			None
		};

		Self { status, url, errors, oauth, body }
	}

	/// Returns the code of the first structured sub-error, if any.
	pub fn primary_code(&self) -> Option<&str> {
		self.errors.first().map(|detail| detail.code.as_str())
	}

	/// Returns `true` when the service reported coarse quota exhaustion.
	pub fn is_quota_exceeded(&self) -> bool {
		self.primary_code() == Some(QUOTA_EXCEEDED)
	}

	/// Returns `true` when the error is the service's end-of-results signal for continuations.
	pub fn is_invalid_input(&self) -> bool {
		self.primary_code() == Some(INVALID_INPUT)
	}

	/// Renders the structured fields as a human-readable message.
	///
	/// Every sub-error becomes `"<code>: <message> - <details>"`, one per line; without
	/// sub-errors the OAuth pair is rendered as `"<error> <error_description>"`.
	pub fn message(&self) -> String {
		if !self.errors.is_empty() {
			return self
				.errors
				.iter()
				.map(|detail| format!("{}: {} - {}", detail.code, detail.message, detail.details))
				.collect::<Vec<_>>()
				.join("\n");
		}

		let oauth = self.oauth.clone().unwrap_or_default();

		format!("{} {}", oauth.error, oauth.error_description)
	}

	/// Returns the raw body as lossy UTF-8.
	pub fn body_text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}
}
impl Debug for ApiError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiError")
			.field("status", &self.status)
			.field("url", &self.url.as_str())
			.field("errors", &self.errors)
			.field("oauth", &self.oauth)
			.field("body", &self.body_text())
			.finish()
	}
}
impl Display for ApiError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(
			f,
			"SP-API error (endpoint: {}, status: {}): {}; body: {}",
			self.url,
			self.status,
			self.message(),
			self.body_text()
		)
	}
}
impl StdError for ApiError {}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn orders_url() -> Url {
		Url::parse("https://sellingpartnerapi-na.amazon.com/orders/v0/orders?MarketplaceIds=X")
			.expect("Fixture URL should parse.")
	}

	#[test]
	fn api_envelope_keeps_sub_error_order() {
		let body = br#"{"errors":[
			{"code":"QuotaExceeded","message":"You exceeded your quota","details":""},
			{"code":"InvalidInput","message":"second","details":"extra"}
		]}"#;
		let err = ApiError::classify(429, body.to_vec(), orders_url());

		assert_eq!(err.errors.len(), 2);
		assert_eq!(err.primary_code(), Some(QUOTA_EXCEEDED));
		assert!(err.is_quota_exceeded());
		assert!(!err.is_invalid_input());
		assert!(err.oauth.is_none());
		assert_eq!(
			err.message(),
			"QuotaExceeded: You exceeded your quota - \nInvalidInput: second - extra"
		);
	}

	#[test]
	fn oauth_envelope_is_used_when_no_sub_errors() {
		let url = Url::parse("https://api.amazon.com/auth/o2/token").expect("URL should parse.");
		let err = ApiError::classify(
			400,
			br#"{"error":"invalid_grant","error_description":"The refresh token is invalid"}"#
				.to_vec(),
			url,
		);

		assert!(err.errors.is_empty());
		assert_eq!(err.primary_code(), None);
		assert_eq!(err.message(), "invalid_grant The refresh token is invalid");
		assert_eq!(err.oauth.as_ref().map(|o| o.error.as_str()), Some("invalid_grant"));
	}

	#[test]
	fn unparseable_body_still_carries_diagnostics() {
		let err = ApiError::classify(503, b"<html>Service Unavailable</html>".to_vec(), orders_url());

		assert_eq!(err.status, 503);
		assert_eq!(err.url, orders_url());
		assert!(err.errors.is_empty());
		assert!(err.oauth.is_none());
		assert_eq!(err.body_text(), "<html>Service Unavailable</html>");
		assert_eq!(err.message(), " ");

		let rendered = err.to_string();

		assert!(rendered.contains("status: 503"));
		assert!(rendered.contains("orders/v0/orders?MarketplaceIds=X"));
		assert!(rendered.contains("<html>Service Unavailable</html>"));
	}

	#[test]
	fn empty_body_is_tolerated() {
		let err = ApiError::classify(500, Vec::new(), orders_url());

		assert!(err.errors.is_empty());
		assert!(err.oauth.is_none());
		assert!(err.body.is_empty());
	}

	#[test]
	fn missing_detail_fields_default_to_empty() {
		let err = ApiError::classify(
			400,
			br#"{"errors":[{"code":"InvalidInput"}]}"#.to_vec(),
			orders_url(),
		);

		assert!(err.is_invalid_input());
		assert_eq!(err.message(), "InvalidInput:  - ");
	}
}
