//! Access/refresh token pair, lifecycle helpers, and builder.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Errors produced by [`TokenBuilder`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum TokenBuilderError {
	/// Issued when no access token value was provided.
	#[error("Access token is required.")]
	MissingAccessToken,
	/// Issued when no refresh token value was provided.
	#[error("Refresh token is required.")]
	MissingRefreshToken,
	/// Issued when no expiry (absolute or relative) was configured.
	#[error("Expiry must be supplied via expires_at or expires_in.")]
	MissingExpiry,
}

/// Token pair issued by the refresh-token grant.
///
/// A token is usable only while `expires_at` lies strictly in the future. The credential
/// manager replaces the whole value on every successful refresh.
#[derive(Clone, Serialize, Deserialize)]
pub struct Token {
	/// Access token sent with every API call.
	pub access_token: TokenSecret,
	/// Refresh token used for the next grant.
	pub refresh_token: TokenSecret,
	/// Token type reported by the token endpoint (usually `bearer`).
	pub token_type: String,
	/// Instant the token was received.
	pub issued_at: OffsetDateTime,
	/// Expiry instant derived from `issued_at + expires_in`.
	pub expires_at: OffsetDateTime,
}
impl Token {
	/// Returns a builder for constructing tokens.
	pub fn builder() -> TokenBuilder {
		TokenBuilder::default()
	}

	/// Returns `true` if the token may still be used at `instant`.
	pub fn is_usable_at(&self, instant: OffsetDateTime) -> bool {
		self.expires_at > instant
	}

	/// Returns `true` if the token may still be used now.
	pub fn is_usable(&self) -> bool {
		self.is_usable_at(OffsetDateTime::now_utc())
	}

	/// Returns `true` if the token expired at or before `instant`.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		!self.is_usable_at(instant)
	}
}
impl Debug for Token {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Token")
			.field("access_token", &"<redacted>")
			.field("refresh_token", &"<redacted>")
			.field("token_type", &self.token_type)
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

/// Builder for [`Token`].
#[derive(Clone, Debug, Default)]
pub struct TokenBuilder {
	access_token: Option<TokenSecret>,
	refresh_token: Option<TokenSecret>,
	token_type: Option<String>,
	issued_at: Option<OffsetDateTime>,
	expires_at: Option<OffsetDateTime>,
	expires_in: Option<Duration>,
}
impl TokenBuilder {
	/// Provides the access token value.
	pub fn access_token(mut self, token: impl Into<String>) -> Self {
		self.access_token = Some(TokenSecret::new(token));

		self
	}

	/// Provides the refresh token value.
	pub fn refresh_token(mut self, token: impl Into<TokenSecret>) -> Self {
		self.refresh_token = Some(token.into());

		self
	}

	/// Sets the token type (defaults to `bearer`).
	pub fn token_type(mut self, token_type: impl Into<String>) -> Self {
		self.token_type = Some(token_type.into());

		self
	}

	/// Sets the issued-at instant.
	pub fn issued_at(mut self, instant: OffsetDateTime) -> Self {
		self.issued_at = Some(instant);

		self
	}

	/// Sets an absolute expiry instant.
	pub fn expires_at(mut self, instant: OffsetDateTime) -> Self {
		self.expires_at = Some(instant);

		self
	}

	/// Sets a relative expiry duration from the issued instant.
	pub fn expires_in(mut self, duration: Duration) -> Self {
		self.expires_in = Some(duration);

		self
	}

	/// Consumes the builder and produces a [`Token`].
	pub fn build(self) -> Result<Token, TokenBuilderError> {
		let access_token = self.access_token.ok_or(TokenBuilderError::MissingAccessToken)?;
		let refresh_token = self.refresh_token.ok_or(TokenBuilderError::MissingRefreshToken)?;
		let issued_at = self.issued_at.unwrap_or_else(OffsetDateTime::now_utc);
		let expires_at = match (self.expires_at, self.expires_in) {
			(Some(instant), _) => instant,
			(None, Some(delta)) => issued_at + delta,
			(None, None) => return Err(TokenBuilderError::MissingExpiry),
		};

		Ok(Token {
			access_token,
			refresh_token,
			token_type: self.token_type.unwrap_or_else(|| "bearer".into()),
			issued_at,
			expires_at,
		})
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn usability_is_strictly_before_expiry() {
		let token = Token::builder()
			.access_token("Atza|access")
			.refresh_token("Atzr|refresh")
			.issued_at(macros::datetime!(2025-01-01 00:00 UTC))
			.expires_at(macros::datetime!(2025-01-01 01:00 UTC))
			.build()
			.expect("Token builder should succeed.");

		assert!(token.is_usable_at(macros::datetime!(2025-01-01 00:59 UTC)));
		assert!(!token.is_usable_at(macros::datetime!(2025-01-01 01:00 UTC)));
		assert!(token.is_expired_at(macros::datetime!(2025-01-01 01:00 UTC)));
	}

	#[test]
	fn builder_handles_relative_expiry_and_defaults() {
		let token = Token::builder()
			.access_token("access")
			.refresh_token("refresh")
			.issued_at(macros::datetime!(2025-01-01 00:00 UTC))
			.expires_in(Duration::seconds(3600))
			.build()
			.expect("Token builder should support relative expiry.");

		assert_eq!(token.expires_at, macros::datetime!(2025-01-01 01:00 UTC));
		assert_eq!(token.token_type, "bearer");
	}

	#[test]
	fn builder_reports_missing_fields() {
		assert_eq!(
			Token::builder().refresh_token("r").expires_in(Duration::MINUTE).build().err(),
			Some(TokenBuilderError::MissingAccessToken)
		);
		assert_eq!(
			Token::builder().access_token("a").expires_in(Duration::MINUTE).build().err(),
			Some(TokenBuilderError::MissingRefreshToken)
		);
		assert_eq!(
			Token::builder().access_token("a").refresh_token("r").build().err(),
			Some(TokenBuilderError::MissingExpiry)
		);
	}

	#[test]
	fn debug_redacts_secrets() {
		let token = Token::builder()
			.access_token("visible?")
			.refresh_token("visible?")
			.expires_in(Duration::MINUTE)
			.build()
			.expect("Token builder should succeed.");
		let rendered = format!("{token:?}");

		assert!(!rendered.contains("visible?"));
		assert!(rendered.contains("<redacted>"));
	}
}
