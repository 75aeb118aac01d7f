//! Client configuration shared by the credential manager and the executor.
//!
//! Configuration is assembled through [`ClientConfig::builder`], which fills regional defaults
//! and validates endpoints. The type also derives serde so callers can load it from whatever
//! format they already use; run [`ClientConfig::validate`] on deserialized values.

/// Builder API for assembling client configuration.
pub mod builder;

pub use builder::*;

// std
use std::net::IpAddr;
// crates.io
use url::Host;
// self
use crate::{_prelude::*, auth::TokenSecret, marketplace::Marketplace};

/// Login With Amazon token endpoint used for the refresh-token grant.
pub const DEFAULT_TOKEN_ENDPOINT: &str = "https://api.amazon.com/auth/o2/token";

/// Validated client settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
	/// LWA application client identifier.
	pub client_id: String,
	/// LWA application client secret.
	pub client_secret: TokenSecret,
	/// Long-lived refresh token issued to the seller authorization.
	pub refresh_token: TokenSecret,
	/// Marketplace whose identifier seeds marketplace-scoped queries.
	#[serde(default)]
	pub marketplace: Marketplace,
	/// Selling partner identifier, when a resource requires it.
	#[serde(default)]
	pub seller_id: Option<String>,
	/// Base URL of the regional API host.
	pub endpoint: Url,
	/// Token endpoint for the refresh-token grant.
	pub token_endpoint: Url,
}
impl ClientConfig {
	/// Returns a builder seeded with the default marketplace and token endpoint.
	pub fn builder() -> ClientConfigBuilder {
		ClientConfigBuilder::default()
	}

	/// Validates required fields and endpoint schemes.
	pub fn validate(&self) -> Result<(), ConfigBuildError> {
		if self.client_id.trim().is_empty() {
			return Err(ConfigBuildError::MissingClientId);
		}
		if self.client_secret.is_blank() {
			return Err(ConfigBuildError::MissingClientSecret);
		}
		if self.refresh_token.is_blank() {
			return Err(ConfigBuildError::MissingRefreshToken);
		}

		validate_endpoint("api", &self.endpoint)?;
		validate_endpoint("token", &self.token_endpoint)?;

		Ok(())
	}
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ConfigBuildError> {
	match url.scheme() {
		"https" => Ok(()),
		"http" if is_loopback(url) => Ok(()),
		_ => Err(ConfigBuildError::InsecureEndpoint { endpoint: name, url: url.to_string() }),
	}
}

fn is_loopback(url: &Url) -> bool {
	match url.host() {
		Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
		Some(Host::Ipv4(ip)) => IpAddr::V4(ip).is_loopback(),
		Some(Host::Ipv6(ip)) => IpAddr::V6(ip).is_loopback(),
		None => false,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::marketplace::Region;

	fn builder() -> ClientConfigBuilder {
		ClientConfig::builder()
			.client_id("amzn1.application-oa2-client.test")
			.client_secret("s")
			.refresh_token("Atzr|r")
	}

	#[test]
	fn defaults_follow_marketplace_region() {
		let config = builder()
			.marketplace(Marketplace::DE)
			.build()
			.expect("Configuration with required fields should build.");

		assert_eq!(config.endpoint.as_str(), Region::Europe.base_url());
		assert_eq!(config.token_endpoint.as_str(), DEFAULT_TOKEN_ENDPOINT);
		assert_eq!(config.marketplace, Marketplace::DE);
		assert!(config.seller_id.is_none());
	}

	#[test]
	fn required_fields_are_enforced() {
		assert_eq!(
			ClientConfig::builder().client_secret("s").refresh_token("r").build().err(),
			Some(ConfigBuildError::MissingClientId)
		);
		assert_eq!(
			ClientConfig::builder().client_id("id").refresh_token("r").build().err(),
			Some(ConfigBuildError::MissingClientSecret)
		);
		assert_eq!(
			ClientConfig::builder()
				.client_id("id")
				.client_secret("s")
				.refresh_token("  ")
				.build()
				.err(),
			Some(ConfigBuildError::MissingRefreshToken)
		);
	}

	#[test]
	fn plain_http_is_limited_to_loopback() {
		let local = Url::parse("http://127.0.0.1:8080/").expect("Loopback URL should parse.");
		let remote = Url::parse("http://sellingpartnerapi-na.amazon.com/")
			.expect("Remote URL should parse.");

		assert!(builder().endpoint(local.clone()).token_endpoint(local).build().is_ok());
		assert_eq!(
			builder().endpoint(remote).build().err(),
			Some(ConfigBuildError::InsecureEndpoint {
				endpoint: "api",
				url: "http://sellingpartnerapi-na.amazon.com/".into(),
			})
		);
	}

	#[test]
	fn deserialized_configs_validate() {
		let config: ClientConfig = serde_json::from_str(
			r#"{
				"client_id": "id",
				"client_secret": "secret",
				"refresh_token": "",
				"marketplace": "JP",
				"endpoint": "https://sellingpartnerapi-fe.amazon.com/",
				"token_endpoint": "https://api.amazon.com/auth/o2/token"
			}"#,
		)
		.expect("Configuration JSON should deserialize.");

		assert_eq!(config.marketplace, Marketplace::JP);
		assert_eq!(config.validate(), Err(ConfigBuildError::MissingRefreshToken));
	}
}
