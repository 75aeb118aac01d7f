//! Marketplace identifiers and the regional hosts that serve them.

// crates.io
use serde::{Deserializer, de};
// self
use crate::_prelude::*;

/// Regional SP-API deployment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
	/// North America (US, CA, MX).
	NorthAmerica,
	/// Europe, Middle East and Turkey.
	Europe,
	/// Far East (JP).
	FarEast,
}
impl Region {
	/// Hostname of the regional endpoint.
	pub const fn host(self) -> &'static str {
		match self {
			Region::NorthAmerica => "sellingpartnerapi-na.amazon.com",
			Region::Europe => "sellingpartnerapi-eu.amazon.com",
			Region::FarEast => "sellingpartnerapi-fe.amazon.com",
		}
	}

	/// Base URL of the regional endpoint.
	pub const fn base_url(self) -> &'static str {
		match self {
			Region::NorthAmerica => "https://sellingpartnerapi-na.amazon.com/",
			Region::Europe => "https://sellingpartnerapi-eu.amazon.com/",
			Region::FarEast => "https://sellingpartnerapi-fe.amazon.com/",
		}
	}
}

/// Marketplace identifier paired with the region that serves it.
///
/// Serializes as its identifier and deserializes from an identifier or a country code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct Marketplace {
	/// Opaque marketplace identifier sent in `MarketplaceIds` query parameters.
	pub id: &'static str,
	/// ISO 3166 alpha-2 country code.
	pub country: &'static str,
	/// Region hosting the marketplace.
	pub region: Region,
}
impl Marketplace {
	/// United States.
	pub const US: Self = Self::new("ATVPDKIKX0DER", "US", Region::NorthAmerica);
	/// Canada.
	pub const CA: Self = Self::new("A2EUQ1WTGCTBG2", "CA", Region::NorthAmerica);
	/// Mexico.
	pub const MX: Self = Self::new("A1AM78C64UM0Y8", "MX", Region::NorthAmerica);
	/// United Kingdom.
	pub const GB: Self = Self::new("A1F83G8C2ARO7P", "GB", Region::Europe);
	/// Germany.
	pub const DE: Self = Self::new("A1PA6795UKMFR9", "DE", Region::Europe);
	/// France.
	pub const FR: Self = Self::new("A13V1IB3VIYZZH", "FR", Region::Europe);
	/// Italy.
	pub const IT: Self = Self::new("APJ6JRA9NG5V4", "IT", Region::Europe);
	/// Spain.
	pub const ES: Self = Self::new("A1RKKUPIHCS9HS", "ES", Region::Europe);
	/// Netherlands.
	pub const NL: Self = Self::new("A1805IZSGTT6HS", "NL", Region::Europe);
	/// Sweden.
	pub const SE: Self = Self::new("A2NODRKZP88ZB9", "SE", Region::Europe);
	/// Turkey.
	pub const TR: Self = Self::new("A33AVAJ2PDY3EV", "TR", Region::Europe);
	/// United Arab Emirates.
	pub const AE: Self = Self::new("A2VIGQ35RCS4UG", "AE", Region::Europe);
	/// Japan.
	pub const JP: Self = Self::new("A1VC38T7YXB528", "JP", Region::FarEast);

	/// Every supported marketplace.
	pub const ALL: [Self; 13] = [
		Self::US,
		Self::CA,
		Self::MX,
		Self::GB,
		Self::DE,
		Self::FR,
		Self::IT,
		Self::ES,
		Self::NL,
		Self::SE,
		Self::TR,
		Self::AE,
		Self::JP,
	];

	const fn new(id: &'static str, country: &'static str, region: Region) -> Self {
		Self { id, country, region }
	}

	/// Looks up a marketplace by country code (case-insensitive; `UK` aliases `GB`).
	pub fn from_country_code(code: &str) -> Option<Self> {
		let code = code.trim();

		if code.eq_ignore_ascii_case("UK") {
			return Some(Self::GB);
		}

		Self::ALL.into_iter().find(|m| m.country.eq_ignore_ascii_case(code))
	}

	/// Looks up a marketplace by its identifier.
	pub fn from_id(id: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|m| m.id == id)
	}
}
impl Default for Marketplace {
	fn default() -> Self {
		Self::US
	}
}
impl Display for Marketplace {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.id)
	}
}
impl FromStr for Marketplace {
	type Err = UnknownMarketplace;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::from_country_code(s)
			.or_else(|| Self::from_id(s))
			.ok_or_else(|| UnknownMarketplace(s.into()))
	}
}
impl<'de> Deserialize<'de> for Marketplace {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		String::deserialize(deserializer)?.parse().map_err(de::Error::custom)
	}
}
impl TryFrom<String> for Marketplace {
	type Error = UnknownMarketplace;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}
impl From<Marketplace> for String {
	fn from(value: Marketplace) -> Self {
		value.id.to_owned()
	}
}

/// Raised when a country code or identifier matches no known marketplace.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Unknown marketplace `{0}`.")]
pub struct UnknownMarketplace(pub String);
