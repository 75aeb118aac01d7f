//! Catalog Items API `searchCatalogItems` listing (version 2022-04-01).

// self
use crate::{
	_prelude::*,
	client::Client,
	config::ClientConfig,
	http::ApiHttpClient,
	pagination::{Page, PageLimit, PagedCollection},
	request::{self, PreparedRequest},
	resources,
	retry::RetryPolicy,
};

const PATH: &str = "/catalog/2022-04-01/items";
const PAGE_SIZE: u8 = 20;

/// Product identifier namespaces accepted by `identifiersType`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IdentifierType {
	/// Amazon Standard Identification Number.
	Asin,
	/// European Article Number.
	Ean,
	/// Global Trade Item Number.
	Gtin,
	/// International Standard Book Number.
	Isbn,
	/// Japanese Article Number.
	Jan,
	/// Minister of Health code (Italy).
	Minsan,
	/// Seller stock keeping unit.
	Sku,
	/// Universal Product Code.
	Upc,
}
impl IdentifierType {
	/// Returns the wire value.
	pub const fn as_str(self) -> &'static str {
		match self {
			IdentifierType::Asin => "ASIN",
			IdentifierType::Ean => "EAN",
			IdentifierType::Gtin => "GTIN",
			IdentifierType::Isbn => "ISBN",
			IdentifierType::Jan => "JAN",
			IdentifierType::Minsan => "MINSAN",
			IdentifierType::Sku => "SKU",
			IdentifierType::Upc => "UPC",
		}
	}
}

/// Data sets requested through `includedData`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IncludedData {
	/// Product attributes.
	Attributes,
	/// Item and package dimensions.
	Dimensions,
	/// Product identifiers.
	Identifiers,
	/// Product images.
	Images,
	/// Product types.
	ProductTypes,
	/// Variation relationships.
	Relationships,
	/// Sales ranks.
	SalesRanks,
	/// Item summaries.
	Summaries,
}
impl IncludedData {
	/// Returns the wire value.
	pub const fn as_str(self) -> &'static str {
		match self {
			IncludedData::Attributes => "attributes",
			IncludedData::Dimensions => "dimensions",
			IncludedData::Identifiers => "identifiers",
			IncludedData::Images => "images",
			IncludedData::ProductTypes => "productTypes",
			IncludedData::Relationships => "relationships",
			IncludedData::SalesRanks => "salesRanks",
			IncludedData::Summaries => "summaries",
		}
	}
}

/// Search criteria.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogQuery {
	/// Exact identifier lookup.
	Identifiers {
		/// Identifier values.
		identifiers: Vec<String>,
		/// Namespace shared by every value.
		identifiers_type: IdentifierType,
	},
	/// Keyword search, optionally narrowed to brands.
	Keywords {
		/// Search keywords.
		keywords: Vec<String>,
		/// Brand names; ignored when empty.
		brand_names: Vec<String>,
	},
}

/// Query for `GET /catalog/2022-04-01/items`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchCatalogItems {
	/// Search criteria.
	pub query: CatalogQuery,
	/// Data sets to include in each item.
	pub included_data: Vec<IncludedData>,
	/// Marketplaces to search; the client's marketplace is used when empty.
	pub marketplace_ids: Vec<String>,
}
impl SearchCatalogItems {
	/// Looks items up by identifier.
	pub fn by_identifiers<I, S>(identifiers: I, identifiers_type: IdentifierType) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self::new(CatalogQuery::Identifiers {
			identifiers: identifiers.into_iter().map(Into::into).collect(),
			identifiers_type,
		})
	}

	/// Searches items by keyword.
	pub fn by_keywords<I, S>(keywords: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self::new(CatalogQuery::Keywords {
			keywords: keywords.into_iter().map(Into::into).collect(),
			brand_names: Vec::new(),
		})
	}

	fn new(query: CatalogQuery) -> Self {
		Self { query, included_data: vec![IncludedData::Summaries], marketplace_ids: Vec::new() }
	}

	/// Narrows a keyword search to `brand`; no effect on identifier lookups.
	pub fn brand(mut self, brand: impl Into<String>) -> Self {
		if let CatalogQuery::Keywords { brand_names, .. } = &mut self.query {
			brand_names.push(brand.into());
		}

		self
	}

	/// Replaces the requested data sets.
	pub fn included_data(mut self, data: impl IntoIterator<Item = IncludedData>) -> Self {
		self.included_data = data.into_iter().collect();

		self
	}

	/// Adds a marketplace to search.
	pub fn marketplace_id(mut self, id: impl Into<String>) -> Self {
		self.marketplace_ids.push(id.into());

		self
	}

	fn search_url(&self, config: &ClientConfig) -> Result<Url> {
		let mut url = request::resolve(&config.endpoint, PATH)?;

		{
			let mut query = url.query_pairs_mut();

			match &self.query {
				CatalogQuery::Identifiers { identifiers, identifiers_type } => {
					query.append_pair("identifiers", &identifiers.join(","));
					query.append_pair("identifiersType", identifiers_type.as_str());
				},
				CatalogQuery::Keywords { keywords, brand_names } => {
					query.append_pair("keywords", &keywords.join(","));

					if !brand_names.is_empty() {
						query.append_pair("brandNames", &brand_names.join(","));
					}
				},
			}

			let included =
				self.included_data.iter().map(|data| data.as_str()).collect::<Vec<_>>().join(",");

			query.append_pair(
				"marketplaceIds",
				&resources::marketplace_ids(&self.marketplace_ids, config),
			);
			query.append_pair("pageSize", &PAGE_SIZE.to_string());
			query.append_pair("includedData", &included);
		}

		Ok(url)
	}
}
impl PagedCollection for SearchCatalogItems {
	type Item = CatalogItem;
	type Payload = SearchCatalogItemsResponse;

	fn retry_policy(&self) -> RetryPolicy {
		RetryPolicy::short()
	}

	fn initial_request(&self, config: &ClientConfig) -> Result<PreparedRequest> {
		Ok(PreparedRequest::get(self.search_url(config)?))
	}

	fn extract(&self, payload: Self::Payload) -> Page<Self::Item> {
		Page::new(payload.items, payload.pagination.and_then(|p| p.next_token))
	}

	fn continuation_request(&self, config: &ClientConfig, cursor: &str) -> Result<PreparedRequest> {
		let mut url = self.search_url(config)?;

		url.query_pairs_mut().append_pair("pageToken", cursor);

		Ok(PreparedRequest::get(url))
	}
}

/// Response body of `searchCatalogItems`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCatalogItemsResponse {
	/// Total number of matches reported by the service.
	#[serde(default)]
	pub number_of_results: u64,
	/// Items on this page.
	#[serde(default)]
	pub items: Vec<CatalogItem>,
	/// Cursor block; absent on the last page.
	#[serde(default)]
	pub pagination: Option<Pagination>,
}

/// Cursor block of a catalog page.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
	/// Token for the next page.
	#[serde(default)]
	pub next_token: Option<String>,
	/// Token for the previous page.
	#[serde(default)]
	pub previous_token: Option<String>,
}

/// Catalog item; data sets not modeled here are kept in `extra`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
	/// Amazon Standard Identification Number.
	pub asin: String,
	/// Per-marketplace summaries (requires [`IncludedData::Summaries`]).
	#[serde(default)]
	pub summaries: Vec<ItemSummary>,
	/// Remaining data sets as returned by the service.
	#[serde(flatten)]
	pub extra: BTreeMap<String, serde_json::Value>,
}

/// Per-marketplace item summary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
	/// Marketplace the summary applies to.
	pub marketplace_id: String,
	/// Brand name.
	#[serde(default)]
	pub brand: Option<String>,
	/// Display name.
	#[serde(default)]
	pub item_name: Option<String>,
	/// Manufacturer.
	#[serde(default)]
	pub manufacturer: Option<String>,
	/// Model number.
	#[serde(default)]
	pub model_number: Option<String>,
	/// Remaining summary fields.
	#[serde(flatten)]
	pub extra: BTreeMap<String, serde_json::Value>,
}

impl<C> Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Runs a catalog search, following page tokens up to `limit`.
	pub async fn search_catalog_items(
		&mut self,
		search: SearchCatalogItems,
		limit: PageLimit,
	) -> Result<Vec<CatalogItem>> {
		self.paginate(&search, limit).await
	}
}
