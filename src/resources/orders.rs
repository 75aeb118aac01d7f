//! Orders API `getOrders` listing.

// self
use crate::{
	_prelude::*,
	client::Client,
	config::ClientConfig,
	http::ApiHttpClient,
	pagination::{Page, PageLimit, PagedCollection, encode_cursor},
	request::{self, PreparedRequest},
	resources,
	retry::RetryPolicy,
};

const PATH: &str = "/orders/v0/orders";

/// Query for `GET /orders/v0/orders`.
///
/// [`GetOrders::default`] lists orders created during the last 24 hours.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GetOrders {
	/// Orders created at or after this instant.
	pub created_after: Option<OffsetDateTime>,
	/// Orders created before this instant.
	pub created_before: Option<OffsetDateTime>,
	/// Orders updated at or after this instant.
	pub last_updated_after: Option<OffsetDateTime>,
	/// Orders updated before this instant.
	pub last_updated_before: Option<OffsetDateTime>,
	/// Status filter, e.g. `Unshipped`.
	pub order_statuses: Vec<String>,
	/// Marketplaces to query; the client's marketplace is used when empty.
	pub marketplace_ids: Vec<String>,
}
impl GetOrders {
	/// Query without any filter.
	pub fn new() -> Self {
		Self {
			created_after: None,
			created_before: None,
			last_updated_after: None,
			last_updated_before: None,
			order_statuses: Vec::new(),
			marketplace_ids: Vec::new(),
		}
	}

	/// Restricts the listing to orders created at or after `instant`.
	pub fn created_after(mut self, instant: OffsetDateTime) -> Self {
		self.created_after = Some(instant);

		self
	}

	/// Restricts the listing to orders created before `instant`.
	pub fn created_before(mut self, instant: OffsetDateTime) -> Self {
		self.created_before = Some(instant);

		self
	}

	/// Restricts the listing to orders updated at or after `instant`.
	pub fn last_updated_after(mut self, instant: OffsetDateTime) -> Self {
		self.last_updated_after = Some(instant);

		self
	}

	/// Restricts the listing to orders updated before `instant`.
	pub fn last_updated_before(mut self, instant: OffsetDateTime) -> Self {
		self.last_updated_before = Some(instant);

		self
	}

	/// Adds an order status filter.
	pub fn order_status(mut self, status: impl Into<String>) -> Self {
		self.order_statuses.push(status.into());

		self
	}

	/// Adds a marketplace to query.
	pub fn marketplace_id(mut self, id: impl Into<String>) -> Self {
		self.marketplace_ids.push(id.into());

		self
	}
}
impl Default for GetOrders {
	fn default() -> Self {
		Self::new().created_after(OffsetDateTime::now_utc() - Duration::DAY)
	}
}
impl PagedCollection for GetOrders {
	type Item = Order;
	type Payload = OrdersResponse;

	fn retry_policy(&self) -> RetryPolicy {
		RetryPolicy::long()
	}

	fn initial_request(&self, config: &ClientConfig) -> Result<PreparedRequest> {
		let mut url = request::resolve(&config.endpoint, PATH)?;

		{
			let mut query = url.query_pairs_mut();
			let instants = [
				("CreatedAfter", self.created_after),
				("CreatedBefore", self.created_before),
				("LastUpdatedAfter", self.last_updated_after),
				("LastUpdatedBefore", self.last_updated_before),
			];

			for (name, instant) in instants {
				if let Some(instant) = instant {
					query.append_pair(name, &resources::rfc3339(instant)?);
				}
			}
			if !self.order_statuses.is_empty() {
				query.append_pair("OrderStatuses", &self.order_statuses.join(","));
			}

			query.append_pair(
				"MarketplaceIds",
				&resources::marketplace_ids(&self.marketplace_ids, config),
			);
		}

		Ok(PreparedRequest::get(url))
	}

	fn extract(&self, payload: Self::Payload) -> Page<Self::Item> {
		Page::new(payload.payload.orders, payload.payload.next_token)
	}

	fn continuation_request(&self, config: &ClientConfig, cursor: &str) -> Result<PreparedRequest> {
		let mut url = request::resolve(&config.endpoint, PATH)?;

		url.set_query(Some(&format!("NextToken={}", encode_cursor(cursor, &['+', '=']))));

		Ok(PreparedRequest::get(url))
	}
}

/// Envelope returned by `getOrders`.
#[derive(Clone, Debug, Deserialize)]
pub struct OrdersResponse {
	/// Page payload.
	pub payload: OrdersPage,
}

/// One page of orders.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrdersPage {
	/// Orders on this page.
	#[serde(default)]
	pub orders: Vec<Order>,
	/// Continuation cursor.
	#[serde(default)]
	pub next_token: Option<String>,
	/// Upper creation bound applied by the service.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub created_before: Option<OffsetDateTime>,
}

/// Order summary; fields not modeled here are kept in `extra`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Order {
	/// Amazon-defined order identifier.
	pub amazon_order_id: String,
	/// Seller-defined order identifier.
	#[serde(default)]
	pub seller_order_id: Option<String>,
	/// Order status, e.g. `Shipped`.
	#[serde(default)]
	pub order_status: String,
	/// Purchase instant.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub purchase_date: Option<OffsetDateTime>,
	/// Last update instant.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub last_update_date: Option<OffsetDateTime>,
	/// Marketplace the order was placed in.
	#[serde(default)]
	pub marketplace_id: Option<String>,
	/// `AFN` or `MFN`.
	#[serde(default)]
	pub fulfillment_channel: Option<String>,
	/// Sales channel, e.g. `Amazon.com`.
	#[serde(default)]
	pub sales_channel: Option<String>,
	/// Shipped item count.
	#[serde(default)]
	pub number_of_items_shipped: u32,
	/// Unshipped item count.
	#[serde(default)]
	pub number_of_items_unshipped: u32,
	/// Prime order flag.
	#[serde(default)]
	pub is_prime: bool,
	/// Business order flag.
	#[serde(default)]
	pub is_business_order: bool,
	/// Remaining fields as returned by the service.
	#[serde(flatten)]
	pub extra: BTreeMap<String, serde_json::Value>,
}

impl<C> Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Lists every order matching `request`, following all continuation tokens.
	pub async fn get_orders(&mut self, request: GetOrders) -> Result<Vec<Order>> {
		self.paginate(&request, PageLimit::Unbounded).await
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;
	use crate::{
		_preludet::{scripted_client, test_config},
		marketplace::Marketplace,
	};

	#[test]
	fn initial_query_carries_filters() {
		let request = GetOrders::new()
			.created_after(macros::datetime!(2025-01-01 00:00 UTC))
			.order_status("Unshipped")
			.order_status("PartiallyShipped")
			.marketplace_id("ATVPDKIKX0DER")
			.initial_request(&test_config())
			.expect("Request should build.");
		let query: BTreeMap<_, _> = request.url().query_pairs().into_owned().collect();

		assert_eq!(request.url().path(), PATH);
		assert_eq!(query["CreatedAfter"], "2025-01-01T00:00:00Z");
		assert_eq!(query["OrderStatuses"], "Unshipped,PartiallyShipped");
		assert_eq!(query["MarketplaceIds"], "ATVPDKIKX0DER");
		assert!(!query.contains_key("CreatedBefore"));
	}

	#[test]
	fn continuation_sends_only_the_encoded_token() {
		let request = GetOrders::default()
			.continuation_request(&test_config(), "Qm9v+YmFy/cXV4==")
			.expect("Request should build.");

		assert_eq!(request.url().query(), Some("NextToken=Qm9v%2BYmFy/cXV4%3D%3D"));
	}

	#[test]
	fn empty_marketplaces_fall_back_to_the_configured_one() {
		let mut config = test_config();

		config.marketplace = Marketplace::JP;

		let request = GetOrders::new().initial_request(&config).expect("Request should build.");
		let query: BTreeMap<_, _> = request.url().query_pairs().into_owned().collect();

		assert_eq!(query["MarketplaceIds"], Marketplace::JP.id);
	}

	#[tokio::test(start_paused = true)]
	async fn direct_pagination_uses_the_client_marketplace() {
		let (mut client, transport) = scripted_client();

		transport.push_api(200, r#"{"payload":{"Orders":[{"AmazonOrderId":"A"}]}}"#);

		let orders = client
			.paginate(&GetOrders::new(), PageLimit::Unbounded)
			.await
			.expect("Listing should succeed.");
		let sent = transport.api_requests();

		assert_eq!(orders.len(), 1);
		assert_eq!(sent[0].url.query(), Some("MarketplaceIds=ATVPDKIKX0DER"));
	}

	#[test]
	fn default_query_covers_the_last_day() {
		let created_after = GetOrders::default().created_after.expect("Default sets CreatedAfter.");
		let age = OffsetDateTime::now_utc() - created_after;

		assert!(age >= Duration::DAY && age < Duration::DAY + Duration::MINUTE);
	}

	#[test]
	fn unknown_order_fields_are_retained() {
		let order: Order = serde_json::from_str(
			r#"{
				"AmazonOrderId": "902-3159896-1390916",
				"OrderStatus": "Shipped",
				"PurchaseDate": "2025-01-05T18:30:00Z",
				"IsPrime": true,
				"BuyerInfo": {"BuyerEmail": "buyer@marketplace.amazon.com"}
			}"#,
		)
		.expect("Order should decode.");

		assert_eq!(order.amazon_order_id, "902-3159896-1390916");
		assert_eq!(order.purchase_date, Some(macros::datetime!(2025-01-05 18:30 UTC)));
		assert!(order.is_prime);
		assert!(order.extra.contains_key("BuyerInfo"));
	}

	#[tokio::test(start_paused = true)]
	async fn get_orders_follows_next_tokens() {
		let (mut client, transport) = scripted_client();

		transport
			.push_api(
				200,
				r#"{"payload":{"Orders":[{"AmazonOrderId":"A"}],"NextToken":"t+1="}}"#,
			)
			.push_api(200, r#"{"payload":{"Orders":[{"AmazonOrderId":"B"}],"NextToken":"t2"}}"#)
			.push_api(200, r#"{"payload":{"Orders":[{"AmazonOrderId":"C"}]}}"#);

		let orders = client.get_orders(GetOrders::default()).await.expect("Listing should succeed.");
		let ids: Vec<_> = orders.iter().map(|o| o.amazon_order_id.as_str()).collect();
		let sent = transport.api_requests();

		assert_eq!(ids, ["A", "B", "C"]);
		assert!(sent[0].url.query().is_some_and(|q| q.contains("MarketplaceIds=ATVPDKIKX0DER")));
		assert_eq!(sent[1].url.query(), Some("NextToken=t%2B1%3D"));
		assert_eq!(sent[2].url.query(), Some("NextToken=t2"));
	}
}
