//! Lists unshipped orders against a local mock of the Orders API.
//!
//! The mock issues an access token, then serves two pages linked by a `NextToken` that needs
//! percent-encoding. `httpmock` serves a self-signed certificate, so the demo transport accepts
//! invalid certificates; point `endpoint` at a regional host and use `ReqwestApiClient::new` in real code.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use spapi_client::{
	client::ReqwestApiClient, config::ClientConfig, http::ReqwestHttpClient,
	marketplace::Marketplace, reqwest::Client, resources::GetOrders, url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/o2/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"Atza|demo\",\"refresh_token\":\"Atzr|demo\",\"token_type\":\"bearer\",\"expires_in\":3600}",
			);
		})
		.await;
	let first_page = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/orders/v0/orders")
				.query_param("MarketplaceIds", Marketplace::DE.id)
				.query_param("OrderStatuses", "Unshipped");
			then.status(200).header("content-type", "application/json").body(
				"{\"payload\":{\"Orders\":[{\"AmazonOrderId\":\"302-1111111-1111111\",\"OrderStatus\":\"Unshipped\",\"PurchaseDate\":\"2026-10-18T08:15:00Z\"}],\"NextToken\":\"demo+token==\"}}",
			);
		})
		.await;
	let second_page = server
		.mock_async(|when, then| {
			when.method(GET).path("/orders/v0/orders").query_param("NextToken", "demo+token==");
			then.status(200).header("content-type", "application/json").body(
				"{\"payload\":{\"Orders\":[{\"AmazonOrderId\":\"302-2222222-2222222\",\"OrderStatus\":\"Unshipped\",\"IsPrime\":true}]}}",
			);
		})
		.await;
	let config = ClientConfig::builder()
		.client_id("amzn1.application-oa2-client.demo")
		.client_secret("demo-secret")
		.refresh_token("Atzr|seed")
		.marketplace(Marketplace::DE)
		.endpoint(Url::parse(&server.base_url())?)
		.token_endpoint(Url::parse(&server.url("/auth/o2/token"))?)
		.build()?;
	let http_client = ReqwestHttpClient::with_client(
		Client::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()?,
	);
	let mut client = ReqwestApiClient::with_http_client(config, http_client)?;
	let orders = client.get_orders(GetOrders::default().order_status("Unshipped")).await?;

	for order in &orders {
		println!(
			"{} status={} prime={} purchased={:?}",
			order.amazon_order_id, order.order_status, order.is_prime, order.purchase_date
		);
	}

	println!(
		"executions={} attempts={} refresh_grants={}",
		client.metrics.executions(),
		client.metrics.attempts(),
		client.credentials().refresh_count()
	);

	token_mock.assert_calls_async(1).await;
	first_page.assert_calls_async(1).await;
	second_page.assert_calls_async(1).await;

	Ok(())
}
