//! Cursor-following aggregation over any [`PagedCollection`].

// self
use crate::{
	_prelude::*,
	client::Client,
	http::ApiHttpClient,
	obs::{self, CallKind, CallOutcome, CallSpan},
	pagination::{PageLimit, PagedCollection},
};

impl<C> Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Fetches every page of `collection` and returns the aggregated items.
	///
	/// Each page goes through [`Client::execute`] with the collection's retry policy. The loop
	/// stops when a page carries no cursor, when `limit` is exceeded, or when a continuation
	/// request is rejected with `InvalidInput`; the service signals the end of some listings that
	/// way, so the items gathered so far are returned as a success. Any other failure propagates.
	pub async fn paginate<P>(&mut self, collection: &P, limit: PageLimit) -> Result<Vec<P::Item>>
	where
		P: ?Sized + PagedCollection,
	{
		const KIND: CallKind = CallKind::Paginate;

		let span = CallSpan::new(KIND, "paginate");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span.instrument(self.collect_pages(collection, limit)).await;

		obs::record_call_outcome(KIND, CallOutcome::of(&result));

		result
	}

	async fn collect_pages<P>(&mut self, collection: &P, limit: PageLimit) -> Result<Vec<P::Item>>
	where
		P: ?Sized + PagedCollection,
	{
		let policy = collection.retry_policy();
		let request = collection.initial_request(&self.config)?;
		let response = self.execute(&request, &policy).await?;
		let page = collection.extract(response.json()?);
		let mut aggregate = Vec::with_capacity(page.items.len());
		let mut cursor = page.next_cursor;
		let mut fetched = 0;

		collection.merge(&mut aggregate, page.items);

		while let Some(current) = cursor.take() {
			if limit.is_reached(fetched) {
				break;
			}

			let request = collection.continuation_request(&self.config, &current)?;

			fetched += 1;

			let response = match self.execute(&request, &policy).await {
				Ok(response) => response,
				Err(Error::Api(err)) if err.is_invalid_input() => {
					#[cfg(feature = "tracing")]
					tracing::debug!(
						pages = fetched,
						url = err.url.as_str(),
						"continuation rejected as invalid input, treating the listing as complete"
					);

					break;
				},
				Err(e) => return Err(e),
			};
			let page = collection.extract(response.json()?);

			collection.merge(&mut aggregate, page.items);

			cursor = page.next_cursor;
		}

		Ok(aggregate)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		_preludet::scripted_client,
		config::ClientConfig,
		pagination::Page,
		request::{self, PreparedRequest},
		retry::RetryPolicy,
	};

	struct Letters;

	#[derive(Deserialize)]
	struct LettersPayload {
		items: Vec<String>,
		#[serde(default)]
		next: Option<String>,
	}

	impl PagedCollection for Letters {
		type Item = String;
		type Payload = LettersPayload;

		fn retry_policy(&self) -> RetryPolicy {
			RetryPolicy::new(3, StdDuration::from_secs(1))
		}

		fn initial_request(&self, config: &ClientConfig) -> Result<PreparedRequest> {
			let mut url = request::resolve(&config.endpoint, "/letters")?;

			url.query_pairs_mut().append_pair("pageSize", "2");

			Ok(PreparedRequest::get(url))
		}

		fn extract(&self, payload: Self::Payload) -> Page<Self::Item> {
			Page::new(payload.items, payload.next)
		}

		fn continuation_request(
			&self,
			config: &ClientConfig,
			cursor: &str,
		) -> Result<PreparedRequest> {
			let mut url = request::resolve(&config.endpoint, "/letters")?;

			url.query_pairs_mut().append_pair("cursor", cursor);

			Ok(PreparedRequest::get(url))
		}
	}

	fn page(items: &[&str], next: Option<&str>) -> String {
		serde_json::json!({ "items": items, "next": next }).to_string()
	}

	fn cursors(requests: &[crate::_preludet::RecordedRequest]) -> Vec<Option<String>> {
		requests
			.iter()
			.map(|r| r.url.query_pairs().find(|(k, _)| k == "cursor").map(|(_, v)| v.into_owned()))
			.collect()
	}

	#[tokio::test(start_paused = true)]
	async fn follows_each_new_cursor_in_order() {
		let (mut client, transport) = scripted_client();

		transport
			.push_api(200, page(&["a", "b"], Some("c1")))
			.push_api(200, page(&["c", "d"], Some("c2")))
			.push_api(200, page(&["e"], None));

		let items =
			client.paginate(&Letters, PageLimit::Unbounded).await.expect("Listing should succeed.");

		assert_eq!(items, ["a", "b", "c", "d", "e"]);
		assert_eq!(
			cursors(&transport.api_requests()),
			[None, Some("c1".into()), Some("c2".into())]
		);
	}

	#[tokio::test(start_paused = true)]
	async fn empty_cursor_ends_the_listing() {
		let (mut client, transport) = scripted_client();

		transport.push_api(200, page(&["only"], Some("")));

		let items =
			client.paginate(&Letters, PageLimit::Unbounded).await.expect("Listing should succeed.");

		assert_eq!(items, ["only"]);
		assert_eq!(transport.api_requests().len(), 1);
	}

	#[tokio::test(start_paused = true)]
	async fn invalid_input_on_continuation_is_benign() {
		let (mut client, transport) = scripted_client();

		transport
			.push_api(200, page(&["a"], Some("c1")))
			.push_api(200, page(&["b"], Some("expired")))
			.push_api(
				400,
				r#"{"errors":[{"code":"InvalidInput","message":"Invalid pageToken","details":""}]}"#,
			);

		let items = client
			.paginate(&Letters, PageLimit::Unbounded)
			.await
			.expect("InvalidInput on a continuation should end the listing.");

		assert_eq!(items, ["a", "b"]);
		assert_eq!(transport.api_requests().len(), 3);
	}

	#[tokio::test(start_paused = true)]
	async fn invalid_input_on_first_page_fails() {
		let (mut client, transport) = scripted_client();

		transport.push_api(
			400,
			r#"{"errors":[{"code":"InvalidInput","message":"Invalid pageSize","details":""}]}"#,
		);

		let err = client
			.paginate(&Letters, PageLimit::Unbounded)
			.await
			.expect_err("The first page must not swallow InvalidInput.");

		assert!(err.api_error().is_some_and(|e| e.is_invalid_input()));
	}

	#[tokio::test(start_paused = true)]
	async fn other_continuation_errors_propagate() {
		let (mut client, transport) = scripted_client();

		transport
			.push_api(200, page(&["a"], Some("c1")))
			.push_api(403, r#"{"errors":[{"code":"Unauthorized","message":"denied","details":""}]}"#);

		let err = client
			.paginate(&Letters, PageLimit::Unbounded)
			.await
			.expect_err("Forbidden continuation should fail.");

		assert_eq!(err.api_error().map(|e| e.status), Some(403));
	}

	#[tokio::test(start_paused = true)]
	async fn page_limit_bounds_continuation_fetches() {
		let (mut client, transport) = scripted_client();

		for n in 0..5 {
			let item = format!("item-{n}");
			let next = format!("c{}", n + 1);

			transport.push_api(200, page(&[item.as_str()], Some(next.as_str())));
		}

		let items =
			client.paginate(&Letters, PageLimit::Max(1)).await.expect("Listing should succeed.");

		assert_eq!(items, ["item-0", "item-1", "item-2"]);
		assert_eq!(transport.api_requests().len(), 3);
	}

	#[tokio::test(start_paused = true)]
	async fn throttled_pages_are_retried_in_place() {
		let (mut client, transport) = scripted_client();

		transport
			.push_api(200, page(&["a"], Some("c1")))
			.push_api(429, r#"{"errors":[{"code":"TooManyRequests","message":"","details":""}]}"#)
			.push_api(200, page(&["b"], None));

		let items =
			client.paginate(&Letters, PageLimit::Unbounded).await.expect("Listing should recover.");
		let sent = cursors(&transport.api_requests());

		assert_eq!(items, ["a", "b"]);
		assert_eq!(sent, [None, Some("c1".into()), Some("c1".into())]);
	}

	#[tokio::test(start_paused = true)]
	async fn undecodable_page_reports_decode_error() {
		let (mut client, transport) = scripted_client();

		transport.push_api(200, r#"{"items":"nope"}"#);

		let err = client
			.paginate(&Letters, PageLimit::Unbounded)
			.await
			.expect_err("Malformed payload should fail.");

		assert!(matches!(err, Error::Decode { status: 200, .. }));
	}
}
