//! Cursor pagination primitives consumed by [`Client::paginate`](crate::client::Client::paginate).
//!
//! A collection describes how to build its first request, how to read a page and its cursor
//! out of the decoded payload, and how to inject a cursor into the follow-up request. The loop
//! that drives those hooks lives once, in the client.

// self
use crate::{_prelude::*, config::ClientConfig, request::PreparedRequest, retry::RetryPolicy};

/// One decoded page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page<T> {
	/// Items carried by the page.
	pub items: Vec<T>,
	/// Continuation cursor; never `Some("")`.
	pub next_cursor: Option<String>,
}
impl<T> Page<T> {
	/// Creates a page, normalizing an empty cursor to `None`.
	pub fn new(items: Vec<T>, next_cursor: Option<String>) -> Self {
		Self { items, next_cursor: next_cursor.filter(|cursor| !cursor.is_empty()) }
	}
}

/// Upper bound on continuation fetches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PageLimit {
	/// Follow cursors until the collection is exhausted.
	#[default]
	Unbounded,
	/// Stop once more than this many continuation pages were fetched.
	Max(usize),
}
impl PageLimit {
	/// Returns `true` when `fetched` continuation pages exceed the limit.
	pub fn is_reached(self, fetched: usize) -> bool {
		match self {
			PageLimit::Unbounded => false,
			PageLimit::Max(max) => fetched > max,
		}
	}
}

/// A paginated resource listing.
pub trait PagedCollection {
	/// Decoded response body of one page.
	type Payload: DeserializeOwned;
	/// Aggregated element type.
	type Item;

	/// Retry policy applied to every page request.
	fn retry_policy(&self) -> RetryPolicy;

	/// Builds the request for the first page against the client's endpoint and marketplace.
	fn initial_request(&self, config: &ClientConfig) -> Result<PreparedRequest>;

	/// Splits a decoded payload into items and the continuation cursor.
	fn extract(&self, payload: Self::Payload) -> Page<Self::Item>;

	/// Builds the request for the page behind `cursor`.
	fn continuation_request(&self, config: &ClientConfig, cursor: &str) -> Result<PreparedRequest>;

	/// Folds one page of items into the aggregate.
	fn merge(&self, aggregate: &mut Vec<Self::Item>, items: Vec<Self::Item>) {
		aggregate.extend(items);
	}
}

/// Percent-encodes every occurrence of `reserved` in `cursor`, leaving other characters intact.
pub fn encode_cursor(cursor: &str, reserved: &[char]) -> String {
	let mut encoded = String::with_capacity(cursor.len());

	for c in cursor.chars() {
		if reserved.contains(&c) {
			let mut buf = [0; 4];

			for byte in c.encode_utf8(&mut buf).bytes() {
				encoded.push_str(&format!("%{byte:02X}"));
			}
		} else {
			encoded.push(c);
		}
	}

	encoded
}
