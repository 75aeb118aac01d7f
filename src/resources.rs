//! Paginated resource listings built on [`PagedCollection`](crate::pagination::PagedCollection).

pub mod catalog;
pub mod orders;

pub use catalog::*;
pub use orders::*;

// crates.io
use time::{UtcOffset, format_description::well_known::Rfc3339};
// self
use crate::{_prelude::*, config::ClientConfig, error::ConfigError};

/// Joins `ids`, falling back to the configured marketplace when none were given.
fn marketplace_ids(ids: &[String], config: &ClientConfig) -> String {
	if ids.is_empty() { config.marketplace.id.to_owned() } else { ids.join(",") }
}

/// Formats `instant` as second-precision RFC 3339 in UTC.
fn rfc3339(instant: OffsetDateTime) -> Result<String> {
	let instant = instant.to_offset(UtcOffset::UTC);
	let instant = instant.replace_nanosecond(0).unwrap_or(instant);

	instant.format(&Rfc3339).map_err(|e| ConfigError::from(e).into())
}
