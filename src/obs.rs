//! Optional observability helpers for client calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `spapi_client.call` with the `call` and
//!   `stage` (call site) fields. Executor spans also carry the latest `attempt` number and HTTP
//!   `status`, and every retry decision emits one event.
//! - Enable `metrics` to increment the `spapi_client_call_total` counter for every
//!   attempt/success/failure/cancellation, labeled by `call` + `outcome`, and
//!   `spapi_client_retry_total` labeled by `decision`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Call kinds observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallKind {
	/// Refresh-token grant against the token endpoint.
	Refresh,
	/// One logical API call driven by the retry loop.
	Execute,
	/// A paginated listing.
	Paginate,
}
impl CallKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallKind::Refresh => "refresh",
			CallKind::Execute => "execute",
			CallKind::Paginate => "paginate",
		}
	}
}
impl Display for CallKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to a client helper.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
	/// The caller's cancellation signal aborted the call.
	Cancelled,
}
impl CallOutcome {
	/// Maps the result of a finished call to its outcome label.
	pub fn of<T>(result: &Result<T>) -> Self {
		match result {
			Ok(_) => CallOutcome::Success,
			Err(Error::Cancelled) => CallOutcome::Cancelled,
			Err(_) => CallOutcome::Failure,
		}
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Success => "success",
			CallOutcome::Failure => "failure",
			CallOutcome::Cancelled => "cancelled",
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
