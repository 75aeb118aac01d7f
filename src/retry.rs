//! Retry policy and the pure per-attempt decision step.
//!
//! [`RetryPolicy::decide`] maps the outcome of one attempt to a [`RetryDecision`] without touching
//! the network, so the executor loop only has to act on the decision:
//!
//! | Outcome | Decision |
//! |---|---|
//! | `2xx` | [`RetryDecision::Success`] |
//! | `401`, previous attempt was not a `401` | [`RetryDecision::RefreshAndRetryNow`] |
//! | `401` again | [`RetryDecision::Fatal`] |
//! | `429` with `QuotaExceeded` | [`RetryDecision::CooldownRetry`] |
//! | other `429`, or a listed status | [`RetryDecision::BackoffRetry`] |
//! | anything else | [`RetryDecision::Fatal`] |

// self
use crate::{_prelude::*, classify::QUOTA_EXCEEDED};

/// Action the executor takes after one attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryDecision {
	/// The response is successful; return it.
	Success,
	/// Force a token refresh and retry immediately without consuming an attempt.
	RefreshAndRetryNow,
	/// Reset the attempt counter and sleep for the quota cooldown.
	CooldownRetry(StdDuration),
	/// Sleep for the policy backoff and consume an attempt.
	BackoffRetry(StdDuration),
	/// Surface the classified error without retrying.
	Fatal,
}
impl RetryDecision {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(&self) -> &'static str {
		match self {
			Self::Success => "success",
			Self::RefreshAndRetryNow => "refresh",
			Self::CooldownRetry(_) => "cooldown",
			Self::BackoffRetry(_) => "backoff",
			Self::Fatal => "fatal",
		}
	}
}
impl Display for RetryDecision {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Bounded retry policy configured per call site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
	/// Maximum number of counted attempts.
	pub attempt_limit: u32,
	/// Delay before an ordinary retry.
	pub backoff: StdDuration,
	/// Delay after a `QuotaExceeded` rejection.
	pub quota_cooldown: StdDuration,
	/// Statuses besides `429` that are retried with the ordinary backoff.
	pub retryable_statuses: Vec<u16>,
}
impl RetryPolicy {
	/// Cooldown applied after a `QuotaExceeded` rejection.
	pub const QUOTA_COOLDOWN: StdDuration = StdDuration::from_secs(30);

	const DEFAULT_ATTEMPTS: u32 = 10;
	const FALLBACK_BACKOFF: StdDuration = StdDuration::from_secs(1);

	/// Creates a policy; a zero backoff is replaced by one second.
	pub fn new(attempt_limit: u32, backoff: StdDuration) -> Self {
		Self {
			attempt_limit,
			backoff: if backoff.is_zero() { Self::FALLBACK_BACKOFF } else { backoff },
			quota_cooldown: Self::QUOTA_COOLDOWN,
			retryable_statuses: Vec::new(),
		}
	}

	/// Ten attempts with a one second backoff (pricing, catalog, eligibility).
	pub fn short() -> Self {
		Self::new(Self::DEFAULT_ATTEMPTS, StdDuration::from_secs(1))
	}

	/// Ten attempts with a one minute backoff (order listing).
	pub fn long() -> Self {
		Self::new(Self::DEFAULT_ATTEMPTS, StdDuration::from_secs(60))
	}

	/// Overrides the quota cooldown.
	pub fn with_quota_cooldown(mut self, cooldown: StdDuration) -> Self {
		self.quota_cooldown = cooldown;

		self
	}

	/// Marks an additional status as retryable with the ordinary backoff.
	pub fn retry_on_status(mut self, status: u16) -> Self {
		if !self.retryable_statuses.contains(&status) {
			self.retryable_statuses.push(status);
		}

		self
	}

	/// Decides how to react to one attempt.
	///
	/// `primary_code` is the first structured error code of the classified body and
	/// `previous_status` the status of the previous failed attempt of the same execution.
	pub fn decide(
		&self,
		status: u16,
		primary_code: Option<&str>,
		previous_status: Option<u16>,
	) -> RetryDecision {
		match status {
			200..=299 => RetryDecision::Success,
			401 if previous_status == Some(401) => RetryDecision::Fatal,
			401 => RetryDecision::RefreshAndRetryNow,
			429 if primary_code == Some(QUOTA_EXCEEDED) =>
				RetryDecision::CooldownRetry(self.quota_cooldown),
			429 => RetryDecision::BackoffRetry(self.backoff),
			code if self.retryable_statuses.contains(&code) =>
				RetryDecision::BackoffRetry(self.backoff),
			_ => RetryDecision::Fatal,
		}
	}
}
impl Default for RetryPolicy {
	fn default() -> Self {
		Self::short()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn success_range_is_half_open() {
		let policy = RetryPolicy::short();

		assert_eq!(policy.decide(200, None, None), RetryDecision::Success);
		assert_eq!(policy.decide(204, None, Some(429)), RetryDecision::Success);
		assert_eq!(policy.decide(299, None, None), RetryDecision::Success);
		assert_eq!(policy.decide(300, None, None), RetryDecision::Fatal);
	}

	#[test]
	fn unauthorized_refreshes_once() {
		let policy = RetryPolicy::short();

		assert_eq!(policy.decide(401, None, None), RetryDecision::RefreshAndRetryNow);
		assert_eq!(policy.decide(401, None, Some(429)), RetryDecision::RefreshAndRetryNow);
		assert_eq!(policy.decide(401, Some("Unauthorized"), Some(401)), RetryDecision::Fatal);
	}

	#[test]
	fn quota_exhaustion_cools_down() {
		let policy = RetryPolicy::long();

		assert_eq!(
			policy.decide(429, Some("QuotaExceeded"), None),
			RetryDecision::CooldownRetry(StdDuration::from_secs(30))
		);
		assert_eq!(
			policy.decide(429, Some("TooManyRequests"), None),
			RetryDecision::BackoffRetry(StdDuration::from_secs(60))
		);
		assert_eq!(policy.decide(429, None, None), RetryDecision::BackoffRetry(policy.backoff));
	}

	#[test]
	fn other_statuses_are_fatal_unless_listed() {
		let policy = RetryPolicy::short();

		assert_eq!(policy.decide(400, Some("InvalidInput"), None), RetryDecision::Fatal);
		assert_eq!(policy.decide(403, None, None), RetryDecision::Fatal);
		assert_eq!(policy.decide(503, None, None), RetryDecision::Fatal);

		let policy = policy.retry_on_status(503).retry_on_status(503);

		assert_eq!(policy.retryable_statuses, vec![503]);
		assert_eq!(policy.decide(503, None, None), RetryDecision::BackoffRetry(policy.backoff));
	}

	#[test]
	fn zero_backoff_falls_back_to_one_second() {
		let policy = RetryPolicy::new(3, StdDuration::ZERO);

		assert_eq!(policy.backoff, StdDuration::from_secs(1));
		assert_eq!(policy.quota_cooldown, RetryPolicy::QUOTA_COOLDOWN);
	}

	#[test]
	fn decision_labels_are_stable() {
		assert_eq!(RetryDecision::CooldownRetry(StdDuration::ZERO).to_string(), "cooldown");
		assert_eq!(RetryDecision::RefreshAndRetryNow.as_str(), "refresh");
	}
}
