// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for executor activity.
#[derive(Debug, Default)]
pub struct CallMetrics {
	executions: AtomicU64,
	attempts: AtomicU64,
	success: AtomicU64,
	failure: AtomicU64,
	refreshes: AtomicU64,
	cooldowns: AtomicU64,
	backoffs: AtomicU64,
}
impl CallMetrics {
	/// Returns the number of logical calls started.
	pub fn executions(&self) -> u64 {
		self.executions.load(Ordering::Relaxed)
	}

	/// Returns the number of HTTP attempts sent, including retries.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of logical calls that succeeded.
	pub fn successes(&self) -> u64 {
		self.success.load(Ordering::Relaxed)
	}

	/// Returns the number of logical calls that failed.
	pub fn failures(&self) -> u64 {
		self.failure.load(Ordering::Relaxed)
	}

	/// Returns the number of refreshes forced by a `401`.
	pub fn refreshes(&self) -> u64 {
		self.refreshes.load(Ordering::Relaxed)
	}

	/// Returns the number of quota cooldowns.
	pub fn cooldowns(&self) -> u64 {
		self.cooldowns.load(Ordering::Relaxed)
	}

	/// Returns the number of ordinary backoffs.
	pub fn backoffs(&self) -> u64 {
		self.backoffs.load(Ordering::Relaxed)
	}

	pub(crate) fn record_execution(&self) {
		self.executions.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_success(&self) {
		self.success.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.failure.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_refresh(&self) {
		self.refreshes.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_cooldown(&self) {
		self.cooldowns.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_backoff(&self) {
		self.backoffs.fetch_add(1, Ordering::Relaxed);
	}
}
