// self
use crate::{
	obs::{CallKind, CallOutcome},
	retry::RetryDecision,
};

/// Records a call outcome via the global metrics recorder (when enabled).
pub fn record_call_outcome(kind: CallKind, outcome: CallOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"spapi_client_call_total",
			"call" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records a retry decision via the global metrics recorder (when enabled).
pub fn record_retry_decision(decision: RetryDecision) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("spapi_client_retry_total", "decision" => decision.as_str()).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = decision;
	}
}
