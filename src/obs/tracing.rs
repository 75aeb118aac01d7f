// self
use crate::{_prelude::*, obs::CallKind, retry::RetryDecision};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// A span builder used by client calls.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Creates a new span tagged with the provided call kind + stage.
	pub fn new(kind: CallKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"spapi_client.call",
				call = kind.as_str(),
				stage,
				attempt = tracing::field::Empty,
				status = tracing::field::Empty,
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Records the attempt number and the HTTP status it produced on the span.
	pub fn record_attempt(&self, attempt: u32, status: u16) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("attempt", attempt);
			self.span.record("status", status);
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (attempt, status);
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits an event describing the retry decision taken after a failed attempt.
pub fn trace_retry_decision(decision: RetryDecision, status: u16, attempt: u32, url: &Url) {
	#[cfg(feature = "tracing")]
	{
		match decision {
			RetryDecision::CooldownRetry(delay) | RetryDecision::BackoffRetry(delay) =>
				tracing::warn!(
					decision = decision.as_str(),
					status,
					attempt,
					delay_ms = delay.as_millis() as u64,
					url = url.as_str(),
					"retrying SP-API call"
				),
			RetryDecision::RefreshAndRetryNow => tracing::debug!(
				decision = decision.as_str(),
				status,
				attempt,
				url = url.as_str(),
				"access token rejected, refreshing"
			),
			RetryDecision::Success | RetryDecision::Fatal => tracing::debug!(
				decision = decision.as_str(),
				status,
				attempt,
				url = url.as_str(),
				"SP-API call settled"
			),
		}
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (decision, status, attempt, url);
	}
}
