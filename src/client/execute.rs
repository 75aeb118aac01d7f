//! Bounded, failure-class-aware retry loop for one logical call.

// crates.io
use oauth2::AsyncHttpClient;
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	classify::ApiError,
	client::{Client, until_cancelled},
	error::RetryExhaustedError,
	http::{self, ApiHttpClient, ResponseMetadataSlot},
	obs::{self, CallKind, CallOutcome, CallSpan},
	request::{ApiResponse, PreparedRequest},
	retry::{RetryDecision, RetryPolicy},
};

impl<C> Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Executes `request`, retrying per `policy` until a `2xx` response arrives.
	///
	/// A `401` forces one token refresh and an immediate retry without consuming an attempt; a
	/// second consecutive `401` is fatal. A `429` carrying `QuotaExceeded` resets the attempt
	/// counter and sleeps for the quota cooldown. Other `429`s (and statuses the policy lists)
	/// sleep for the backoff and consume an attempt. Everything else fails immediately with the
	/// classified [`ApiError`]. Transport failures are never retried.
	pub async fn execute(
		&mut self,
		request: &PreparedRequest,
		policy: &RetryPolicy,
	) -> Result<ApiResponse> {
		const KIND: CallKind = CallKind::Execute;

		let span = CallSpan::new(KIND, "execute");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);
		self.metrics.record_execution();

		let result = span.instrument(self.run_attempts(&span, request, policy)).await;

		match &result {
			Ok(_) => self.metrics.record_success(),
			Err(_) => self.metrics.record_failure(),
		}

		obs::record_call_outcome(KIND, CallOutcome::of(&result));

		result
	}

	async fn run_attempts(
		&mut self,
		span: &CallSpan,
		request: &PreparedRequest,
		policy: &RetryPolicy,
	) -> Result<ApiResponse> {
		let mut access_token = until_cancelled(
			&self.cancellation,
			self.credentials.ensure_valid_token(self.http_client.as_ref()),
		)
		.await?
		.access_token
		.clone();
		let mut attempt = 0;
		let mut previous_status = None;
		let mut last_error = None;

		while attempt < policy.attempt_limit {
			if self.cancellation.is_cancelled() {
				return Err(Error::Cancelled);
			}

			self.metrics.record_attempt();

			let (status, body) = until_cancelled(
				&self.cancellation,
				send(self.http_client.as_ref(), request, &access_token),
			)
			.await?;

			span.record_attempt(attempt, status);

			if (200..300).contains(&status) {
				obs::record_retry_decision(RetryDecision::Success);

				return Ok(ApiResponse { status, body });
			}

			let error = Box::new(ApiError::classify(status, body, request.url().clone()));
			let decision = policy.decide(status, error.primary_code(), previous_status);

			obs::record_retry_decision(decision);
			obs::trace_retry_decision(decision, status, attempt, request.url());

			match decision {
				// `Success` only stems from the 2xx range handled above.
				RetryDecision::Success | RetryDecision::Fatal => return Err(Error::Api(error)),
				RetryDecision::RefreshAndRetryNow => {
					self.metrics.record_refresh();

					access_token = until_cancelled(
						&self.cancellation,
						self.credentials.force_refresh(self.http_client.as_ref()),
					)
					.await?
					.access_token
					.clone();
				},
				RetryDecision::CooldownRetry(delay) => {
					self.metrics.record_cooldown();

					attempt = 0;

					self.pause(delay).await?;
				},
				RetryDecision::BackoffRetry(delay) => {
					self.metrics.record_backoff();
					self.pause(delay).await?;

					attempt += 1;
				},
			}

			previous_status = Some(status);
			last_error = Some(error);
		}

		Err(RetryExhaustedError { attempts: policy.attempt_limit, backoff: policy.backoff, last_error }
			.into())
	}

	async fn pause(&self, delay: StdDuration) -> Result<()> {
		until_cancelled(&self.cancellation, async {
			tokio::time::sleep(delay).await;

			Ok(())
		})
		.await
	}
}

async fn send<C>(
	http_client: &C,
	request: &PreparedRequest,
	access_token: &TokenSecret,
) -> Result<(u16, Vec<u8>)>
where
	C: ?Sized + ApiHttpClient,
{
	let wire = request.to_http_request(access_token)?;
	let handle = http_client.with_metadata(ResponseMetadataSlot::default());
	let response = handle.call(wire).await.map_err(http::map_transport_error)?;

	Ok((response.status().as_u16(), response.into_body()))
}
