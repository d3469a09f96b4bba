// self
use crate::{_prelude::*, auth::ConsumerKey, error::Rejection, obs::VerificationStage};

/// Future type returned by [`VerifySpan::instrument`].
#[cfg(feature = "tracing")]
pub type InstrumentedVerify<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedVerify<F> = F;

/// Span covering one verification.
#[derive(Clone, Debug)]
pub struct VerifySpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl VerifySpan {
	/// Opens a span in the [`VerificationStage::Received`] stage.
	pub fn new(method: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"oauth1_gate.verify",
				method,
				stage = VerificationStage::Received.as_str(),
				consumer = tracing::field::Empty
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = method;

			Self {}
		}
	}

	/// Moves the `stage` field forward.
	pub fn stage(&self, stage: VerificationStage) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("stage", stage.as_str());
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = stage;
		}
	}

	/// Tags the span with the consumer once it is known.
	pub fn consumer(&self, consumer: &ConsumerKey) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("consumer", consumer.as_str());
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = consumer;
		}
	}

	/// Instruments the verification future without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedVerify<Fut>
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

/// Emits a `warn` event describing a refused request.
///
/// `consumer` is the raw `oauth_consumer_key` as received, which may not be a valid key.
pub fn log_rejection(rejection: &Rejection, consumer: Option<&str>) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(reason = rejection.code(), consumer, "{rejection}");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (rejection, consumer);
	}
}

/// Emits a `warn` event when the post-verification nonce sweep fails.
pub fn log_sweep_failure(error: &Error) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(%error, "nonce sweep failed");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = error;
	}
}
