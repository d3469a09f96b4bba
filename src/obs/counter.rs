// self
use crate::{error::Rejection, obs::VerifyOutcome};

/// Counts one verification via the global metrics recorder (when enabled).
///
/// `reason` is the rejection code, or `none` for accepted and failed verifications.
pub fn record_verification(outcome: VerifyOutcome, rejection: Option<&Rejection>) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"oauth1_gate_verification_total",
			"outcome" => outcome.as_str(),
			"reason" => rejection.map_or("none", Rejection::code)
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (outcome, rejection);
	}
}

/// Counts nonce records removed by a sweep.
pub fn record_nonce_sweep(purged: usize) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("oauth1_gate_nonce_swept_total").increment(purged as u64);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = purged;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recorders_noop_without_a_global_recorder() {
		record_verification(VerifyOutcome::Rejected, Some(&Rejection::ReplayedNonce));
		record_verification(VerifyOutcome::Accepted, None);
		record_nonce_sweep(3);
	}
}
