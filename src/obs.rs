//! Optional observability hooks for request verification.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to wrap each verification in an `oauth1_gate.verify` span whose `stage`
//!   field follows the verifier state machine, and to emit a `warn` event per rejection.
//! - Enable `metrics` to increment `oauth1_gate_verification_total` (labeled by `outcome` and
//!   `reason`) and `oauth1_gate_nonce_swept_total`.
//!
//! Neither hook ever sees a secret.

mod counter;
mod span;

pub use counter::*;
pub use span::*;

// self
use crate::_prelude::*;

/// States a request passes through while being verified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VerificationStage {
	/// Request handed to the verifier.
	Received,
	/// Protocol parameters present and well formed.
	ParamsExtracted,
	/// Credentials resolved, timestamp fresh, nonce recorded.
	NonceChecked,
	/// Expected signature computed from the stored secrets.
	SignatureComputed,
	/// Signature matched.
	Accepted,
	/// Terminal failure at any earlier stage.
	Rejected,
}
impl VerificationStage {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			VerificationStage::Received => "received",
			VerificationStage::ParamsExtracted => "params_extracted",
			VerificationStage::NonceChecked => "nonce_checked",
			VerificationStage::SignatureComputed => "signature_computed",
			VerificationStage::Accepted => "accepted",
			VerificationStage::Rejected => "rejected",
		}
	}
}
impl Display for VerificationStage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Final outcome recorded for each verification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VerifyOutcome {
	/// The request was authenticated.
	Accepted,
	/// The request was refused with a [`Rejection`](crate::error::Rejection).
	Rejected,
	/// Storage or configuration failed before a verdict was reached.
	Failed,
}
impl VerifyOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			VerifyOutcome::Accepted => "accepted",
			VerifyOutcome::Rejected => "rejected",
			VerifyOutcome::Failed => "failed",
		}
	}
}
impl Display for VerifyOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
