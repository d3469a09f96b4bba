//! Signature base-string construction and HMAC-SHA1 signing.
//!
//! The pieces compose exactly as the signer and the verifier need them:
//! [`normalize_url`] and [`normalize_params`] feed [`build_base_string`], whose output is
//! signed by a [`SignatureMethod`]. Every function here is pure.

pub mod base_string;
pub mod base_url;
pub mod method;
pub mod params;

pub use base_string::*;
pub use base_url::*;
pub use method::*;
pub use params::*;

// self
use crate::{
	_prelude::*,
	error::{ConfigError, Rejection},
};

/// Protocol parameter carrying the signature itself; never part of the base string.
pub const OAUTH_SIGNATURE: &str = "oauth_signature";

/// Failures raised while normalizing or signing request material.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum SignatureError {
	/// The URL cannot be parsed or lacks a host.
	#[error("URL `{url}` cannot be normalized: {reason}.")]
	InvalidUrl {
		/// URL as supplied.
		url: String,
		/// Short description of the defect.
		reason: &'static str,
	},
	/// The signature method name is not a supported variant.
	#[error("Signature method `{method}` is not supported.")]
	UnsupportedMethod {
		/// Method name as supplied.
		method: String,
	},
	/// The HMAC primitive rejected the signing key.
	#[error("HMAC signing key could not be initialized.")]
	HmacKey,
}
impl From<SignatureError> for Error {
	fn from(e: SignatureError) -> Self {
		match e {
			SignatureError::InvalidUrl { url, .. } => Rejection::InvalidUrl { url }.into(),
			SignatureError::UnsupportedMethod { method } =>
				Rejection::UnsupportedSignatureMethod { method }.into(),
			SignatureError::HmacKey => ConfigError::HmacUnavailable.into(),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn signature_errors_map_onto_rejections() {
		let err: Error = SignatureError::InvalidUrl { url: "nope".into(), reason: "missing host" }
			.into();

		assert_eq!(err.rejection(), Some(&Rejection::InvalidUrl { url: "nope".into() }));

		let err: Error = SignatureError::UnsupportedMethod { method: "RSA-SHA1".into() }.into();

		assert_eq!(err.rejection().map(Rejection::code), Some("unsupported_signature_method"));

		let err: Error = SignatureError::HmacKey.into();

		assert!(matches!(err, Error::Config(ConfigError::HmacUnavailable)));
	}
}
