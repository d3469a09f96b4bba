//! Verifier-level error types shared across signing, stores, and configuration.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// The request failed verification and must not be served.
	#[error(transparent)]
	Rejected(#[from] Rejection),
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
}
impl Error {
	/// Returns the rejection reason when the error is a verification failure.
	pub fn rejection(&self) -> Option<&Rejection> {
		match self {
			Self::Rejected(rejection) => Some(rejection),
			_ => None,
		}
	}

	/// HTTP status a caller should answer with; non-rejection failures map to 500.
	pub fn status_code(&self) -> u16 {
		match self {
			Self::Rejected(rejection) => rejection.status_code(),
			Self::Storage(_) | Self::Config(_) => 500,
		}
	}
}

/// Reasons a signed request is refused.
///
/// Every variant is terminal for the request: a client must build and send an entirely new
/// signed request (fresh nonce and timestamp) instead of retrying.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum Rejection {
	/// A required OAuth protocol parameter is absent or empty.
	#[error("Required OAuth parameter `{name}` is missing.")]
	MissingParameter {
		/// Name of the missing parameter.
		name: &'static str,
	},
	/// A protocol parameter is malformed or supplied more than once.
	#[error("OAuth parameter `{name}` is malformed.")]
	InvalidParameter {
		/// Name of the offending parameter.
		name: String,
	},
	/// The request names a signature method other than `HMAC-SHA1`.
	#[error("Signature method `{method}` is not supported.")]
	UnsupportedSignatureMethod {
		/// Method named by the request.
		method: String,
	},
	/// The request declares an OAuth version other than `1.0`.
	#[error("OAuth version `{version}` is not supported.")]
	UnsupportedVersion {
		/// Version named by the request.
		version: String,
	},
	/// The request URL cannot be normalized.
	#[error("Request URL `{url}` is invalid.")]
	InvalidUrl {
		/// URL as received.
		url: String,
	},
	/// Consumer key is unknown or revoked.
	#[error("Consumer key is unknown or revoked.")]
	UnknownConsumer,
	/// Token is unknown, revoked, or issued to another consumer.
	#[error("Token is unknown, revoked, or bound to another consumer.")]
	UnknownToken,
	/// Timestamp lies outside the freshness window.
	#[error("Timestamp is outside the freshness window.")]
	StaleTimestamp,
	/// Nonce was already used by this consumer/token pair.
	#[error("Nonce has already been used.")]
	ReplayedNonce,
	/// Supplied signature does not match the computed one.
	#[error("Signature is invalid.")]
	InvalidSignature,
}
impl Rejection {
	/// Returns a stable label suitable for logs and metric fields.
	pub const fn code(&self) -> &'static str {
		match self {
			Self::MissingParameter { .. } => "missing_parameter",
			Self::InvalidParameter { .. } => "invalid_parameter",
			Self::UnsupportedSignatureMethod { .. } => "unsupported_signature_method",
			Self::UnsupportedVersion { .. } => "unsupported_version",
			Self::InvalidUrl { .. } => "invalid_url",
			Self::UnknownConsumer => "unknown_consumer",
			Self::UnknownToken => "unknown_token",
			Self::StaleTimestamp => "stale_timestamp",
			Self::ReplayedNonce => "replayed_nonce",
			Self::InvalidSignature => "invalid_signature",
		}
	}

	/// HTTP status equivalent: malformed requests map to 400, authentication failures to 401.
	pub const fn status_code(&self) -> u16 {
		match self {
			Self::MissingParameter { .. }
			| Self::InvalidParameter { .. }
			| Self::UnsupportedSignatureMethod { .. }
			| Self::UnsupportedVersion { .. }
			| Self::InvalidUrl { .. } => 400,
			Self::UnknownConsumer
			| Self::UnknownToken
			| Self::StaleTimestamp
			| Self::ReplayedNonce
			| Self::InvalidSignature => 401,
		}
	}
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// The freshness window must be a positive duration.
	#[error("Freshness window must be positive.")]
	NonPositiveWindow,
	/// The freshness window exceeds the supported maximum.
	#[error("Freshness window must not exceed {max_secs} seconds.")]
	WindowTooLarge {
		/// Largest accepted window, in seconds.
		max_secs: i64,
	},
	/// The sweep interval must be a positive duration.
	#[error("Nonce sweep interval must be positive.")]
	NonPositiveSweepInterval,
	/// The sweep interval exceeds the supported maximum.
	#[error("Nonce sweep interval must not exceed {max_secs} seconds.")]
	SweepIntervalTooLarge {
		/// Largest accepted interval, in seconds.
		max_secs: i64,
	},
	/// Configuration document could not be parsed.
	#[error("Verifier configuration is malformed at `{path}`.", path = .source.path())]
	Parse {
		/// Structured parsing failure including the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::error::Error>,
	},
	/// The HMAC-SHA1 primitive refused to initialize.
	#[error("HMAC-SHA1 primitive is unavailable.")]
	HmacUnavailable,
}
