//! Verifier configuration.

// self
use crate::{_prelude::*, error::ConfigError, signature::ParamOrdering};

/// Allowed clock skew between client and server, in seconds.
pub const DEFAULT_FRESHNESS_WINDOW_SECS: i64 = 600;
/// Minimum spacing between nonce sweeps, in seconds.
pub const DEFAULT_SWEEP_INTERVAL_SECS: i64 = 300;
/// Upper bound for both the freshness window and the sweep interval, in seconds (one week).
pub const MAX_DURATION_SECS: i64 = 7 * 24 * 60 * 60;

/// Tunables for [`Verifier`](crate::verifier::Verifier) and
/// [`ReplayGuard`](crate::guard::ReplayGuard).
///
/// Deserializes from JSON with every field optional:
///
/// ```json
/// { "freshness_window_secs": 300, "param_ordering": "byte" }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VerifierConfig {
	/// Accepted distance between `oauth_timestamp` and the server clock.
	pub freshness_window_secs: i64,
	/// Minimum time between two sweeps of expired nonces.
	pub sweep_interval_secs: i64,
	/// Comparison used when sorting parameters for the base string.
	pub param_ordering: ParamOrdering,
	/// Rejects requests that omit `oauth_version`.
	pub require_version: bool,
}
impl VerifierConfig {
	/// Parses and validates a JSON document.
	pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
		let mut de = serde_json::Deserializer::from_str(json);

		Self::from_deserializer(&mut de)
	}

	/// Parses and validates a JSON byte slice.
	pub fn from_json_slice(json: &[u8]) -> Result<Self, ConfigError> {
		let mut de = serde_json::Deserializer::from_slice(json);

		Self::from_deserializer(&mut de)
	}

	fn from_deserializer<'de, R>(de: &mut serde_json::Deserializer<R>) -> Result<Self, ConfigError>
	where
		R: serde_json::de::Read<'de>,
	{
		let config: Self = serde_path_to_error::deserialize(&mut *de)
			.map_err(|source| ConfigError::Parse { source })?;

		config.validate()?;

		Ok(config)
	}

	/// Overrides the freshness window.
	pub fn with_freshness_window(mut self, window: Duration) -> Self {
		self.freshness_window_secs = window.whole_seconds();

		self
	}

	/// Overrides the sweep interval.
	pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
		self.sweep_interval_secs = interval.whole_seconds();

		self
	}

	/// Overrides the parameter ordering.
	pub fn with_param_ordering(mut self, ordering: ParamOrdering) -> Self {
		self.param_ordering = ordering;

		self
	}

	/// Requires `oauth_version` on every request.
	pub fn with_required_version(mut self, required: bool) -> Self {
		self.require_version = required;

		self
	}

	/// Checks that both durations are positive and at most [`MAX_DURATION_SECS`].
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.freshness_window_secs <= 0 {
			return Err(ConfigError::NonPositiveWindow);
		}
		if self.freshness_window_secs > MAX_DURATION_SECS {
			return Err(ConfigError::WindowTooLarge { max_secs: MAX_DURATION_SECS });
		}
		if self.sweep_interval_secs <= 0 {
			return Err(ConfigError::NonPositiveSweepInterval);
		}
		if self.sweep_interval_secs > MAX_DURATION_SECS {
			return Err(ConfigError::SweepIntervalTooLarge { max_secs: MAX_DURATION_SECS });
		}

		Ok(())
	}

	/// Freshness window as a duration.
	pub fn freshness_window(&self) -> Duration {
		Duration::seconds(self.freshness_window_secs)
	}

	/// Sweep interval as a duration.
	pub fn sweep_interval(&self) -> Duration {
		Duration::seconds(self.sweep_interval_secs)
	}
}
impl Default for VerifierConfig {
	fn default() -> Self {
		Self {
			freshness_window_secs: DEFAULT_FRESHNESS_WINDOW_SECS,
			sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
			param_ordering: ParamOrdering::default(),
			require_version: false,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn empty_document_yields_defaults() {
		let config = VerifierConfig::from_json_str("{}").expect("Empty config should parse.");

		assert_eq!(config, VerifierConfig::default());
		assert_eq!(config.freshness_window(), Duration::minutes(10));
		assert_eq!(config.sweep_interval(), Duration::minutes(5));
		assert_eq!(config.param_ordering, ParamOrdering::Natural);
	}

	#[test]
	fn partial_document_overrides_fields() {
		let config = VerifierConfig::from_json_slice(
			br#"{ "freshness_window_secs": 120, "param_ordering": "byte", "require_version": true }"#,
		)
		.expect("Partial config should parse.");

		assert_eq!(config.freshness_window_secs, 120);
		assert_eq!(config.sweep_interval_secs, DEFAULT_SWEEP_INTERVAL_SECS);
		assert_eq!(config.param_ordering, ParamOrdering::Byte);
		assert!(config.require_version);
	}

	#[test]
	fn parse_errors_report_the_failing_path() {
		let err = VerifierConfig::from_json_str(r#"{ "param_ordering": "random" }"#)
			.expect_err("Unknown ordering must be rejected.");

		assert_eq!(err.to_string(), "Verifier configuration is malformed at `param_ordering`.");

		let err = VerifierConfig::from_json_str(r#"{ "window": 10 }"#)
			.expect_err("Unknown fields must be rejected.");

		assert!(matches!(err, ConfigError::Parse { .. }));
	}

	#[test]
	fn oversized_durations_fail_validation() {
		assert!(matches!(
			VerifierConfig::from_json_str(r#"{ "freshness_window_secs": 9223372036854775807 }"#),
			Err(ConfigError::WindowTooLarge { max_secs: MAX_DURATION_SECS })
		));
		assert!(matches!(
			VerifierConfig::default()
				.with_sweep_interval(Duration::seconds(MAX_DURATION_SECS + 1))
				.validate(),
			Err(ConfigError::SweepIntervalTooLarge { .. })
		));
		VerifierConfig::default()
			.with_freshness_window(Duration::seconds(MAX_DURATION_SECS))
			.with_sweep_interval(Duration::seconds(MAX_DURATION_SECS))
			.validate()
			.expect("Durations at the upper bound should validate.");
	}

	#[test]
	fn non_positive_durations_fail_validation() {
		assert!(matches!(
			VerifierConfig::from_json_str(r#"{ "freshness_window_secs": 0 }"#),
			Err(ConfigError::NonPositiveWindow)
		));
		assert!(matches!(
			VerifierConfig::default().with_sweep_interval(Duration::seconds(-1)).validate(),
			Err(ConfigError::NonPositiveSweepInterval)
		));
		VerifierConfig::default()
			.with_freshness_window(Duration::seconds(30))
			.with_param_ordering(ParamOrdering::Byte)
			.with_required_version(true)
			.validate()
			.expect("Positive durations should validate.");
	}
}
