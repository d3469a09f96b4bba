//! Redacting wrapper for consumer and token secrets.

// self
use crate::_prelude::*;

/// Shared secret that never appears in `Debug` or `Display` output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);
impl Secret {
	/// Wraps a secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the raw secret for signing. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl Debug for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Secret").field(&"<redacted>").finish()
	}
}
impl Display for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn formatters_redact_but_serde_keeps_the_value() {
		let secret = Secret::new("kd94hf93k423kf44");

		assert_eq!(format!("{secret:?}"), "Secret(\"<redacted>\")");
		assert_eq!(secret.to_string(), "<redacted>");
		assert_eq!(secret.expose(), "kd94hf93k423kf44");
		assert_eq!(
			serde_json::to_string(&secret).expect("Secret should serialize for persistence."),
			"\"kd94hf93k423kf44\""
		);
	}
}
