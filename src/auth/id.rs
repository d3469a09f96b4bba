//! Strongly typed consumer and token keys.

// std
use std::borrow::Borrow;
// self
use crate::_prelude::*;

/// Longest key accepted from a request or a store.
pub const KEY_MAX_LEN: usize = 128;

macro_rules! def_key {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Validates and wraps a key.
			pub fn new(value: impl Into<String>) -> Result<Self, KeyError> {
				let value = value.into();

				validate_key($kind, &value)?;

				Ok(Self(value))
			}

			/// Borrows the key as a string slice.
			pub fn as_str(&self) -> &str {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = KeyError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				Self::new(value)
			}
		}
		impl FromStr for $name {
			type Err = KeyError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
	};
}

/// Error returned when a consumer or token key fails validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum KeyError {
	/// The key was empty.
	#[error("{kind} key cannot be empty.")]
	Empty {
		/// Kind of key (consumer, token).
		kind: &'static str,
	},
	/// The key contains whitespace, control, or non-ASCII characters.
	#[error("{kind} key contains a character outside printable ASCII.")]
	InvalidCharacter {
		/// Kind of key (consumer, token).
		kind: &'static str,
	},
	/// The key exceeded the allowed length.
	#[error("{kind} key exceeds {max} characters.")]
	TooLong {
		/// Kind of key (consumer, token).
		kind: &'static str,
		/// Maximum permitted length.
		max: usize,
	},
}

def_key! { ConsumerKey, "Key identifying a registered consumer (`oauth_consumer_key`).", "Consumer" }
def_key! { TokenKey, "Key identifying an issued token (`oauth_token`).", "Token" }

fn validate_key(kind: &'static str, value: &str) -> Result<(), KeyError> {
	if value.is_empty() {
		return Err(KeyError::Empty { kind });
	}
	if !value.bytes().all(|b| b.is_ascii_graphic()) {
		return Err(KeyError::InvalidCharacter { kind });
	}
	if value.len() > KEY_MAX_LEN {
		return Err(KeyError::TooLong { kind, max: KEY_MAX_LEN });
	}

	Ok(())
}
