//! RFC 3986 percent-encoding shared by every signature component.

// std
use std::borrow::Cow;
// crates.io
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, percent_encode};
// self
use crate::_prelude::*;

/// Everything except the unreserved set `A-Z a-z 0-9 - . _ ~` is encoded.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Raised when a percent-encoded value does not decode to UTF-8.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Percent-encoded value does not decode to UTF-8.")]
pub struct DecodeError;

/// Percent-encodes a string's UTF-8 bytes (space becomes `%20`, never `+`).
pub fn encode(value: &str) -> String {
	encode_bytes(value.as_bytes())
}

/// Percent-encodes raw octets with uppercase hex digits.
pub fn encode_bytes(value: &[u8]) -> String {
	percent_encode(value, UNRESERVED).to_string()
}

/// Reverses [`encode`]; `+` is left untouched.
pub fn decode(value: &str) -> Result<String, DecodeError> {
	percent_decode_str(value).decode_utf8().map(Cow::into_owned).map_err(|_| DecodeError)
}
