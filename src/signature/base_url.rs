//! Base string URI normalization.

// std
use std::fmt::Write as _;
// self
use crate::{_prelude::*, signature::SignatureError};

/// Normalizes a request URL into `scheme://host[:port]path`.
///
/// Scheme and host are lowercased, the default port of `http` (80) and `https` (443) is
/// dropped, and the query string and fragment are discarded; callers fold query parameters
/// into the parameter set themselves. An empty path becomes `/`.
///
/// The path is taken after WHATWG URL parsing: `.` and `..` segments are resolved, characters
/// outside the path set (spaces, for instance) are percent-encoded, and internationalized hosts
/// come back in punycode. Signer and verifier both go through this function, so they agree on
/// the rewritten form.
pub fn normalize_url(raw: &str) -> Result<String, SignatureError> {
	let invalid = |reason| SignatureError::InvalidUrl { url: raw.to_owned(), reason };
	let parsed = Url::parse(raw.trim()).map_err(|_| invalid("unparseable"))?;
	let scheme = parsed.scheme().to_ascii_lowercase();
	let host = parsed
		.host_str()
		.filter(|host| !host.is_empty())
		.ok_or_else(|| invalid("missing host"))?
		.to_ascii_lowercase();
	let mut normalized = format!("{scheme}://{host}");

	if let Some(port) = parsed.port().filter(|port| !is_default_port(&scheme, *port)) {
		let _ = write!(normalized, ":{port}");
	}

	match parsed.path() {
		"" => normalized.push('/'),
		path => normalized.push_str(path),
	}

	Ok(normalized)
}

fn is_default_port(scheme: &str, port: u16) -> bool {
	matches!((scheme, port), ("http", 80) | ("https", 443))
}
