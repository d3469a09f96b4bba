//! Inbound signed-request model.

// crates.io
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	encoding,
	error::Rejection,
	signature::{OAUTH_SIGNATURE, ParamValue, Parameters},
};

const AUTHORIZATION: &str = "Authorization";
const REALM: &str = "realm";

/// HTTP method, full URL, and every decoded parameter that takes part in signing.
///
/// Parameters may arrive through the query string, an `application/x-www-form-urlencoded`
/// body, and the `Authorization: OAuth` header; all sources are merged into one multimap, so a
/// key sent through two sources becomes multi-valued.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedRequest {
	method: String,
	url: String,
	params: Parameters,
}
impl SignedRequest {
	/// Starts a request without parameters.
	pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
		Self { method: method.into(), url: url.into(), params: Parameters::new() }
	}

	/// Replaces the parameter set.
	pub fn with_params(mut self, params: Parameters) -> Self {
		self.params = params;

		self
	}

	/// Appends one parameter.
	pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.params.append(key, value);

		self
	}

	/// Folds the query component of the URL into the parameters.
	pub fn with_query_from_url(mut self) -> Result<Self, Rejection> {
		let url = Url::parse(self.url.trim())
			.map_err(|_| Rejection::InvalidUrl { url: self.url.clone() })?;

		self.params.extend(url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())));

		Ok(self)
	}

	/// Folds an `application/x-www-form-urlencoded` body into the parameters.
	pub fn with_form_body(mut self, body: &[u8]) -> Self {
		self.params.extend(form_urlencoded::parse(body).map(|(k, v)| (k.into_owned(), v.into_owned())));

		self
	}

	/// Folds the parameters of an `Authorization: OAuth ...` header value.
	///
	/// Values must be double-quoted and are percent-decoded; `realm` is dropped.
	pub fn with_authorization_header(mut self, header: &str) -> Result<Self, Rejection> {
		for (key, value) in parse_authorization_header(header)? {
			self.params.append(key, value);
		}

		Ok(self)
	}

	/// HTTP method as received.
	pub fn method(&self) -> &str {
		&self.method
	}

	/// Full request URL as received.
	pub fn url(&self) -> &str {
		&self.url
	}

	/// All collected parameters, `oauth_signature` included.
	pub fn params(&self) -> &Parameters {
		&self.params
	}

	/// Mutable access to the parameters.
	pub fn params_mut(&mut self) -> &mut Parameters {
		&mut self.params
	}

	/// The supplied `oauth_signature`, when sent exactly once.
	pub fn oauth_signature(&self) -> Option<&str> {
		self.params.single(OAUTH_SIGNATURE)
	}

	/// Every `oauth_*` parameter, in key order.
	pub fn oauth_params(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
		self.params.iter().filter(|(key, _)| key.starts_with("oauth_"))
	}
}

/// Parses `OAuth k1="v1", k2="v2"` into decoded pairs, `realm` excluded.
pub fn parse_authorization_header(header: &str) -> Result<Vec<(String, String)>, Rejection> {
	let malformed = || Rejection::InvalidParameter { name: AUTHORIZATION.into() };
	let header = header.trim();
	let (scheme, rest) = header.split_once(char::is_whitespace).unwrap_or((header, ""));

	if !scheme.eq_ignore_ascii_case("OAuth") {
		return Err(malformed());
	}

	let mut pairs = Vec::new();

	for part in rest.split(',').map(str::trim).filter(|part| !part.is_empty()) {
		let (key, value) = part.split_once('=').ok_or_else(malformed)?;
		let value = value
			.trim()
			.strip_prefix('"')
			.and_then(|value| value.strip_suffix('"'))
			.ok_or_else(malformed)?;
		let key = encoding::decode(key.trim()).map_err(|_| malformed())?;

		if key.is_empty() {
			return Err(malformed());
		}
		if key.eq_ignore_ascii_case(REALM) {
			continue;
		}

		let value = encoding::decode(value).map_err(|_| malformed())?;

		pairs.push((key, value));
	}

	Ok(pairs)
}
