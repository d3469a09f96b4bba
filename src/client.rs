//! Outbound request signing for API clients.

// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::{
	_prelude::*,
	auth::Credential,
	encoding,
	request::SignedRequest,
	signature::{
		OAUTH_SIGNATURE, ParamOrdering, Parameters, SignatureError, SignatureMethod,
		build_base_string,
	},
};

/// Length of generated nonces.
pub const NONCE_LEN: usize = 32;

/// Signs outbound requests with HMAC-SHA1 on behalf of one credential.
#[derive(Clone, Debug)]
pub struct RequestSigner {
	credential: Credential,
	ordering: ParamOrdering,
}
impl RequestSigner {
	/// Creates a signer using natural parameter ordering.
	pub fn new(credential: Credential) -> Self {
		Self { credential, ordering: ParamOrdering::default() }
	}

	/// Overrides the parameter ordering; must match the verifier's.
	pub fn with_ordering(mut self, ordering: ParamOrdering) -> Self {
		self.ordering = ordering;

		self
	}

	/// Credential used for signing.
	pub fn credential(&self) -> &Credential {
		&self.credential
	}

	/// Signs with a fresh random nonce and the current time.
	pub fn sign(
		&self,
		method: &str,
		url: &str,
		params: Parameters,
	) -> Result<SignedRequest, SignatureError> {
		self.sign_with(method, url, params, &generate_nonce(), OffsetDateTime::now_utc())
	}

	/// Signs with a caller-chosen nonce and timestamp.
	///
	/// Protocol parameters already present in `params` are overwritten; a stale
	/// `oauth_signature` is discarded. The query string of `url` is not read, so query
	/// parameters must be passed in `params` as well.
	pub fn sign_with(
		&self,
		method: &str,
		url: &str,
		mut params: Parameters,
		nonce: &str,
		timestamp: OffsetDateTime,
	) -> Result<SignedRequest, SignatureError> {
		let method_name = SignatureMethod::HmacSha1;

		params.remove(OAUTH_SIGNATURE);
		params.insert("oauth_consumer_key", self.credential.consumer_key.as_str());
		params.insert("oauth_signature_method", method_name.as_str());
		params.insert("oauth_timestamp", timestamp.unix_timestamp().to_string());
		params.insert("oauth_nonce", nonce);
		params.insert("oauth_version", "1.0");

		match &self.credential.token {
			Some(token) => params.insert("oauth_token", token.as_str()),
			None => params.remove("oauth_token"),
		};

		let base_string = build_base_string(method, url, &params, self.ordering)?;
		let signature = method_name.sign(
			&base_string,
			self.credential.consumer_secret.expose(),
			self.credential.token_secret(),
		)?;

		params.insert(OAUTH_SIGNATURE, signature);

		Ok(SignedRequest::new(method.to_ascii_uppercase(), url).with_params(params))
	}
}

/// Renders the `Authorization` header value carrying every `oauth_*` parameter of `request`.
///
/// Keys and values are percent-encoded and emitted in key order.
pub fn authorization_header(request: &SignedRequest) -> String {
	let mut header = String::from("OAuth ");

	for (idx, (key, value)) in request
		.oauth_params()
		.flat_map(|(key, value)| value.values().iter().map(move |value| (key, value)))
		.enumerate()
	{
		if idx > 0 {
			header.push_str(", ");
		}

		header.push_str(&encoding::encode(key));
		header.push_str("=\"");
		header.push_str(&encoding::encode(value));
		header.push('"');
	}

	header
}

/// 32 random ASCII alphanumerics from the thread-local CSPRNG.
pub fn generate_nonce() -> String {
	rand::rng().sample_iter(Alphanumeric).take(NONCE_LEN).map(char::from).collect()
}
