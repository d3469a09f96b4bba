//! Supported signature methods and the HMAC-SHA1 signer.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use sha1::Sha1;
// self
use crate::{_prelude::*, encoding, signature::SignatureError};

type HmacSha1 = Hmac<Sha1>;

/// Signature methods a request may name in `oauth_signature_method`.
///
/// The set is closed; supporting `RSA-SHA1` or `PLAINTEXT` means adding a variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum SignatureMethod {
	/// HMAC-SHA1 keyed with the consumer and token secrets.
	#[serde(rename = "HMAC-SHA1")]
	HmacSha1,
}
impl SignatureMethod {
	/// Returns the protocol identifier for the method.
	pub const fn as_str(self) -> &'static str {
		match self {
			SignatureMethod::HmacSha1 => "HMAC-SHA1",
		}
	}

	/// Signs a base string with the given secrets; a missing token secret signs as empty.
	pub fn sign(
		self,
		base_string: &str,
		consumer_secret: &str,
		token_secret: Option<&str>,
	) -> Result<String, SignatureError> {
		match self {
			SignatureMethod::HmacSha1 => sign_hmac_sha1(base_string, consumer_secret, token_secret),
		}
	}
}
impl Display for SignatureMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for SignatureMethod {
	type Err = SignatureError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"HMAC-SHA1" => Ok(SignatureMethod::HmacSha1),
			other => Err(SignatureError::UnsupportedMethod { method: other.to_owned() }),
		}
	}
}

/// Builds the signing key `encode(consumer_secret)&encode(token_secret)`.
pub fn signing_key(consumer_secret: &str, token_secret: Option<&str>) -> String {
	format!(
		"{}&{}",
		encoding::encode(consumer_secret),
		encoding::encode(token_secret.unwrap_or_default())
	)
}

/// `base64(HMAC-SHA1(signing_key, base_string))`.
pub fn sign_hmac_sha1(
	base_string: &str,
	consumer_secret: &str,
	token_secret: Option<&str>,
) -> Result<String, SignatureError> {
	let key = signing_key(consumer_secret, token_secret);
	let mut mac =
		HmacSha1::new_from_slice(key.as_bytes()).map_err(|_| SignatureError::HmacKey)?;

	mac.update(base_string.as_bytes());

	Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::signature::{ParamOrdering, Parameters, build_base_string};

	#[test]
	fn reference_vector_signs_exactly() {
		let params: Parameters = [
			("file", "vacation.jpg"),
			("size", "original"),
			("oauth_consumer_key", "dpf43f3p2l4k3l03"),
			("oauth_token", "nnch734d00sl2jdk"),
			("oauth_signature_method", "HMAC-SHA1"),
			("oauth_timestamp", "1191242096"),
			("oauth_nonce", "kllo9940pd9333jh"),
			("oauth_version", "1.0"),
		]
		.into_iter()
		.collect();
		let base = build_base_string(
			"GET",
			"http://photos.example.net/photos",
			&params,
			ParamOrdering::Natural,
		)
		.expect("Reference request should produce a base string.");
		let signature = SignatureMethod::HmacSha1
			.sign(&base, "kd94hf93k423kf44", Some("pfkkdhi9sl3r4s00"))
			.expect("HMAC-SHA1 should sign the reference base string.");

		assert_eq!(signature, "tR3+Ty81lMeYAr/Fid0kMTYa/WM=");
	}

	#[test]
	fn signing_key_encodes_both_secrets() {
		assert_eq!(signing_key("kd94hf93k423kf44", Some("pfkkdhi9sl3r4s00")), "kd94hf93k423kf44&pfkkdhi9sl3r4s00");
		assert_eq!(signing_key("a&b", None), "a%26b&");
		assert_eq!(signing_key("s p", Some("")), "s%20p&");
	}

	#[test]
	fn missing_and_empty_token_secret_sign_identically() {
		let without = sign_hmac_sha1("GET&x&y", "secret", None)
			.expect("Signing without a token secret should succeed.");
		let empty = sign_hmac_sha1("GET&x&y", "secret", Some(""))
			.expect("Signing with an empty token secret should succeed.");

		assert_eq!(without, empty);
		assert_ne!(without, sign_hmac_sha1("GET&x&y", "secret", Some("t")).expect("Signing should succeed."));
	}

	#[test]
	fn only_hmac_sha1_parses() {
		assert_eq!("HMAC-SHA1".parse::<SignatureMethod>(), Ok(SignatureMethod::HmacSha1));

		for name in ["hmac-sha1", "RSA-SHA1", "PLAINTEXT", "HMAC-SHA256", ""] {
			assert_eq!(
				name.parse::<SignatureMethod>(),
				Err(SignatureError::UnsupportedMethod { method: name.into() })
			);
		}
	}

	#[test]
	fn method_serializes_with_protocol_name() {
		let payload = serde_json::to_string(&SignatureMethod::HmacSha1)
			.expect("SignatureMethod should serialize to JSON.");

		assert_eq!(payload, "\"HMAC-SHA1\"");
	}
}
