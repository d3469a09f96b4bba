//! Signature base string (RFC 5849 section 3.4.1).

// self
use crate::{
	encoding,
	signature::{OAUTH_SIGNATURE, ParamOrdering, Parameters, SignatureError, normalize_url, params},
};

/// Builds `METHOD&encode(normalized URL)&encode(normalized parameters)`.
///
/// The method is uppercased and any `oauth_signature` entry in `params` is left out, so a
/// verifier can pass the inbound parameters untouched.
pub fn build_base_string(
	method: &str,
	url: &str,
	params: &Parameters,
	ordering: ParamOrdering,
) -> Result<String, SignatureError> {
	let normalized_url = normalize_url(url)?;
	let normalized_params =
		params::normalize_pairs(params.pairs().filter(|(key, _)| *key != OAUTH_SIGNATURE), ordering);

	Ok(format!(
		"{}&{}&{}",
		encoding::encode(&method.to_ascii_uppercase()),
		encoding::encode(&normalized_url),
		encoding::encode(&normalized_params)
	))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn photo_params() -> Parameters {
		[
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
		.collect()
	}

	#[test]
	fn builds_the_reference_base_string() {
		let base = build_base_string(
			"get",
			"http://photos.example.net/photos",
			&photo_params(),
			ParamOrdering::Natural,
		)
		.expect("Reference request should produce a base string.");

		assert_eq!(
			base,
			"GET&http%3A%2F%2Fphotos.example.net%2Fphotos&file%3Dvacation.jpg%26\
			 oauth_consumer_key%3Ddpf43f3p2l4k3l03%26oauth_nonce%3Dkllo9940pd9333jh%26\
			 oauth_signature_method%3DHMAC-SHA1%26oauth_timestamp%3D1191242096%26\
			 oauth_token%3Dnnch734d00sl2jdk%26oauth_version%3D1.0%26size%3Doriginal"
		);
	}

	#[test]
	fn signature_parameter_never_enters_the_base_string() {
		let mut params = photo_params();

		params.insert(OAUTH_SIGNATURE, "tR3+Ty81lMeYAr/Fid0kMTYa/WM=");

		let with_signature =
			build_base_string("GET", "http://photos.example.net/photos", &params, ParamOrdering::Byte)
				.expect("Base string with a signature entry should build.");
		let without_signature = build_base_string(
			"GET",
			"http://photos.example.net/photos",
			&photo_params(),
			ParamOrdering::Byte,
		)
		.expect("Base string without a signature entry should build.");

		assert_eq!(with_signature, without_signature);
		assert!(!with_signature.contains("oauth_signature%3D"));
	}

	#[test]
	fn invalid_urls_surface_as_errors() {
		let err = build_base_string("GET", "not a url", &photo_params(), ParamOrdering::Natural)
			.expect_err("A relative URL must not produce a base string.");

		assert!(matches!(err, SignatureError::InvalidUrl { .. }));
	}
}
