//! Server-side verification of signed requests.
//!
//! A request moves through the [`VerificationStage`] states in order:
//!
//! 1. `Received → ParamsExtracted`: the protocol parameters are present, single-valued, and
//!    well formed, the signature method is supported, and the URL normalizes.
//! 2. `ParamsExtracted → NonceChecked`: the consumer (and token) resolve to active records, the
//!    timestamp is fresh, and the nonce is recorded.
//! 3. `NonceChecked → SignatureComputed`: the base string is rebuilt and signed with the stored
//!    secrets.
//! 4. `SignatureComputed → Accepted | Rejected`: the signatures are compared in constant time.
//!
//! Every failure is terminal. The nonce is recorded before the signature is checked, so a
//! request rejected for its signature still burns its nonce.

// crates.io
use subtle::ConstantTimeEq;
// self
use crate::{
	_prelude::*,
	auth::{ConsumerKey, Credential, TokenKey},
	config::VerifierConfig,
	error::{ConfigError, Rejection},
	guard::ReplayGuard,
	obs::{self, VerifyOutcome, VerifySpan},
	request::SignedRequest,
	signature::{OAUTH_SIGNATURE, ParamValue, Parameters, SignatureMethod, build_base_string, normalize_url},
	store::{CredentialStore, NonceStore},
};

pub use crate::obs::VerificationStage;

const OAUTH_CONSUMER_KEY: &str = "oauth_consumer_key";
const OAUTH_TOKEN: &str = "oauth_token";
const OAUTH_SIGNATURE_METHOD: &str = "oauth_signature_method";
const OAUTH_TIMESTAMP: &str = "oauth_timestamp";
const OAUTH_NONCE: &str = "oauth_nonce";
const OAUTH_VERSION: &str = "oauth_version";
const SUPPORTED_VERSION: &str = "1.0";

/// Identity of an authenticated request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Verified {
	/// Consumer that signed the request.
	pub consumer_key: ConsumerKey,
	/// Token the request was signed with; `None` for two-legged requests.
	pub token: Option<TokenKey>,
	/// Nonce recorded for the request.
	pub nonce: String,
	/// Client-declared request time.
	pub timestamp: OffsetDateTime,
	/// Method used to sign the request.
	pub signature_method: SignatureMethod,
}

/// Authenticates inbound requests against the injected stores.
#[derive(Clone)]
pub struct Verifier {
	credentials: Arc<dyn CredentialStore>,
	guard: ReplayGuard,
	config: VerifierConfig,
}
impl Verifier {
	/// Validates `config` and wires the stores together.
	pub fn new(
		credentials: Arc<dyn CredentialStore>,
		nonces: Arc<dyn NonceStore>,
		config: VerifierConfig,
	) -> Result<Self, ConfigError> {
		config.validate()?;

		let guard = ReplayGuard::new(nonces, &config);

		Ok(Self { credentials, guard, config })
	}

	/// Active configuration.
	pub fn config(&self) -> &VerifierConfig {
		&self.config
	}

	/// Replay guard shared by every verification.
	pub fn guard(&self) -> &ReplayGuard {
		&self.guard
	}

	/// Verifies `request` against the current system time.
	pub async fn verify(&self, request: &SignedRequest) -> Result<Verified> {
		self.verify_at(request, OffsetDateTime::now_utc()).await
	}

	/// Verifies `request` as if the server clock read `now`.
	///
	/// A due nonce sweep runs after the verdict; its failure is logged and never changes the
	/// verdict.
	pub async fn verify_at(&self, request: &SignedRequest, now: OffsetDateTime) -> Result<Verified> {
		let span = VerifySpan::new(request.method());
		let result = span.instrument(self.evaluate(request, now, &span)).await;

		match &result {
			Ok(_) => {
				span.stage(VerificationStage::Accepted);
				obs::record_verification(VerifyOutcome::Accepted, None);
			},
			Err(Error::Rejected(rejection)) => {
				span.stage(VerificationStage::Rejected);
				obs::log_rejection(rejection, request.params().single(OAUTH_CONSUMER_KEY));
				obs::record_verification(VerifyOutcome::Rejected, Some(rejection));
			},
			Err(_) => {
				span.stage(VerificationStage::Rejected);
				obs::record_verification(VerifyOutcome::Failed, None);
			},
		}

		if let Err(e) = span.instrument(self.guard.maybe_sweep(now)).await {
			obs::log_sweep_failure(&e);
		}

		result
	}

	async fn evaluate(
		&self,
		request: &SignedRequest,
		now: OffsetDateTime,
		span: &VerifySpan,
	) -> Result<Verified> {
		let protocol = ProtocolParams::extract(request.params(), self.config.require_version)?;

		normalize_url(request.url())?;
		span.consumer(&protocol.consumer_key);
		span.stage(VerificationStage::ParamsExtracted);

		let credential = self.resolve_credential(&protocol.consumer_key, protocol.token.as_ref()).await?;

		self.guard
			.check_and_record(
				&protocol.consumer_key,
				protocol.token.as_ref(),
				protocol.nonce,
				protocol.timestamp,
				now,
			)
			.await?;
		span.stage(VerificationStage::NonceChecked);

		let base_string =
			build_base_string(request.method(), request.url(), request.params(), self.config.param_ordering)?;
		let expected = protocol.signature_method.sign(
			&base_string,
			credential.consumer_secret.expose(),
			credential.token_secret(),
		)?;

		span.stage(VerificationStage::SignatureComputed);

		if !signatures_match(&expected, protocol.signature) {
			return Err(Rejection::InvalidSignature.into());
		}

		Ok(Verified {
			consumer_key: protocol.consumer_key,
			token: protocol.token,
			nonce: protocol.nonce.to_owned(),
			timestamp: protocol.timestamp,
			signature_method: protocol.signature_method,
		})
	}

	async fn resolve_credential(
		&self,
		consumer_key: &ConsumerKey,
		token: Option<&TokenKey>,
	) -> Result<Credential> {
		let consumer = self
			.credentials
			.fetch_consumer(consumer_key)
			.await?
			.filter(|consumer| !consumer.is_revoked())
			.ok_or(Rejection::UnknownConsumer)?;
		let token = match token {
			Some(token) => Some(
				self.credentials
					.fetch_token(token)
					.await?
					.filter(|record| record.is_usable_by(consumer_key))
					.ok_or(Rejection::UnknownToken)?,
			),
			None => None,
		};

		Ok(Credential::from_records(&consumer, token.as_ref()))
	}
}
impl Debug for Verifier {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Verifier")
			.field("guard", &self.guard)
			.field("config", &self.config)
			.finish_non_exhaustive()
	}
}

struct ProtocolParams<'a> {
	consumer_key: ConsumerKey,
	token: Option<TokenKey>,
	signature_method: SignatureMethod,
	timestamp: OffsetDateTime,
	nonce: &'a str,
	signature: &'a str,
}
impl<'a> ProtocolParams<'a> {
	fn extract(params: &'a Parameters, require_version: bool) -> Result<Self, Rejection> {
		let consumer_key = required(params, OAUTH_CONSUMER_KEY)?;
		let signature_method = required(params, OAUTH_SIGNATURE_METHOD)?;
		let timestamp = required(params, OAUTH_TIMESTAMP)?;
		let nonce = required(params, OAUTH_NONCE)?;
		let signature = required(params, OAUTH_SIGNATURE)?;
		let signature_method = signature_method.parse::<SignatureMethod>().map_err(|_| {
			Rejection::UnsupportedSignatureMethod { method: signature_method.to_owned() }
		})?;

		match optional(params, OAUTH_VERSION)? {
			Some(SUPPORTED_VERSION) => {},
			Some(version) => return Err(Rejection::UnsupportedVersion { version: version.to_owned() }),
			None if require_version => return Err(Rejection::MissingParameter { name: OAUTH_VERSION }),
			None => {},
		}

		let consumer_key = ConsumerKey::new(consumer_key).map_err(|_| invalid(OAUTH_CONSUMER_KEY))?;
		let token = optional(params, OAUTH_TOKEN)?
			.map(|token| TokenKey::new(token).map_err(|_| invalid(OAUTH_TOKEN)))
			.transpose()?;
		let timestamp = parse_timestamp(timestamp).ok_or_else(|| invalid(OAUTH_TIMESTAMP))?;

		Ok(Self { consumer_key, token, signature_method, timestamp, nonce, signature })
	}
}

fn required<'a>(params: &'a Parameters, name: &'static str) -> Result<&'a str, Rejection> {
	optional(params, name)?.ok_or(Rejection::MissingParameter { name })
}

// Empty values count as absent; repeated protocol parameters are ambiguous and refused.
fn optional<'a>(params: &'a Parameters, name: &'static str) -> Result<Option<&'a str>, Rejection> {
	match params.get(name) {
		None => Ok(None),
		Some(ParamValue::Single(value)) if value.is_empty() => Ok(None),
		Some(ParamValue::Single(value)) => Ok(Some(value)),
		Some(ParamValue::Multi(_)) => Err(invalid(name)),
	}
}

fn invalid(name: &str) -> Rejection {
	Rejection::InvalidParameter { name: name.to_owned() }
}

fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
	if !raw.bytes().all(|b| b.is_ascii_digit()) {
		return None;
	}

	OffsetDateTime::from_unix_timestamp(raw.parse().ok()?).ok()
}

fn signatures_match(expected: &str, supplied: &str) -> bool {
	expected.as_bytes().ct_eq(supplied.as_bytes()).into()
}
