//! Consumer and token records plus the resolved signing credential.

// self
use crate::{
	_prelude::*,
	auth::{ConsumerKey, Secret, TokenKey},
};

/// Registered third-party application.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consumer {
	/// Public consumer key.
	pub key: ConsumerKey,
	/// Shared consumer secret.
	pub secret: Secret,
	/// Revocation instant; a revoked consumer is treated as unknown.
	pub revoked_at: Option<OffsetDateTime>,
}
impl Consumer {
	/// Creates an active consumer.
	pub fn new(key: ConsumerKey, secret: impl Into<String>) -> Self {
		Self { key, secret: Secret::new(secret), revoked_at: None }
	}

	/// Returns `true` once the consumer has been revoked.
	pub fn is_revoked(&self) -> bool {
		self.revoked_at.is_some()
	}

	/// Marks the consumer as revoked.
	pub fn revoke(&mut self, instant: OffsetDateTime) {
		self.revoked_at = Some(instant);
	}
}

/// Token issued to a consumer after the authorization handshake.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
	/// Consumer the token was issued to.
	pub consumer: ConsumerKey,
	/// Public token key.
	pub token: TokenKey,
	/// Token secret.
	pub secret: Secret,
	/// Revocation instant; a revoked token is treated as unknown.
	pub revoked_at: Option<OffsetDateTime>,
}
impl AccessToken {
	/// Creates an active token for `consumer`.
	pub fn new(consumer: ConsumerKey, token: TokenKey, secret: impl Into<String>) -> Self {
		Self { consumer, token, secret: Secret::new(secret), revoked_at: None }
	}

	/// Returns `true` once the token has been revoked.
	pub fn is_revoked(&self) -> bool {
		self.revoked_at.is_some()
	}

	/// Returns `true` if the token is active and was issued to `consumer`.
	pub fn is_usable_by(&self, consumer: &ConsumerKey) -> bool {
		!self.is_revoked() && &self.consumer == consumer
	}

	/// Marks the token as revoked.
	pub fn revoke(&mut self, instant: OffsetDateTime) {
		self.revoked_at = Some(instant);
	}
}

/// Signing material for one request: consumer secret plus an optional token pair.
///
/// Two-legged requests carry no token and sign with an empty token secret.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credential {
	/// Consumer key sent as `oauth_consumer_key`.
	pub consumer_key: ConsumerKey,
	/// Consumer secret, first half of the signing key.
	pub consumer_secret: Secret,
	/// Token key sent as `oauth_token`.
	pub token: Option<TokenKey>,
	/// Token secret, second half of the signing key.
	pub token_secret: Option<Secret>,
}
impl Credential {
	/// Consumer-only credential for two-legged requests.
	pub fn consumer(key: ConsumerKey, secret: impl Into<String>) -> Self {
		Self { consumer_key: key, consumer_secret: Secret::new(secret), token: None, token_secret: None }
	}

	/// Attaches a token pair.
	pub fn with_token(mut self, token: TokenKey, secret: impl Into<String>) -> Self {
		self.token = Some(token);
		self.token_secret = Some(Secret::new(secret));

		self
	}

	/// Assembles the credential from stored records.
	pub fn from_records(consumer: &Consumer, token: Option<&AccessToken>) -> Self {
		Self {
			consumer_key: consumer.key.clone(),
			consumer_secret: consumer.secret.clone(),
			token: token.map(|record| record.token.clone()),
			token_secret: token.map(|record| record.secret.clone()),
		}
	}

	/// Token secret as a plain string slice, if any.
	pub fn token_secret(&self) -> Option<&str> {
		self.token_secret.as_ref().map(Secret::expose)
	}
}
