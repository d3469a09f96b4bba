//! Nonce bookkeeping records used by the replay guard.

// self
use crate::{
	_prelude::*,
	auth::{ConsumerKey, TokenKey},
};

/// Uniqueness key: a nonce is scoped to the consumer and token that sent it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonceKey {
	/// Consumer that sent the nonce.
	pub consumer_key: ConsumerKey,
	/// Token the request was signed with, if any.
	pub token: Option<TokenKey>,
	/// Nonce value as received.
	pub nonce: String,
}
impl NonceKey {
	/// Builds a key from its parts.
	pub fn new(consumer_key: ConsumerKey, token: Option<TokenKey>, nonce: impl Into<String>) -> Self {
		Self { consumer_key, token, nonce: nonce.into() }
	}
}

/// One accepted nonce.
///
/// A record is live through `expires_at` inclusive; after that the same triple may be recorded
/// again and the record is eligible for the batch sweep.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonceRecord {
	/// Consumer that sent the nonce.
	pub consumer_key: ConsumerKey,
	/// Token the request was signed with, if any.
	pub token: Option<TokenKey>,
	/// Nonce value as received.
	pub nonce: String,
	/// Client-declared request time.
	pub timestamp: OffsetDateTime,
	/// Instant the verifier accepted the nonce.
	pub seen_at: OffsetDateTime,
	/// `max(timestamp, seen_at) + window`.
	pub expires_at: OffsetDateTime,
}
impl NonceRecord {
	/// Creates a record that stays live for `window` past the later of `timestamp` and
	/// `seen_at`.
	///
	/// A timestamp anywhere inside the window can never be accepted again before the record
	/// expires, so replays stay rejected for as long as they would pass the freshness check.
	/// The expiry saturates at the largest representable instant.
	pub fn new(key: NonceKey, timestamp: OffsetDateTime, seen_at: OffsetDateTime, window: Duration) -> Self {
		let expires_at = timestamp.max(seen_at).saturating_add(window);

		Self {
			consumer_key: key.consumer_key,
			token: key.token,
			nonce: key.nonce,
			timestamp,
			seen_at,
			expires_at,
		}
	}

	/// Uniqueness key for this record.
	pub fn key(&self) -> NonceKey {
		NonceKey::new(self.consumer_key.clone(), self.token.clone(), self.nonce.clone())
	}

	/// Returns `true` once the record no longer blocks its triple.
	///
	/// At `expires_at` itself the record is still live: the freshness check is inclusive, so
	/// a timestamp sitting exactly on the window edge must still meet its record.
	pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
		self.expires_at < now
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	fn key() -> NonceKey {
		NonceKey::new(
			ConsumerKey::new("dpf43f3p2l4k3l03").expect("Consumer key fixture should be valid."),
			None,
			"kllo9940pd9333jh",
		)
	}

	#[test]
	fn expiry_tracks_the_later_instant() {
		let seen_at = macros::datetime!(2025-03-01 12:00 UTC);
		let window = Duration::seconds(600);
		let past = NonceRecord::new(key(), seen_at - Duration::seconds(120), seen_at, window);
		let future = NonceRecord::new(key(), seen_at + Duration::seconds(120), seen_at, window);

		assert_eq!(past.expires_at, macros::datetime!(2025-03-01 12:10 UTC));
		assert_eq!(future.expires_at, macros::datetime!(2025-03-01 12:12 UTC));
	}

	#[test]
	fn record_stays_live_through_its_expiry_instant() {
		let seen_at = macros::datetime!(2025-03-01 12:00 UTC);
		let record = NonceRecord::new(key(), seen_at, seen_at, Duration::seconds(600));

		assert!(!record.is_expired_at(macros::datetime!(2025-03-01 12:09:59 UTC)));
		assert!(!record.is_expired_at(macros::datetime!(2025-03-01 12:10 UTC)));
		assert!(record.is_expired_at(macros::datetime!(2025-03-01 12:10:01 UTC)));
		assert_eq!(record.key(), key());
	}

	#[test]
	fn oversized_windows_saturate_instead_of_overflowing() {
		let seen_at = macros::datetime!(2025-03-01 12:00 UTC);
		let record = NonceRecord::new(key(), seen_at, seen_at, Duration::seconds(i64::MAX));

		assert!(record.expires_at > seen_at);
		assert!(!record.is_expired_at(seen_at + Duration::days(365)));
	}
}
