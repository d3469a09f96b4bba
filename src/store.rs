//! Storage contracts for credentials and nonces plus the built-in backends.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Consumer, ConsumerKey, NonceKey, NonceRecord, TokenKey},
};

/// Boxed future returned by every store operation.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Lookup and lifecycle of consumer and token records.
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Persists or replaces a consumer record.
	fn save_consumer(&self, consumer: Consumer) -> StoreFuture<'_, ()>;

	/// Persists or replaces a token record.
	fn save_token(&self, token: AccessToken) -> StoreFuture<'_, ()>;

	/// Fetches a consumer by key, revoked or not.
	fn fetch_consumer<'a>(&'a self, key: &'a ConsumerKey) -> StoreFuture<'a, Option<Consumer>>;

	/// Fetches a token by key, revoked or not.
	fn fetch_token<'a>(&'a self, token: &'a TokenKey) -> StoreFuture<'a, Option<AccessToken>>;

	/// Marks a consumer as revoked and returns the updated record.
	fn revoke_consumer<'a>(
		&'a self,
		key: &'a ConsumerKey,
		instant: OffsetDateTime,
	) -> StoreFuture<'a, Option<Consumer>>;

	/// Marks a token as revoked and returns the updated record.
	fn revoke_token<'a>(
		&'a self,
		token: &'a TokenKey,
		instant: OffsetDateTime,
	) -> StoreFuture<'a, Option<AccessToken>>;
}

/// Nonce bookkeeping backing the replay guard.
pub trait NonceStore
where
	Self: Send + Sync,
{
	/// Records the nonce unless a live record for the same triple exists.
	///
	/// Check and insert must be a single atomic step: of two concurrent calls with the same
	/// triple exactly one observes [`InsertOutcome::Inserted`]. A stored record that is expired
	/// at `record.seen_at` counts as absent and is replaced.
	fn insert_if_absent(&self, record: NonceRecord) -> StoreFuture<'_, InsertOutcome>;

	/// Deletes every record expired at `now` and returns how many were removed.
	fn purge_expired(&self, now: OffsetDateTime) -> StoreFuture<'_, usize>;

	/// Number of records currently held, expired ones included.
	fn count(&self) -> StoreFuture<'_, usize>;
}

/// Result of [`NonceStore::insert_if_absent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsertOutcome {
	/// The nonce was new (or its previous record had expired) and is now recorded.
	Inserted,
	/// A live record for the same triple already exists.
	Duplicate,
}

/// Error type produced by store implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Snapshot encoding or decoding failed.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// The storage engine itself failed.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

pub(crate) fn insert_nonce_into(
	nonces: &mut HashMap<NonceKey, NonceRecord>,
	record: NonceRecord,
) -> InsertOutcome {
	let key = record.key();

	match nonces.get(&key) {
		Some(existing) if !existing.is_expired_at(record.seen_at) => InsertOutcome::Duplicate,
		_ => {
			nonces.insert(key, record);

			InsertOutcome::Inserted
		},
	}
}

pub(crate) fn purge_nonces_in(
	nonces: &mut HashMap<NonceKey, NonceRecord>,
	now: OffsetDateTime,
) -> usize {
	let before = nonces.len();

	nonces.retain(|_, record| !record.is_expired_at(now));

	before - nonces.len()
}

#[cfg(test)]
mod tests {
	// std
	use std::error::Error as StdError;
	// crates.io
	use time::macros;
	// self
	use super::*;

	fn record(nonce: &str, seen_at: OffsetDateTime) -> NonceRecord {
		let consumer = ConsumerKey::new("consumer-1").expect("Consumer fixture should be valid.");

		NonceRecord::new(NonceKey::new(consumer, None, nonce), seen_at, seen_at, Duration::seconds(600))
	}

	#[test]
	fn store_error_converts_into_crate_error_with_source() {
		let store_error = StoreError::Backend { message: "disk unavailable".into() };
		let error: Error = store_error.clone().into();

		assert!(matches!(error, Error::Storage(_)));
		assert!(error.to_string().contains("disk unavailable"));
		assert_eq!(error.status_code(), 500);

		let source =
			StdError::source(&error).expect("Crate error should expose the store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}

	#[test]
	fn expired_records_are_replaced_and_purged() {
		let t0 = macros::datetime!(2025-03-01 12:00 UTC);
		let mut nonces = HashMap::new();

		assert_eq!(insert_nonce_into(&mut nonces, record("n-1", t0)), InsertOutcome::Inserted);
		assert_eq!(
			insert_nonce_into(&mut nonces, record("n-1", t0 + Duration::seconds(599))),
			InsertOutcome::Duplicate
		);
		assert_eq!(
			insert_nonce_into(&mut nonces, record("n-1", t0 + Duration::seconds(600))),
			InsertOutcome::Duplicate
		);
		assert_eq!(
			insert_nonce_into(&mut nonces, record("n-1", t0 + Duration::seconds(601))),
			InsertOutcome::Inserted
		);
		assert_eq!(insert_nonce_into(&mut nonces, record("n-2", t0)), InsertOutcome::Inserted);
		assert_eq!(purge_nonces_in(&mut nonces, t0 + Duration::seconds(600)), 0);
		assert_eq!(purge_nonces_in(&mut nonces, t0 + Duration::seconds(601)), 1);
		assert_eq!(nonces.len(), 1);
	}
}
