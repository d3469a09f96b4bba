//! Thread-safe in-memory store for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Consumer, ConsumerKey, NonceKey, NonceRecord, TokenKey},
	store::{self, CredentialStore, InsertOutcome, NonceStore, StoreFuture},
};

type ConsumerMap = Arc<RwLock<HashMap<ConsumerKey, Consumer>>>;
type TokenMap = Arc<RwLock<HashMap<TokenKey, AccessToken>>>;
type NonceMap = Arc<RwLock<HashMap<NonceKey, NonceRecord>>>;

/// Keeps consumers, tokens, and nonces in process memory.
///
/// Clones share the same maps.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
	consumers: ConsumerMap,
	tokens: TokenMap,
	nonces: NonceMap,
}
impl MemoryStore {
	fn revoke_consumer_now(
		map: ConsumerMap,
		key: ConsumerKey,
		instant: OffsetDateTime,
	) -> Option<Consumer> {
		let mut guard = map.write();
		let record = guard.get_mut(&key)?;

		record.revoke(instant);

		Some(record.clone())
	}

	fn revoke_token_now(map: TokenMap, token: TokenKey, instant: OffsetDateTime) -> Option<AccessToken> {
		let mut guard = map.write();
		let record = guard.get_mut(&token)?;

		record.revoke(instant);

		Some(record.clone())
	}

	fn insert_nonce_now(map: NonceMap, record: NonceRecord) -> InsertOutcome {
		let mut guard = map.write();

		store::insert_nonce_into(&mut guard, record)
	}

	fn purge_now(map: NonceMap, now: OffsetDateTime) -> usize {
		let mut guard = map.write();

		store::purge_nonces_in(&mut guard, now)
	}
}
impl CredentialStore for MemoryStore {
	fn save_consumer(&self, consumer: Consumer) -> StoreFuture<'_, ()> {
		let map = self.consumers.clone();

		Box::pin(async move {
			map.write().insert(consumer.key.clone(), consumer);

			Ok(())
		})
	}

	fn save_token(&self, token: AccessToken) -> StoreFuture<'_, ()> {
		let map = self.tokens.clone();

		Box::pin(async move {
			map.write().insert(token.token.clone(), token);

			Ok(())
		})
	}

	fn fetch_consumer<'a>(&'a self, key: &'a ConsumerKey) -> StoreFuture<'a, Option<Consumer>> {
		let map = self.consumers.clone();

		Box::pin(async move { Ok(map.read().get(key).cloned()) })
	}

	fn fetch_token<'a>(&'a self, token: &'a TokenKey) -> StoreFuture<'a, Option<AccessToken>> {
		let map = self.tokens.clone();

		Box::pin(async move { Ok(map.read().get(token).cloned()) })
	}

	fn revoke_consumer<'a>(
		&'a self,
		key: &'a ConsumerKey,
		instant: OffsetDateTime,
	) -> StoreFuture<'a, Option<Consumer>> {
		let map = self.consumers.clone();
		let key = key.to_owned();

		Box::pin(async move { Ok(Self::revoke_consumer_now(map, key, instant)) })
	}

	fn revoke_token<'a>(
		&'a self,
		token: &'a TokenKey,
		instant: OffsetDateTime,
	) -> StoreFuture<'a, Option<AccessToken>> {
		let map = self.tokens.clone();
		let token = token.to_owned();

		Box::pin(async move { Ok(Self::revoke_token_now(map, token, instant)) })
	}
}
impl NonceStore for MemoryStore {
	fn insert_if_absent(&self, record: NonceRecord) -> StoreFuture<'_, InsertOutcome> {
		let map = self.nonces.clone();

		Box::pin(async move { Ok(Self::insert_nonce_now(map, record)) })
	}

	fn purge_expired(&self, now: OffsetDateTime) -> StoreFuture<'_, usize> {
		let map = self.nonces.clone();

		Box::pin(async move { Ok(Self::purge_now(map, now)) })
	}

	fn count(&self) -> StoreFuture<'_, usize> {
		let map = self.nonces.clone();

		Box::pin(async move { Ok(map.read().len()) })
	}
}
