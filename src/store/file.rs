//! JSON-file store for single-node deployments.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Consumer, ConsumerKey, NonceKey, NonceRecord, TokenKey},
	store::{self, CredentialStore, InsertOutcome, NonceStore, StoreError, StoreFuture},
};

#[derive(Debug, Default)]
struct Tables {
	consumers: HashMap<ConsumerKey, Consumer>,
	tokens: HashMap<TokenKey, AccessToken>,
	nonces: HashMap<NonceKey, NonceRecord>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct Snapshot {
	consumers: Vec<Consumer>,
	tokens: Vec<AccessToken>,
	nonces: Vec<NonceRecord>,
}
impl From<Snapshot> for Tables {
	fn from(snapshot: Snapshot) -> Self {
		Self {
			consumers: snapshot.consumers.into_iter().map(|c| (c.key.clone(), c)).collect(),
			tokens: snapshot.tokens.into_iter().map(|t| (t.token.clone(), t)).collect(),
			nonces: snapshot.nonces.into_iter().map(|n| (n.key(), n)).collect(),
		}
	}
}

/// Rewrites a JSON snapshot of every record after each mutation.
///
/// The snapshot is written to a sibling `.tmp` file and renamed over the original, so a crash
/// leaves either the old or the new snapshot on disk.
#[derive(Clone, Debug)]
pub struct FileStore {
	path: PathBuf,
	inner: Arc<RwLock<Tables>>,
}
impl FileStore {
	/// Opens (or creates) a store at `path`, loading any existing snapshot.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let tables = Self::load_snapshot(&path)?.into();

		Ok(Self { path, inner: Arc::new(RwLock::new(tables)) })
	}

	/// Location of the snapshot file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn load_snapshot(path: &Path) -> Result<Snapshot, StoreError> {
		if !path.exists() {
			return Ok(Snapshot::default());
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		if bytes.is_empty() {
			return Ok(Snapshot::default());
		}

		serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization {
			message: format!("Failed to parse {}: {e}", path.display()),
		})
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	fn persist_locked(&self, tables: &Tables) -> Result<(), StoreError> {
		let snapshot = Snapshot {
			consumers: tables.consumers.values().cloned().collect(),
			tokens: tables.tokens.values().cloned().collect(),
			nonces: tables.nonces.values().cloned().collect(),
		};
		let serialized =
			serde_json::to_vec_pretty(&snapshot).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize store snapshot: {e}"),
			})?;
		let tmp_path = self.path.with_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl CredentialStore for FileStore {
	fn save_consumer(&self, consumer: Consumer) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			let mut guard = self.inner.write();

			guard.consumers.insert(consumer.key.clone(), consumer);
			self.persist_locked(&guard)
		})
	}

	fn save_token(&self, token: AccessToken) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			let mut guard = self.inner.write();

			guard.tokens.insert(token.token.clone(), token);
			self.persist_locked(&guard)
		})
	}

	fn fetch_consumer<'a>(&'a self, key: &'a ConsumerKey) -> StoreFuture<'a, Option<Consumer>> {
		Box::pin(async move { Ok(self.inner.read().consumers.get(key).cloned()) })
	}

	fn fetch_token<'a>(&'a self, token: &'a TokenKey) -> StoreFuture<'a, Option<AccessToken>> {
		Box::pin(async move { Ok(self.inner.read().tokens.get(token).cloned()) })
	}

	fn revoke_consumer<'a>(
		&'a self,
		key: &'a ConsumerKey,
		instant: OffsetDateTime,
	) -> StoreFuture<'a, Option<Consumer>> {
		Box::pin(async move {
			let mut guard = self.inner.write();
			let Some(record) = guard.consumers.get_mut(key) else {
				return Ok(None);
			};

			record.revoke(instant);

			let revoked = record.clone();

			self.persist_locked(&guard)?;

			Ok(Some(revoked))
		})
	}

	fn revoke_token<'a>(
		&'a self,
		token: &'a TokenKey,
		instant: OffsetDateTime,
	) -> StoreFuture<'a, Option<AccessToken>> {
		Box::pin(async move {
			let mut guard = self.inner.write();
			let Some(record) = guard.tokens.get_mut(token) else {
				return Ok(None);
			};

			record.revoke(instant);

			let revoked = record.clone();

			self.persist_locked(&guard)?;

			Ok(Some(revoked))
		})
	}
}
impl NonceStore for FileStore {
	fn insert_if_absent(&self, record: NonceRecord) -> StoreFuture<'_, InsertOutcome> {
		Box::pin(async move {
			let mut guard = self.inner.write();
			let outcome = store::insert_nonce_into(&mut guard.nonces, record);

			if outcome == InsertOutcome::Inserted {
				self.persist_locked(&guard)?;
			}

			Ok(outcome)
		})
	}

	fn purge_expired(&self, now: OffsetDateTime) -> StoreFuture<'_, usize> {
		Box::pin(async move {
			let mut guard = self.inner.write();
			let purged = store::purge_nonces_in(&mut guard.nonces, now);

			if purged > 0 {
				self.persist_locked(&guard)?;
			}

			Ok(purged)
		})
	}

	fn count(&self) -> StoreFuture<'_, usize> {
		Box::pin(async move { Ok(self.inner.read().nonces.len()) })
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::{env, process};
	// crates.io
	use time::macros;
	use tokio::runtime::Runtime;
	// self
	use super::*;

	fn temp_path(label: &str) -> PathBuf {
		let unique = format!(
			"oauth1_gate_file_store_{label}_{}_{}.json",
			process::id(),
			OffsetDateTime::now_utc().unix_timestamp_nanos(),
		);

		env::temp_dir().join(unique)
	}

	fn consumer_key() -> ConsumerKey {
		ConsumerKey::new("dpf43f3p2l4k3l03").expect("Consumer key fixture should be valid.")
	}

	fn token_key() -> TokenKey {
		TokenKey::new("nnch734d00sl2jdk").expect("Token key fixture should be valid.")
	}

	#[test]
	fn records_survive_reopen() {
		let path = temp_path("reopen");
		let store = FileStore::open(&path).expect("Failed to open file store snapshot.");
		let rt = Runtime::new().expect("Failed to build Tokio runtime for file store test.");
		let seen_at = macros::datetime!(2025-03-01 12:00 UTC);
		let nonce = NonceRecord::new(
			NonceKey::new(consumer_key(), Some(token_key()), "kllo9940pd9333jh"),
			seen_at,
			seen_at,
			Duration::seconds(600),
		);

		rt.block_on(store.save_consumer(Consumer::new(consumer_key(), "kd94hf93k423kf44")))
			.expect("Failed to save consumer fixture.");
		rt.block_on(store.save_token(AccessToken::new(consumer_key(), token_key(), "pfkkdhi9sl3r4s00")))
			.expect("Failed to save token fixture.");
		rt.block_on(store.insert_if_absent(nonce.clone())).expect("Failed to record nonce fixture.");
		rt.block_on(store.revoke_token(&token_key(), seen_at)).expect("Failed to revoke token fixture.");
		drop(store);

		let reopened = FileStore::open(&path).expect("Failed to reopen file store snapshot.");
		let consumer = rt
			.block_on(reopened.fetch_consumer(&consumer_key()))
			.expect("Failed to fetch consumer from file store.")
			.expect("File store lost consumer after reopen.");
		let token = rt
			.block_on(reopened.fetch_token(&token_key()))
			.expect("Failed to fetch token from file store.")
			.expect("File store lost token after reopen.");

		assert_eq!(consumer.secret.expose(), "kd94hf93k423kf44");
		assert_eq!(token.revoked_at, Some(seen_at));
		assert_eq!(
			rt.block_on(reopened.insert_if_absent(nonce)).expect("Nonce insert should not fail."),
			InsertOutcome::Duplicate
		);
		assert_eq!(rt.block_on(reopened.count()).expect("Nonce count should not fail."), 1);

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary file store snapshot {}: {e}", path.display())
		});
	}

	#[test]
	fn purge_rewrites_the_snapshot() {
		let path = temp_path("purge");
		let store = FileStore::open(&path).expect("Failed to open file store snapshot.");
		let rt = Runtime::new().expect("Failed to build Tokio runtime for file store test.");
		let seen_at = macros::datetime!(2025-03-01 12:00 UTC);

		for nonce in ["n-1", "n-2"] {
			let record = NonceRecord::new(
				NonceKey::new(consumer_key(), None, nonce),
				seen_at,
				seen_at,
				Duration::seconds(60),
			);

			rt.block_on(store.insert_if_absent(record)).expect("Failed to record nonce fixture.");
		}

		let purged = rt
			.block_on(store.purge_expired(seen_at + Duration::minutes(5)))
			.expect("Purge should not fail.");

		assert_eq!(purged, 2);
		drop(store);

		let reopened = FileStore::open(&path).expect("Failed to reopen file store snapshot.");

		assert_eq!(rt.block_on(reopened.count()).expect("Nonce count should not fail."), 0);

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary file store snapshot {}: {e}", path.display())
		});
	}

	#[test]
	fn corrupt_snapshot_is_a_serialization_error() {
		let path = temp_path("corrupt");

		fs::write(&path, b"{ not json").expect("Failed to write corrupt snapshot fixture.");

		let err = FileStore::open(&path).expect_err("Corrupt snapshot must not open.");

		assert!(matches!(err, StoreError::Serialization { .. }));

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary file store snapshot {}: {e}", path.display())
		});
	}
}
