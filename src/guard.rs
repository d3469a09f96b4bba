//! Nonce/timestamp replay protection.

// self
use crate::{
	_prelude::*,
	auth::{ConsumerKey, NonceKey, NonceRecord, TokenKey},
	config::VerifierConfig,
	error::Rejection,
	obs,
	store::{InsertOutcome, NonceStore},
};

/// Rejects stale timestamps and reused nonces, recording every accepted nonce.
///
/// Expired records are removed in batches: [`ReplayGuard::maybe_sweep`] purges at most once
/// per sweep interval, so the store stays bounded without per-request deletes.
#[derive(Clone)]
pub struct ReplayGuard {
	nonces: Arc<dyn NonceStore>,
	window: Duration,
	sweep_interval: Duration,
	last_sweep: Arc<Mutex<Option<OffsetDateTime>>>,
}
impl ReplayGuard {
	/// Builds a guard over `nonces` using the window and sweep interval from `config`.
	pub fn new(nonces: Arc<dyn NonceStore>, config: &VerifierConfig) -> Self {
		Self {
			nonces,
			window: config.freshness_window(),
			sweep_interval: config.sweep_interval(),
			last_sweep: Default::default(),
		}
	}

	/// Accepted clock skew in either direction.
	pub fn window(&self) -> Duration {
		self.window
	}

	/// Returns `true` when `timestamp` lies within `[now - window, now + window]`.
	pub fn is_fresh(&self, timestamp: OffsetDateTime, now: OffsetDateTime) -> bool {
		(now - timestamp).abs() <= self.window
	}

	/// Checks freshness, then atomically records the nonce.
	///
	/// Fails with [`Rejection::StaleTimestamp`] outside the window and with
	/// [`Rejection::ReplayedNonce`] when the triple already has a live record.
	pub async fn check_and_record(
		&self,
		consumer_key: &ConsumerKey,
		token: Option<&TokenKey>,
		nonce: &str,
		timestamp: OffsetDateTime,
		now: OffsetDateTime,
	) -> Result<NonceRecord> {
		if !self.is_fresh(timestamp, now) {
			return Err(Rejection::StaleTimestamp.into());
		}

		let key = NonceKey::new(consumer_key.clone(), token.cloned(), nonce);
		let record = NonceRecord::new(key, timestamp, now, self.window);

		match self.nonces.insert_if_absent(record.clone()).await? {
			InsertOutcome::Inserted => Ok(record),
			InsertOutcome::Duplicate => Err(Rejection::ReplayedNonce.into()),
		}
	}

	/// Purges every record expired at `now`.
	pub async fn sweep(&self, now: OffsetDateTime) -> Result<usize> {
		let purged = self.nonces.purge_expired(now).await?;

		*self.last_sweep.lock() = Some(now);
		obs::record_nonce_sweep(purged);

		Ok(purged)
	}

	/// Runs [`ReplayGuard::sweep`] if the sweep interval has elapsed since the last one.
	///
	/// Returns `None` when no sweep was due. Concurrent callers race for the slot; only one
	/// of them sweeps.
	pub async fn maybe_sweep(&self, now: OffsetDateTime) -> Result<Option<usize>> {
		if !self.claim_sweep(now) {
			return Ok(None);
		}

		self.sweep(now).await.map(Some)
	}

	fn claim_sweep(&self, now: OffsetDateTime) -> bool {
		let mut last = self.last_sweep.lock();

		match *last {
			Some(previous) if now - previous < self.sweep_interval => false,
			_ => {
				*last = Some(now);

				true
			},
		}
	}
}
impl Debug for ReplayGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ReplayGuard")
			.field("window", &self.window)
			.field("sweep_interval", &self.sweep_interval)
			.field("last_sweep", &*self.last_sweep.lock())
			.finish_non_exhaustive()
	}
}
