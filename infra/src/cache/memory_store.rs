//! In-memory OTP store
//!
//! A `HashMap` keyed by normalized phone number behind a mutex. Each trait
//! method takes the lock once, so lookup-then-mutate sequences (attempt
//! counting, consume on success) cannot interleave for the same phone.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use pv_core::domain::entities::otp_record::{AttemptOutcome, OtpRecord};
use pv_core::services::otp::OtpStore;

/// Default maximum number of live records
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

/// Process-local OTP store with an entry cap
pub struct InMemoryOtpStore {
    records: Mutex<HashMap<String, OtpRecord>>,
    max_entries: usize,
}

impl InMemoryOtpStore {
    /// Create a store holding at most `max_entries` records
    pub fn new(max_entries: usize) -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            max_entries: max_entries.max(1),
        }
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, OtpRecord>>, String> {
        self.records
            .lock()
            .map_err(|_| "OTP store lock poisoned".to_string())
    }

    /// Make room for one new record
    ///
    /// Expired records go first; if the store is still full, the record
    /// closest to expiry is evicted.
    fn make_room(&self, records: &mut HashMap<String, OtpRecord>, now: DateTime<Utc>) {
        let before = records.len();
        records.retain(|_, record| !record.is_expired(now));
        let purged = before - records.len();
        if purged > 0 {
            debug!(purged, "Purged expired OTP records to make room");
        }

        while records.len() >= self.max_entries {
            let victim = records
                .iter()
                .min_by_key(|(_, record)| record.expires_at)
                .map(|(phone, _)| phone.clone());

            match victim {
                Some(phone) => {
                    records.remove(&phone);
                    warn!(
                        max_entries = self.max_entries,
                        event = "otp_store_eviction",
                        "OTP store full, evicted the record closest to expiry"
                    );
                }
                None => break,
            }
        }
    }
}

impl Default for InMemoryOtpStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

#[async_trait]
impl OtpStore for InMemoryOtpStore {
    async fn put(&self, record: OtpRecord) -> Result<(), String> {
        let mut records = self.lock()?;

        if !records.contains_key(&record.phone) && records.len() >= self.max_entries {
            self.make_room(&mut records, record.created_at);
        }

        records.insert(record.phone.clone(), record);
        Ok(())
    }

    async fn attempt(
        &self,
        phone: &str,
        submitted: &str,
        now: DateTime<Utc>,
        max_attempts: u32,
    ) -> Result<AttemptOutcome, String> {
        let mut records = self.lock()?;

        let outcome = match records.get_mut(phone) {
            Some(record) => record.register_attempt(submitted, now, max_attempts),
            None => return Ok(AttemptOutcome::NotFound),
        };

        if outcome.is_terminal() {
            records.remove(phone);
        }

        Ok(outcome)
    }

    async fn get(&self, phone: &str) -> Result<Option<OtpRecord>, String> {
        Ok(self.lock()?.get(phone).cloned())
    }

    async fn remove(&self, phone: &str) -> Result<bool, String> {
        Ok(self.lock()?.remove(phone).is_some())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, String> {
        let mut records = self.lock()?;
        let before = records.len();
        records.retain(|_, record| !record.is_expired(now));
        Ok(before - records.len())
    }

    async fn len(&self) -> Result<usize, String> {
        Ok(self.lock()?.len())
    }
}
