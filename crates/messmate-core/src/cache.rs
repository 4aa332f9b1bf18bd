//! Per-dataset cache in front of a [`DatasetFetcher`].
//!
//! Each dataset gets one slot. A filled slot is served until it expires
//! (never, by default) or [`DatasetCache::reset`] clears it. Failures are
//! absorbed: callers always get a dataset, possibly empty.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::fetch::{DatasetFetcher, FetchError};
use crate::record::DatasetKind;

// ---------------------------------------------------------------------------
// CacheConfig
// ---------------------------------------------------------------------------

/// Invalidation policy for a dataset slot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CacheConfig {
    /// How long a filled slot stays fresh. `None` means it never expires.
    pub ttl: Option<Duration>,
}

// ---------------------------------------------------------------------------
// DatasetCache
// ---------------------------------------------------------------------------

struct Slot<T> {
    records: Arc<Vec<T>>,
    fetched_at: Instant,
}

/// Caches one dataset's records, fetching at most once per miss.
pub struct DatasetCache<T> {
    kind: DatasetKind,
    config: CacheConfig,
    fetcher: Arc<dyn DatasetFetcher>,
    slot: Mutex<Option<Slot<T>>>,
}

impl<T> DatasetCache<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    #[must_use]
    pub fn new(kind: DatasetKind, fetcher: Arc<dyn DatasetFetcher>) -> Self {
        Self::with_config(kind, fetcher, CacheConfig::default())
    }

    #[must_use]
    pub fn with_config(
        kind: DatasetKind,
        fetcher: Arc<dyn DatasetFetcher>,
        config: CacheConfig,
    ) -> Self {
        Self {
            kind,
            config,
            fetcher,
            slot: Mutex::new(None),
        }
    }

    /// Records for this dataset, fetching on a cold or expired slot.
    ///
    /// The slot lock is held across the fetch, so concurrent callers
    /// coalesce into a single request and then share the filled slot. On
    /// any fetch failure the slot stays empty and an empty dataset is
    /// returned; the next call retries.
    pub async fn get(&self) -> Arc<Vec<T>> {
        let mut slot = self.slot.lock().await;
        if let Some(filled) = slot.as_ref() {
            if self.is_fresh(filled.fetched_at) {
                return Arc::clone(&filled.records);
            }
        }

        match self.fetch_records().await {
            Ok(records) => {
                let records = Arc::new(records);
                debug!(dataset = %self.kind, records = records.len(), "dataset fetched");
                *slot = Some(Slot {
                    records: Arc::clone(&records),
                    fetched_at: Instant::now(),
                });
                records
            }
            Err(err) => {
                warn!(dataset = %self.kind, error = %err, "dataset fetch failed; serving empty result");
                *slot = None;
                Arc::new(Vec::new())
            }
        }
    }

    /// Drop any cached records so the next [`DatasetCache::get`] refetches.
    pub async fn reset(&self) {
        let mut slot = self.slot.lock().await;
        *slot = None;
    }

    async fn fetch_records(&self) -> Result<Vec<T>, FetchError> {
        let payload = self.fetcher.fetch(self.kind).await?;

        // Endpoint failures arrive in-band as an `error` field on an
        // object payload.
        if let Some(error) = payload.get("error").filter(|value| !value.is_null()) {
            return Err(FetchError::Endpoint {
                kind: self.kind,
                message: error_message(error),
            });
        }

        if !payload.is_array() {
            return Err(FetchError::Shape {
                kind: self.kind,
                message: "expected an array of records".to_string(),
            });
        }

        serde_json::from_value(payload).map_err(|err| FetchError::Shape {
            kind: self.kind,
            message: err.to_string(),
        })
    }

    fn is_fresh(&self, fetched_at: Instant) -> bool {
        match self.config.ttl {
            Some(ttl) => fetched_at.elapsed() < ttl,
            None => true,
        }
    }
}

fn error_message(error: &serde_json::Value) -> String {
    match error.as_str() {
        Some(text) => text.to_string(),
        None => error.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
