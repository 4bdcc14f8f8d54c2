// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Read-through, per-zone lazy DNS record cache.
//!
//! [`DnsRecordCache`] maps `(zone_id, record_id)` to a previously fetched
//! [`DnsRecord`]. The first lookup that touches a zone lists the whole zone
//! through a caller-supplied fetch function; every later lookup for that zone
//! is answered from memory.
//!
//! # Locking
//!
//! One mutex guards all zones and the counters. The fetch runs while that lock
//! is held, so a slow cold zone blocks lookups for every other zone, but a zone
//! is never fetched twice concurrently.
//!
//! # Fetch failures
//!
//! A failed fetch is logged and swallowed. Under the default
//! [`FetchFailurePolicy::CacheEmpty`] the zone stays marked initialized with no
//! records, so every later lookup in it misses without calling the provider
//! again. [`FetchFailurePolicy::Retry`] forgets the zone instead.
//!
//! # Example
//!
//! ```rust
//! use zonecache::cache::DnsRecordCache;
//! use zonecache::record::DnsRecord;
//!
//! let cache = DnsRecordCache::new();
//! let fetch = |zone_id: &str| -> Result<Vec<DnsRecord>, String> {
//!     Ok(vec![DnsRecord::new("record-0", zone_id, "A", "www.example.com", "192.0.2.1")])
//! };
//!
//! let record = cache.lookup("zone-A", "record-0", fetch);
//! assert_eq!(record.map(|r| r.content), Some("192.0.2.1".to_string()));
//! assert!(cache.lookup("zone-A", "record-9", fetch).is_none());
//! assert_eq!(cache.stats().requests, 2);
//! ```

use crate::config::{CacheConfig, FetchFailurePolicy};
use crate::metrics;
use crate::record::DnsRecord;
use std::collections::HashMap;
use std::fmt::Display;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Records of one zone, keyed by record id.
pub type ZoneRecordMap = HashMap<String, DnsRecord>;

/// Lookup counters.
///
/// `requests` counts every lookup; `cache_hits` counts lookups that found a record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub requests: u64,
    pub cache_hits: u64,
}

impl CacheStats {
    /// Lookups that did not find a record.
    #[must_use]
    pub fn misses(&self) -> u64 {
        self.requests - self.cache_hits
    }

    /// Fraction of lookups that found a record, `0.0` before the first lookup.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_ratio(&self) -> f64 {
        if self.requests == 0 {
            0.0
        } else {
            self.cache_hits as f64 / self.requests as f64
        }
    }
}

#[derive(Debug, Default)]
struct CacheState {
    zones: HashMap<String, ZoneRecordMap>,
    stats: CacheStats,
}

/// Per-zone lazy record cache. See the [module docs](self).
///
/// The cache is `Send + Sync`; share one instance through an `Arc`.
#[derive(Debug, Default)]
pub struct DnsRecordCache {
    config: CacheConfig,
    state: Mutex<CacheState>,
}

impl DnsRecordCache {
    /// Create an empty cache with the default fetch-failure policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty cache with an explicit configuration.
    #[must_use]
    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            config,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// The configuration this cache was built with.
    #[must_use]
    pub fn config(&self) -> CacheConfig {
        self.config
    }

    /// Look up `record_id` in `zone_id`, listing the zone through `fetch` on first access.
    ///
    /// `fetch` is only called when the zone has not been initialized yet. It must
    /// return every record currently in the zone; records are keyed by their own
    /// `id`, and a later duplicate replaces an earlier one. A fetch error is logged
    /// and never returned: it shows up as `None` here and on later lookups.
    ///
    /// Returns a clone of the cached record, or `None` if the zone has no record
    /// with that id.
    pub fn lookup<F, E>(&self, zone_id: &str, record_id: &str, fetch: F) -> Option<DnsRecord>
    where
        F: FnOnce(&str) -> Result<Vec<DnsRecord>, E>,
        E: Display,
    {
        let mut guard = self.lock();
        let state = &mut *guard;

        let fetch_failed = Self::ensure_zone_initialized(
            &mut state.zones,
            zone_id,
            self.config.fetch_failure_policy,
            fetch,
        );

        let record = state
            .zones
            .get(zone_id)
            .and_then(|records| records.get(record_id))
            .cloned();

        if fetch_failed && self.config.fetch_failure_policy == FetchFailurePolicy::Retry {
            state.zones.remove(zone_id);
            metrics::record_zones_released(1);
            debug!(zone_id = %zone_id, "Forgot failed zone so the next lookup fetches it again");
        }

        let found = record.is_some();
        state.stats.requests += 1;
        if found {
            state.stats.cache_hits += 1;
        }
        metrics::record_lookup(found);

        debug!(
            zone_id = %zone_id,
            record_id = %record_id,
            found = found,
            requests = state.stats.requests,
            cache_hits = state.stats.cache_hits,
            "Record lookup"
        );

        record
    }

    /// Current lookup counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.lock().stats
    }

    /// Number of zones marked initialized.
    #[must_use]
    pub fn cached_zone_count(&self) -> usize {
        self.lock().zones.len()
    }

    /// Returns `true` if `zone_id` has been initialized, whether or not its fetch succeeded.
    #[must_use]
    pub fn is_zone_cached(&self, zone_id: &str) -> bool {
        self.lock().zones.contains_key(zone_id)
    }

    // A fetch that panicked poisons the mutex. The zone is either empty or,
    // under the retry policy, already forgotten, so the state is consistent.
    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns `true` if this call fetched the zone and the fetch failed.
    ///
    /// A panicking fetch is re-raised. Under [`FetchFailurePolicy::Retry`] the
    /// zone is forgotten first, so the next lookup fetches it again.
    fn ensure_zone_initialized<F, E>(
        zones: &mut HashMap<String, ZoneRecordMap>,
        zone_id: &str,
        policy: FetchFailurePolicy,
        fetch: F,
    ) -> bool
    where
        F: FnOnce(&str) -> Result<Vec<DnsRecord>, E>,
        E: Display,
    {
        if zones.contains_key(zone_id) {
            debug!(zone_id = %zone_id, "DNS zone already cached");
            return false;
        }

        warn!(zone_id = %zone_id, "DNS zone not found in cache, fetching all records");

        zones.insert(zone_id.to_string(), ZoneRecordMap::new());
        metrics::record_zone_cached();

        let start = Instant::now();
        let fetched = match panic::catch_unwind(AssertUnwindSafe(|| fetch(zone_id))) {
            Ok(fetched) => fetched,
            Err(payload) => {
                metrics::record_zone_fetch_error(start.elapsed());
                if policy == FetchFailurePolicy::Retry {
                    zones.remove(zone_id);
                    metrics::record_zones_released(1);
                }
                error!(zone_id = %zone_id, "Fetch panicked while listing DNS zone");
                panic::resume_unwind(payload);
            }
        };
        let elapsed = start.elapsed();

        match fetched {
            Ok(records) => {
                metrics::record_zone_fetch_success(elapsed);
                info!(
                    zone_id = %zone_id,
                    records = records.len(),
                    elapsed = ?elapsed,
                    "Fetched all records in DNS zone"
                );

                let zone = zones.entry(zone_id.to_string()).or_default();
                for record in records {
                    zone.insert(record.id.clone(), record);
                }

                info!(zone_id = %zone_id, cached = zone.len(), "DNS zone cache initialized");
                false
            }
            Err(e) => {
                metrics::record_zone_fetch_error(elapsed);
                warn!(
                    zone_id = %zone_id,
                    error = %e,
                    elapsed = ?elapsed,
                    "Failed to fetch records for DNS zone"
                );
                true
            }
        }
    }
}

impl Drop for DnsRecordCache {
    fn drop(&mut self) {
        let zones = self
            .state
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .zones
            .len();
        metrics::record_zones_released(zones);
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod cache_tests;
