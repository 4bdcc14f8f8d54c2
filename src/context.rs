// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Shared context for components that read DNS records.
//!
//! A [`Context`] bundles one explicitly constructed [`DnsRecordCache`] with the
//! [`ZoneRecordSource`] that fills it. Clone the context (it is two `Arc`s) into
//! every component that needs record lookups; all clones share the same cache.

use crate::cache::{CacheStats, DnsRecordCache};
use crate::provider::ZoneRecordSource;
use crate::record::DnsRecord;
use anyhow::{Context as _, Result};
use std::sync::Arc;

/// Cache plus the source used to fill it.
#[derive(Clone)]
pub struct Context {
    /// Record cache shared by every clone of this context
    pub cache: Arc<DnsRecordCache>,

    /// Source listing a zone's records on a cold lookup
    pub source: Arc<dyn ZoneRecordSource>,
}

impl Context {
    #[must_use]
    pub fn new(cache: Arc<DnsRecordCache>, source: Arc<dyn ZoneRecordSource>) -> Self {
        Self { cache, source }
    }

    /// Look up a record, blocking the current thread on a cold zone.
    ///
    /// Do not call this from an async task; use [`Context::read_record`].
    #[must_use]
    pub fn lookup_record(&self, zone_id: &str, record_id: &str) -> Option<DnsRecord> {
        self.cache
            .lookup(zone_id, record_id, |zone| self.source.list_zone_records(zone))
    }

    /// Look up a record from async code.
    ///
    /// The lookup (and any zone fetch it triggers) runs on tokio's blocking pool,
    /// so a slow provider never stalls the runtime's worker threads.
    ///
    /// # Errors
    ///
    /// Returns an error only if the blocking task panicked or was cancelled. A
    /// failed zone fetch is not an error; it yields `Ok(None)`.
    pub async fn read_record(&self, zone_id: &str, record_id: &str) -> Result<Option<DnsRecord>> {
        let ctx = self.clone();
        let zone_id = zone_id.to_string();
        let record_id = record_id.to_string();

        tokio::task::spawn_blocking(move || ctx.lookup_record(&zone_id, &record_id))
            .await
            .context("Record lookup task failed")
    }

    /// Lookup counters of the shared cache.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod context_tests;
