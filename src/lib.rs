// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # zonecache - Per-zone DNS record cache
//!
//! zonecache answers "give me record `R` of zone `Z`" without calling the DNS
//! provider's API once per record. The first lookup in a zone lists the whole
//! zone; every later lookup in that zone is served from memory.
//!
//! ## Modules
//!
//! - [`cache`] - The read-through, per-zone lazy record cache
//! - [`record`] - DNS record value type
//! - [`provider`] - Blocking REST client that lists a zone's records
//! - [`context`] - Cache plus record source, shared by callers
//! - [`config`] - Cache and provider configuration
//! - [`errors`] - Provider and configuration error types
//! - [`metrics`] - Prometheus metrics
//! - [`retry`] - Exponential backoff for provider requests
//!
//! ## Example
//!
//! ```rust
//! use zonecache::cache::DnsRecordCache;
//! use zonecache::record::DnsRecord;
//!
//! let cache = DnsRecordCache::new();
//!
//! let fetch = |zone_id: &str| -> Result<Vec<DnsRecord>, String> {
//!     match zone_id {
//!         "zone-A" => Ok(vec![DnsRecord::new("record-0", "zone-A", "A", "zero-A", "127.0.0.0")]),
//!         other => Err(format!("Unknown zone {other}")),
//!     }
//! };
//!
//! assert_eq!(cache.lookup("zone-A", "record-0", fetch).unwrap().name, "zero-A");
//! assert!(cache.lookup("unknown-zone", "record-0", fetch).is_none());
//! ```
//!
//! ## Behaviour
//!
//! - **Populate once** - each zone is listed at most once per cache instance
//! - **Failures stick** - a failed listing leaves the zone empty (opt-in retry via
//!   [`config::FetchFailurePolicy::Retry`])
//! - **One lock** - lookups are serialized, including the provider call

pub mod cache;
pub mod config;
pub mod constants;
pub mod context;
pub mod errors;
pub mod metrics;
pub mod provider;
pub mod record;
pub mod retry;
