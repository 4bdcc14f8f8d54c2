// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Provider REST API client.
//!
//! [`ProviderClient::list_zone_records`] is the production fetch function for
//! [`DnsRecordCache`](crate::cache::DnsRecordCache): it lists every record of a
//! zone through `GET /zones/{zone_id}/dns_records`, following pagination and
//! retrying transient failures.
//!
//! The client is blocking. The cache calls its fetch function while holding a
//! `std::sync::Mutex`, so the fetch has to be synchronous; async callers go
//! through [`Context::read_record`](crate::context::Context::read_record),
//! which moves the lookup onto tokio's blocking pool.
//!
//! # Example
//!
//! ```rust,no_run
//! use zonecache::cache::DnsRecordCache;
//! use zonecache::config::ProviderConfig;
//! use zonecache::provider::ProviderClient;
//!
//! # fn example() -> anyhow::Result<()> {
//! let client = ProviderClient::new(ProviderConfig::from_env()?)?;
//! let cache = DnsRecordCache::new();
//!
//! let zone_id = "023e105f4ecef8ad9ca31a8372d0c353";
//! let record_id = "372e67954025e0ba6aaa6d586b9e0b59";
//! let record = cache.lookup(zone_id, record_id, |zone| client.list_zone_records(zone));
//! println!("{record:?}");
//! # Ok(())
//! # }
//! ```

pub mod types;

use crate::config::ProviderConfig;
use crate::constants::USER_AGENT;
use crate::errors::ProviderError;
use crate::metrics;
use crate::record::DnsRecord;
use crate::retry::{http_backoff, ExponentialBackoff};
use anyhow::{Context as _, Result};
use reqwest::blocking::Client as HttpClient;
use std::time::Instant;
use tracing::{debug, error, warn};
use types::ListRecordsResponse;

/// Anything that can list the full record set of a zone.
///
/// This is the seam between the cache's callers and the remote API: the
/// production implementation is [`ProviderClient`], tests substitute fakes.
pub trait ZoneRecordSource: Send + Sync {
    /// Return every record currently in `zone_id`.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] if the records cannot be listed.
    fn list_zone_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>, ProviderError>;
}

/// One decoded listing page.
#[derive(Debug)]
struct RecordPage {
    records: Vec<DnsRecord>,
    total_pages: Option<u32>,
}

/// Blocking client for the provider REST API.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    http: HttpClient,
    config: ProviderConfig,
    backoff: ExponentialBackoff,
}

impl ProviderClient {
    /// Create a client from `config`.
    ///
    /// Must not be called from inside an async task; build it before entering
    /// the runtime or on a blocking thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built (TLS backend failure).
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .context("Failed to build provider HTTP client")?;

        Ok(Self {
            http,
            config,
            backoff: http_backoff(),
        })
    }

    /// Replace the retry schedule shared by all page requests of one zone listing.
    #[must_use]
    pub fn with_backoff(mut self, backoff: ExponentialBackoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// The configuration this client was built with.
    #[must_use]
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// List every record in `zone_id`, following pagination.
    ///
    /// Records that come back without a `zone_id` are stamped with the zone
    /// they were listed from.
    ///
    /// # Errors
    ///
    /// Returns the first non-retryable [`ProviderError`], or
    /// [`ProviderError::RetriesExhausted`] once the retry budget is spent.
    pub fn list_zone_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>, ProviderError> {
        let start = Instant::now();
        let mut records = Vec::new();
        let mut page = 1;

        // One retry budget covers every page of the listing
        let mut backoff = self.backoff.clone();
        backoff.reset();

        loop {
            let listing = self.fetch_page_with_retry(zone_id, page, &mut backoff)?;
            let in_page = listing.records.len();

            records.extend(listing.records.into_iter().map(|mut record| {
                if record.zone_id.is_empty() {
                    record.zone_id = zone_id.to_string();
                }
                record
            }));

            debug!(
                zone_id = %zone_id,
                page = page,
                records_in_page = in_page,
                total_records = records.len(),
                "Fetched record page from provider API"
            );

            match listing.total_pages {
                Some(total_pages) if page < total_pages && in_page > 0 => page += 1,
                _ => break,
            }
        }

        debug!(
            zone_id = %zone_id,
            pages = page,
            total_records = records.len(),
            elapsed = ?start.elapsed(),
            "Listed all records in zone"
        );

        Ok(records)
    }

    fn fetch_page_with_retry(
        &self,
        zone_id: &str,
        page: u32,
        backoff: &mut ExponentialBackoff,
    ) -> Result<RecordPage, ProviderError> {
        backoff.reset_interval();
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;

            let err = match self.fetch_page(zone_id, page) {
                Ok(listing) => {
                    if attempt > 1 {
                        debug!(
                            zone_id = %zone_id,
                            page = page,
                            attempt = attempt,
                            elapsed = ?backoff.elapsed(),
                            "Provider API call succeeded after retries"
                        );
                    }
                    return Ok(listing);
                }
                Err(e) => e,
            };

            if !err.is_retryable() {
                error!(
                    zone_id = %zone_id,
                    page = page,
                    error = %err,
                    "Non-retryable provider API error, failing immediately"
                );
                return Err(err);
            }

            let Some(delay) = backoff.next_backoff() else {
                error!(
                    zone_id = %zone_id,
                    page = page,
                    attempt = attempt,
                    elapsed = ?backoff.elapsed(),
                    error = %err,
                    "Max retry time exceeded, giving up"
                );
                return Err(ProviderError::RetriesExhausted {
                    zone_id: zone_id.to_string(),
                    attempts: attempt,
                    last_error: err.to_string(),
                });
            };

            warn!(
                zone_id = %zone_id,
                page = page,
                attempt = attempt,
                retry_after = ?delay,
                error = %err,
                "Retryable provider API error, will retry"
            );
            std::thread::sleep(delay);
        }
    }

    fn fetch_page(&self, zone_id: &str, page: u32) -> Result<RecordPage, ProviderError> {
        let mut url = self
            .config
            .dns_records_url(zone_id)
            .map_err(|e| ProviderError::InvalidRequest {
                zone_id: zone_id.to_string(),
                reason: e.to_string(),
            })?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &self.config.page_size.to_string());

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.config.api_token)
            .send()
            .map_err(|e| {
                metrics::record_provider_request("transport_error");
                ProviderError::Transport {
                    zone_id: zone_id.to_string(),
                    reason: e.to_string(),
                }
            })?;

        let status = response.status();
        metrics::record_provider_request(status.as_str());

        let body = response.text().map_err(|e| ProviderError::Transport {
            zone_id: zone_id.to_string(),
            reason: format!("Failed to read response body: {e}"),
        })?;

        if !status.is_success() {
            let message = serde_json::from_str::<ListRecordsResponse>(&body)
                .map(|envelope| envelope.error_message())
                .unwrap_or(body);
            return Err(ProviderError::Http {
                status: status.as_u16(),
                zone_id: zone_id.to_string(),
                message,
            });
        }

        let envelope: ListRecordsResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Decode {
                zone_id: zone_id.to_string(),
                reason: e.to_string(),
            })?;

        if !envelope.success {
            return Err(ProviderError::Api {
                zone_id: zone_id.to_string(),
                code: envelope.error_code(),
                message: envelope.error_message(),
            });
        }

        Ok(RecordPage {
            total_pages: envelope.result_info.map(|info| info.total_pages),
            records: envelope.result.unwrap_or_default(),
        })
    }
}

impl ZoneRecordSource for ProviderClient {
    fn list_zone_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>, ProviderError> {
        ProviderClient::list_zone_records(self, zone_id)
    }
}
