// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! DNS record value type.
//!
//! [`DnsRecord`] mirrors the record object returned by the provider's
//! `dns_records` listing endpoint. The cache only ever reads [`DnsRecord::id`];
//! every other field is carried through untouched for the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single DNS resource record as returned by the provider API.
///
/// `Default` yields the zero value (all strings empty, no TTL, no timestamps).
///
/// # Example
///
/// ```rust
/// use zonecache::record::DnsRecord;
///
/// let record = DnsRecord::new("record-0", "zone-A", "A", "www.example.com", "192.0.2.1");
/// assert_eq!(record.id, "record-0");
/// assert_eq!(record.record_type, "A");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Provider-assigned identifier, unique within the zone
    pub id: String,

    /// Identifier of the zone that owns the record
    #[serde(default)]
    pub zone_id: String,

    /// Record type (A, AAAA, CNAME, TXT, ...)
    #[serde(rename = "type")]
    pub record_type: String,

    /// Fully qualified record name
    pub name: String,

    /// Record data (address, target, text)
    #[serde(default)]
    pub content: String,

    /// Time to live in seconds (1 means "automatic" for Cloudflare)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,

    /// Whether traffic for this record is proxied through the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxied: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_on: Option<DateTime<Utc>>,
}

impl DnsRecord {
    /// Build a record from its identifying fields, leaving the optional ones unset.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        zone_id: impl Into<String>,
        record_type: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            zone_id: zone_id.into(),
            record_type: record_type.into(),
            name: name.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    /// Returns `true` if this is the zero value handed out for a miss.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod record_tests;
