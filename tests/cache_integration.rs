// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Integration tests for zonecache
//!
//! These tests drive the public API end to end: the cache on its own with
//! in-process fetch functions, and the cache behind a `Context` backed by the
//! real provider client talking to a local mock API.
//!
//! Run with: cargo test --test cache_integration

use serde_json::json;
use std::cell::Cell;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zonecache::cache::{CacheStats, DnsRecordCache};
use zonecache::config::ProviderConfig;
use zonecache::context::Context;
use zonecache::provider::ProviderClient;
use zonecache::record::DnsRecord;

// ============================================================================
// Helper Functions
// ============================================================================

fn fetch_all_records_in_zone(zone_id: &str) -> Result<Vec<DnsRecord>, String> {
    match zone_id {
        "zone-A" => Ok(vec![
            DnsRecord::new("record-0", "zone-A", "A", "zero-A", "127.0.0.0"),
            DnsRecord::new("record-1", "zone-A", "A", "one-A", "127.0.0.1"),
        ]),
        "zone-B" => Ok(vec![
            DnsRecord::new("record-0", "zone-B", "A", "zero-B", "127.0.0.0"),
            DnsRecord::new("record-1", "zone-B", "A", "one-B", "127.0.0.1"),
        ]),
        other => Err(format!("Unknown zone {other}")),
    }
}

fn listing(zone_id: &str, names: &[(&str, &str)]) -> serde_json::Value {
    let result: Vec<_> = names
        .iter()
        .map(|(id, name)| {
            json!({
                "id": id,
                "zone_id": zone_id,
                "name": name,
                "type": "A",
                "content": "192.0.2.10",
                "ttl": 300
            })
        })
        .collect();
    json!({
        "success": true,
        "errors": [],
        "result": result,
        "result_info": {
            "page": 1,
            "per_page": 100,
            "count": names.len(),
            "total_count": names.len(),
            "total_pages": 1
        }
    })
}

// ============================================================================
// Cache Scenarios
// ============================================================================

#[test]
fn test_two_zones_and_an_unknown_zone() {
    let cache = DnsRecordCache::new();

    let a = cache
        .lookup("zone-A", "record-0", fetch_all_records_in_zone)
        .expect("zone-A/record-0 should be found");
    let b = cache
        .lookup("zone-B", "record-0", fetch_all_records_in_zone)
        .expect("zone-B/record-0 should be found");
    let unknown = cache.lookup("unknown-zone", "record-0", fetch_all_records_in_zone);

    assert_eq!(a.name, "zero-A");
    assert_eq!(a.zone_id, "zone-A");
    assert_eq!(b.name, "zero-B");
    assert_eq!(b.zone_id, "zone-B");
    assert!(unknown.is_none());

    assert_eq!(
        cache.stats(),
        CacheStats {
            requests: 3,
            cache_hits: 2
        }
    );
}

#[test]
fn test_each_zone_listed_once_over_many_lookups() {
    let cache = DnsRecordCache::new();
    let listed = Cell::new(0);
    let fetch = |zone_id: &str| {
        listed.set(listed.get() + 1);
        fetch_all_records_in_zone(zone_id)
    };

    let mut hits = 0;
    for round in 0..20 {
        for zone_id in ["zone-A", "zone-B", "unknown-zone"] {
            let record_id = format!("record-{}", round % 3);
            if cache.lookup(zone_id, &record_id, fetch).is_some() {
                hits += 1;
            }
        }
    }

    assert_eq!(listed.get(), 3);
    let stats = cache.stats();
    assert_eq!(stats.requests, 60);
    assert_eq!(stats.cache_hits, hits);
    assert!(stats.requests >= stats.cache_hits);
}

// ============================================================================
// Provider-backed Context
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_context_reads_through_provider_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zones/zone-A/dns_records"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(listing("zone-A", &[("record-0", "www"), ("record-1", "api")])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/zones/missing-zone/dns_records"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "success": false,
            "errors": [{ "code": 9109, "message": "Unauthorized to access requested resource" }],
            "result": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let base_url = server.uri();

    // The blocking client is built, used and dropped on a blocking thread
    let (found, missing, stats) = tokio::task::spawn_blocking(move || {
        let config = ProviderConfig::new("test-token", &base_url).unwrap();
        let client = ProviderClient::new(config).unwrap();
        let ctx = Context::new(Arc::new(DnsRecordCache::new()), Arc::new(client));

        let found = vec![
            ctx.lookup_record("zone-A", "record-0"),
            ctx.lookup_record("zone-A", "record-1"),
            ctx.lookup_record("zone-A", "record-2"),
        ];
        let missing = vec![
            ctx.lookup_record("missing-zone", "record-0"),
            ctx.lookup_record("missing-zone", "record-0"),
        ];
        (found, missing, ctx.stats())
    })
    .await
    .unwrap();

    assert_eq!(found[0].as_ref().unwrap().name, "www");
    assert_eq!(found[1].as_ref().unwrap().name, "api");
    assert!(found[2].is_none());
    assert!(missing.iter().all(Option::is_none));
    assert_eq!(
        stats,
        CacheStats {
            requests: 5,
            cache_hits: 2
        }
    );
}
