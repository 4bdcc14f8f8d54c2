// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for context.rs

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::errors::ProviderError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory source that counts how often each zone is listed.
    #[derive(Default)]
    struct FakeSource {
        calls: AtomicUsize,
    }

    impl ZoneRecordSource for FakeSource {
        fn list_zone_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match zone_id {
                "zone-A" => Ok(vec![
                    DnsRecord::new("record-0", "zone-A", "A", "zero-A", "127.0.0.0"),
                    DnsRecord::new("record-1", "zone-A", "A", "one-A", "127.0.0.1"),
                ]),
                other => Err(ProviderError::Http {
                    status: 404,
                    zone_id: other.to_string(),
                    message: "zone not found".to_string(),
                }),
            }
        }
    }

    fn context() -> (Context, Arc<FakeSource>) {
        let source = Arc::new(FakeSource::default());
        let ctx = Context::new(Arc::new(DnsRecordCache::new()), source.clone());
        (ctx, source)
    }

    #[test]
    fn test_lookup_record_uses_source_once() {
        let (ctx, source) = context();

        assert_eq!(ctx.lookup_record("zone-A", "record-0").unwrap().name, "zero-A");
        assert_eq!(ctx.lookup_record("zone-A", "record-1").unwrap().name, "one-A");
        assert!(ctx.lookup_record("zone-A", "record-2").is_none());

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            ctx.stats(),
            CacheStats {
                requests: 3,
                cache_hits: 2
            }
        );
    }

    #[test]
    fn test_clones_share_cache() {
        let (ctx, source) = context();
        let other = ctx.clone();

        assert!(ctx.lookup_record("zone-A", "record-0").is_some());
        assert!(other.lookup_record("zone-A", "record-1").is_some());

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(other.stats().requests, 2);
    }

    #[test]
    fn test_source_error_is_a_miss() {
        let (ctx, source) = context();

        assert!(ctx.lookup_record("unknown-zone", "record-0").is_none());
        assert!(ctx.lookup_record("unknown-zone", "record-0").is_none());

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_read_record_from_async() {
        let (ctx, source) = context();

        let found = ctx.read_record("zone-A", "record-1").await.unwrap();
        let missing = ctx.read_record("unknown-zone", "record-1").await.unwrap();

        assert_eq!(found.unwrap().content, "127.0.0.1");
        assert!(missing.is_none());
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_async_reads_fetch_once() {
        let (ctx, source) = context();

        let tasks: Vec<_> = (0..32)
            .map(|i| {
                let ctx = ctx.clone();
                tokio::spawn(async move {
                    let record_id = format!("record-{}", i % 2);
                    ctx.read_record("zone-A", &record_id).await
                })
            })
            .collect();

        for task in tasks {
            let record = task.await.unwrap().unwrap();
            assert!(record.is_some());
        }

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(ctx.stats().cache_hits, 32);
    }

    #[test]
    fn test_debug_does_not_require_source_debug() {
        let (ctx, _) = context();
        let debug = format!("{ctx:?}");
        assert!(debug.contains("Context"));
    }
}
