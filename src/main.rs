// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::{Context as _, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use zonecache::{
    cache::DnsRecordCache,
    config::{
        parse_page_size, CacheConfig, FetchFailurePolicy, ProviderConfig, ProviderOverrides,
    },
    context::Context,
    metrics::gather_metrics,
    provider::ProviderClient,
};

/// Look up DNS records through a per-zone read-through cache.
///
/// Each zone named on the command line is listed from the provider API once;
/// every record in it is then answered from memory.
#[derive(Parser, Debug)]
#[command(name = "zonecache", version, about)]
struct Cli {
    /// Zone used for records given without a `ZONE_ID/` prefix
    #[arg(long)]
    zone_id: Option<String>,

    /// Record to look up, as `ZONE_ID/RECORD_ID` or `RECORD_ID` with --zone-id
    #[arg(short, long = "record", required = true)]
    records: Vec<String>,

    /// Re-fetch a zone on the next lookup if its listing failed
    #[arg(long)]
    retry_failed_fetches: bool,

    /// Provider API base URL (overrides CLOUDFLARE_API_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Records per listing page (overrides ZONECACHE_PAGE_SIZE)
    #[arg(long, value_parser = parse_page_size)]
    page_size: Option<u32>,

    /// Print Prometheus metrics after the lookups
    #[arg(long)]
    metrics: bool,
}

/// A `(zone_id, record_id)` pair parsed from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RecordRef {
    zone_id: String,
    record_id: String,
}

/// Parse `ZONE_ID/RECORD_ID`, or a bare `RECORD_ID` when a default zone is given.
fn parse_record_ref(value: &str, default_zone: Option<&str>) -> Result<RecordRef> {
    if let Some((zone_id, record_id)) = value.split_once('/') {
        return Ok(RecordRef {
            zone_id: zone_id.to_string(),
            record_id: record_id.to_string(),
        });
    }

    let zone_id = default_zone.with_context(|| {
        format!("Record '{value}' has no zone; use ZONE_ID/RECORD_ID or pass --zone-id")
    })?;

    Ok(RecordRef {
        zone_id: zone_id.to_string(),
        record_id: value.to_string(),
    })
}

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    debug!(?cli, "Parsed command line");

    let refs = cli
        .records
        .iter()
        .map(|value| parse_record_ref(value, cli.zone_id.as_deref()))
        .collect::<Result<Vec<_>>>()?;

    let cache_config = if cli.retry_failed_fetches {
        CacheConfig {
            fetch_failure_policy: FetchFailurePolicy::Retry,
        }
    } else {
        CacheConfig::from_env()?
    };

    let provider_config = ProviderConfig::from_env_with(&ProviderOverrides {
        base_url: cli.base_url.clone(),
        page_size: cli.page_size,
    })?;
    debug!(?cache_config, ?provider_config, "Loaded configuration");

    // The blocking HTTP client must be created (and dropped) outside the runtime
    let client = ProviderClient::new(provider_config)?;
    let ctx = Context::new(
        Arc::new(DnsRecordCache::with_config(cache_config)),
        Arc::new(client),
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("zonecache")
        .enable_all()
        .build()?;

    let result = runtime.block_on(async_main(ctx.clone(), refs));
    drop(runtime);

    let stats = ctx.stats();
    info!(
        requests = stats.requests,
        cache_hits = stats.cache_hits,
        zones = ctx.cache.cached_zone_count(),
        "Record cache statistics"
    );

    if cli.metrics {
        println!("{}", gather_metrics()?);
    }

    result
}

fn init_logging() {
    // Respects RUST_LOG (default: info) and RUST_LOG_FORMAT (json|text).
    // Logs go to stderr so stdout carries only record JSON.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }
}

async fn async_main(ctx: Context, refs: Vec<RecordRef>) -> Result<()> {
    info!(lookups = refs.len(), "Looking up records");

    let tasks: Vec<_> = refs
        .into_iter()
        .map(|record_ref| {
            let ctx = ctx.clone();
            tokio::spawn(async move {
                let record = ctx
                    .read_record(&record_ref.zone_id, &record_ref.record_id)
                    .await;
                (record_ref, record)
            })
        })
        .collect();

    let total = tasks.len();
    let mut missing = 0;

    for task in tasks {
        let (record_ref, record) = task.await.context("Lookup task panicked")?;
        match record? {
            Some(record) => {
                println!("{}", serde_json::to_string(&record)?);
            }
            None => {
                missing += 1;
                warn!(
                    zone_id = %record_ref.zone_id,
                    record_id = %record_ref.record_id,
                    "Record not found (absent from zone, or zone listing failed)"
                );
            }
        }
    }

    if missing > 0 {
        error!(missing = missing, total = total, "Some records were not found");
        anyhow::bail!("{missing} of {total} records not found");
    }

    Ok(())
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod main_tests;
