// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for zonecache.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// Provider API Constants
// ============================================================================

/// Default base URL of the Cloudflare v4 REST API
pub const DEFAULT_API_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

/// Default number of records requested per page when listing a zone
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Smallest page size accepted by the provider API
pub const MIN_PAGE_SIZE: u32 = 5;

/// Largest page size accepted by the provider API
pub const MAX_PAGE_SIZE: u32 = 5000;

/// Default timeout for a single HTTP request to the provider API
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// User agent sent with every provider API request
pub const USER_AGENT: &str = concat!("zonecache/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Environment Variables
// ============================================================================

/// API token used as a bearer credential (required)
pub const ENV_API_TOKEN: &str = "CLOUDFLARE_API_TOKEN";

/// Override for the provider API base URL
pub const ENV_API_BASE_URL: &str = "CLOUDFLARE_API_BASE_URL";

/// Override for the list page size
pub const ENV_PAGE_SIZE: &str = "ZONECACHE_PAGE_SIZE";

/// Override for the per-request HTTP timeout, in seconds
pub const ENV_HTTP_TIMEOUT_SECS: &str = "ZONECACHE_HTTP_TIMEOUT_SECS";

/// When `true`, a failed zone fetch is retried on the next lookup instead of cached as empty
pub const ENV_RETRY_FAILED_FETCHES: &str = "ZONECACHE_RETRY_FAILED_FETCHES";

// ============================================================================
// Metrics Constants
// ============================================================================

/// Namespace prefix for all zonecache metrics (prometheus-safe)
pub const METRICS_NAMESPACE: &str = "zonecache";

/// Label value for a lookup that found its record
pub const LOOKUP_RESULT_HIT: &str = "hit";

/// Label value for a lookup that did not find its record
pub const LOOKUP_RESULT_MISS: &str = "miss";

/// Label value for a successful operation
pub const STATUS_SUCCESS: &str = "success";

/// Label value for a failed operation
pub const STATUS_ERROR: &str = "error";
