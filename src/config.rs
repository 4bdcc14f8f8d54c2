// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Configuration for the record cache and the provider client.
//!
//! Both configs load from environment variables (see [`crate::constants`]).
//! The `from_lookup` variants take the variable source as a closure so tests
//! never have to touch the process environment.

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_PAGE_SIZE, ENV_API_BASE_URL,
    ENV_API_TOKEN, ENV_HTTP_TIMEOUT_SECS, ENV_PAGE_SIZE, ENV_RETRY_FAILED_FETCHES, MAX_PAGE_SIZE,
    MIN_PAGE_SIZE,
};
use crate::errors::ConfigError;
use std::fmt;
use std::time::Duration;
use url::Url;

/// What the cache does with a zone whose first fetch failed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FetchFailurePolicy {
    /// Keep the zone marked initialized with no records; never fetch it again.
    #[default]
    CacheEmpty,
    /// Forget the zone so the next lookup fetches it again.
    Retry,
}

/// Record cache behaviour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheConfig {
    pub fetch_failure_policy: FetchFailurePolicy,
}

impl CacheConfig {
    /// Load from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if `ZONECACHE_RETRY_FAILED_FETCHES`
    /// is set to something other than a boolean.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using `lookup` as the variable source.
    ///
    /// # Errors
    ///
    /// See [`CacheConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let retry = match non_empty(&lookup, ENV_RETRY_FAILED_FETCHES) {
            Some(value) => parse_bool(ENV_RETRY_FAILED_FETCHES, &value)?,
            None => false,
        };

        Ok(Self {
            fetch_failure_policy: if retry {
                FetchFailurePolicy::Retry
            } else {
                FetchFailurePolicy::CacheEmpty
            },
        })
    }
}

/// Values that take precedence over the environment, e.g. from command line flags.
///
/// A variable with an override is never read, so a malformed value in the
/// environment does not fail the load.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProviderOverrides {
    pub base_url: Option<String>,
    pub page_size: Option<u32>,
}

/// Provider API client settings.
#[derive(Clone)]
pub struct ProviderConfig {
    /// Bearer token sent with every request
    pub api_token: String,
    /// API root, without trailing slash
    pub base_url: Url,
    /// Records requested per page
    pub page_size: u32,
    /// Timeout for a single HTTP request
    pub timeout: Duration,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_token", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("page_size", &self.page_size)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ProviderConfig {
    /// Build a config with defaults for everything but the token and base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if `base_url` is not an http(s) URL.
    pub fn new(api_token: impl Into<String>, base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_token: api_token.into(),
            base_url: parse_base_url(ENV_API_BASE_URL, base_url)?,
            page_size: DEFAULT_PAGE_SIZE,
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        })
    }

    /// Load from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnv`] if `CLOUDFLARE_API_TOKEN` is unset and
    /// [`ConfigError::InvalidValue`] for malformed overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using `lookup` as the variable source.
    ///
    /// # Errors
    ///
    /// See [`ProviderConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_token = non_empty(&lookup, ENV_API_TOKEN).ok_or_else(|| ConfigError::MissingEnv {
            name: ENV_API_TOKEN.to_string(),
        })?;

        let base_url = non_empty(&lookup, ENV_API_BASE_URL)
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let mut config = Self::new(api_token, &base_url)?;

        if let Some(value) = non_empty(&lookup, ENV_PAGE_SIZE) {
            config.page_size = parse_page_size(&value)?;
        }

        if let Some(value) = non_empty(&lookup, ENV_HTTP_TIMEOUT_SECS) {
            let secs: u64 = value.parse().map_err(|e| ConfigError::InvalidValue {
                name: ENV_HTTP_TIMEOUT_SECS.to_string(),
                value: value.clone(),
                reason: format!("{e}"),
            })?;
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    name: ENV_HTTP_TIMEOUT_SECS.to_string(),
                    value,
                    reason: "timeout must be at least 1 second".to_string(),
                });
            }
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Load from the process environment, with `overrides` replacing the matching variables.
    ///
    /// # Errors
    ///
    /// See [`ProviderConfig::from_env`].
    pub fn from_env_with(overrides: &ProviderOverrides) -> Result<Self, ConfigError> {
        Self::from_lookup_with(|name| std::env::var(name).ok(), overrides)
    }

    /// Load using `lookup` as the variable source, with `overrides` applied.
    ///
    /// # Errors
    ///
    /// See [`ProviderConfig::from_env`].
    pub fn from_lookup_with<F>(lookup: F, overrides: &ProviderOverrides) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::from_lookup(|name| match name {
            ENV_API_BASE_URL if overrides.base_url.is_some() => overrides.base_url.clone(),
            ENV_PAGE_SIZE if overrides.page_size.is_some() => None,
            _ => lookup(name),
        })?;

        if let Some(page_size) = overrides.page_size {
            config.page_size = page_size;
        }

        Ok(config)
    }

    /// URL of the first listing page for `zone_id`, before pagination params.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the zone id cannot form a URL path.
    pub fn dns_records_url(&self, zone_id: &str) -> Result<Url, ConfigError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ConfigError::InvalidValue {
                name: ENV_API_BASE_URL.to_string(),
                value: self.base_url.to_string(),
                reason: "base URL cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .extend(["zones", zone_id, "dns_records"]);
        Ok(url)
    }
}

fn non_empty<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_bool(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}

/// Parse and range-check a page size value.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] if the value is not an integer in `5..=5000`.
pub fn parse_page_size(value: &str) -> Result<u32, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidValue {
        name: ENV_PAGE_SIZE.to_string(),
        value: value.to_string(),
        reason,
    };
    let size: u32 = value.parse().map_err(|e| invalid(format!("{e}")))?;
    if !(MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&size) {
        return Err(invalid(format!(
            "must be between {MIN_PAGE_SIZE} and {MAX_PAGE_SIZE}"
        )));
    }
    Ok(size)
}

fn parse_base_url(name: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim_end_matches('/')).map_err(|e| ConfigError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
        reason: format!("{e}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
            reason: "scheme must be http or https".to_string(),
        });
    }
    Ok(url)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
