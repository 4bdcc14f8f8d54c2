// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Provider API and configuration error types.
//!
//! The record cache itself never returns an error: a failed zone fetch is logged
//! and surfaces only as a miss. These types describe why a fetch failed, so the
//! provider client can decide what to retry and the binary can report it.

use thiserror::Error;

/// Errors that can occur while listing a zone's records from the provider API.
#[derive(Error, Debug, Clone)]
pub enum ProviderError {
    /// The provider answered with a non-success HTTP status
    ///
    /// 429, 500, 502, 503 and 504 are treated as transient; every other status
    /// fails immediately.
    #[error("HTTP {status} listing records for zone '{zone_id}': {message}")]
    Http {
        /// HTTP status code returned by the provider
        status: u16,
        /// Zone whose records were being listed
        zone_id: String,
        /// Response body or status text
        message: String,
    },

    /// The HTTP exchange succeeded but the envelope reported `success: false`
    #[error("Provider API error {code} for zone '{zone_id}': {message}")]
    Api {
        /// Zone whose records were being listed
        zone_id: String,
        /// First error code from the envelope (0 if none was given)
        code: i64,
        /// Error messages from the envelope, joined
        message: String,
    },

    /// The request never produced a response (DNS, connect, TLS, timeout)
    #[error("Failed to send request for zone '{zone_id}': {reason}")]
    Transport {
        /// Zone whose records were being listed
        zone_id: String,
        /// Underlying client error
        reason: String,
    },

    /// The response body was not a valid record listing
    #[error("Failed to decode record listing for zone '{zone_id}': {reason}")]
    Decode {
        /// Zone whose records were being listed
        zone_id: String,
        /// Underlying decoding error
        reason: String,
    },

    /// The request URL could not be built for this zone
    #[error("Cannot build request for zone '{zone_id}': {reason}")]
    InvalidRequest {
        /// Zone whose records were being listed
        zone_id: String,
        /// Why the request could not be built
        reason: String,
    },

    /// Transient failures persisted past the retry budget
    #[error("Gave up listing zone '{zone_id}' after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        /// Zone whose records were being listed
        zone_id: String,
        /// Number of attempts made
        attempts: u32,
        /// Error from the final attempt
        last_error: String,
    },
}

impl ProviderError {
    /// Returns `true` if the request may succeed when repeated.
    ///
    /// # Example
    ///
    /// ```rust
    /// use zonecache::errors::ProviderError;
    ///
    /// let err = ProviderError::Http {
    ///     status: 503,
    ///     zone_id: "zone-A".into(),
    ///     message: "unavailable".into(),
    /// };
    /// assert!(err.is_retryable());
    /// ```
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { status, .. } => {
                reqwest::StatusCode::from_u16(*status)
                    .is_ok_and(crate::retry::is_retryable_http_status)
            }
            Self::Transport { .. } => true,
            Self::Api { .. }
            | Self::Decode { .. }
            | Self::InvalidRequest { .. }
            | Self::RetriesExhausted { .. } => false,
        }
    }

    /// The zone the failed request was made for.
    #[must_use]
    pub fn zone_id(&self) -> &str {
        match self {
            Self::Http { zone_id, .. }
            | Self::Api { zone_id, .. }
            | Self::Transport { zone_id, .. }
            | Self::Decode { zone_id, .. }
            | Self::InvalidRequest { zone_id, .. }
            | Self::RetriesExhausted { zone_id, .. } => zone_id,
        }
    }
}

/// Errors raised while loading configuration from the environment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is unset or empty
    #[error("Required environment variable {name} is not set")]
    MissingEnv {
        /// Name of the variable
        name: String,
    },

    /// A variable is set to something that cannot be used
    #[error("Invalid value '{value}' for {name}: {reason}")]
    InvalidValue {
        /// Name of the variable or flag
        name: String,
        /// Offending value
        value: String,
        /// Why it was rejected
        reason: String,
    },
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod errors_tests;
