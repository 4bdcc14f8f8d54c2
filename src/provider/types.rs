// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Response envelope of the provider's `dns_records` listing endpoint.

use crate::record::DnsRecord;
use serde::Deserialize;

/// Top-level envelope wrapping every provider API response.
#[derive(Debug, Default, Deserialize)]
pub struct ListRecordsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<ApiMessage>,
    #[serde(default)]
    pub result: Option<Vec<DnsRecord>>,
    #[serde(default)]
    pub result_info: Option<ResultInfo>,
}

impl ListRecordsResponse {
    /// First error code, or 0 when the envelope carries none.
    #[must_use]
    pub fn error_code(&self) -> i64 {
        self.errors.first().map_or(0, |e| e.code)
    }

    /// All error messages joined with `"; "`.
    #[must_use]
    pub fn error_message(&self) -> String {
        if self.errors.is_empty() {
            return "request was not successful".to_string();
        }
        self.errors
            .iter()
            .map(|e| format!("{} ({})", e.message, e.code))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// One entry of the envelope's `errors` or `messages` arrays.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Pagination block of a listing response.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ResultInfo {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub total_count: u32,
    #[serde(default)]
    pub total_pages: u32,
}
