// crates/foxden-doi-core/src/core/service.rs
// ============================================================================
// Module: FOXDEN Service Envelopes
// Description: Wire envelopes shared by FOXDEN search-style services.
// Purpose: Fix the request/response contracts spoken to backend services.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Search-style services accept a [`ServiceRequest`] (query text plus
//! pagination) and answer writes with a [`ServiceResponse`] carrying a
//! service code and an HTTP code. Responses tolerate missing fields so that
//! partial error payloads still decode.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::record::MetadataRecord;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Pagination limit meaning "return every match".
pub const UNBOUNDED_LIMIT: i64 = -1;
/// Service code reported on success.
pub const SERVICE_OK: i64 = 0;
/// HTTP status code reported on success.
pub const HTTP_OK: i64 = 200;

// ============================================================================
// SECTION: Request
// ============================================================================

/// Query payload with pagination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceQuery {
    /// JSON-encoded query document.
    pub query: String,
    /// Index of the first record to return.
    pub idx: i64,
    /// Maximum number of records; [`UNBOUNDED_LIMIT`] disables paging.
    pub limit: i64,
}

impl ServiceQuery {
    /// Builds an unpaginated query (index 0, unbounded limit).
    #[must_use]
    pub fn unbounded(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            idx: 0,
            limit: UNBOUNDED_LIMIT,
        }
    }
}

/// Request envelope for search-style services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRequest {
    /// Name of the calling client.
    pub client: String,
    /// Query and pagination.
    pub service_query: ServiceQuery,
}

impl ServiceRequest {
    /// Creates a request envelope.
    #[must_use]
    pub fn new(client: impl Into<String>, service_query: ServiceQuery) -> Self {
        Self {
            client: client.into(),
            service_query,
        }
    }
}

// ============================================================================
// SECTION: Response
// ============================================================================

/// Result payload carried by a [`ServiceResponse`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceResults {
    /// Number of matching records, when reported.
    #[serde(default)]
    pub nrecords: i64,
    /// Records returned by the service, when reported.
    #[serde(default)]
    pub records: Vec<MetadataRecord>,
}

/// Response envelope returned by service write endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResponse {
    /// Service-level status code; [`SERVICE_OK`] means success.
    #[serde(default)]
    pub srv_code: i64,
    /// HTTP status code reported by the service.
    #[serde(default)]
    pub http_code: i64,
    /// Service error message, empty on success.
    #[serde(default)]
    pub error: String,
    /// Result payload.
    #[serde(default, deserialize_with = "results_or_default")]
    pub results: ServiceResults,
}

impl ServiceResponse {
    /// Returns true when both the service and HTTP codes report success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.srv_code == SERVICE_OK && self.http_code == HTTP_OK
    }
}

impl fmt::Display for ServiceResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<ServiceResponse srvCode={} httpCode={} error={}>",
            self.srv_code, self.http_code, self.error
        )
    }
}

/// Decodes `results`, treating `null` or an unexpected shape as empty.
fn results_or_default<'de, D>(deserializer: D) -> Result<ServiceResults, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
