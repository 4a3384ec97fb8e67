// crates/foxden-doi-services/src/catalog.rs
// ============================================================================
// Module: HTTP Metadata Catalog
// Description: Blocking HTTP client for the FOXDEN metadata service.
// Purpose: Search, look up, and update dataset metadata records.
// Dependencies: foxden-doi-core, reqwest, serde_json, url
// ============================================================================

//! ## Overview
//! [`HttpMetadataCatalog`] implements [`MetadataCatalog`] against the
//! metadata service:
//! - `POST {base}/search` with a [`ServiceRequest`] body returns a JSON array.
//! - `GET {base}/record?did=...` returns every record for a dataset.
//! - `PUT {base}` with a [`MetaRecord`] body returns a [`ServiceResponse`].
//!
//! Responses are read through a bounded reader; redirects are not followed.
//! Update responses are decoded even on non-success HTTP status because the
//! service reports its own codes in the body.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;
use std::time::Duration;

use foxden_doi_core::AccessToken;
use foxden_doi_core::CatalogError;
use foxden_doi_core::DatasetId;
use foxden_doi_core::MetaRecord;
use foxden_doi_core::MetadataCatalog;
use foxden_doi_core::MetadataRecord;
use foxden_doi_core::ServiceRequest;
use foxden_doi_core::ServiceResponse;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::blocking::RequestBuilder;
use reqwest::redirect::Policy;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Maximum number of body bytes echoed into error messages.
const MAX_ERROR_EXCERPT_BYTES: usize = 512;

/// HTTP settings for the catalog client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogHttpConfig {
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum response size allowed, in bytes.
    pub max_response_bytes: usize,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

impl Default for CatalogHttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            max_response_bytes: 8 * 1024 * 1024,
            user_agent: "foxden-doi/0.1".to_string(),
        }
    }
}

// ============================================================================
// SECTION: Catalog Client
// ============================================================================

/// Metadata catalog reached over HTTP.
///
/// # Invariants
/// - `base` is an absolute http(s) URL.
#[derive(Debug, Clone)]
pub struct HttpMetadataCatalog {
    /// Service base URL.
    base: Url,
    /// Blocking HTTP client.
    client: Client,
    /// Response size cap.
    max_response_bytes: usize,
}

impl HttpMetadataCatalog {
    /// Creates a catalog client for the service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Transport`] when the URL is invalid or the
    /// client cannot be built.
    pub fn new(base_url: &str, config: &CatalogHttpConfig) -> Result<Self, CatalogError> {
        let invalid = |message: String| CatalogError::Transport {
            endpoint: base_url.to_string(),
            message,
        };
        let base = Url::parse(base_url).map_err(|err| invalid(format!("invalid url: {err}")))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", base.scheme())));
        }
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .redirect(Policy::none())
            .build()
            .map_err(|err| invalid(format!("http client build failed: {err}")))?;
        Ok(Self {
            base,
            client,
            max_response_bytes: config.max_response_bytes,
        })
    }

    /// Returns the service base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base
    }

    /// Builds `{base}/{path}`.
    fn endpoint(&self, path: &str) -> Result<Url, CatalogError> {
        let joined = format!("{}/{path}", self.base.as_str().trim_end_matches('/'));
        Url::parse(&joined).map_err(|err| CatalogError::Transport {
            endpoint: joined.clone(),
            message: format!("invalid url: {err}"),
        })
    }

    /// Sends a request and returns the status and bounded body.
    fn exchange(
        &self,
        endpoint: &Url,
        request: RequestBuilder,
    ) -> Result<(StatusCode, Vec<u8>), CatalogError> {
        let response = request.send().map_err(|err| CatalogError::Transport {
            endpoint: endpoint.to_string(),
            message: err.to_string(),
        })?;
        let status = response.status();
        let limit = u64::try_from(self.max_response_bytes).unwrap_or(u64::MAX);
        let too_large = || CatalogError::Transport {
            endpoint: endpoint.to_string(),
            message: "response exceeds size limit".to_string(),
        };
        if response.content_length().is_some_and(|length| length > limit) {
            return Err(too_large());
        }
        let mut body = Vec::new();
        response.take(limit.saturating_add(1)).read_to_end(&mut body).map_err(|err| {
            CatalogError::Transport {
                endpoint: endpoint.to_string(),
                message: format!("failed to read response: {err}"),
            }
        })?;
        if body.len() > self.max_response_bytes {
            return Err(too_large());
        }
        debug!(endpoint = endpoint.as_str(), status = status.as_u16(), "catalog response");
        Ok((status, body))
    }

    /// Sends a request expecting a successful JSON response.
    fn fetch_json<T: DeserializeOwned>(
        &self,
        endpoint: &Url,
        request: RequestBuilder,
    ) -> Result<T, CatalogError> {
        let (status, body) = self.exchange(endpoint, request)?;
        if !status.is_success() {
            return Err(CatalogError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message: body_excerpt(&body),
            });
        }
        decode(endpoint, &body)
    }
}

impl MetadataCatalog for HttpMetadataCatalog {
    fn search(
        &self,
        token: &AccessToken,
        request: &ServiceRequest,
    ) -> Result<Vec<MetadataRecord>, CatalogError> {
        let endpoint = self.endpoint("search")?;
        let builder = self.client.post(endpoint.clone()).bearer_auth(token.bearer()).json(request);
        self.fetch_json(&endpoint, builder)
    }

    fn records_by_did(
        &self,
        token: &AccessToken,
        did: &DatasetId,
    ) -> Result<Vec<MetadataRecord>, CatalogError> {
        let mut endpoint = self.endpoint("record")?;
        endpoint.query_pairs_mut().append_pair("did", did.as_str());
        let builder = self.client.get(endpoint.clone()).bearer_auth(token.bearer());
        self.fetch_json(&endpoint, builder)
    }

    fn update(
        &self,
        token: &AccessToken,
        record: &MetaRecord,
    ) -> Result<ServiceResponse, CatalogError> {
        let endpoint = self.base.clone();
        let builder = self.client.put(endpoint.clone()).bearer_auth(token.bearer()).json(record);
        let (status, body) = self.exchange(&endpoint, builder)?;
        match decode::<ServiceResponse>(&endpoint, &body) {
            Ok(response) => Ok(response),
            Err(_) if !status.is_success() => Err(CatalogError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message: body_excerpt(&body),
            }),
            Err(err) => Err(err),
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Decodes a JSON body.
fn decode<T: DeserializeOwned>(endpoint: &Url, body: &[u8]) -> Result<T, CatalogError> {
    serde_json::from_slice(body).map_err(|err| CatalogError::Decode {
        endpoint: endpoint.to_string(),
        message: err.to_string(),
    })
}

/// Renders a bounded, lossy excerpt of a response body.
fn body_excerpt(body: &[u8]) -> String {
    let end = body.len().min(MAX_ERROR_EXCERPT_BYTES);
    String::from_utf8_lossy(&body[..end]).trim().to_string()
}
