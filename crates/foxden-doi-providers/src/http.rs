// crates/foxden-doi-providers/src/http.rs
// ============================================================================
// Module: Provider HTTP Plumbing
// Description: Shared blocking HTTP client handling for DOI providers.
// Purpose: Build bounded clients and decode provider responses.
// Dependencies: foxden-doi-core, reqwest, serde_json, url
// ============================================================================

//! ## Overview
//! Providers share one client configuration: request timeout, user agent,
//! redirects disabled, and a hard cap on response bodies. Clients are built
//! lazily on first use so that provider initialization stays local.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;
use std::sync::OnceLock;
use std::time::Duration;

use foxden_doi_core::ProviderError;
use reqwest::blocking::Client;
use reqwest::blocking::RequestBuilder;
use reqwest::blocking::Response;
use reqwest::redirect::Policy;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Maximum number of body bytes echoed into error messages.
const MAX_ERROR_EXCERPT_BYTES: usize = 512;

/// HTTP settings shared by all providers.
///
/// # Invariants
/// - `max_response_bytes` is enforced as a hard upper bound on response bodies.
/// - `timeout_ms` applies to the full request lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderHttpConfig {
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum response size allowed, in bytes.
    pub max_response_bytes: usize,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

impl Default for ProviderHttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            max_response_bytes: 8 * 1024 * 1024,
            user_agent: "foxden-doi/0.1".to_string(),
        }
    }
}

// ============================================================================
// SECTION: Lazy Client
// ============================================================================

/// HTTP client built on first use.
pub(crate) struct LazyClient {
    /// Client settings.
    config: ProviderHttpConfig,
    /// Built client, once initialized.
    client: OnceLock<Client>,
}

impl LazyClient {
    /// Creates an uninitialized client holder.
    pub(crate) const fn new(config: ProviderHttpConfig) -> Self {
        Self {
            config,
            client: OnceLock::new(),
        }
    }

    /// Returns the response size cap.
    pub(crate) const fn max_response_bytes(&self) -> usize {
        self.config.max_response_bytes
    }

    /// Returns the client, building it if needed.
    pub(crate) fn get(&self) -> Result<&Client, ProviderError> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let client = build_http_client(&self.config)?;
        Ok(self.client.get_or_init(|| client))
    }
}

/// Builds a blocking HTTP client with redirects disabled.
fn build_http_client(config: &ProviderHttpConfig) -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(Duration::from_millis(config.timeout_ms))
        .user_agent(config.user_agent.clone())
        .redirect(Policy::none())
        .build()
        .map_err(|err| ProviderError::Config(format!("http client build failed: {err}")))
}

// ============================================================================
// SECTION: Requests
// ============================================================================

/// Joins `path` onto `base`, validating the result.
pub(crate) fn endpoint(base: &str, path: &str) -> Result<Url, ProviderError> {
    let joined = format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'));
    Url::parse(&joined).map_err(|err| ProviderError::Config(format!("invalid url {joined}: {err}")))
}

/// Validates that `base` is an absolute http(s) URL.
pub(crate) fn validate_base_url(name: &str, base: &str) -> Result<(), ProviderError> {
    let url = Url::parse(base)
        .map_err(|err| ProviderError::Config(format!("{name} base_url is invalid: {err}")))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ProviderError::Config(format!("{name} base_url has unsupported scheme {other}"))),
    }
}

/// Sends `request` and returns the body of a successful response.
pub(crate) fn send(
    request: RequestBuilder,
    max_bytes: usize,
    action: &str,
) -> Result<Vec<u8>, ProviderError> {
    let mut response =
        request.send().map_err(|err| ProviderError::Transport(format!("{action}: {err}")))?;
    let status = response.status();
    let body = read_response_limited(&mut response, max_bytes)?;
    if !status.is_success() {
        return Err(ProviderError::Rejected {
            status: status.as_u16(),
            message: format!("{action}: {}", body_excerpt(&body)),
        });
    }
    Ok(body)
}

/// Sends `request` and decodes a successful JSON response.
pub(crate) fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
    max_bytes: usize,
    action: &str,
) -> Result<T, ProviderError> {
    let body = send(request, max_bytes, action)?;
    serde_json::from_slice(&body).map_err(|err| ProviderError::Decode(format!("{action}: {err}")))
}

/// Reads the response body while enforcing a byte limit.
fn read_response_limited(response: &mut Response, max_bytes: usize) -> Result<Vec<u8>, ProviderError> {
    let max_bytes_u64 = u64::try_from(max_bytes)
        .map_err(|_| ProviderError::Config("response size limit exceeds u64".to_string()))?;
    if let Some(expected) = response.content_length()
        && expected > max_bytes_u64
    {
        return Err(ProviderError::Transport("provider response exceeds size limit".to_string()));
    }
    let mut buf = Vec::new();
    response
        .take(max_bytes_u64.saturating_add(1))
        .read_to_end(&mut buf)
        .map_err(|err| ProviderError::Transport(format!("failed to read response: {err}")))?;
    if buf.len() > max_bytes {
        return Err(ProviderError::Transport("provider response exceeds size limit".to_string()));
    }
    Ok(buf)
}

/// Renders a bounded, lossy excerpt of a response body.
fn body_excerpt(body: &[u8]) -> String {
    let end = body.len().min(MAX_ERROR_EXCERPT_BYTES);
    String::from_utf8_lossy(&body[..end]).trim().to_string()
}

/// Landing URL for a DOI on the global resolver.
pub(crate) fn doi_resolver_url(doi: &str) -> String {
    format!("https://doi.org/{doi}")
}
