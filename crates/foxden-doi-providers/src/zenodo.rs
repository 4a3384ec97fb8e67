// crates/foxden-doi-providers/src/zenodo.rs
// ============================================================================
// Module: Zenodo DOI Provider
// Description: Deposit-based DOI publication through the Zenodo REST API.
// Purpose: Create a deposition, attach the metadata record, and publish it.
// Dependencies: foxden-doi-core, reqwest, serde, serde_json
// ============================================================================

//! ## Overview
//! Zenodo mints a DOI when a deposition is published. Publication is a
//! three-step exchange: create the deposition with descriptive metadata,
//! upload the dataset's metadata record as `metadata.json` into the
//! deposition bucket (Zenodo refuses to publish empty depositions), then
//! invoke the publish action.

// ============================================================================
// SECTION: Imports
// ============================================================================

use foxden_doi_core::DoiProvider;
use foxden_doi_core::ProviderError;
use foxden_doi_core::ProviderResult;
use foxden_doi_core::PublishRequest;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::Value;
use serde_json::json;
use tracing::debug;

use crate::http::LazyClient;
use crate::http::ProviderHttpConfig;
use crate::http::doi_resolver_url;
use crate::http::endpoint;
use crate::http::send;
use crate::http::send_json;
use crate::http::validate_base_url;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Default Zenodo API base URL.
pub const DEFAULT_ZENODO_URL: &str = "https://zenodo.org/api";
/// Creator listed when none are configured.
pub const DEFAULT_CREATOR: &str = "FOXDEN";
/// File name used for the uploaded metadata record.
const METADATA_FILE_NAME: &str = "metadata.json";

/// Configuration for the Zenodo provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ZenodoProviderConfig {
    /// Zenodo API base URL.
    #[serde(default = "default_zenodo_url")]
    pub base_url: String,
    /// Personal access token with deposit scopes.
    pub access_token: String,
    /// Optional community identifier the deposition is submitted to.
    #[serde(default)]
    pub community: Option<String>,
    /// Creator names listed on the deposition.
    #[serde(default)]
    pub creators: Vec<String>,
}

impl ZenodoProviderConfig {
    /// Creates a config for the public Zenodo instance.
    #[must_use]
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            base_url: default_zenodo_url(),
            access_token: access_token.into(),
            community: None,
            creators: Vec::new(),
        }
    }
}

/// Serde default for [`ZenodoProviderConfig::base_url`].
fn default_zenodo_url() -> String {
    DEFAULT_ZENODO_URL.to_string()
}

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// Deposition returned on creation.
#[derive(Debug, Deserialize)]
struct Deposition {
    /// Deposition identifier.
    id: u64,
    /// Related links.
    #[serde(default)]
    links: DepositionLinks,
}

/// Links attached to a deposition.
#[derive(Debug, Default, Deserialize)]
struct DepositionLinks {
    /// File bucket URL for uploads.
    bucket: Option<String>,
    /// Deposition page.
    html: Option<String>,
    /// Published record page.
    record_html: Option<String>,
}

/// Deposition returned by the publish action.
#[derive(Debug, Deserialize)]
struct PublishedDeposition {
    /// Minted DOI.
    doi: String,
    /// Related links.
    #[serde(default)]
    links: DepositionLinks,
}

// ============================================================================
// SECTION: Provider Implementation
// ============================================================================

/// DOI provider backed by Zenodo depositions.
pub struct ZenodoProvider {
    /// Provider configuration.
    config: ZenodoProviderConfig,
    /// HTTP client, built on init.
    client: LazyClient,
}

impl ZenodoProvider {
    /// Creates a Zenodo provider.
    #[must_use]
    pub const fn new(config: ZenodoProviderConfig, http: ProviderHttpConfig) -> Self {
        Self {
            config,
            client: LazyClient::new(http),
        }
    }

    /// Builds the deposition metadata for a publish request.
    fn deposition_metadata(&self, request: &PublishRequest<'_>) -> Value {
        let summary = if request.description.trim().is_empty() {
            request.did.as_str()
        } else {
            request.description
        };
        let creators: Vec<Value> = if self.config.creators.is_empty() {
            vec![json!({ "name": DEFAULT_CREATOR })]
        } else {
            self.config.creators.iter().map(|name| json!({ "name": name })).collect()
        };
        let mut metadata = json!({
            "title": summary,
            "upload_type": "dataset",
            "description": summary,
            "creators": creators,
            "notes": format!("FOXDEN dataset {}", request.did),
        });
        if let (Some(community), Some(object)) = (&self.config.community, metadata.as_object_mut()) {
            object.insert("communities".to_string(), json!([{ "identifier": community }]));
        }
        json!({ "metadata": metadata })
    }
}

impl DoiProvider for ZenodoProvider {
    fn init(&self) -> Result<(), ProviderError> {
        validate_base_url("zenodo", &self.config.base_url)?;
        if self.config.access_token.trim().is_empty() {
            return Err(ProviderError::Config("zenodo access_token must be set".to_string()));
        }
        self.client.get().map(|_| ())
    }

    fn publish(&self, request: &PublishRequest<'_>) -> Result<ProviderResult, ProviderError> {
        let client = self.client.get()?;
        let max_bytes = self.client.max_response_bytes();
        let token = self.config.access_token.as_str();

        let create_url = endpoint(&self.config.base_url, "deposit/depositions")?;
        let deposition: Deposition = send_json(
            client.post(create_url).bearer_auth(token).json(&self.deposition_metadata(request)),
            max_bytes,
            "zenodo create deposition",
        )?;
        debug!(deposition = deposition.id, did = request.did.as_str(), "zenodo deposition created");

        let bucket = deposition.links.bucket.ok_or_else(|| {
            ProviderError::Decode("zenodo deposition has no bucket link".to_string())
        })?;
        let upload_url = endpoint(&bucket, METADATA_FILE_NAME)?;
        let payload = serde_json::to_vec_pretty(request.record)
            .map_err(|err| ProviderError::Decode(format!("metadata record encoding: {err}")))?;
        send(
            client
                .put(upload_url)
                .bearer_auth(token)
                .header(CONTENT_TYPE, "application/octet-stream")
                .body(payload),
            max_bytes,
            "zenodo upload metadata",
        )?;

        let publish_url =
            endpoint(&self.config.base_url, &format!("deposit/depositions/{}/actions/publish", deposition.id))?;
        let published: PublishedDeposition =
            send_json(client.post(publish_url).bearer_auth(token), max_bytes, "zenodo publish")?;
        let doi_link = published
            .links
            .record_html
            .or(published.links.html)
            .unwrap_or_else(|| doi_resolver_url(&published.doi));
        Ok(ProviderResult::new(published.doi, doi_link))
    }
}
