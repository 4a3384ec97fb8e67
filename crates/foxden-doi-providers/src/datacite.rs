// crates/foxden-doi-providers/src/datacite.rs
// ============================================================================
// Module: DataCite DOI Provider
// Description: Direct DOI registration through the DataCite REST API.
// Purpose: Register and publish a findable DOI for a dataset landing page.
// Dependencies: foxden-doi-core, reqwest, serde, serde_json, time, url
// ============================================================================

//! ## Overview
//! DataCite registers DOIs directly under a repository prefix. A single
//! JSON:API `POST /dois` with `event = publish` creates a findable DOI that
//! resolves to the dataset landing page. The landing page is the configured
//! `landing_url` with the dataset identifier passed as the `did` query
//! parameter.

// ============================================================================
// SECTION: Imports
// ============================================================================

use foxden_doi_core::DoiProvider;
use foxden_doi_core::ProviderError;
use foxden_doi_core::ProviderResult;
use foxden_doi_core::PublishRequest;
use reqwest::header::ACCEPT;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::Value;
use serde_json::json;
use time::OffsetDateTime;
use tracing::debug;
use url::Url;

use crate::http::LazyClient;
use crate::http::ProviderHttpConfig;
use crate::http::doi_resolver_url;
use crate::http::endpoint;
use crate::http::send_json;
use crate::http::validate_base_url;
use crate::zenodo::DEFAULT_CREATOR;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Default DataCite API base URL.
pub const DEFAULT_DATACITE_URL: &str = "https://api.datacite.org";
/// JSON:API media type required by DataCite.
const JSON_API_MEDIA_TYPE: &str = "application/vnd.api+json";

/// Configuration for the DataCite provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataCiteProviderConfig {
    /// DataCite API base URL.
    #[serde(default = "default_datacite_url")]
    pub base_url: String,
    /// Repository account identifier used for basic auth.
    pub repository_id: String,
    /// Repository password.
    pub password: String,
    /// DOI prefix owned by the repository.
    pub prefix: String,
    /// Publisher recorded on every DOI.
    pub publisher: String,
    /// Landing page base URL; the did is appended as a query parameter.
    pub landing_url: String,
    /// Creator names recorded on every DOI.
    #[serde(default)]
    pub creators: Vec<String>,
}

/// Serde default for [`DataCiteProviderConfig::base_url`].
fn default_datacite_url() -> String {
    DEFAULT_DATACITE_URL.to_string()
}

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// JSON:API document returned by DataCite.
#[derive(Debug, Deserialize)]
struct DoiDocument {
    /// Primary data.
    data: DoiData,
}

/// DOI resource.
#[derive(Debug, Deserialize)]
struct DoiData {
    /// DOI (JSON:API resource id).
    id: String,
    /// Resource attributes.
    #[serde(default)]
    attributes: DoiAttributes,
}

/// Subset of DOI attributes read back.
#[derive(Debug, Default, Deserialize)]
struct DoiAttributes {
    /// Registered DOI.
    doi: Option<String>,
}

// ============================================================================
// SECTION: Provider Implementation
// ============================================================================

/// DOI provider registering DOIs directly with DataCite.
pub struct DataCiteProvider {
    /// Provider configuration.
    config: DataCiteProviderConfig,
    /// HTTP client, built on init.
    client: LazyClient,
}

impl DataCiteProvider {
    /// Creates a DataCite provider.
    #[must_use]
    pub const fn new(config: DataCiteProviderConfig, http: ProviderHttpConfig) -> Self {
        Self {
            config,
            client: LazyClient::new(http),
        }
    }

    /// Landing page URL for a dataset.
    fn landing_page(&self, did: &str) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&self.config.landing_url).map_err(|err| {
            ProviderError::Config(format!("datacite landing_url is invalid: {err}"))
        })?;
        url.query_pairs_mut().append_pair("did", did);
        Ok(url)
    }

    /// Builds the JSON:API registration document.
    fn registration(&self, request: &PublishRequest<'_>, landing: &Url) -> Value {
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
        json!({
            "data": {
                "type": "dois",
                "attributes": {
                    "event": "publish",
                    "prefix": self.config.prefix,
                    "creators": creators,
                    "titles": [{ "title": summary }],
                    "publisher": self.config.publisher,
                    "publicationYear": OffsetDateTime::now_utc().year(),
                    "types": { "resourceTypeGeneral": "Dataset" },
                    "descriptions": [{
                        "description": summary,
                        "descriptionType": "Abstract",
                    }],
                    "url": landing.as_str(),
                }
            }
        })
    }
}

impl DoiProvider for DataCiteProvider {
    fn init(&self) -> Result<(), ProviderError> {
        validate_base_url("datacite", &self.config.base_url)?;
        validate_base_url("datacite landing", &self.config.landing_url)?;
        for (field, value) in [
            ("repository_id", &self.config.repository_id),
            ("password", &self.config.password),
            ("prefix", &self.config.prefix),
            ("publisher", &self.config.publisher),
        ] {
            if value.trim().is_empty() {
                return Err(ProviderError::Config(format!("datacite {field} must be set")));
            }
        }
        self.client.get().map(|_| ())
    }

    fn publish(&self, request: &PublishRequest<'_>) -> Result<ProviderResult, ProviderError> {
        let client = self.client.get()?;
        let landing = self.landing_page(request.did.as_str())?;
        let body = serde_json::to_vec(&self.registration(request, &landing))
            .map_err(|err| ProviderError::Decode(format!("datacite document encoding: {err}")))?;
        let url = endpoint(&self.config.base_url, "dois")?;
        let document: DoiDocument = send_json(
            client
                .post(url)
                .basic_auth(&self.config.repository_id, Some(&self.config.password))
                .header(CONTENT_TYPE, JSON_API_MEDIA_TYPE)
                .header(ACCEPT, JSON_API_MEDIA_TYPE)
                .body(body),
            self.client.max_response_bytes(),
            "datacite register doi",
        )?;
        let doi = document.data.attributes.doi.unwrap_or(document.data.id);
        debug!(doi = doi.as_str(), did = request.did.as_str(), "datacite doi registered");
        let doi_link = doi_resolver_url(&doi);
        Ok(ProviderResult::new(doi, doi_link))
    }
}
