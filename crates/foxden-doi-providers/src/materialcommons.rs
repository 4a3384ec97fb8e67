// crates/foxden-doi-providers/src/materialcommons.rs
// ============================================================================
// Module: MaterialCommons DOI Provider
// Description: Dataset DOI publication through the MaterialCommons API.
// Purpose: Create a project dataset, assign it a DOI, and publish it.
// Dependencies: foxden-doi-core, reqwest, serde, serde_json
// ============================================================================

//! ## Overview
//! MaterialCommons wraps every response in a `{"data": ...}` envelope. A
//! dataset is created inside the configured project, a DOI is assigned to
//! it, and the dataset is published so the DOI resolves.

// ============================================================================
// SECTION: Imports
// ============================================================================

use foxden_doi_core::DoiProvider;
use foxden_doi_core::ProviderError;
use foxden_doi_core::ProviderResult;
use foxden_doi_core::PublishRequest;
use serde::Deserialize;
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

/// Default MaterialCommons API base URL.
pub const DEFAULT_MATERIALCOMMONS_URL: &str = "https://materialscommons.org/api";

/// Configuration for the MaterialCommons provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MaterialCommonsProviderConfig {
    /// MaterialCommons API base URL.
    #[serde(default = "default_materialcommons_url")]
    pub base_url: String,
    /// API token used as a bearer credential.
    pub api_token: String,
    /// Project that owns published datasets.
    pub project_id: u64,
}

impl MaterialCommonsProviderConfig {
    /// Creates a config for the public MaterialCommons instance.
    #[must_use]
    pub fn new(api_token: impl Into<String>, project_id: u64) -> Self {
        Self {
            base_url: default_materialcommons_url(),
            api_token: api_token.into(),
            project_id,
        }
    }
}

/// Serde default for [`MaterialCommonsProviderConfig::base_url`].
fn default_materialcommons_url() -> String {
    DEFAULT_MATERIALCOMMONS_URL.to_string()
}

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// Response envelope.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    /// Payload.
    data: T,
}

/// Dataset as returned by the API.
#[derive(Debug, Deserialize)]
struct Dataset {
    /// Dataset identifier.
    id: u64,
    /// Assigned DOI, once minted.
    #[serde(default)]
    doi: Option<String>,
}

// ============================================================================
// SECTION: Provider Implementation
// ============================================================================

/// DOI provider backed by MaterialCommons datasets.
pub struct MaterialCommonsProvider {
    /// Provider configuration.
    config: MaterialCommonsProviderConfig,
    /// HTTP client, built on init.
    client: LazyClient,
}

impl MaterialCommonsProvider {
    /// Creates a MaterialCommons provider.
    #[must_use]
    pub const fn new(config: MaterialCommonsProviderConfig, http: ProviderHttpConfig) -> Self {
        Self {
            config,
            client: LazyClient::new(http),
        }
    }

    /// Path of a dataset resource within the configured project.
    fn dataset_path(&self, dataset: u64, action: &str) -> String {
        format!("projects/{}/datasets/{dataset}/{action}", self.config.project_id)
    }
}

impl DoiProvider for MaterialCommonsProvider {
    fn init(&self) -> Result<(), ProviderError> {
        validate_base_url("materialcommons", &self.config.base_url)?;
        if self.config.api_token.trim().is_empty() {
            return Err(ProviderError::Config("materialcommons api_token must be set".to_string()));
        }
        self.client.get().map(|_| ())
    }

    fn publish(&self, request: &PublishRequest<'_>) -> Result<ProviderResult, ProviderError> {
        let client = self.client.get()?;
        let max_bytes = self.client.max_response_bytes();
        let token = self.config.api_token.as_str();

        let create_url =
            endpoint(&self.config.base_url, &format!("projects/{}/datasets", self.config.project_id))?;
        let body = json!({
            "name": request.did.as_str(),
            "description": request.description,
            "summary": request.description,
            "license": "",
        });
        let created: Envelope<Dataset> = send_json(
            client.post(create_url).bearer_auth(token).json(&body),
            max_bytes,
            "materialcommons create dataset",
        )?;
        let dataset = created.data.id;
        debug!(dataset, did = request.did.as_str(), "materialcommons dataset created");

        let assign_url = endpoint(&self.config.base_url, &self.dataset_path(dataset, "assign_doi"))?;
        let assigned: Envelope<Dataset> =
            send_json(client.put(assign_url).bearer_auth(token), max_bytes, "materialcommons assign doi")?;
        let doi = assigned.data.doi.filter(|doi| !doi.is_empty()).ok_or_else(|| {
            ProviderError::Decode(format!("materialcommons dataset {dataset} has no doi"))
        })?;

        let publish_url = endpoint(&self.config.base_url, &self.dataset_path(dataset, "publish"))?;
        send(client.put(publish_url).bearer_auth(token), max_bytes, "materialcommons publish")?;
        let doi_link = doi_resolver_url(&doi);
        Ok(ProviderResult::new(doi, doi_link))
    }
}
