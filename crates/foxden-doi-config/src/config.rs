// crates/foxden-doi-config/src/config.rs
// ============================================================================
// Module: FOXDEN DOI Configuration
// Description: Configuration loading and validation for FOXDEN DOI.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: foxden-doi-core, foxden-doi-providers, serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Unknown keys are rejected and every section is validated before use, so a
//! mistyped credential fails at startup rather than mid-publication.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use foxden_doi_core::DEFAULT_APPLICATION;
use foxden_doi_core::DEFAULT_CLIENT_NAME;
use foxden_doi_core::DEFAULT_SERVICE_USER;
use foxden_doi_core::FailurePolicy;
use foxden_doi_core::TokenIssuerConfig;
use foxden_doi_providers::BuiltinProviderConfigs;
use foxden_doi_providers::ProviderHttpConfig;
use foxden_doi_services::CatalogHttpConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "foxden-doi.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "FOXDEN_DOI_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Upper bound for `http.max_response_bytes`.
const MAX_RESPONSE_BYTES_LIMIT: usize = 64 * 1024 * 1024;
/// Upper bound for `http.timeout_ms`.
const MAX_TIMEOUT_MS: u64 = 10 * 60 * 1000;

// ============================================================================
// SECTION: Configuration Model
// ============================================================================

/// Root configuration for the FOXDEN DOI workflow.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FoxdenDoiConfig {
    /// Token issuance settings.
    pub authz: AuthzConfig,
    /// Metadata service settings.
    pub services: ServicesConfig,
    /// Outbound HTTP settings shared by every client.
    #[serde(default)]
    pub http: HttpConfig,
    /// Metadata synchronization settings.
    #[serde(default)]
    pub sync: SyncConfig,
    /// Provider sections; built-ins without a section fail at `init`.
    #[serde(default)]
    pub providers: BuiltinProviderConfigs,
}

/// `[authz]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthzConfig {
    /// Client identity presented to the signing authority.
    pub client_id: String,
    /// Token lifetime in seconds; `0` selects the default.
    #[serde(default)]
    pub token_expires: u64,
    /// Application identity embedded in token claims.
    #[serde(default = "default_application")]
    pub application: String,
    /// Identity used for tokens issued without an operator user.
    #[serde(default = "default_service_user")]
    pub service_user: String,
    /// File holding the Ed25519 signing seed.
    pub signing_key_path: PathBuf,
}

/// `[services]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServicesConfig {
    /// Metadata service base URL.
    pub metadata_url: String,
    /// Client name sent with search requests.
    #[serde(default = "default_client_name")]
    pub client_name: String,
}

/// `[http]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum response size allowed, in bytes.
    pub max_response_bytes: usize,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        let defaults = ProviderHttpConfig::default();
        Self {
            timeout_ms: defaults.timeout_ms,
            max_response_bytes: defaults.max_response_bytes,
            user_agent: defaults.user_agent,
        }
    }
}

/// `[sync]` section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    /// Behavior after a record write fails.
    pub failure_policy: FailurePolicy,
}

/// Serde default for [`AuthzConfig::application`].
fn default_application() -> String {
    DEFAULT_APPLICATION.to_string()
}

/// Serde default for [`AuthzConfig::service_user`].
fn default_service_user() -> String {
    DEFAULT_SERVICE_USER.to_string()
}

/// Serde default for [`ServicesConfig::client_name`].
fn default_client_name() -> String {
    DEFAULT_CLIENT_NAME.to_string()
}

// ============================================================================
// SECTION: Loading and Conversion
// ============================================================================

impl FoxdenDoiConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// The path is `path` when given, else `FOXDEN_DOI_CONFIG`, else
    /// `foxden-doi.toml` in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        Self::load_from(&resolved)
    }

    /// Loads configuration from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        validate_path(path)?;
        let bytes = fs::read(path)
            .map_err(|err| ConfigError::Io(format!("{}: {err}", path.display())))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.authz.validate()?;
        self.services.validate()?;
        self.http.validate()?;
        validate_providers(&self.providers)
    }

    /// Settings for the token issuer.
    #[must_use]
    pub fn token_issuer_config(&self) -> TokenIssuerConfig {
        TokenIssuerConfig {
            client_id: self.authz.client_id.clone(),
            token_expires: self.authz.token_expires,
            application: self.authz.application.clone(),
            service_user: self.authz.service_user.clone(),
        }
    }

    /// Settings for the metadata catalog client.
    #[must_use]
    pub fn catalog_http_config(&self) -> CatalogHttpConfig {
        CatalogHttpConfig {
            timeout_ms: self.http.timeout_ms,
            max_response_bytes: self.http.max_response_bytes,
            user_agent: self.http.user_agent.clone(),
        }
    }

    /// Provider sections with the shared HTTP settings applied.
    #[must_use]
    pub fn provider_configs(&self) -> BuiltinProviderConfigs {
        BuiltinProviderConfigs {
            http: ProviderHttpConfig {
                timeout_ms: self.http.timeout_ms,
                max_response_bytes: self.http.max_response_bytes,
                user_agent: self.http.user_agent.clone(),
            },
            ..self.providers.clone()
        }
    }
}

// ============================================================================
// SECTION: Section Validation
// ============================================================================

impl AuthzConfig {
    /// Validates the `[authz]` section.
    fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty("authz.client_id", &self.client_id)?;
        require_non_empty("authz.application", &self.application)?;
        require_non_empty("authz.service_user", &self.service_user)?;
        if self.signing_key_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("authz.signing_key_path must be non-empty".to_string()));
        }
        validate_path(&self.signing_key_path)
    }
}

impl ServicesConfig {
    /// Validates the `[services]` section.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_http_url("services.metadata_url", &self.metadata_url)?;
        require_non_empty("services.client_name", &self.client_name)
    }
}

impl HttpConfig {
    /// Validates the `[http]` section.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms == 0 || self.timeout_ms > MAX_TIMEOUT_MS {
            return Err(ConfigError::Invalid(format!(
                "http.timeout_ms must be between 1 and {MAX_TIMEOUT_MS}"
            )));
        }
        if self.max_response_bytes == 0 || self.max_response_bytes > MAX_RESPONSE_BYTES_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "http.max_response_bytes must be between 1 and {MAX_RESPONSE_BYTES_LIMIT}"
            )));
        }
        require_non_empty("http.user_agent", &self.user_agent)
    }
}

/// Validates every configured provider section.
fn validate_providers(providers: &BuiltinProviderConfigs) -> Result<(), ConfigError> {
    if let Some(zenodo) = &providers.zenodo {
        validate_http_url("providers.zenodo.base_url", &zenodo.base_url)?;
        require_non_empty("providers.zenodo.access_token", &zenodo.access_token)?;
    }
    if let Some(materialcommons) = &providers.materialcommons {
        validate_http_url("providers.materialcommons.base_url", &materialcommons.base_url)?;
        require_non_empty("providers.materialcommons.api_token", &materialcommons.api_token)?;
    }
    if let Some(datacite) = &providers.datacite {
        validate_http_url("providers.datacite.base_url", &datacite.base_url)?;
        validate_http_url("providers.datacite.landing_url", &datacite.landing_url)?;
        require_non_empty("providers.datacite.repository_id", &datacite.repository_id)?;
        require_non_empty("providers.datacite.password", &datacite.password)?;
        require_non_empty("providers.datacite.prefix", &datacite.prefix)?;
        require_non_empty("providers.datacite.publisher", &datacite.publisher)?;
    }
    Ok(())
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates a path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Rejects empty or whitespace-only values.
fn require_non_empty(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    Ok(())
}

/// Requires an absolute http(s) URL.
fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|err| ConfigError::Invalid(format!("{field} is not a valid url: {err}")))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::Invalid(format!("{field} must use http or https, not {other}"))),
    }
}
