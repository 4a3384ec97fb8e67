// crates/foxden-doi-providers/src/registry.rs
// ============================================================================
// Module: Provider Registry
// Description: Registry for built-in and external DOI providers.
// Purpose: Route publish requests by case-insensitive provider name.
// Dependencies: foxden-doi-core, serde
// ============================================================================

//! ## Overview
//! The provider registry resolves publish requests by provider name and
//! implements the core [`foxden_doi_core::ProviderDispatcher`] interface.
//! Names are matched case-insensitively; unknown names fail with
//! [`DispatchError::Unsupported`] carrying the name exactly as requested.
//! Each dispatch runs the provider's `init` step before `publish`.
//! Built-in providers are always registered; a built-in without a config
//! section fails its `init` step with [`ProviderError::Config`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use foxden_doi_core::DispatchError;
use foxden_doi_core::DoiProvider;
use foxden_doi_core::ProviderDispatcher;
use foxden_doi_core::ProviderError;
use foxden_doi_core::ProviderResult;
use foxden_doi_core::PublishRequest;
use serde::Deserialize;
use tracing::debug;

use crate::DataCiteProvider;
use crate::DataCiteProviderConfig;
use crate::MaterialCommonsProvider;
use crate::MaterialCommonsProviderConfig;
use crate::ProviderHttpConfig;
use crate::ZenodoProvider;
use crate::ZenodoProviderConfig;

// ============================================================================
// SECTION: Provider Names
// ============================================================================

/// Registry name of the Zenodo provider.
pub const ZENODO: &str = "zenodo";
/// Registry name of the MaterialCommons provider.
pub const MATERIALCOMMONS: &str = "materialcommons";
/// Registry name of the DataCite provider.
pub const DATACITE: &str = "datacite";

// ============================================================================
// SECTION: Built-in Config
// ============================================================================

/// Configuration bundle for built-in providers.
///
/// # Invariants
/// - Every built-in provider is registered; missing sections fail at `init`.
/// - `http` settings are shared by every registered provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuiltinProviderConfigs {
    /// Shared HTTP client settings.
    #[serde(skip)]
    pub http: ProviderHttpConfig,
    /// Configuration for the Zenodo provider.
    pub zenodo: Option<ZenodoProviderConfig>,
    /// Configuration for the MaterialCommons provider.
    pub materialcommons: Option<MaterialCommonsProviderConfig>,
    /// Configuration for the DataCite provider.
    pub datacite: Option<DataCiteProviderConfig>,
}

// ============================================================================
// SECTION: Provider Registry
// ============================================================================

/// DOI provider registry keyed by lowercase provider name.
///
/// # Invariants
/// - Provider names are unique within the registry, ignoring case.
/// - Registered providers are `Send + Sync` and stored behind trait objects.
#[derive(Default)]
pub struct ProviderRegistry {
    /// Provider implementations keyed by lowercase name.
    providers: BTreeMap<String, Box<dyn DoiProvider + Send + Sync>>,
    /// Built-in names registered without a config section.
    unconfigured: BTreeSet<String>,
}

impl ProviderRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with every built-in provider registered.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when registration fails.
    pub fn with_builtin_providers(configs: BuiltinProviderConfigs) -> Result<Self, ProviderError> {
        let mut registry = Self::new();
        registry.register_builtin_providers(configs)?;
        Ok(registry)
    }

    /// Registers a provider under the given name.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the name is empty or already registered.
    pub fn register_provider(
        &mut self,
        name: &str,
        provider: impl DoiProvider + Send + Sync + 'static,
    ) -> Result<(), ProviderError> {
        let key = normalize(name);
        if key.is_empty() {
            return Err(ProviderError::Config("provider name must not be empty".to_string()));
        }
        if self.providers.contains_key(&key) {
            return Err(ProviderError::Config(format!("provider already registered: {key}")));
        }
        self.providers.insert(key, Box::new(provider));
        Ok(())
    }

    /// Registers every built-in provider.
    ///
    /// Providers without a config section are registered as placeholders
    /// whose `init` step reports the missing section.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when registration fails.
    pub fn register_builtin_providers(
        &mut self,
        configs: BuiltinProviderConfigs,
    ) -> Result<(), ProviderError> {
        match configs.zenodo {
            Some(config) => {
                self.register_provider(ZENODO, ZenodoProvider::new(config, configs.http.clone()))?;
            }
            None => self.register_unconfigured(ZENODO)?,
        }
        match configs.materialcommons {
            Some(config) => self.register_provider(
                MATERIALCOMMONS,
                MaterialCommonsProvider::new(config, configs.http.clone()),
            )?,
            None => self.register_unconfigured(MATERIALCOMMONS)?,
        }
        match configs.datacite {
            Some(config) => {
                self.register_provider(DATACITE, DataCiteProvider::new(config, configs.http))?;
            }
            None => self.register_unconfigured(DATACITE)?,
        }
        Ok(())
    }

    /// Registers a placeholder for a built-in provider with no config section.
    fn register_unconfigured(&mut self, name: &'static str) -> Result<(), ProviderError> {
        self.register_provider(name, UnconfiguredProvider { name })?;
        self.unconfigured.insert(normalize(name));
        Ok(())
    }

    /// Returns registered provider names in sorted order.
    #[must_use]
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.keys().map(String::as_str).collect()
    }

    /// Returns names of providers that can publish, in sorted order.
    ///
    /// Built-in placeholders registered without a config section are omitted.
    #[must_use]
    pub fn configured_provider_names(&self) -> Vec<&str> {
        self.providers
            .keys()
            .filter(|name| !self.unconfigured.contains(*name))
            .map(String::as_str)
            .collect()
    }

    /// Looks up a provider by name, ignoring case.
    fn provider(&self, name: &str) -> Option<&(dyn DoiProvider + Send + Sync)> {
        self.providers.get(&normalize(name)).map(|provider| provider.as_ref())
    }
}

impl ProviderDispatcher for ProviderRegistry {
    fn supports(&self, provider: &str) -> bool {
        self.provider(provider).is_some()
    }

    fn dispatch(
        &self,
        provider: &str,
        request: &PublishRequest<'_>,
    ) -> Result<ProviderResult, DispatchError> {
        let Some(selected) = self.provider(provider) else {
            return Err(DispatchError::Unsupported {
                provider: provider.to_string(),
            });
        };
        let wrap = |source| DispatchError::Provider {
            provider: provider.to_string(),
            source,
        };
        selected.init().map_err(wrap)?;
        debug!(provider, did = request.did.as_str(), "dispatching publish request");
        selected.publish(request).map_err(wrap)
    }
}

// ============================================================================
// SECTION: Unconfigured Built-ins
// ============================================================================

/// Built-in provider registered without a config section.
struct UnconfiguredProvider {
    /// Registry name of the built-in provider.
    name: &'static str,
}

impl UnconfiguredProvider {
    /// Error reported for every lifecycle call.
    fn missing_section(&self) -> ProviderError {
        ProviderError::Config(format!(
            "{} section missing from providers configuration",
            self.name
        ))
    }
}

impl DoiProvider for UnconfiguredProvider {
    fn init(&self) -> Result<(), ProviderError> {
        Err(self.missing_section())
    }

    fn publish(&self, _request: &PublishRequest<'_>) -> Result<ProviderResult, ProviderError> {
        Err(self.missing_section())
    }
}

/// Canonical registry key for a provider name.
///
/// Matching ignores ASCII case only; surrounding whitespace is significant.
fn normalize(name: &str) -> String {
    name.to_ascii_lowercase()
}
