// crates/foxden-doi-core/src/interfaces/mod.rs
// ============================================================================
// Module: FOXDEN DOI Interfaces
// Description: Backend-agnostic interfaces for auth, catalog, and providers.
// Purpose: Define the contract surfaces consumed by the publication workflow.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Interfaces describe the collaborators the workflow talks to without
//! embedding transport details: a token signer, the metadata catalog, and
//! DOI providers behind a name-based dispatcher. Implementations report
//! failures verbatim and never retry.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::DatasetId;
use crate::core::MetaRecord;
use crate::core::MetadataRecord;
use crate::core::ProviderResult;
use crate::core::ServiceRequest;
use crate::core::ServiceResponse;
use crate::core::TokenScope;

// ============================================================================
// SECTION: Authentication
// ============================================================================

/// Bearer credential issued for a single privileged call.
///
/// # Invariants
/// - The token text is never rendered by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps an issued token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw bearer token.
    #[must_use]
    pub fn bearer(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Custom claims embedded in issued tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User identity the token acts for.
    pub user: String,
    /// Requested access scope.
    pub scope: TokenScope,
    /// Credential kind (always `client_credentials` for this workflow).
    pub kind: String,
    /// Application identity.
    pub application: String,
}

/// Token issuance errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The signing authority rejected or failed the request.
    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Signing authority that turns claims into bearer tokens.
pub trait AccessTokenSigner {
    /// Signs `claims` for `client_id` with the given lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] when the token cannot be produced.
    fn sign(
        &self,
        client_id: &str,
        duration_secs: u64,
        claims: &TokenClaims,
    ) -> Result<AccessToken, AuthError>;
}

impl<T: AccessTokenSigner + ?Sized> AccessTokenSigner for Arc<T> {
    fn sign(
        &self,
        client_id: &str,
        duration_secs: u64,
        claims: &TokenClaims,
    ) -> Result<AccessToken, AuthError> {
        (**self).sign(client_id, duration_secs, claims)
    }
}

// ============================================================================
// SECTION: Metadata Catalog
// ============================================================================

/// Metadata catalog errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Network or I/O failure talking to the catalog.
    #[error("catalog transport error at {endpoint}: {message}")]
    Transport {
        /// Endpoint that failed.
        endpoint: String,
        /// Underlying failure description.
        message: String,
    },
    /// The catalog answered with a body that is not the expected JSON.
    #[error("catalog decode error at {endpoint}: {message}")]
    Decode {
        /// Endpoint whose body failed to decode.
        endpoint: String,
        /// Decoder failure description.
        message: String,
    },
    /// The catalog answered with a non-success HTTP status.
    #[error("catalog returned status {status} at {endpoint}: {message}")]
    Status {
        /// Endpoint that answered.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Response body text (possibly truncated).
        message: String,
    },
}

/// Metadata catalog consumed by the workflow.
pub trait MetadataCatalog {
    /// Runs a structured search and returns matching records in order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on transport, status, or decode failures.
    fn search(
        &self,
        token: &AccessToken,
        request: &ServiceRequest,
    ) -> Result<Vec<MetadataRecord>, CatalogError>;

    /// Returns every record whose `did` field matches.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on transport, status, or decode failures.
    fn records_by_did(
        &self,
        token: &AccessToken,
        did: &DatasetId,
    ) -> Result<Vec<MetadataRecord>, CatalogError>;

    /// Submits a patched record and returns the service response.
    ///
    /// Implementations return the decoded response even when it reports a
    /// service-level failure; callers inspect [`ServiceResponse::is_success`].
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on transport or decode failures.
    fn update(
        &self,
        token: &AccessToken,
        record: &MetaRecord,
    ) -> Result<ServiceResponse, CatalogError>;
}

// ============================================================================
// SECTION: DOI Providers
// ============================================================================

/// Input handed to a provider publish call.
#[derive(Debug, Clone, Copy)]
pub struct PublishRequest<'a> {
    /// Dataset being published.
    pub did: &'a DatasetId,
    /// Human description of the dataset.
    pub description: &'a str,
    /// Authoritative metadata record for the dataset.
    pub record: &'a MetadataRecord,
}

/// DOI provider errors.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Provider configuration is missing or invalid.
    #[error("provider configuration error: {0}")]
    Config(String),
    /// Network or I/O failure talking to the provider.
    #[error("provider transport error: {0}")]
    Transport(String),
    /// Provider answered with a body that is not the expected JSON.
    #[error("provider decode error: {0}")]
    Decode(String),
    /// Provider rejected the request.
    #[error("provider rejected request with status {status}: {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body text (possibly truncated).
        message: String,
    },
}

/// A DOI-issuing backend.
pub trait DoiProvider {
    /// Prepares local provider state. Calling it again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the provider cannot be prepared.
    fn init(&self) -> Result<(), ProviderError>;

    /// Publishes the dataset and returns the minted DOI and its link.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when publication fails.
    fn publish(&self, request: &PublishRequest<'_>) -> Result<ProviderResult, ProviderError>;
}

/// Dispatch errors for provider selection.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No provider is registered under the requested name.
    #[error("Provider '{provider}' is not supported")]
    Unsupported {
        /// Provider name exactly as requested.
        provider: String,
    },
    /// The selected provider failed.
    #[error("provider {provider} failed: {source}")]
    Provider {
        /// Provider name exactly as requested.
        provider: String,
        /// Provider failure.
        #[source]
        source: ProviderError,
    },
}

/// Name-based selection over a set of DOI providers.
pub trait ProviderDispatcher {
    /// Returns true when a provider is registered under `provider`.
    fn supports(&self, provider: &str) -> bool;

    /// Initializes and invokes the provider registered under `provider`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] when the provider is unknown or fails.
    fn dispatch(
        &self,
        provider: &str,
        request: &PublishRequest<'_>,
    ) -> Result<ProviderResult, DispatchError>;
}
