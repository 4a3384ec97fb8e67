// crates/foxden-doi-core/src/runtime/error.rs
// ============================================================================
// Module: FOXDEN DOI Workflow Errors
// Description: Error taxonomy for publication and synchronization.
// Purpose: Carry enough context to report a failure without re-deriving it.
// Dependencies: thiserror, crate::interfaces
// ============================================================================

//! ## Overview
//! [`WorkflowError`] is returned by every workflow operation. Variants carry
//! the offending dataset identifier, provider name, schema, or endpoint so the
//! caller can log or display the failure directly. Nothing is retried.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::DatasetId;
use crate::core::SchemaConflict;
use crate::core::TokenScope;
use crate::interfaces::AuthError;
use crate::interfaces::CatalogError;
use crate::interfaces::ProviderError;

// ============================================================================
// SECTION: Workflow Error
// ============================================================================

/// Errors surfaced by the publication workflow.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Token issuance failed.
    #[error("unable to issue {scope} token for user {user}: {source}")]
    Auth {
        /// User the token was requested for.
        user: String,
        /// Requested scope.
        scope: TokenScope,
        /// Signing failure.
        #[source]
        source: AuthError,
    },
    /// Network or I/O failure talking to a collaborator.
    #[error("transport error at {endpoint}: {message}")]
    Transport {
        /// Endpoint that failed.
        endpoint: String,
        /// Failure description.
        message: String,
    },
    /// Malformed JSON response from a collaborator.
    #[error("unable to decode response from {endpoint}: {message}")]
    Decode {
        /// Endpoint whose body failed to decode.
        endpoint: String,
        /// Decoder failure description.
        message: String,
    },
    /// No catalog record matched the dataset identifier.
    #[error("no metadata record found for did={did}")]
    NotFound {
        /// Dataset identifier searched for.
        did: String,
    },
    /// More than one catalog record matched where exactly one is required.
    #[error("wrong number of records for did={did}: expected 1, found {count}")]
    AmbiguousRecord {
        /// Dataset identifier searched for.
        did: String,
        /// Number of records returned.
        count: usize,
    },
    /// The dataset identifier spans more than one schema.
    #[error(transparent)]
    SchemaConflict(#[from] SchemaConflict),
    /// No provider is registered under the requested name.
    #[error("Provider '{provider}' is not supported")]
    UnsupportedProvider {
        /// Provider name exactly as requested.
        provider: String,
    },
    /// A collaborator reported a non-success status; message is its own.
    #[error("metadata service error for did={did}: {message}")]
    RemoteService {
        /// Dataset identifier being processed.
        did: String,
        /// Error text reported by the service.
        message: String,
    },
    /// The selected DOI provider failed.
    #[error("provider {provider} failed for did={did}: {source}")]
    Provider {
        /// Provider name exactly as requested.
        provider: String,
        /// Dataset identifier being published.
        did: String,
        /// Provider failure.
        #[source]
        source: ProviderError,
    },
}

impl WorkflowError {
    /// Maps a catalog failure into the workflow taxonomy for `did`.
    #[must_use]
    pub fn from_catalog(err: CatalogError, did: &DatasetId) -> Self {
        match err {
            CatalogError::Transport {
                endpoint,
                message,
            } => Self::Transport {
                endpoint,
                message,
            },
            CatalogError::Decode {
                endpoint,
                message,
            } => Self::Decode {
                endpoint,
                message,
            },
            CatalogError::Status {
                endpoint,
                status,
                message,
            } => Self::RemoteService {
                did: did.to_string(),
                message: format!("status {status} from {endpoint}: {message}"),
            },
        }
    }
}
