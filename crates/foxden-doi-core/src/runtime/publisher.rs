// crates/foxden-doi-core/src/runtime/publisher.rs
// ============================================================================
// Module: FOXDEN DOI Dataset Publisher
// Description: Publishes a dataset through a named DOI provider.
// Purpose: Combine the metadata precondition with provider dispatch.
// Dependencies: crate::interfaces, tracing
// ============================================================================

//! ## Overview
//! [`DatasetPublisher::publish_dataset`] resolves the provider name first,
//! then fetches the single authoritative record, then makes exactly one
//! provider attempt. An unknown provider or an ambiguous dataset fails
//! before any provider is contacted. The minted DOI is returned to the
//! caller, who decides when to propagate it with the synchronizer.

// ============================================================================
// SECTION: Imports
// ============================================================================

use tracing::info;
use tracing::warn;

use crate::core::DatasetId;
use crate::core::ProviderResult;
use crate::interfaces::DispatchError;
use crate::interfaces::ProviderDispatcher;
use crate::interfaces::PublishRequest;
use crate::runtime::error::WorkflowError;
use crate::runtime::reader::MetadataReader;

// ============================================================================
// SECTION: Publisher
// ============================================================================

/// Publishes datasets to DOI providers.
pub struct DatasetPublisher<'a> {
    /// Metadata source for the publish precondition.
    reader: MetadataReader<'a>,
    /// Provider selection.
    dispatcher: &'a (dyn ProviderDispatcher + Send + Sync),
}

impl<'a> DatasetPublisher<'a> {
    /// Creates a publisher.
    #[must_use]
    pub const fn new(
        reader: MetadataReader<'a>,
        dispatcher: &'a (dyn ProviderDispatcher + Send + Sync),
    ) -> Self {
        Self {
            reader,
            dispatcher,
        }
    }

    /// Publishes `did` with `provider` on behalf of `user`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::UnsupportedProvider`] for unknown providers,
    /// metadata precondition failures from [`MetadataReader::fetch_one`], and
    /// [`WorkflowError::Provider`] when the provider call fails.
    pub fn publish_dataset(
        &self,
        user: &str,
        provider: &str,
        did: &DatasetId,
        description: &str,
    ) -> Result<ProviderResult, WorkflowError> {
        if !self.dispatcher.supports(provider) {
            warn!(provider, did = did.as_str(), "provider is not supported");
            return Err(WorkflowError::UnsupportedProvider {
                provider: provider.to_string(),
            });
        }
        let record = self.reader.fetch_one(user, did)?;
        let request = PublishRequest {
            did,
            description,
            record: &record,
        };
        let result = self.dispatcher.dispatch(provider, &request).map_err(|err| match err {
            DispatchError::Unsupported {
                provider,
            } => WorkflowError::UnsupportedProvider {
                provider,
            },
            DispatchError::Provider {
                provider,
                source,
            } => WorkflowError::Provider {
                provider,
                did: did.to_string(),
                source,
            },
        })?;
        info!(provider, did = did.as_str(), doi = result.doi.as_str(), "dataset published");
        Ok(result)
    }
}
