// crates/foxden-doi-core/src/runtime/reader.rs
// ============================================================================
// Module: FOXDEN DOI Metadata Reader
// Description: Fetches metadata records for a dataset identifier.
// Purpose: Resolve the single authoritative record or every matching record.
// Dependencies: crate::interfaces, serde_json, tracing
// ============================================================================

//! ## Overview
//! [`MetadataReader::fetch_one`] is the strict precondition of publication:
//! exactly one catalog record must match the dataset identifier. Zero or
//! several matches fail rather than picking one.
//! [`MetadataReader::fetch_matching`] returns every match and is used by
//! synchronization, where an empty set is valid.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::json;
use tracing::debug;

use crate::core::DatasetId;
use crate::core::MetadataRecord;
use crate::core::ServiceQuery;
use crate::core::ServiceRequest;
use crate::core::TokenScope;
use crate::interfaces::MetadataCatalog;
use crate::runtime::error::WorkflowError;
use crate::runtime::token::TokenIssuer;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Client name sent in service request envelopes by default.
pub const DEFAULT_CLIENT_NAME: &str = "foxden-doi";

// ============================================================================
// SECTION: Metadata Reader
// ============================================================================

/// Reads metadata records from the catalog.
#[derive(Clone)]
pub struct MetadataReader<'a> {
    /// Token source for catalog reads.
    issuer: &'a TokenIssuer,
    /// Catalog backend.
    catalog: &'a (dyn MetadataCatalog + Send + Sync),
    /// Client name placed in search envelopes.
    client_name: String,
}

impl<'a> MetadataReader<'a> {
    /// Creates a reader using [`DEFAULT_CLIENT_NAME`].
    #[must_use]
    pub fn new(issuer: &'a TokenIssuer, catalog: &'a (dyn MetadataCatalog + Send + Sync)) -> Self {
        Self {
            issuer,
            catalog,
            client_name: DEFAULT_CLIENT_NAME.to_string(),
        }
    }

    /// Overrides the client name sent in search envelopes.
    #[must_use]
    pub fn with_client_name(mut self, client_name: impl Into<String>) -> Self {
        self.client_name = client_name.into();
        self
    }

    /// Returns the token issuer shared with this reader.
    #[must_use]
    pub const fn issuer(&self) -> &'a TokenIssuer {
        self.issuer
    }

    /// Returns the catalog backend.
    #[must_use]
    pub const fn catalog(&self) -> &'a (dyn MetadataCatalog + Send + Sync) {
        self.catalog
    }

    /// Builds the exact-match search envelope for `did`.
    #[must_use]
    pub fn did_search_request(&self, did: &DatasetId) -> ServiceRequest {
        let query = json!({ "did": did.as_str() }).to_string();
        ServiceRequest::new(self.client_name.clone(), ServiceQuery::unbounded(query))
    }

    /// Fetches the single record for `did` on behalf of `user`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::NotFound`] for zero matches,
    /// [`WorkflowError::AmbiguousRecord`] for more than one, and auth,
    /// transport, or decode errors from the collaborators.
    pub fn fetch_one(&self, user: &str, did: &DatasetId) -> Result<MetadataRecord, WorkflowError> {
        let token = self.issuer.issue(user, TokenScope::Read)?;
        let request = self.did_search_request(did);
        let mut records = self
            .catalog
            .search(&token, &request)
            .map_err(|err| WorkflowError::from_catalog(err, did))?;
        debug!(did = did.as_str(), matches = records.len(), "metadata search completed");
        match records.len() {
            0 => Err(WorkflowError::NotFound {
                did: did.to_string(),
            }),
            1 => Ok(records.remove(0)),
            count => Err(WorkflowError::AmbiguousRecord {
                did: did.to_string(),
                count,
            }),
        }
    }

    /// Fetches every record whose `did` field matches, using the service identity.
    ///
    /// # Errors
    ///
    /// Returns auth, transport, or decode errors; an empty result is not an error.
    pub fn fetch_matching(&self, did: &DatasetId) -> Result<Vec<MetadataRecord>, WorkflowError> {
        let token = self.issuer.issue_service(TokenScope::Read)?;
        let records = self
            .catalog
            .records_by_did(&token, did)
            .map_err(|err| WorkflowError::from_catalog(err, did))?;
        debug!(did = did.as_str(), matches = records.len(), "metadata records fetched");
        Ok(records)
    }
}
