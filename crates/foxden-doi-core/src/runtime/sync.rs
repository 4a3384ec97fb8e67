// crates/foxden-doi-core/src/runtime/sync.rs
// ============================================================================
// Module: FOXDEN DOI Metadata Synchronizer
// Description: Propagates a minted DOI into every matching catalog record.
// Purpose: Patch records schema-aware and track per-record outcomes.
// Dependencies: crate::interfaces, serde, tracing
// ============================================================================

//! ## Overview
//! [`MetadataSynchronizer::apply`] extracts the schema from the dataset
//! identifier, fetches every matching record, strips the catalog-internal
//! identity, sets `doi`/`doi_url`, and writes each record back with a fresh
//! write token.
//! Invariants:
//! - A multi-schema identifier fails before any catalog call.
//! - A failed candidate fetch is fatal; an empty candidate set is zero updates.
//! - Token issuance failures are always fatal.
//! - Writes already committed are never rolled back.
//! - Re-applying the same DOI yields the same record content.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use tracing::info;
use tracing::warn;

use crate::core::DatasetId;
use crate::core::MetaRecord;
use crate::core::MetadataRecord;
use crate::core::SchemaName;
use crate::core::TokenScope;
use crate::runtime::error::WorkflowError;
use crate::runtime::reader::MetadataReader;

// ============================================================================
// SECTION: Policy and Report
// ============================================================================

/// Behavior after a record write fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// End the call with the first failed record's error.
    #[default]
    StopOnFirst,
    /// Attempt every record and report failures in the [`SyncReport`].
    Continue,
}

/// Final state of a propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncOutcome {
    /// Every matching record was updated (possibly zero records).
    Done,
    /// Some records were updated and some failed.
    PartiallyPropagated,
    /// Every attempted record failed.
    Failed,
}

/// Failure recorded for a single record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordFailure {
    /// Position of the record in the catalog answer.
    pub index: usize,
    /// Failure message, verbatim from the service when it reported one.
    pub message: String,
}

/// Aggregate result of a propagation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Dataset identifier propagated.
    pub did: DatasetId,
    /// Schema the records were written under.
    pub schema: SchemaName,
    /// Number of records that matched the dataset identifier.
    pub matched: usize,
    /// Number of records successfully updated.
    pub updated: usize,
    /// Per-record failures (only populated under [`FailurePolicy::Continue`]).
    pub failures: Vec<RecordFailure>,
}

impl SyncReport {
    /// Classifies the report into a final workflow state.
    #[must_use]
    pub fn outcome(&self) -> SyncOutcome {
        if self.failures.is_empty() {
            SyncOutcome::Done
        } else if self.updated > 0 {
            SyncOutcome::PartiallyPropagated
        } else {
            SyncOutcome::Failed
        }
    }
}

// ============================================================================
// SECTION: Synchronizer
// ============================================================================

/// Writes minted DOIs back into the metadata catalog.
pub struct MetadataSynchronizer<'a> {
    /// Reader used to locate candidate records.
    reader: MetadataReader<'a>,
    /// Record failure handling.
    policy: FailurePolicy,
}

impl<'a> MetadataSynchronizer<'a> {
    /// Creates a synchronizer with the given failure policy.
    #[must_use]
    pub const fn new(reader: MetadataReader<'a>, policy: FailurePolicy) -> Self {
        Self {
            reader,
            policy,
        }
    }

    /// Returns the configured failure policy.
    #[must_use]
    pub const fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Propagates `doi` and `doi_link` to every record matching `did`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::SchemaConflict`] for multi-schema identifiers,
    /// fetch and auth failures, and, under [`FailurePolicy::StopOnFirst`], the
    /// first record write failure.
    pub fn apply(
        &self,
        did: &DatasetId,
        doi: &str,
        doi_link: &str,
    ) -> Result<SyncReport, WorkflowError> {
        let schema = did.schema()?;
        let records = self.reader.fetch_matching(did)?;
        let mut report = SyncReport {
            did: did.clone(),
            schema: schema.clone(),
            matched: records.len(),
            updated: 0,
            failures: Vec::new(),
        };

        for (index, record) in records.into_iter().enumerate() {
            let envelope = patch_record(&schema, record, doi, doi_link);
            match self.write(did, &envelope) {
                Ok(()) => report.updated += 1,
                Err(err @ WorkflowError::Auth { .. }) => return Err(err),
                Err(err) => {
                    warn!(did = did.as_str(), index, error = %err, "metadata record update failed");
                    if self.policy == FailurePolicy::StopOnFirst {
                        return Err(err);
                    }
                    report.failures.push(RecordFailure {
                        index,
                        message: failure_message(err),
                    });
                }
            }
        }

        info!(
            did = did.as_str(),
            schema = schema.as_str(),
            matched = report.matched,
            updated = report.updated,
            failed = report.failures.len(),
            "doi propagated to metadata records"
        );
        Ok(report)
    }

    /// Writes one patched record with a freshly issued write token.
    fn write(&self, did: &DatasetId, envelope: &MetaRecord) -> Result<(), WorkflowError> {
        let token = self.reader.issuer().issue_service(TokenScope::Write)?;
        let response = self
            .reader
            .catalog()
            .update(&token, envelope)
            .map_err(|err| WorkflowError::from_catalog(err, did))?;
        if response.is_success() {
            return Ok(());
        }
        let message = if response.error.is_empty() { response.to_string() } else { response.error };
        Err(WorkflowError::RemoteService {
            did: did.to_string(),
            message,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds the update envelope for one catalog record.
#[must_use]
pub fn patch_record(
    schema: &SchemaName,
    record: MetadataRecord,
    doi: &str,
    doi_link: &str,
) -> MetaRecord {
    MetaRecord {
        schema: schema.clone(),
        record: record.with_doi(doi, doi_link),
    }
}

/// Extracts the message recorded for a failed record.
fn failure_message(err: WorkflowError) -> String {
    match err {
        WorkflowError::RemoteService {
            message, ..
        } => message,
        other => other.to_string(),
    }
}
