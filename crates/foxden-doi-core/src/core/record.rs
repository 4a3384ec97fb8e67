// crates/foxden-doi-core/src/core/record.rs
// ============================================================================
// Module: FOXDEN DOI Metadata Records
// Description: Catalog-owned metadata records and DOI patching.
// Purpose: Model records as opaque JSON maps with typed accessors.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Metadata records are owned by the catalog and treated as field maps. The
//! workflow only reads them and rewrites them with DOI fields; it never
//! creates or deletes records.
//! Invariants:
//! - [`MetadataRecord::with_doi`] strips [`INTERNAL_ID_FIELD`] and sets both
//!   DOI fields, so applying it twice yields the same record.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::core::identifiers::SchemaName;

// ============================================================================
// SECTION: Field Names
// ============================================================================

/// Catalog-internal identity field; never part of the logical schema.
pub const INTERNAL_ID_FIELD: &str = "_id";
/// Field holding the dataset identifier.
pub const DID_FIELD: &str = "did";
/// Field holding the minted DOI.
pub const DOI_FIELD: &str = "doi";
/// Field holding the DOI landing-page URL.
pub const DOI_URL_FIELD: &str = "doi_url";

// ============================================================================
// SECTION: Metadata Record
// ============================================================================

/// Metadata record as stored by the catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataRecord(Map<String, Value>);

impl MetadataRecord {
    /// Creates a record from a JSON field map.
    #[must_use]
    pub const fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Returns the value stored under `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Returns the string value stored under `field`, if it is a string.
    #[must_use]
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// Returns true when the record carries `field`.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Returns the record's dataset identifier field, if present.
    #[must_use]
    pub fn did(&self) -> Option<&str> {
        self.get_str(DID_FIELD)
    }

    /// Returns the record's DOI field, if present.
    #[must_use]
    pub fn doi(&self) -> Option<&str> {
        self.get_str(DOI_FIELD)
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the underlying field map.
    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consumes the record and returns the field map.
    #[must_use]
    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }

    /// Returns a copy prepared for a catalog update carrying the DOI fields.
    ///
    /// The internal identity field is removed and `doi`/`doi_url` are
    /// overwritten with the supplied values.
    #[must_use]
    pub fn with_doi(mut self, doi: &str, doi_link: &str) -> Self {
        self.0.remove(INTERNAL_ID_FIELD);
        self.0.insert(DOI_FIELD.to_string(), Value::String(doi.to_string()));
        self.0.insert(DOI_URL_FIELD.to_string(), Value::String(doi_link.to_string()));
        self
    }
}

impl From<Map<String, Value>> for MetadataRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

// ============================================================================
// SECTION: Update Envelope
// ============================================================================

/// Update envelope submitted to the catalog.
///
/// # Invariants
/// - `record` never carries [`INTERNAL_ID_FIELD`] when built by the workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaRecord {
    /// Schema governing the record's field shape.
    pub schema: SchemaName,
    /// Patched record fields.
    pub record: MetadataRecord,
}

// ============================================================================
// SECTION: Provider Result
// ============================================================================

/// DOI minted by a provider together with its resolvable link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderResult {
    /// Minted DOI.
    pub doi: String,
    /// Resolvable landing-page URL.
    pub doi_link: String,
}

impl ProviderResult {
    /// Creates a provider result.
    #[must_use]
    pub fn new(doi: impl Into<String>, doi_link: impl Into<String>) -> Self {
        Self {
            doi: doi.into(),
            doi_link: doi_link.into(),
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
