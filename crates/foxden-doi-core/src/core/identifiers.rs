// crates/foxden-doi-core/src/core/identifiers.rs
// ============================================================================
// Module: FOXDEN DOI Identifiers
// Description: Dataset identifiers, schema names, and token scopes.
// Purpose: Provide strongly typed identifiers with stable wire forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A dataset identifier (`did`) is a `/`-joined sequence of `key=value`
//! segments. The value of the `beamline` segment names the schema that
//! governs the dataset's metadata shape. Schema extraction is strict: a
//! beamline value listing several schemas (comma-separated) is rejected.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Separator between `did` segments.
pub const DID_SEGMENT_SEPARATOR: char = '/';
/// Segment prefix carrying the schema name.
pub const SCHEMA_SEGMENT_PREFIX: &str = "beamline=";
/// Separator marking multiple schemas inside a beamline value.
const MULTI_SCHEMA_SEPARATOR: char = ',';

// ============================================================================
// SECTION: Dataset Identifier
// ============================================================================

/// Dataset identifier (`did`).
///
/// # Invariants
/// - Opaque UTF-8 string; segments are only interpreted by [`DatasetId::schema`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetId(String);

impl DatasetId {
    /// Creates a new dataset identifier.
    #[must_use]
    pub fn new(did: impl Into<String>) -> Self {
        Self(did.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterates over the `/`-separated segments of the identifier.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(DID_SEGMENT_SEPARATOR)
    }

    /// Returns the value of the first segment with the given key, if any.
    #[must_use]
    pub fn segment_value(&self, key: &str) -> Option<&str> {
        self.segments().find_map(|segment| {
            let (segment_key, value) = segment.split_once('=')?;
            (segment_key == key).then_some(value)
        })
    }

    /// Extracts the schema governing this dataset.
    ///
    /// A missing `beamline=` segment yields the empty schema, which is a
    /// valid single schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaConflict`] when the beamline value names more than one
    /// schema.
    pub fn schema(&self) -> Result<SchemaName, SchemaConflict> {
        let raw = self
            .segments()
            .find_map(|segment| segment.strip_prefix(SCHEMA_SEGMENT_PREFIX))
            .unwrap_or_default();
        if raw.contains(MULTI_SCHEMA_SEPARATOR) {
            return Err(SchemaConflict {
                did: self.0.clone(),
                schema: raw.to_string(),
            });
        }
        Ok(SchemaName::new(raw))
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for DatasetId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A dataset identifier that spans more than one schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported did={did} with multiple schemas {schema} for MetaData update")]
pub struct SchemaConflict {
    /// Offending dataset identifier.
    pub did: String,
    /// Raw beamline value listing several schemas.
    pub schema: String,
}

// ============================================================================
// SECTION: Schema Name
// ============================================================================

/// Schema name derived from a dataset identifier.
///
/// # Invariants
/// - Never contains a comma when produced by [`DatasetId::schema`].
/// - May be empty when the identifier has no beamline segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaName(String);

impl SchemaName {
    /// Creates a schema name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the schema name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when no schema was present in the identifier.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SchemaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// SECTION: Token Scope
// ============================================================================

/// Access scope requested for a bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenScope {
    /// Read-only catalog access.
    Read,
    /// Catalog write access.
    Write,
}

impl TokenScope {
    /// Returns the stable wire label for the scope.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}

impl fmt::Display for TokenScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
