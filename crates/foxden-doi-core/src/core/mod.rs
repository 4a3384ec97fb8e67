// crates/foxden-doi-core/src/core/mod.rs
// ============================================================================
// Module: FOXDEN DOI Core Types
// Description: Identifiers, metadata records, and service envelopes.
// Purpose: Group the data model shared by the workflow and its collaborators.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Core types are plain data: identifiers with schema extraction, catalog
//! records with DOI patching, and the wire envelopes of FOXDEN services.

pub mod identifiers;
pub mod record;
pub mod service;

pub use identifiers::DatasetId;
pub use identifiers::SchemaConflict;
pub use identifiers::SchemaName;
pub use identifiers::TokenScope;
pub use record::MetaRecord;
pub use record::MetadataRecord;
pub use record::ProviderResult;
pub use service::ServiceQuery;
pub use service::ServiceRequest;
pub use service::ServiceResponse;
pub use service::ServiceResults;
