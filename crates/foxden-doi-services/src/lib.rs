// crates/foxden-doi-services/src/lib.rs
// ============================================================================
// Module: FOXDEN DOI Services
// Description: Network-facing collaborators for the DOI workflow.
// Purpose: Provide the HTTP metadata catalog client and the token signer.
// Dependencies: foxden-doi-core, reqwest, ed25519-dalek, base64
// ============================================================================

//! ## Overview
//! Concrete implementations of the collaborator interfaces defined in
//! `foxden-doi-core`: [`HttpMetadataCatalog`] talks to the FOXDEN metadata
//! service over blocking HTTP, and [`Ed25519TokenSigner`] issues compact
//! EdDSA-signed bearer tokens.
//! Invariants:
//! - Every catalog call carries a bearer token.
//! - Catalog responses are size-limited before decoding.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod auth;
pub mod catalog;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use auth::Ed25519TokenSigner;
pub use auth::KeyLoadError;
pub use catalog::CatalogHttpConfig;
pub use catalog::HttpMetadataCatalog;
