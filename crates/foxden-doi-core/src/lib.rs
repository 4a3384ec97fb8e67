// crates/foxden-doi-core/src/lib.rs
// ============================================================================
// Module: FOXDEN DOI Core Library
// Description: Dataset publication and DOI synchronization workflow.
// Purpose: Provide the provider-agnostic core of DOI publication.
// Dependencies: serde, serde_json, thiserror, tracing
// ============================================================================

//! ## Overview
//! `foxden-doi-core` mints DOIs for datasets through pluggable providers and
//! propagates them back into the FOXDEN metadata catalog. Collaborators
//! (token signer, catalog, providers) are consumed through the traits in
//! [`interfaces`]; concrete HTTP implementations live in sibling crates.
//! Invariants:
//! - Publication requires exactly one catalog record for the dataset.
//! - Synchronization targets exactly one schema per dataset identifier.
//! - No operation retries; errors are returned to the caller with context.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;
pub use interfaces::*;
pub use runtime::*;
