// crates/foxden-doi-core/src/runtime/mod.rs
// ============================================================================
// Module: FOXDEN DOI Runtime
// Description: Publication and synchronization workflow components.
// Purpose: Orchestrate token issuance, catalog reads, providers, and writes.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! Runtime components are synchronous and hold no shared mutable state; each
//! call performs blocking round trips through the configured collaborators.

pub mod error;
pub mod publisher;
pub mod reader;
pub mod sync;
pub mod token;

pub use error::WorkflowError;
pub use publisher::DatasetPublisher;
pub use reader::DEFAULT_CLIENT_NAME;
pub use reader::MetadataReader;
pub use sync::FailurePolicy;
pub use sync::MetadataSynchronizer;
pub use sync::RecordFailure;
pub use sync::SyncOutcome;
pub use sync::SyncReport;
pub use sync::patch_record;
pub use token::CLIENT_CREDENTIALS_KIND;
pub use token::DEFAULT_APPLICATION;
pub use token::DEFAULT_SERVICE_USER;
pub use token::DEFAULT_TOKEN_EXPIRES_SECS;
pub use token::TokenIssuer;
pub use token::TokenIssuerConfig;
