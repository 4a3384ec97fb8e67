// crates/foxden-doi-config/src/lib.rs
// ============================================================================
// Module: FOXDEN DOI Config
// Description: Configuration model and validation for the DOI workflow.
// Purpose: Load the operator TOML file into typed component settings.
// Dependencies: foxden-doi-core, foxden-doi-providers, serde, toml
// ============================================================================

//! ## Overview
//! Loads `foxden-doi.toml`, validates it fail-closed, and converts it into
//! the settings consumed by the token issuer, catalog client, provider
//! registry, and synchronizer.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::AuthzConfig;
pub use config::ConfigError;
pub use config::FoxdenDoiConfig;
pub use config::HttpConfig;
pub use config::ServicesConfig;
pub use config::SyncConfig;
