// crates/foxden-doi-providers/src/lib.rs
// ============================================================================
// Module: FOXDEN DOI Providers
// Description: Built-in DOI providers and registry utilities.
// Purpose: Publish datasets to external DOI registries by provider name.
// Dependencies: foxden-doi-core, reqwest, serde, time, url
// ============================================================================

//! ## Overview
//! This crate ships the built-in DOI providers (Zenodo, MaterialCommons,
//! DataCite) and a registry that routes publish requests by provider name.
//! Providers share a bounded blocking HTTP client with redirects disabled.
//! Invariants:
//! - Publish requests are routed via [`ProviderRegistry`] by provider name,
//!   ignoring case.
//! - Provider responses are size-limited and fail closed on unexpected shapes.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod datacite;
mod http;
pub mod materialcommons;
pub mod registry;
pub mod zenodo;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use datacite::DataCiteProvider;
pub use datacite::DataCiteProviderConfig;
pub use http::ProviderHttpConfig;
pub use materialcommons::MaterialCommonsProvider;
pub use materialcommons::MaterialCommonsProviderConfig;
pub use registry::BuiltinProviderConfigs;
pub use registry::DATACITE;
pub use registry::MATERIALCOMMONS;
pub use registry::ProviderRegistry;
pub use registry::ZENODO;
pub use zenodo::ZenodoProvider;
pub use zenodo::ZenodoProviderConfig;
