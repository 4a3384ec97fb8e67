// crates/foxden-doi-core/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: In-memory collaborators for workflow tests.
// Purpose: Record every call so tests can assert on ordering and payloads.
// Dependencies: foxden-doi-core
// ============================================================================

//! ## Overview
//! Fakes for the token signer, metadata catalog, and provider dispatcher.
//! Each fake records the calls it receives behind a mutex.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::VecDeque;
use std::sync::Mutex;

use foxden_doi_core::AccessToken;
use foxden_doi_core::AccessTokenSigner;
use foxden_doi_core::AuthError;
use foxden_doi_core::CatalogError;
use foxden_doi_core::DatasetId;
use foxden_doi_core::DispatchError;
use foxden_doi_core::MetaRecord;
use foxden_doi_core::MetadataCatalog;
use foxden_doi_core::MetadataRecord;
use foxden_doi_core::ProviderDispatcher;
use foxden_doi_core::ProviderError;
use foxden_doi_core::ProviderResult;
use foxden_doi_core::PublishRequest;
use foxden_doi_core::ServiceRequest;
use foxden_doi_core::ServiceResponse;
use foxden_doi_core::TokenClaims;
use foxden_doi_core::TokenIssuer;
use foxden_doi_core::TokenIssuerConfig;
use serde_json::Value;

// ============================================================================
// SECTION: Records
// ============================================================================

/// Builds a metadata record from a JSON object literal.
pub fn record(value: Value) -> MetadataRecord {
    serde_json::from_value(value).unwrap()
}

/// Successful catalog write response.
pub fn ok_response() -> ServiceResponse {
    ServiceResponse {
        srv_code: 0,
        http_code: 200,
        ..ServiceResponse::default()
    }
}

/// Failed catalog write response carrying `error`.
pub fn failed_response(error: &str) -> ServiceResponse {
    ServiceResponse {
        srv_code: 7,
        http_code: 400,
        error: error.to_string(),
        ..ServiceResponse::default()
    }
}

// ============================================================================
// SECTION: Signer
// ============================================================================

/// Call recorded by [`FakeSigner`].
#[derive(Debug, Clone)]
pub struct SignCall {
    pub client_id: String,
    pub duration_secs: u64,
    pub claims: TokenClaims,
}

/// Signer returning sequential tokens and recording claims.
#[derive(Default)]
pub struct FakeSigner {
    pub calls: Mutex<Vec<SignCall>>,
    pub fail_after: Option<usize>,
}

impl FakeSigner {
    /// Signer that fails once `count` tokens have been issued.
    pub fn failing_after(count: usize) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_after: Some(count),
        }
    }
}

impl AccessTokenSigner for FakeSigner {
    fn sign(
        &self,
        client_id: &str,
        duration_secs: u64,
        claims: &TokenClaims,
    ) -> Result<AccessToken, AuthError> {
        let mut calls = self.calls.lock().unwrap();
        if self.fail_after.is_some_and(|limit| calls.len() >= limit) {
            return Err(AuthError::Signing("authz unavailable".to_string()));
        }
        calls.push(SignCall {
            client_id: client_id.to_string(),
            duration_secs,
            claims: claims.clone(),
        });
        Ok(AccessToken::new(format!("token-{}-{}", claims.scope, calls.len())))
    }
}

/// Builds an issuer over a shared fake signer.
pub fn issuer(signer: &std::sync::Arc<FakeSigner>) -> TokenIssuer {
    TokenIssuer::new(std::sync::Arc::clone(signer), TokenIssuerConfig::new("client-1"))
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Catalog call kinds recorded by [`FakeCatalog`].
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogCall {
    Search {
        token: String,
        request: ServiceRequest,
    },
    RecordsByDid {
        token: String,
        did: String,
    },
    Update {
        token: String,
        record: MetaRecord,
    },
}

/// In-memory catalog.
#[derive(Default)]
pub struct FakeCatalog {
    pub search_results: Vec<MetadataRecord>,
    pub did_results: Vec<MetadataRecord>,
    pub fail_fetch: bool,
    pub update_responses: Mutex<VecDeque<Result<ServiceResponse, CatalogError>>>,
    pub calls: Mutex<Vec<CatalogCall>>,
}

impl FakeCatalog {
    /// Catalog whose search and did lookups return `records`.
    pub fn with_records(records: Vec<MetadataRecord>) -> Self {
        Self {
            search_results: records.clone(),
            did_results: records,
            ..Self::default()
        }
    }

    /// Queues the response for the next update call.
    pub fn push_update(&self, response: Result<ServiceResponse, CatalogError>) {
        self.update_responses.lock().unwrap().push_back(response);
    }

    /// Returns the recorded calls.
    pub fn calls(&self) -> Vec<CatalogCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Returns the recorded update envelopes.
    pub fn updates(&self) -> Vec<MetaRecord> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                CatalogCall::Update {
                    record, ..
                } => Some(record),
                _ => None,
            })
            .collect()
    }

    /// Returns the tokens used for update calls.
    pub fn update_tokens(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                CatalogCall::Update {
                    token, ..
                } => Some(token),
                _ => None,
            })
            .collect()
    }
}

impl MetadataCatalog for FakeCatalog {
    fn search(
        &self,
        token: &AccessToken,
        request: &ServiceRequest,
    ) -> Result<Vec<MetadataRecord>, CatalogError> {
        self.calls.lock().unwrap().push(CatalogCall::Search {
            token: token.bearer().to_string(),
            request: request.clone(),
        });
        if self.fail_fetch {
            return Err(CatalogError::Transport {
                endpoint: "/search".to_string(),
                message: "connection refused".to_string(),
            });
        }
        Ok(self.search_results.clone())
    }

    fn records_by_did(
        &self,
        token: &AccessToken,
        did: &DatasetId,
    ) -> Result<Vec<MetadataRecord>, CatalogError> {
        self.calls.lock().unwrap().push(CatalogCall::RecordsByDid {
            token: token.bearer().to_string(),
            did: did.to_string(),
        });
        if self.fail_fetch {
            return Err(CatalogError::Transport {
                endpoint: "/record".to_string(),
                message: "connection refused".to_string(),
            });
        }
        Ok(self.did_results.clone())
    }

    fn update(
        &self,
        token: &AccessToken,
        record: &MetaRecord,
    ) -> Result<ServiceResponse, CatalogError> {
        self.calls.lock().unwrap().push(CatalogCall::Update {
            token: token.bearer().to_string(),
            record: record.clone(),
        });
        self.update_responses.lock().unwrap().pop_front().unwrap_or_else(|| Ok(ok_response()))
    }
}

// ============================================================================
// SECTION: Dispatcher
// ============================================================================

/// Dispatch call recorded by [`FakeDispatcher`].
#[derive(Debug, Clone)]
pub struct DispatchCall {
    pub provider: String,
    pub did: String,
    pub description: String,
    pub record: MetadataRecord,
}

/// Dispatcher knowing a fixed set of lowercase provider names.
pub struct FakeDispatcher {
    pub known: Vec<String>,
    pub result: Result<ProviderResult, String>,
    pub calls: Mutex<Vec<DispatchCall>>,
}

impl FakeDispatcher {
    /// Dispatcher answering every known provider with `result`.
    pub fn new(known: &[&str], result: ProviderResult) -> Self {
        Self {
            known: known.iter().map(|name| (*name).to_string()).collect(),
            result: Ok(result),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Dispatcher whose providers reject every publish call.
    pub fn failing(known: &[&str], message: &str) -> Self {
        Self {
            known: known.iter().map(|name| (*name).to_string()).collect(),
            result: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Returns the recorded calls.
    pub fn calls(&self) -> Vec<DispatchCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl ProviderDispatcher for FakeDispatcher {
    fn supports(&self, provider: &str) -> bool {
        self.known.contains(&provider.to_ascii_lowercase())
    }

    fn dispatch(
        &self,
        provider: &str,
        request: &PublishRequest<'_>,
    ) -> Result<ProviderResult, DispatchError> {
        self.calls.lock().unwrap().push(DispatchCall {
            provider: provider.to_string(),
            did: request.did.to_string(),
            description: request.description.to_string(),
            record: request.record.clone(),
        });
        match &self.result {
            Ok(result) => Ok(result.clone()),
            Err(message) => Err(DispatchError::Provider {
                provider: provider.to_string(),
                source: ProviderError::Rejected {
                    status: 500,
                    message: message.clone(),
                },
            }),
        }
    }
}
