// crates/foxden-doi-core/tests/metadata_sync.rs
// ============================================================================
// Module: Metadata Synchronization Tests
// Description: DOI propagation into catalog records.
// Purpose: Verify schema handling, field hygiene, idempotence, and policies.
// Dependencies: foxden-doi-core
// ============================================================================

//! ## Overview
//! Drives `MetadataSynchronizer::apply` against an in-memory catalog and
//! inspects the exact update envelopes it submits.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use std::sync::Arc;

use foxden_doi_core::CatalogError;
use foxden_doi_core::DatasetId;
use foxden_doi_core::FailurePolicy;
use foxden_doi_core::MetadataReader;
use foxden_doi_core::MetadataSynchronizer;
use foxden_doi_core::SyncOutcome;
use foxden_doi_core::TokenScope;
use foxden_doi_core::WorkflowError;
use serde_json::json;

use crate::common::FakeCatalog;
use crate::common::FakeSigner;
use crate::common::failed_response;
use crate::common::issuer;
use crate::common::ok_response;
use crate::common::record;

const DID: &str = "beamline=id1a3/experiment=42";
const DOI: &str = "10.5072/abc123";
const DOI_LINK: &str = "https://zenodo.org/record/abc123";

fn three_records() -> Vec<foxden_doi_core::MetadataRecord> {
    vec![
        record(json!({"_id": "a", "did": DID, "run": 1})),
        record(json!({"_id": "b", "did": DID, "run": 2})),
        record(json!({"_id": "c", "did": DID, "run": 3})),
    ]
}

#[test]
fn scenario_put_payload_matches_contract() {
    let signer = Arc::new(FakeSigner::default());
    let issuer = issuer(&signer);
    let catalog =
        FakeCatalog::with_records(vec![record(json!({"_id": "x", "did": DID, "sample": "Fe2O3"}))]);
    let sync = MetadataSynchronizer::new(MetadataReader::new(&issuer, &catalog), FailurePolicy::default());

    let report = sync.apply(&DatasetId::new(DID), DOI, DOI_LINK).unwrap();

    assert_eq!(report.updated, 1);
    assert_eq!(report.outcome(), SyncOutcome::Done);
    let updates = catalog.updates();
    assert_eq!(
        serde_json::to_value(&updates[0]).unwrap(),
        json!({
            "schema": "id1a3",
            "record": {"did": DID, "sample": "Fe2O3", "doi": DOI, "doi_url": DOI_LINK},
        })
    );
}

#[test]
fn multi_schema_did_is_rejected_before_any_call() {
    let signer = Arc::new(FakeSigner::default());
    let issuer = issuer(&signer);
    let catalog = FakeCatalog::with_records(three_records());
    let sync = MetadataSynchronizer::new(MetadataReader::new(&issuer, &catalog), FailurePolicy::Continue);

    let err = sync.apply(&DatasetId::new("beamline=3a,4b/experiment=1"), DOI, DOI_LINK).unwrap_err();

    assert!(matches!(err, WorkflowError::SchemaConflict(ref conflict) if conflict.schema == "3a,4b"));
    assert!(err.to_string().contains("multiple schemas"));
    assert!(catalog.calls().is_empty());
    assert!(signer.calls.lock().unwrap().is_empty());
}

#[test]
fn no_matching_records_is_zero_updates() {
    let signer = Arc::new(FakeSigner::default());
    let issuer = issuer(&signer);
    let catalog = FakeCatalog::default();
    let sync = MetadataSynchronizer::new(MetadataReader::new(&issuer, &catalog), FailurePolicy::default());

    let report = sync.apply(&DatasetId::new(DID), DOI, DOI_LINK).unwrap();

    assert_eq!(report.matched, 0);
    assert_eq!(report.updated, 0);
    assert_eq!(report.outcome(), SyncOutcome::Done);
    assert!(catalog.updates().is_empty());
}

#[test]
fn every_record_is_patched_with_a_fresh_write_token() {
    let signer = Arc::new(FakeSigner::default());
    let issuer = issuer(&signer);
    let catalog = FakeCatalog::with_records(three_records());
    let sync = MetadataSynchronizer::new(MetadataReader::new(&issuer, &catalog), FailurePolicy::default());

    let report = sync.apply(&DatasetId::new(DID), DOI, DOI_LINK).unwrap();

    assert_eq!(report.updated, 3);
    let updates = catalog.updates();
    assert_eq!(updates.len(), 3);
    for update in &updates {
        assert!(!update.record.contains("_id"));
        assert_eq!(update.record.doi(), Some(DOI));
        assert_eq!(update.record.get_str("doi_url"), Some(DOI_LINK));
        assert_eq!(update.schema.as_str(), "id1a3");
    }
    let tokens = catalog.update_tokens();
    assert_eq!(tokens, vec!["token-write-2", "token-write-3", "token-write-4"]);
    let calls = signer.calls.lock().unwrap();
    assert_eq!(calls[0].claims.scope, TokenScope::Read);
    assert!(calls[1..].iter().all(|call| call.claims.scope == TokenScope::Write));
}

#[test]
fn applying_twice_produces_identical_payloads() {
    let signer = Arc::new(FakeSigner::default());
    let issuer = issuer(&signer);
    let catalog = FakeCatalog::with_records(vec![record(
        json!({"_id": "x", "did": DID, "doi": DOI, "doi_url": DOI_LINK}),
    )]);
    let sync = MetadataSynchronizer::new(MetadataReader::new(&issuer, &catalog), FailurePolicy::default());

    sync.apply(&DatasetId::new(DID), DOI, DOI_LINK).unwrap();
    sync.apply(&DatasetId::new(DID), DOI, DOI_LINK).unwrap();

    let updates = catalog.updates();
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0], updates[1]);
    assert_eq!(updates[0].record.len(), 3);
}

#[test]
fn did_without_beamline_uses_empty_schema() {
    let signer = Arc::new(FakeSigner::default());
    let issuer = issuer(&signer);
    let catalog = FakeCatalog::with_records(vec![record(json!({"did": "experiment=42"}))]);
    let sync = MetadataSynchronizer::new(MetadataReader::new(&issuer, &catalog), FailurePolicy::default());

    let report = sync.apply(&DatasetId::new("experiment=42"), DOI, DOI_LINK).unwrap();

    assert!(report.schema.is_empty());
    assert_eq!(serde_json::to_value(&catalog.updates()[0]).unwrap()["schema"], json!(""));
}

#[test]
fn stop_on_first_returns_service_error_verbatim() {
    let signer = Arc::new(FakeSigner::default());
    let issuer = issuer(&signer);
    let catalog = FakeCatalog::with_records(three_records());
    catalog.push_update(Ok(ok_response()));
    catalog.push_update(Ok(failed_response("record does not match schema id1a3")));
    let sync = MetadataSynchronizer::new(MetadataReader::new(&issuer, &catalog), FailurePolicy::StopOnFirst);

    let err = sync.apply(&DatasetId::new(DID), DOI, DOI_LINK).unwrap_err();

    assert!(
        matches!(err, WorkflowError::RemoteService { ref message, .. } if message == "record does not match schema id1a3"),
        "{err:?}"
    );
    assert_eq!(catalog.updates().len(), 2);
}

#[test]
fn continue_policy_attempts_every_record() {
    let signer = Arc::new(FakeSigner::default());
    let issuer = issuer(&signer);
    let catalog = FakeCatalog::with_records(three_records());
    catalog.push_update(Ok(ok_response()));
    catalog.push_update(Ok(failed_response("schema mismatch")));
    catalog.push_update(Ok(ok_response()));
    let sync = MetadataSynchronizer::new(MetadataReader::new(&issuer, &catalog), FailurePolicy::Continue);

    let report = sync.apply(&DatasetId::new(DID), DOI, DOI_LINK).unwrap();

    assert_eq!(catalog.updates().len(), 3);
    assert_eq!(report.matched, 3);
    assert_eq!(report.updated, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].index, 1);
    assert_eq!(report.failures[0].message, "schema mismatch");
    assert_eq!(report.outcome(), SyncOutcome::PartiallyPropagated);
}

#[test]
fn continue_policy_reports_failed_when_nothing_was_written() {
    let signer = Arc::new(FakeSigner::default());
    let issuer = issuer(&signer);
    let catalog = FakeCatalog::with_records(three_records()[..2].to_vec());
    catalog.push_update(Err(CatalogError::Transport {
        endpoint: "PUT /".to_string(),
        message: "reset by peer".to_string(),
    }));
    catalog.push_update(Ok(failed_response("forbidden")));
    let sync = MetadataSynchronizer::new(MetadataReader::new(&issuer, &catalog), FailurePolicy::Continue);

    let report = sync.apply(&DatasetId::new(DID), DOI, DOI_LINK).unwrap();

    assert_eq!(report.updated, 0);
    assert_eq!(report.outcome(), SyncOutcome::Failed);
    assert!(report.failures[0].message.contains("reset by peer"));
    assert_eq!(report.failures[1].message, "forbidden");
}

#[test]
fn service_failure_without_message_reports_codes() {
    let signer = Arc::new(FakeSigner::default());
    let issuer = issuer(&signer);
    let catalog = FakeCatalog::with_records(vec![record(json!({"did": DID}))]);
    catalog.push_update(Ok(foxden_doi_core::ServiceResponse {
        srv_code: 0,
        http_code: 500,
        ..foxden_doi_core::ServiceResponse::default()
    }));
    let sync = MetadataSynchronizer::new(MetadataReader::new(&issuer, &catalog), FailurePolicy::StopOnFirst);

    let err = sync.apply(&DatasetId::new(DID), DOI, DOI_LINK).unwrap_err();

    assert!(err.to_string().contains("httpCode=500"), "{err}");
}

#[test]
fn candidate_fetch_failure_is_fatal() {
    let signer = Arc::new(FakeSigner::default());
    let issuer = issuer(&signer);
    let catalog = FakeCatalog {
        fail_fetch: true,
        ..FakeCatalog::with_records(three_records())
    };
    let sync = MetadataSynchronizer::new(MetadataReader::new(&issuer, &catalog), FailurePolicy::Continue);

    let err = sync.apply(&DatasetId::new(DID), DOI, DOI_LINK).unwrap_err();

    assert!(matches!(err, WorkflowError::Transport { .. }), "{err:?}");
    assert!(catalog.updates().is_empty());
}

#[test]
fn token_failure_mid_loop_is_fatal_under_continue() {
    let signer = Arc::new(FakeSigner::failing_after(2));
    let issuer = issuer(&signer);
    let catalog = FakeCatalog::with_records(three_records());
    let sync = MetadataSynchronizer::new(MetadataReader::new(&issuer, &catalog), FailurePolicy::Continue);

    let err = sync.apply(&DatasetId::new(DID), DOI, DOI_LINK).unwrap_err();

    assert!(matches!(err, WorkflowError::Auth { scope: TokenScope::Write, .. }), "{err:?}");
    assert_eq!(catalog.updates().len(), 1);
}
