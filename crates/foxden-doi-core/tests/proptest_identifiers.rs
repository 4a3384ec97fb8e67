// crates/foxden-doi-core/tests/proptest_identifiers.rs
// ============================================================================
// Module: Dataset Identifier Property Tests
// Description: Property-based checks for schema extraction.
// Purpose: Ensure multi-schema identifiers are always rejected.
// Dependencies: foxden-doi-core, proptest
// ============================================================================

//! ## Overview
//! Generates dataset identifiers with arbitrary segment values and checks
//! schema extraction and record patching invariants.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use foxden_doi_core::DatasetId;
use foxden_doi_core::MetadataRecord;
use proptest::prelude::*;
use serde_json::Map;
use serde_json::Value;

proptest! {
    #[test]
    fn beamline_value_is_the_schema(schema in "[a-z0-9]{1,8}", experiment in "[a-z0-9-]{0,12}") {
        let did = DatasetId::new(format!("/beamline={schema}/experiment={experiment}"));
        let derived = did.schema().unwrap();
        prop_assert_eq!(derived.as_str(), schema.as_str());
    }

    #[test]
    fn comma_separated_beamlines_conflict(first in "[a-z0-9]{0,6}", second in "[a-z0-9]{0,6}") {
        let did = DatasetId::new(format!("beamline={first},{second}/cycle=2024-1"));
        let err = did.schema().unwrap_err();
        prop_assert_eq!(err.schema, format!("{first},{second}"));
    }

    #[test]
    fn patched_records_never_keep_internal_id(
        fields in proptest::collection::btree_map("[a-z_]{1,6}", "[a-z0-9]{0,6}", 0..8),
        doi in "10\\.[0-9]{4}/[a-z0-9]{1,8}",
    ) {
        let mut map: Map<String, Value> =
            fields.into_iter().map(|(k, v)| (k, Value::String(v))).collect();
        map.insert("_id".to_string(), Value::String("internal".to_string()));
        let patched = MetadataRecord::new(map).with_doi(&doi, "https://doi.org/x");
        prop_assert!(!patched.contains("_id"));
        prop_assert_eq!(patched.doi(), Some(doi.as_str()));
        let again = patched.clone().with_doi(&doi, "https://doi.org/x");
        prop_assert_eq!(patched, again);
    }
}
