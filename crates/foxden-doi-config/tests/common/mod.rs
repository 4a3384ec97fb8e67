// crates/foxden-doi-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared TOML fixtures for config validation tests.
// Purpose: Reduce duplication across integration tests for foxden-doi-config.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use foxden_doi_config::ConfigError;
use foxden_doi_config::FoxdenDoiConfig;

/// Smallest valid configuration.
pub const MINIMAL_TOML: &str = r#"
[authz]
client_id = "foxden-doi-client"
signing_key_path = "/etc/foxden/doi.key"

[services]
metadata_url = "https://foxden.example.org/meta"
"#;

/// Parses TOML without running validation.
pub fn parse(toml_str: &str) -> Result<FoxdenDoiConfig, toml::de::Error> {
    toml::from_str(toml_str)
}

/// Returns the minimal config with all defaults applied.
pub fn minimal_config() -> Result<FoxdenDoiConfig, toml::de::Error> {
    parse(MINIMAL_TOML)
}

/// Minimal TOML followed by `extra`.
pub fn with_sections(extra: &str) -> String {
    format!("{MINIMAL_TOML}\n{extra}")
}

/// Checks that `result` failed with a message containing `needle`.
pub fn assert_invalid<T>(result: Result<T, ConfigError>, needle: &str) -> Result<(), String> {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}
