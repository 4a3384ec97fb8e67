// crates/foxden-doi-services/src/auth.rs
// ============================================================================
// Module: Ed25519 Token Signer
// Description: Compact JWS access tokens signed with Ed25519.
// Purpose: Issue scoped bearer tokens for the metadata service.
// Dependencies: foxden-doi-core, ed25519-dalek, base64, serde_json, time
// ============================================================================

//! ## Overview
//! [`Ed25519TokenSigner`] implements [`AccessTokenSigner`] by producing a
//! compact JWS (`alg = EdDSA`, `typ = JWT`) whose header `kid` is the client
//! identifier. The payload carries the registered `iss`, `sub`, `iat`, and
//! `exp` claims plus the workflow claims `user`, `scope`, `kind`, and
//! `application`.
//!
//! Key material is a 32-byte Ed25519 seed, stored either as raw bytes or as
//! base64 text.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use ed25519_dalek::SECRET_KEY_LENGTH;
use ed25519_dalek::Signer;
use ed25519_dalek::SigningKey;
use ed25519_dalek::VerifyingKey;
use foxden_doi_core::AccessToken;
use foxden_doi_core::AccessTokenSigner;
use foxden_doi_core::AuthError;
use foxden_doi_core::TokenClaims;
use serde_json::json;
use thiserror::Error;
use time::OffsetDateTime;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// JWS algorithm identifier for Ed25519.
pub const JWS_ALGORITHM: &str = "EdDSA";
/// Largest key file accepted, in bytes.
const MAX_KEY_FILE_BYTES: u64 = 4 * 1024;

// ============================================================================
// SECTION: Key Loading
// ============================================================================

/// Signing key loading errors.
#[derive(Debug, Error)]
pub enum KeyLoadError {
    /// The key file could not be read.
    #[error("failed to read signing key {path}: {source}")]
    Io {
        /// Key file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The key file does not contain a 32-byte seed.
    #[error("invalid signing key {path}: {message}")]
    Format {
        /// Key file path.
        path: PathBuf,
        /// Description of the problem.
        message: String,
    },
}

// ============================================================================
// SECTION: Signer
// ============================================================================

/// Access token signer backed by an Ed25519 key.
pub struct Ed25519TokenSigner {
    /// Private signing key.
    key: SigningKey,
}

impl Ed25519TokenSigner {
    /// Creates a signer from a 32-byte seed.
    #[must_use]
    pub fn from_seed(seed: &[u8; SECRET_KEY_LENGTH]) -> Self {
        Self {
            key: SigningKey::from_bytes(seed),
        }
    }

    /// Loads a signer from a key file holding a raw or base64 seed.
    ///
    /// # Errors
    ///
    /// Returns [`KeyLoadError`] when the file is unreadable, too large, or
    /// does not decode to exactly 32 bytes.
    pub fn from_key_file(path: &Path) -> Result<Self, KeyLoadError> {
        let io_error = |source| KeyLoadError::Io {
            path: path.to_path_buf(),
            source,
        };
        let format_error = |message: String| KeyLoadError::Format {
            path: path.to_path_buf(),
            message,
        };
        let size = fs::metadata(path).map_err(io_error)?.len();
        if size > MAX_KEY_FILE_BYTES {
            return Err(format_error(format!("file is {size} bytes")));
        }
        let bytes = fs::read(path).map_err(io_error)?;
        let seed = decode_seed(&bytes).map_err(format_error)?;
        Ok(Self::from_seed(&seed))
    }

    /// Returns the public key that verifies issued tokens.
    #[must_use]
    pub fn verifying_key(&self) -> VerifyingKey {
        self.key.verifying_key()
    }
}

impl fmt::Debug for Ed25519TokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ed25519TokenSigner")
            .field("verifying_key", &URL_SAFE_NO_PAD.encode(self.verifying_key().as_bytes()))
            .finish_non_exhaustive()
    }
}

impl AccessTokenSigner for Ed25519TokenSigner {
    fn sign(
        &self,
        client_id: &str,
        duration_secs: u64,
        claims: &TokenClaims,
    ) -> Result<AccessToken, AuthError> {
        let issued_at = OffsetDateTime::now_utc().unix_timestamp();
        let lifetime = i64::try_from(duration_secs)
            .map_err(|_| AuthError::Signing(format!("token lifetime {duration_secs}s is too large")))?;
        let header = json!({
            "alg": JWS_ALGORITHM,
            "typ": "JWT",
            "kid": client_id,
        });
        let payload = json!({
            "iss": client_id,
            "sub": claims.user,
            "iat": issued_at,
            "exp": issued_at.saturating_add(lifetime),
            "user": claims.user,
            "scope": claims.scope,
            "kind": claims.kind,
            "application": claims.application,
        });
        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(header.to_string()),
            URL_SAFE_NO_PAD.encode(payload.to_string())
        );
        let signature = self.key.sign(signing_input.as_bytes());
        Ok(AccessToken::new(format!(
            "{signing_input}.{}",
            URL_SAFE_NO_PAD.encode(signature.to_bytes())
        )))
    }
}

/// Decodes a seed stored as raw bytes or base64 text.
fn decode_seed(bytes: &[u8]) -> Result<[u8; SECRET_KEY_LENGTH], String> {
    if let Ok(seed) = <[u8; SECRET_KEY_LENGTH]>::try_from(bytes) {
        return Ok(seed);
    }
    let text = std::str::from_utf8(bytes)
        .map_err(|_| format!("expected {SECRET_KEY_LENGTH} raw bytes or base64 text"))?
        .trim();
    let decoded = STANDARD
        .decode(text)
        .or_else(|_| URL_SAFE_NO_PAD.decode(text))
        .map_err(|err| format!("base64 decode failed: {err}"))?;
    <[u8; SECRET_KEY_LENGTH]>::try_from(decoded.as_slice())
        .map_err(|_| format!("seed is {} bytes, expected {SECRET_KEY_LENGTH}", decoded.len()))
}
