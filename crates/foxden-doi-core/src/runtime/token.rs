// crates/foxden-doi-core/src/runtime/token.rs
// ============================================================================
// Module: FOXDEN DOI Token Issuer
// Description: Scoped bearer-token issuance for privileged calls.
// Purpose: Build client-credential claims and delegate signing.
// Dependencies: crate::interfaces, tracing
// ============================================================================

//! ## Overview
//! [`TokenIssuer`] produces a fresh token for every privileged call. Tokens
//! are never cached, so there is no token lifecycle state to invalidate.

// ============================================================================
// SECTION: Imports
// ============================================================================

use tracing::debug;

use crate::core::TokenScope;
use crate::interfaces::AccessToken;
use crate::interfaces::AccessTokenSigner;
use crate::interfaces::TokenClaims;
use crate::runtime::error::WorkflowError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Token lifetime used when none (or zero) is configured.
pub const DEFAULT_TOKEN_EXPIRES_SECS: u64 = 7200;
/// Credential kind carried in every claim set.
pub const CLIENT_CREDENTIALS_KIND: &str = "client_credentials";
/// Default application identity.
pub const DEFAULT_APPLICATION: &str = "FOXDEN";
/// Default identity used for calls made without an operator user.
pub const DEFAULT_SERVICE_USER: &str = "foxden-doi";

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Token issuance settings.
///
/// # Invariants
/// - `token_expires == 0` means [`DEFAULT_TOKEN_EXPIRES_SECS`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenIssuerConfig {
    /// Client identity presented to the signing authority.
    pub client_id: String,
    /// Configured token lifetime in seconds.
    pub token_expires: u64,
    /// Application identity embedded in claims.
    pub application: String,
    /// Identity used by [`TokenIssuer::issue_service`].
    pub service_user: String,
}

impl TokenIssuerConfig {
    /// Creates a config for `client_id` with default lifetime and identities.
    #[must_use]
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            token_expires: 0,
            application: DEFAULT_APPLICATION.to_string(),
            service_user: DEFAULT_SERVICE_USER.to_string(),
        }
    }

    /// Returns the lifetime actually requested from the signer.
    #[must_use]
    pub const fn effective_expiry(&self) -> u64 {
        if self.token_expires == 0 { DEFAULT_TOKEN_EXPIRES_SECS } else { self.token_expires }
    }
}

// ============================================================================
// SECTION: Token Issuer
// ============================================================================

/// Issues scoped bearer tokens through an [`AccessTokenSigner`].
pub struct TokenIssuer {
    /// Signing authority.
    signer: Box<dyn AccessTokenSigner + Send + Sync>,
    /// Issuance settings.
    config: TokenIssuerConfig,
}

impl TokenIssuer {
    /// Creates an issuer backed by `signer`.
    #[must_use]
    pub fn new(
        signer: impl AccessTokenSigner + Send + Sync + 'static,
        config: TokenIssuerConfig,
    ) -> Self {
        Self {
            signer: Box::new(signer),
            config,
        }
    }

    /// Returns the issuance settings.
    #[must_use]
    pub const fn config(&self) -> &TokenIssuerConfig {
        &self.config
    }

    /// Builds the claim set for `user` and `scope`.
    #[must_use]
    pub fn claims(&self, user: &str, scope: TokenScope) -> TokenClaims {
        TokenClaims {
            user: user.to_string(),
            scope,
            kind: CLIENT_CREDENTIALS_KIND.to_string(),
            application: self.config.application.clone(),
        }
    }

    /// Issues a token for `user` with `scope`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Auth`] carrying the signer's failure verbatim.
    pub fn issue(&self, user: &str, scope: TokenScope) -> Result<AccessToken, WorkflowError> {
        let claims = self.claims(user, scope);
        let duration = self.config.effective_expiry();
        debug!(user, scope = scope.as_str(), duration, "issuing access token");
        self.signer.sign(&self.config.client_id, duration, &claims).map_err(|source| {
            WorkflowError::Auth {
                user: user.to_string(),
                scope,
                source,
            }
        })
    }

    /// Issues a token for the configured service identity.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Auth`] when signing fails.
    pub fn issue_service(&self, scope: TokenScope) -> Result<AccessToken, WorkflowError> {
        self.issue(&self.config.service_user, scope)
    }
}
