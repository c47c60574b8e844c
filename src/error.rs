// src/error.rs

use thiserror::Error;

/// The primary error type for the `invite-oidc` crate.
#[derive(Debug, Error)]
pub enum InviteOidcError {
    #[error("A required configuration field is missing: {0}")]
    MissingConfiguration(String),

    #[error("Invalid configuration value for '{key}': {reason}")]
    InvalidConfiguration { key: String, reason: String },

    #[error("Invalid invitee data, check field(s): {0}")]
    InvalidInput(String),

    #[error("No signing certificate matches thumbprint '{0}' in the key store")]
    KeyNotFound(String),

    #[error("Signing key '{0}' has no accessible private key material")]
    MissingPrivateKey(String),

    #[error("Invalid key format: {0}")]
    InvalidKeyFormat(String),

    #[error("Key store lookup failed: {0}")]
    KeyStore(String),

    #[error("Token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl InviteOidcError {
    /// Whether the error is correctable by the caller (as opposed to the operator).
    pub fn is_user_error(&self) -> bool {
        matches!(self, InviteOidcError::InvalidInput(_))
    }

    /// The message safe to return to an external caller.
    ///
    /// Validation failures name the offending fields so the caller can fix its
    /// request. Operational errors (configuration, key store, signing) are logged
    /// in full at the operation boundary and reduced to a generic line here, so
    /// internal detail never leaks into a response body.
    pub fn public_message(&self) -> String {
        match self {
            InviteOidcError::InvalidInput(fields) => {
                format!("Fill in all fields correctly. Invalid field(s): {fields}")
            }
            _ => "An error occurred while processing the request".to_string(),
        }
    }
}
