// src/model.rs

use serde::{Deserialize, Serialize};

/// Represents a single JSON Web Key (JWK) as defined in RFC 7517.
///
/// Only public RSA parameters are carried; the private half of the signing key
/// never enters this type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonWebKey {
    pub kid: String,
    pub kty: String,
    #[serde(rename = "use")]
    pub use_purpose: String,
    pub alg: String,
    pub n: String,
    pub e: String,
}

/// Represents a JSON Web Key Set (JWKS), which is a collection of JWKs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonWebKeySet {
    pub keys: Vec<JsonWebKey>,
}

/// The OIDC discovery document served at `.well-known/openid-configuration`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OidcDiscoveryDocument {
    pub issuer: String,
    pub jwks_uri: String,
    pub id_token_signing_alg_values_supported: Vec<String>,
}
