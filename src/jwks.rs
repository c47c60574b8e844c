// src/jwks.rs

use crate::keys::SigningKey;
use crate::model::JsonWebKeySet;

/// Builds the JWKS document for the resolved signing key.
///
/// The set contains exactly one entry: the public JWK of the active key. Only
/// public parameters cross this boundary; the private key never leaves
/// `SigningKey`. The set form keeps the document shape open for key rollover,
/// even though this service holds a single active key.
pub fn publish(key: &SigningKey) -> JsonWebKeySet {
    JsonWebKeySet {
        keys: vec![key.public_jwk().clone()],
    }
}
