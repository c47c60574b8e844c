// src/keys.rs

use crate::error::InviteOidcError;
use crate::model::JsonWebKey;
use base64::engine::{general_purpose::URL_SAFE_NO_PAD, Engine};
use jsonwebtoken::{Algorithm, EncodingKey};
use once_cell::sync::OnceCell;
use rsa::pkcs1::EncodeRsaPrivateKey;
use rsa::traits::PublicKeyParts;
use rsa::{pkcs8::DecodePrivateKey, RsaPrivateKey};
use serde_json::json;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::debug;

/// The certificate/key store that supplies signing key material by thumbprint.
///
/// The hosting layer decides what backs this (an OS certificate store, a file,
/// a secrets manager). `Ok(None)` means the store has no matching entry.
pub trait KeyStore: Send + Sync {
    fn find_by_thumbprint(
        &self,
        thumbprint: &str,
    ) -> Result<Option<KeyMaterial>, InviteOidcError>;
}

/// Raw key material returned by a `KeyStore` lookup.
#[derive(Clone)]
pub struct KeyMaterial {
    /// PKCS#8 PEM-encoded private key. `None` when the store only holds the
    /// public half of the certificate, which is unusable for signing.
    pub private_key_pem: Option<String>,
}

/// A resolved signing key: the private encoding key together with the public
/// JWK it corresponds to and a stable key id.
///
/// Once built, the (private key, public key, algorithm, kid) tuple is immutable,
/// so the JWKS this crate publishes always matches the key tokens are signed with.
pub struct SigningKey {
    kid: String,
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    public_jwk: JsonWebKey,
}

impl SigningKey {
    /// Builds a `SigningKey` from store material.
    ///
    /// The private key is parsed from PKCS#8 PEM and re-encoded as PKCS#1 DER for
    /// `jsonwebtoken`, which handles that form reliably. The `kid` is the RFC 7638
    /// JWK thumbprint of the public key, so validators can match it regardless of
    /// how the certificate itself is identified.
    pub fn from_material(
        thumbprint: &str,
        material: &KeyMaterial,
    ) -> Result<Self, InviteOidcError> {
        let pem = material
            .private_key_pem
            .as_deref()
            .ok_or_else(|| InviteOidcError::MissingPrivateKey(thumbprint.to_string()))?;

        let private_key = RsaPrivateKey::from_pkcs8_pem(pem).map_err(|e| {
            InviteOidcError::InvalidKeyFormat(format!(
                "Failed to parse RSA private key from PKCS#8 PEM: {e}"
            ))
        })?;

        let pkcs1_der = private_key.to_pkcs1_der().map_err(|e| {
            InviteOidcError::InvalidKeyFormat(format!(
                "Failed to convert RSA key to PKCS#1 DER: {e}"
            ))
        })?;
        let encoding_key = EncodingKey::from_rsa_der(pkcs1_der.as_bytes());

        let public_key = private_key.to_public_key();
        let n = URL_SAFE_NO_PAD.encode(public_key.n().to_bytes_be());
        let e = URL_SAFE_NO_PAD.encode(public_key.e().to_bytes_be());

        // RFC 7638 JWK thumbprint: SHA-256 over the canonical JSON of the
        // required members, in lexicographic order.
        let canonical_jwk = json!({
            "e": e,
            "kty": "RSA",
            "n": n,
        });
        // Serialization of this static structure cannot fail.
        let canonical_jwk_string = serde_json::to_string(&canonical_jwk).unwrap();
        let mut hasher = Sha256::new();
        hasher.update(canonical_jwk_string.as_bytes());
        let kid = URL_SAFE_NO_PAD.encode(hasher.finalize());

        let algorithm = Algorithm::RS256;
        let public_jwk = JsonWebKey {
            kid: kid.clone(),
            kty: "RSA".to_string(),
            use_purpose: "sig".to_string(),
            alg: format!("{algorithm:?}"),
            n,
            e,
        };

        Ok(Self {
            kid,
            algorithm,
            encoding_key,
            public_jwk,
        })
    }

    /// The stable key id carried in token headers and the JWKS entry.
    pub fn kid(&self) -> &str {
        &self.kid
    }

    /// The signing algorithm of this key.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// The algorithm name as advertised in discovery metadata, e.g. "RS256".
    pub fn algorithm_name(&self) -> String {
        format!("{:?}", self.algorithm)
    }

    /// The private encoding key used to sign tokens.
    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    /// The public JWK corresponding to this signing key.
    pub fn public_jwk(&self) -> &JsonWebKey {
        &self.public_jwk
    }
}

/// Resolves the configured signing key from the key store, once per process.
///
/// `resolve` is idempotent: the first call performs the store lookup and every
/// later call returns the cached result. Initialization is single-flight, so
/// concurrent first calls perform exactly one lookup and all callers observe
/// the same key.
pub struct KeyResolver<S: KeyStore> {
    store: S,
    thumbprint: String,
    resolved: OnceCell<Arc<SigningKey>>,
}

impl<S: KeyStore> KeyResolver<S> {
    /// Creates a resolver for the key identified by `thumbprint`.
    pub fn new(store: S, thumbprint: String) -> Self {
        Self {
            store,
            thumbprint,
            resolved: OnceCell::new(),
        }
    }

    /// Returns the resolved signing key, performing the store lookup on first use.
    ///
    /// A failed lookup is reported immediately and not retried here: a missing
    /// certificate cannot appear without operator action, so the next request
    /// attempts resolution afresh rather than a retry loop doing so.
    pub fn resolve(&self) -> Result<Arc<SigningKey>, InviteOidcError> {
        if self.thumbprint.trim().is_empty() {
            return Err(InviteOidcError::MissingConfiguration(
                crate::config::setting::THUMBPRINT.to_string(),
            ));
        }

        self.resolved
            .get_or_try_init(|| {
                debug!(thumbprint = %self.thumbprint, "Resolving signing key from key store.");
                let material = self
                    .store
                    .find_by_thumbprint(&self.thumbprint)?
                    .ok_or_else(|| InviteOidcError::KeyNotFound(self.thumbprint.clone()))?;
                let key = SigningKey::from_material(&self.thumbprint, &material)?;
                debug!(kid = %key.kid(), "Signing key resolved and cached.");
                Ok(Arc::new(key))
            })
            .cloned()
    }
}
