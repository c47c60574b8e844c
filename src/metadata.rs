// src/metadata.rs

use crate::error::InviteOidcError;
use crate::keys::SigningKey;
use crate::model::OidcDiscoveryDocument;
use url::Url;

/// The fixed path, relative to the issuer, where the JWKS document is served.
pub const JWKS_PATH: &str = ".well-known/keys";

/// Derives the issuer URL from the serving request's own origin.
///
/// The scheme, host and base path are kept and the path is normalized to a
/// trailing slash. Both the `iss` claim of issued tokens and the discovery
/// document go through here, so the two always agree regardless of the
/// deployment hostname.
pub fn issuer_url(request_origin: &Url) -> Url {
    let mut issuer = request_origin.clone();
    issuer.set_query(None);
    issuer.set_fragment(None);
    if !issuer.path().ends_with('/') {
        let path = format!("{}/", issuer.path());
        issuer.set_path(&path);
    }
    issuer
}

/// Builds the OIDC discovery document for this deployment.
///
/// `jwks_uri` is always the issuer plus the fixed JWKS path, and the supported
/// signing algorithm list reflects the live resolved key, so metadata never
/// advertises an algorithm the service cannot produce.
pub fn publish(
    request_origin: &Url,
    key: &SigningKey,
) -> Result<OidcDiscoveryDocument, InviteOidcError> {
    let issuer = issuer_url(request_origin);
    let jwks_uri = issuer
        .join(JWKS_PATH)
        .map_err(|e| InviteOidcError::InvalidUrl(e.to_string()))?;

    Ok(OidcDiscoveryDocument {
        issuer: issuer.to_string(),
        jwks_uri: jwks_uri.to_string(),
        id_token_signing_alg_values_supported: vec![key.algorithm_name()],
    })
}
