// src/service.rs

use crate::config::Config;
use crate::error::InviteOidcError;
use crate::issuer::{self, InviteeData, IssuedToken};
use crate::jwks;
use crate::keys::{KeyResolver, KeyStore};
use crate::metadata;
use crate::model::{JsonWebKeySet, OidcDiscoveryDocument};
use serde::Serialize;
use tracing::error;
use url::Url;

/// The result of a successful invite issuance.
#[derive(Debug)]
pub struct InviteOutcome {
    /// The signed invite token.
    pub token: IssuedToken,
    /// The authorize URL carrying the token as `id_token_hint`.
    pub redirect_url: String,
}

/// The JSON envelope returned to external callers, for success and failure alike.
#[derive(Debug, Serialize)]
pub struct ApiMessage {
    pub message: String,
}

impl ApiMessage {
    /// The success body for an issued invite.
    pub fn invite_success(redirect_url: &str) -> Self {
        Self {
            message: format!("Invite token generated successfully. URL: {redirect_url}"),
        }
    }

    /// Converts an error into the failure body.
    ///
    /// The full error is logged here with context; only `public_message` reaches
    /// the caller, so operational detail stays out of response bodies.
    pub fn failure(err: &InviteOidcError) -> Self {
        error!(error = %err, user_error = err.is_user_error(), "Request failed.");
        Self {
            message: err.public_message(),
        }
    }
}

/// The three operations of the claims provider, behind one resolved signing key.
///
/// Stateless across invocations apart from the lazily cached key; safe to share
/// between concurrent requests. The hosting layer maps each method onto a route
/// and turns errors into responses via `ApiMessage::failure` (user errors map
/// to a client failure status, the rest to a server error).
pub struct InviteService<S: KeyStore> {
    config: Config,
    resolver: KeyResolver<S>,
}

impl<S: KeyStore> InviteService<S> {
    /// Creates the service from validated configuration and a key store.
    pub fn new(config: Config, store: S) -> Self {
        let resolver = KeyResolver::new(store, config.thumbprint.clone());
        Self { config, resolver }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Issues an invite token and the redirect URL embedding it.
    ///
    /// Validation runs before the key store is touched, so malformed input
    /// never triggers a lookup or a signature.
    pub fn issue_invite(
        &self,
        invitee: &InviteeData,
        request_origin: &Url,
    ) -> Result<InviteOutcome, InviteOidcError> {
        invitee.validate()?;

        let key = self.resolver.resolve()?;
        let issuer_url = metadata::issuer_url(request_origin);
        let token = issuer::issue(
            invitee,
            &self.config.client_id,
            &issuer_url,
            self.config.invite_expire_minutes,
            &key,
        )?;
        let redirect_url = issuer::build_redirect_url(token.as_str(), &self.config);

        Ok(InviteOutcome {
            token,
            redirect_url,
        })
    }

    /// Returns the JWKS document for the resolved signing key.
    pub fn published_keys(&self) -> Result<JsonWebKeySet, InviteOidcError> {
        let key = self.resolver.resolve()?;
        Ok(jwks::publish(&key))
    }

    /// Returns the OIDC discovery document for the given request origin.
    pub fn discovery_metadata(
        &self,
        request_origin: &Url,
    ) -> Result<OidcDiscoveryDocument, InviteOidcError> {
        let key = self.resolver.resolve()?;
        metadata::publish(request_origin, &key)
    }
}
