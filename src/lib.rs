// src/lib.rs

pub mod config;
pub mod error;
pub mod issuer;
pub mod jwks;
pub mod keys;
pub mod metadata;
pub mod model;
pub mod service;

/// The public prelude for the `invite-oidc` crate.
///
/// This module re-exports the most commonly used types for convenience.
pub mod prelude {
    pub use crate::config::{Config, ConfigBuilder, SettingsProvider};
    pub use crate::error::InviteOidcError;
    pub use crate::issuer::{InviteClaims, InviteeData, IssuedToken};
    pub use crate::keys::{KeyMaterial, KeyResolver, KeyStore, SigningKey};
    pub use crate::model::{JsonWebKey, JsonWebKeySet, OidcDiscoveryDocument};
    pub use crate::service::{ApiMessage, InviteOutcome, InviteService};
    pub use jsonwebtoken::Algorithm;
}
