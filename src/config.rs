// src/config.rs

use crate::error::InviteOidcError;
use std::collections::HashMap;

/// Names of the settings consumed from the injected configuration provider.
pub mod setting {
    pub const THUMBPRINT: &str = "thumbprint";
    pub const INVITE_EXPIRE_MINUTES: &str = "invite_expire_minutes";
    pub const CLIENT_ID: &str = "client_id";
    pub const TENANT: &str = "tenant";
    pub const POLICY: &str = "policy";
    pub const REDIRECT_URI: &str = "redirect_uri";
    pub const AUTHORIZE_URL_TEMPLATE: &str = "authorize_url_template";
}

/// Placeholders that must appear in the authorize URL template.
pub const TEMPLATE_PLACEHOLDERS: [&str; 5] = [
    "{tenant}",
    "{policy}",
    "{client_id}",
    "{redirect_uri}",
    "{nonce}",
];

/// A key/value source for process configuration.
///
/// The hosting layer decides where settings come from (environment, app settings
/// file, secret store); the crate only ever asks for named string values.
pub trait SettingsProvider {
    fn get(&self, key: &str) -> Option<String>;
}

impl SettingsProvider for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

/// The validated configuration for the invite service.
///
/// This struct holds everything the three operations need: the signing key
/// identifier, token lifetime, OIDC client id, and the pieces of the redirect
/// URL handed back with each issued invite. It should be constructed using the
/// `ConfigBuilder` or `Config::from_settings`.
#[derive(Clone, Debug)]
pub struct Config {
    /// Thumbprint of the signing certificate to resolve from the key store.
    pub thumbprint: String,
    /// Lifetime of issued invite tokens, in minutes. Always greater than zero.
    pub invite_expire_minutes: u64,
    /// The client id of the application registration, used as the `aud` claim.
    pub client_id: String,
    /// The tenant interpolated into the authorize URL template.
    pub tenant: String,
    /// The custom policy name interpolated into the authorize URL template.
    pub policy: String,
    /// The redirect URI interpolated (percent-escaped) into the template.
    pub redirect_uri: String,
    /// The authorize URL template. Must contain the `{tenant}`, `{policy}`,
    /// `{client_id}`, `{redirect_uri}` and `{nonce}` placeholders.
    pub authorize_url_template: String,
}

impl Config {
    /// Loads and validates a `Config` from a settings provider.
    ///
    /// Fails with `MissingConfiguration` naming the first absent or empty key,
    /// and with `InvalidConfiguration` for values that are present but unusable.
    pub fn from_settings(provider: &impl SettingsProvider) -> Result<Self, InviteOidcError> {
        let required = |key: &str| -> Result<String, InviteOidcError> {
            provider
                .get(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| InviteOidcError::MissingConfiguration(key.to_string()))
        };

        let minutes_raw = required(setting::INVITE_EXPIRE_MINUTES)?;
        let minutes = minutes_raw.trim().parse::<u64>().map_err(|e| {
            InviteOidcError::InvalidConfiguration {
                key: setting::INVITE_EXPIRE_MINUTES.to_string(),
                reason: format!("not a positive integer: {e}"),
            }
        })?;

        ConfigBuilder::new()
            .thumbprint(required(setting::THUMBPRINT)?)
            .invite_expire_minutes(minutes)
            .client_id(required(setting::CLIENT_ID)?)
            .tenant(required(setting::TENANT)?)
            .policy(required(setting::POLICY)?)
            .redirect_uri(required(setting::REDIRECT_URI)?)
            .authorize_url_template(required(setting::AUTHORIZE_URL_TEMPLATE)?)
            .build()
    }
}

/// A builder for creating a `Config` instance.
///
/// This builder provides a fluent API to ensure that the configuration is
/// constructed correctly and with all required fields.
#[derive(Default)]
pub struct ConfigBuilder {
    thumbprint: Option<String>,
    invite_expire_minutes: Option<u64>,
    client_id: Option<String>,
    tenant: Option<String>,
    policy: Option<String>,
    redirect_uri: Option<String>,
    authorize_url_template: Option<String>,
}

impl ConfigBuilder {
    /// Creates a new `ConfigBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the signing certificate thumbprint. This is a required field.
    pub fn thumbprint(mut self, thumbprint: impl Into<String>) -> Self {
        self.thumbprint = Some(thumbprint.into());
        self
    }

    /// Sets the invite token lifetime in minutes. Required, must be > 0.
    pub fn invite_expire_minutes(mut self, minutes: u64) -> Self {
        self.invite_expire_minutes = Some(minutes);
        self
    }

    /// Sets the OIDC client id used as the token audience. This is a required field.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Sets the tenant name. This is a required field.
    pub fn tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = Some(tenant.into());
        self
    }

    /// Sets the custom policy name. This is a required field.
    pub fn policy(mut self, policy: impl Into<String>) -> Self {
        self.policy = Some(policy.into());
        self
    }

    /// Sets the redirect URI embedded in the invite link. This is a required field.
    pub fn redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    /// Sets the authorize URL template. This is a required field.
    pub fn authorize_url_template(mut self, template: impl Into<String>) -> Self {
        self.authorize_url_template = Some(template.into());
        self
    }

    /// Consumes the builder and returns a `Config` object.
    ///
    /// # Errors
    ///
    /// Returns `MissingConfiguration` if a required field is absent and
    /// `InvalidConfiguration` if the token lifetime is zero or the URL template
    /// is missing a placeholder. Failing here keeps a misconfigured process from
    /// issuing tokens it cannot redeem.
    pub fn build(self) -> Result<Config, InviteOidcError> {
        let missing = |key: &str| InviteOidcError::MissingConfiguration(key.to_string());

        let thumbprint = self.thumbprint.ok_or_else(|| missing(setting::THUMBPRINT))?;
        let invite_expire_minutes = self
            .invite_expire_minutes
            .ok_or_else(|| missing(setting::INVITE_EXPIRE_MINUTES))?;
        let client_id = self.client_id.ok_or_else(|| missing(setting::CLIENT_ID))?;
        let tenant = self.tenant.ok_or_else(|| missing(setting::TENANT))?;
        let policy = self.policy.ok_or_else(|| missing(setting::POLICY))?;
        let redirect_uri = self
            .redirect_uri
            .ok_or_else(|| missing(setting::REDIRECT_URI))?;
        let authorize_url_template = self
            .authorize_url_template
            .ok_or_else(|| missing(setting::AUTHORIZE_URL_TEMPLATE))?;

        if invite_expire_minutes == 0 {
            return Err(InviteOidcError::InvalidConfiguration {
                key: setting::INVITE_EXPIRE_MINUTES.to_string(),
                reason: "token lifetime must be greater than zero".to_string(),
            });
        }

        for placeholder in TEMPLATE_PLACEHOLDERS {
            if !authorize_url_template.contains(placeholder) {
                return Err(InviteOidcError::InvalidConfiguration {
                    key: setting::AUTHORIZE_URL_TEMPLATE.to_string(),
                    reason: format!("template is missing the {placeholder} placeholder"),
                });
            }
        }

        Ok(Config {
            thumbprint,
            invite_expire_minutes,
            client_id,
            tenant,
            policy,
            redirect_uri,
            authorize_url_template,
        })
    }
}
