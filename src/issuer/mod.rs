use crate::config::Config;
use crate::error::InviteOidcError;
use crate::keys::SigningKey;
use jsonwebtoken::{encode, Header};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;
use url::Url;
use uuid::Uuid;

/// Maximum email length per RFC 5321.
const MAX_EMAIL_LENGTH: usize = 254;

/// The invitee fields accepted from the request body.
///
/// All four fields are externally supplied and untrusted; `validate` must pass
/// before the data is turned into claims.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteeData {
    pub email: String,
    pub display_name: String,
    pub first_name: String,
    pub last_name: String,
}

impl InviteeData {
    /// Validates the invitee fields.
    ///
    /// Every field must be non-empty and the email must pass a practical
    /// RFC 5322 check. Failure names all offending fields at once, so a caller
    /// can correct the whole request in one round trip.
    pub fn validate(&self) -> Result<(), InviteOidcError> {
        let mut invalid = Vec::new();

        if !is_valid_email(&self.email) {
            invalid.push("email");
        }
        if self.display_name.trim().is_empty() {
            invalid.push("displayName");
        }
        if self.first_name.trim().is_empty() {
            invalid.push("firstName");
        }
        if self.last_name.trim().is_empty() {
            invalid.push("lastName");
        }

        if invalid.is_empty() {
            Ok(())
        } else {
            Err(InviteOidcError::InvalidInput(invalid.join(", ")))
        }
    }
}

/// Practical email format check consistent with RFC 5322 basics: exactly one
/// `@`, non-empty local part, a dotted domain, no whitespace, bounded length.
fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.len() > MAX_EMAIL_LENGTH {
        return false;
    }
    if email.contains(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return false;
    }
    true
}

/// The claim set carried by an invite token.
///
/// All values are plain strings; no nesting. The four custom claims use the
/// wire names the consuming custom policy expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InviteClaims {
    pub iss: String,
    pub aud: String,
    pub iat: u64,
    pub nbf: u64,
    pub exp: u64,
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub email: String,
}

/// A freshly signed invite token in compact serialization, together with the
/// claims that went into it. Tokens are not stored server-side; `exp` is their
/// only validity control.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    compact: String,
    claims: InviteClaims,
}

impl IssuedToken {
    /// The compact `header.payload.signature` serialization.
    pub fn as_str(&self) -> &str {
        &self.compact
    }

    /// The claims the token was signed over.
    pub fn claims(&self) -> &InviteClaims {
        &self.claims
    }

    pub fn into_compact(self) -> String {
        self.compact
    }
}

/// Issues a signed invite token for `invitee`.
///
/// The issuer claim is the serving request's own base URL so that validators
/// following discovery from the same origin find a matching document. The
/// header carries the signing key's `kid`, letting validators select the
/// matching JWKS entry.
pub fn issue(
    invitee: &InviteeData,
    client_id: &str,
    issuer_url: &Url,
    ttl_minutes: u64,
    key: &SigningKey,
) -> Result<IssuedToken, InviteOidcError> {
    invitee.validate()?;

    if client_id.trim().is_empty() {
        return Err(InviteOidcError::InvalidConfiguration {
            key: crate::config::setting::CLIENT_ID.to_string(),
            reason: "client id must be non-empty".to_string(),
        });
    }
    if ttl_minutes == 0 {
        return Err(InviteOidcError::InvalidConfiguration {
            key: crate::config::setting::INVITE_EXPIRE_MINUTES.to_string(),
            reason: "token lifetime must be greater than zero".to_string(),
        });
    }

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs();
    let claims = InviteClaims {
        iss: issuer_url.as_str().to_string(),
        aud: client_id.to_string(),
        iat: now,
        nbf: now,
        exp: now + ttl_minutes * 60,
        display_name: invitee.display_name.clone(),
        first_name: invitee.first_name.clone(),
        last_name: invitee.last_name.clone(),
        email: invitee.email.clone(),
    };

    let mut header = Header::new(key.algorithm());
    header.kid = Some(key.kid().to_string());
    debug!(kid = %key.kid(), aud = %client_id, "Signing invite token.");

    let compact = encode(&header, &claims, key.encoding_key())?;
    Ok(IssuedToken { compact, claims })
}

/// Builds the invite redirect URL for a signed token.
///
/// Interpolates tenant, policy, client id and the percent-escaped redirect URI
/// into the configured authorize URL template, together with a fresh 128-bit
/// nonce, then appends the token as `id_token_hint`. The nonce is generated per
/// call and never reused; uniqueness is not tracked server-side since no state
/// store exists.
pub fn build_redirect_url(token: &str, config: &Config) -> String {
    let nonce = Uuid::new_v4().simple().to_string();

    let url = config
        .authorize_url_template
        .replace("{tenant}", &config.tenant)
        .replace("{policy}", &config.policy)
        .replace("{client_id}", &config.client_id)
        .replace(
            "{redirect_uri}",
            urlencoding::encode(&config.redirect_uri).as_ref(),
        )
        .replace("{nonce}", &nonce);

    format!("{url}&id_token_hint={token}")
}
