//! Credential decoding.
//!
//! Credentials are issued and signed by the backend. The client only reads
//! the claims segment to decide what to show; the signature is never checked
//! here because no secret is available client-side. Nothing derived from
//! [`decode`] is a security control: the backend verifies every protected
//! request on its own.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// User role for authorization hints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }

    /// Anything other than the exact string `admin` is a plain user.
    pub fn from_str(s: &str) -> Self {
        match s {
            "admin" => UserRole::Admin,
            _ => UserRole::User,
        }
    }
}

/// Identity claims extracted from a credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    pub email: String,
    pub role: UserRole,
    pub first_name: String,
    pub last_name: String,
    /// Avatar image reference
    pub image_url: Option<String>,
    /// Issued at (Unix timestamp)
    pub iat: Option<u64>,
    /// Expiration time (Unix timestamp)
    pub exp: Option<u64>,
}

impl Claims {
    /// Whether the credential expired strictly before `now` (Unix seconds).
    /// Claims without an expiry never expire.
    pub fn is_expired_at(&self, now: u64) -> bool {
        self.exp.is_some_and(|exp| exp < now)
    }

    /// Whether the credential is expired relative to the system clock.
    /// An unreadable clock counts as expired when an expiry is present.
    pub fn is_expired(&self) -> bool {
        match unix_now() {
            Some(now) => self.is_expired_at(now),
            None => self.exp.is_some(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// "First Last", falling back to the email when both names are empty.
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim();
        if name.is_empty() {
            self.email.clone()
        } else {
            name.to_string()
        }
    }
}

/// Wire shape of the claims segment. Backends disagree on the subject key,
/// so every known spelling is read and the first present one wins.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawClaims {
    sub: Option<String>,
    id: Option<String>,
    #[serde(rename = "_id")]
    object_id: Option<String>,
    user_id: Option<String>,
    #[serde(default)]
    email: String,
    #[serde(default, deserialize_with = "lenient_role")]
    role: UserRole,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(alias = "avatar")]
    image_url: Option<String>,
    iat: Option<u64>,
    exp: Option<u64>,
}

impl From<RawClaims> for Claims {
    fn from(raw: RawClaims) -> Self {
        Self {
            sub: raw
                .sub
                .or(raw.id)
                .or(raw.object_id)
                .or(raw.user_id)
                .unwrap_or_default(),
            email: raw.email,
            role: raw.role,
            first_name: raw.first_name,
            last_name: raw.last_name,
            image_url: raw.image_url.filter(|url| !url.is_empty()),
            iat: raw.iat,
            exp: raw.exp,
        }
    }
}

/// A role of any JSON shape decodes; only the string `admin` grants admin.
fn lenient_role<'de, D>(deserializer: D) -> Result<UserRole, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_str().map(UserRole::from_str).unwrap_or_default())
}

/// Decode the claims of a stored credential.
///
/// Returns `None` for an absent credential and for every malformed one:
/// wrong segment count, invalid base64url, or claims that are not a JSON
/// object of the expected shape. Expired claims are still returned.
pub fn decode(token: Option<&str>) -> Option<Claims> {
    decode_str(token?)
}

/// Decode the claims of a credential string. See [`decode`].
pub fn decode_str(token: &str) -> Option<Claims> {
    let mut parts = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return None;
    };

    let bytes = URL_SAFE.decode(restore_padding(payload)).ok()?;
    let raw: RawClaims = serde_json::from_slice(&bytes).ok()?;
    Some(raw.into())
}

/// Pad a base64url segment with `=` up to a multiple of 4.
fn restore_padding(segment: &str) -> String {
    let mut padded = segment.to_string();
    while padded.len() % 4 != 0 {
        padded.push('=');
    }
    padded
}

/// Current Unix time in seconds.
pub fn unix_now() -> Option<u64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .map(|d| d.as_secs())
}
