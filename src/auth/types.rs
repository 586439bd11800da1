//! Session state types.

use crate::jwt::Claims;

/// What the stored credential currently amounts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    /// Nothing stored (or storage unreadable)
    Anonymous,
    /// Well-formed and unexpired
    Active(Claims),
    /// Well-formed but past its expiry
    Expired(Claims),
    /// Stored but not decodable
    Malformed,
}

impl SessionStatus {
    /// Claims usable for identity. Expired claims never count.
    pub fn user(&self) -> Option<&Claims> {
        match self {
            SessionStatus::Active(claims) => Some(claims),
            _ => None,
        }
    }

    /// Whether a credential is stored but unusable and should be discarded.
    pub fn is_stale(&self) -> bool {
        matches!(self, SessionStatus::Expired(_) | SessionStatus::Malformed)
    }
}

/// UI-facing capability flags, as consumed by navigation and product cards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub authenticated: bool,
    pub admin: bool,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl Capabilities {
    pub fn can_create_products(&self) -> bool {
        self.admin
    }

    pub fn can_edit_products(&self) -> bool {
        self.admin
    }
}

/// Capability a caller needs before proceeding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Authenticated,
    Admin,
}

/// Outcome of checking a [`Requirement`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Granted(Claims),
    /// Signed in, but lacking the role
    Forbidden(Claims),
    /// No usable identity; send the user to the login view
    RedirectToLogin,
}

impl Access {
    pub fn is_granted(&self) -> bool {
        matches!(self, Access::Granted(_))
    }
}
