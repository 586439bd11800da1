//! Route guard for screens that need a signed-in user or an admin.

use tracing::{info, warn};

use super::gate::AuthGate;
use super::types::{Access, Requirement, SessionStatus};
use crate::storage::Storage;

impl<S: Storage> AuthGate<S> {
    /// Decide whether the caller may proceed.
    ///
    /// A stored credential that is malformed or expired is cleared before
    /// redirecting, so the next visit starts from a clean session.
    pub async fn require(&self, requirement: Requirement) -> Access {
        let status = self.status().await;

        if status.is_stale() {
            info!("Discarding unusable credential");
            if let Err(e) = self.store().clear_all().await {
                warn!(error = %e, "Failed to clear unusable credential");
            }
        }

        let claims = match status {
            SessionStatus::Active(claims) => claims,
            _ => return Access::RedirectToLogin,
        };

        match requirement {
            Requirement::Authenticated => Access::Granted(claims),
            Requirement::Admin if claims.is_admin() => Access::Granted(claims),
            Requirement::Admin => Access::Forbidden(claims),
        }
    }
}
