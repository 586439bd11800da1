//! Client-side authorization hints.
//!
//! The gate decodes the stored credential on every call and answers
//! "signed in?" and "admin?" for the UI. These answers decide what to show,
//! never what is allowed: the backend re-verifies the credential's signature
//! on every protected request.

mod gate;
mod guard;
mod types;

pub use gate::AuthGate;
pub use types::{Access, Capabilities, Requirement, SessionStatus};
