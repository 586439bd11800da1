//! Storefront client session handling.
//!
//! A credential issued by the storefront backend is kept in origin-scoped
//! storage ([`store::TokenStore`]), decoded for display ([`jwt::decode`]),
//! and projected into capability flags ([`auth::AuthGate`]). The
//! [`session::Session`] flows are the only writers of that credential.

pub mod api;
pub mod auth;
pub mod cli;
pub mod db;
pub mod jwt;
pub mod session;
pub mod storage;
pub mod store;

pub use api::StorefrontClient;
pub use auth::AuthGate;
pub use db::Database;
pub use session::{Session, SessionError};
pub use store::TokenStore;
