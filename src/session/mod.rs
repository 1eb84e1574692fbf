//! Login session management
//!
//! This module provides the `SessionStore` that backs authentication:
//! - Token generation on successful login
//! - Token lookup on every protected request, with optional expiry
//! - Idempotent revocation on logout
//! - Periodic purge of expired entries

mod config;
mod store;

pub use config::SessionConfig;
pub use store::{Session, SessionStore};
