//! HTTP API server for the recording library browser
//!
//! This module provides the REST API consumed by the browser UI:
//! - POST /api/login - Exchange credentials for a session token
//! - POST /api/logout - Drop a session
//! - GET /api/browse?path= - List a directory with paired transcripts
//! - GET /api/transcript?file= - Fetch a transcript sidecar
//! - GET /api/absolutePath?file= - Normalize a library path
//! - GET /audio/*path - Stream audio (range requests supported)
//! - GET /api/debug?path= - Raw directory listing (debug mode only)
//! - GET /health - Health check

mod auth;
mod handlers;
mod routes;
mod state;

pub use auth::{Authenticated, MediaAuthenticated, SESSION_HEADER, SESSION_QUERY_PARAM};
pub use routes::create_router;
pub use state::AppState;
