use super::state::AppState;
use crate::error::ApiError;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;
use tracing::debug;

/// Header carrying the session token on API calls
pub const SESSION_HEADER: &str = "x-session-id";

/// Query parameter accepted on `/audio/*` only, where media elements cannot
/// set headers
pub const SESSION_QUERY_PARAM: &str = "session";

/// A request that presented a valid session token
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub username: String,
    pub token: String,
}

/// Like [`Authenticated`], but the token may also come from `?session=`
#[derive(Debug, Clone)]
pub struct MediaAuthenticated(pub Authenticated);

#[derive(Debug, Deserialize)]
struct SessionQuery {
    session: Option<String>,
}

pub fn header_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|token| !token.is_empty())
}

fn query_token(parts: &Parts) -> Option<String> {
    Query::<SessionQuery>::try_from_uri(&parts.uri)
        .ok()
        .and_then(|Query(q)| q.session)
        .filter(|token| !token.is_empty())
}

async fn authenticate(state: &AppState, token: &str) -> Option<Authenticated> {
    state
        .sessions
        .lookup(token)
        .await
        .map(|username| Authenticated {
            username,
            token: token.to_string(),
        })
}

#[async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let Some(token) = header_token(parts) else {
            debug!("No session header on {}", parts.uri.path());
            return Err(ApiError::Unauthorized);
        };

        match authenticate(state, token).await {
            Some(auth) => Ok(auth),
            None => {
                debug!("Unknown or expired session on {}", parts.uri.path());
                Err(ApiError::Unauthorized)
            }
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MediaAuthenticated {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        if let Some(token) = header_token(parts) {
            if let Some(auth) = authenticate(state, token).await {
                return Ok(Self(auth));
            }
        }
        if let Some(token) = query_token(parts) {
            if let Some(auth) = authenticate(state, &token).await {
                return Ok(Self(auth));
            }
        }

        debug!("Media request without a valid session: {}", parts.uri.path());
        Err(ApiError::Unauthorized)
    }
}
