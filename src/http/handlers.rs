use super::auth::{Authenticated, MediaAuthenticated, SESSION_HEADER};
use super::state::AppState;
use crate::catalog::{self, CatalogEntry, DirectoryReport};
use crate::error::ApiError;
use crate::media;
use crate::sandbox::{clean_relative, normalize_relative};
use crate::transcript;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub session_id: String,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Deserialize)]
pub struct BrowseQuery {
    /// Directory relative to the library root; empty for the root itself
    pub path: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseResponse {
    pub current_path: String,
    pub items: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
pub struct FileQuery {
    pub file: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AbsolutePathResponse {
    pub absolute_path: String,
}

impl FileQuery {
    fn require(self) -> Result<String, ApiError> {
        self.file
            .filter(|file| !file.is_empty())
            .ok_or_else(|| ApiError::bad_request("File path required"))
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/login
/// Exchange username and password for a session token
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| {
        warn!("Rejected login body: {}", e);
        ApiError::bad_request("Username and password required")
    })?;

    let (Some(username), Some(password)) = (
        req.username.filter(|u| !u.is_empty()),
        req.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::bad_request("Username and password required"));
    };

    if !state.verify_credentials(&username, &password) {
        warn!("Login failed for user: {}", username);
        return Err(ApiError::InvalidCredentials);
    }

    let session_id = state.sessions.create(username.clone()).await;
    info!("Login successful for user: {}", username);

    Ok(Json(LoginResponse {
        success: true,
        session_id,
        username,
    }))
}

/// POST /api/logout
/// Drop the caller's session; succeeds even without one
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let token = headers
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok());

    if let Some(token) = token {
        state.sessions.revoke(token).await;
    }

    Json(SuccessResponse { success: true })
}

/// GET /api/browse?path=...
/// List one directory with audio files paired to their transcripts
pub async fn browse(
    State(state): State<AppState>,
    auth: Authenticated,
    Query(query): Query<BrowseQuery>,
) -> Result<Json<BrowseResponse>, ApiError> {
    let current_path = clean_relative(query.path.as_deref().unwrap_or(""))?;
    let dir = state.sandbox.resolve(&current_path).await?;

    let mut items = catalog::list(&dir, &current_path).await?;
    catalog::sort_for_display(&mut items);

    info!(
        "{} browsed /{} ({} items)",
        auth.username,
        current_path,
        items.len()
    );

    Ok(Json(BrowseResponse {
        current_path,
        items,
    }))
}

/// GET /api/transcript?file=...
/// Return a sidecar transcript as stored
pub async fn get_transcript(
    State(state): State<AppState>,
    _auth: Authenticated,
    Query(query): Query<FileQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let file = query.require()?;
    let path = state.sandbox.resolve(&file).await?;
    let document = transcript::read(&path).await?;

    Ok(Json(document.into_raw()))
}

/// GET /api/absolutePath?file=...
/// Normalized library-relative form of a path, for copying into notes
pub async fn absolute_path(
    _auth: Authenticated,
    Query(query): Query<FileQuery>,
) -> Result<Json<AbsolutePathResponse>, ApiError> {
    let file = query.require()?;

    Ok(Json(AbsolutePathResponse {
        absolute_path: normalize_relative(&file),
    }))
}

/// GET /audio/*path
/// Stream an audio file, honoring single byte ranges
pub async fn stream_audio(
    State(state): State<AppState>,
    MediaAuthenticated(_auth): MediaAuthenticated,
    Path(relative): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let path = state.sandbox.resolve(&relative).await?;
    let range = headers
        .get(header::RANGE)
        .and_then(|value| value.to_str().ok());

    let stream = media::stream(&path, range).await?;
    Ok(stream.into_response())
}

/// GET /api/debug?path=...
/// Unclassified directory contents; only routed in debug mode
pub async fn debug_listing(
    State(state): State<AppState>,
    _auth: Authenticated,
    Query(query): Query<BrowseQuery>,
) -> Result<Json<DirectoryReport>, ApiError> {
    let relative = clean_relative(query.path.as_deref().unwrap_or(""))?;
    let dir = state.sandbox.resolve(&relative).await?;

    Ok(Json(DirectoryReport::scan(&dir, &relative).await?))
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
