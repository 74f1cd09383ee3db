use axum::{
    extract::State,
    http::HeaderMap,
    Json,
};
use serde::Deserialize;

use crate::auth::guard::{route_access, RouteAccess};
use crate::errors::AppError;
use crate::extract::ApiQuery;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AccessQuery {
    /// Page path, optionally with its query string (`/admin/users?tab=2`).
    pub path: String,
}

/// GET /api/v1/session/access
///
/// Tells the frontend whether to render a page or where to redirect.
/// Works with or without a session token.
pub async fn handle_route_access(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiQuery(params): ApiQuery<AccessQuery>,
) -> Result<Json<RouteAccess>, AppError> {
    if !params.path.starts_with('/') {
        return Err(AppError::Validation("path must start with '/'".to_string()));
    }

    let (path, query) = match params.path.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (params.path.as_str(), None),
    };
    let session = state.session_keys.session_from_headers(&headers);

    Ok(Json(route_access(path, query, session.as_ref())))
}
