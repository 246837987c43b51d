//! Search relay routes.

use axum::extract::{Query, State};
use axum::response::Json;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::ApiError;
use crate::routes::auth::AuthToken;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SearchQuery {
    /// Free-text search term, forwarded to the backend. Absent → empty.
    #[serde(default)]
    pub q: String,
}

/// `GET /api/search/courses?q=` — course search, wrapped as
/// `{ "res": ... }`. No token → `null`.
pub async fn courses(
    State(state): State<AppState>,
    AuthToken(token): AuthToken,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Value>, ApiError> {
    let Some(token) = token else {
        return Ok(Json(Value::Null));
    };

    let _nav = state.loading.begin();
    match state.strapi.search_courses(&token, &params.q).await {
        Ok(res) => Ok(Json(json!({ "res": res }))),
        Err(e) => {
            tracing::warn!(error = %e, q = %params.q, "course search failed");
            Err(ApiError::InvalidToken)
        }
    }
}

/// `GET /api/search/users?q=` — user search, wrapped as
/// `{ "users": ... }`. No token → `null`.
pub async fn users(
    State(state): State<AppState>,
    AuthToken(token): AuthToken,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Value>, ApiError> {
    let Some(token) = token else {
        return Ok(Json(Value::Null));
    };

    let _nav = state.loading.begin();
    match state.strapi.search_users(&token, &params.q).await {
        Ok(users) => Ok(Json(json!({ "users": users }))),
        Err(e) => {
            tracing::warn!(error = %e, q = %params.q, "user search failed");
            Err(ApiError::InvalidToken)
        }
    }
}

#[cfg(test)]
#[path = "search_test.rs"]
mod tests;
