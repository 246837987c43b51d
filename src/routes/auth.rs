//! Authenticated relay routes — recommended courses and user listing.

use std::convert::Infallible;

use axum::extract::State;
use axum::response::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde_json::{Value, json};

use crate::error::ApiError;
use crate::state::AppState;

const TOKEN_COOKIE: &str = "token";

// =============================================================================
// TOKEN EXTRACTOR
// =============================================================================

/// Bearer token read from the `token` cookie.
///
/// Extraction never fails: an absent or empty cookie yields `None`, and
/// relay handlers answer that with a `null` body rather than an error —
/// "not logged in, nothing to show" is not an authentication failure.
pub struct AuthToken(pub Option<String>);

impl<S> axum::extract::FromRequestParts<S> for AuthToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Infallible> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(TOKEN_COOKIE)
            .map(Cookie::value)
            .filter(|t| !t.is_empty())
            .map(ToOwned::to_owned);
        Ok(Self(token))
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `GET /api/auth/recommended` — top recommended courses for the current
/// user, wrapped as `{ "res": ... }`. No token → `null`.
pub async fn recommended(
    State(state): State<AppState>,
    AuthToken(token): AuthToken,
) -> Result<Json<Value>, ApiError> {
    let Some(token) = token else {
        return Ok(Json(Value::Null));
    };

    let _nav = state.loading.begin();
    match state.strapi.recommended(&token).await {
        Ok(res) => Ok(Json(json!({ "res": res }))),
        Err(e) => {
            tracing::warn!(error = %e, "recommended lookup failed");
            Err(ApiError::InvalidToken)
        }
    }
}

/// `GET /api/auth/users` — user listing with tags populated, wrapped as
/// `{ "users": ... }`. No token → `null`.
pub async fn users(
    State(state): State<AppState>,
    AuthToken(token): AuthToken,
) -> Result<Json<Value>, ApiError> {
    let Some(token) = token else {
        return Ok(Json(Value::Null));
    };

    let _nav = state.loading.begin();
    match state.strapi.users(&token).await {
        Ok(users) => Ok(Json(json!({ "users": users }))),
        Err(e) => {
            tracing::warn!(error = %e, "user listing failed");
            Err(ApiError::InvalidToken)
        }
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
