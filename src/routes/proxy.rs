//! Same-origin image proxy route.

use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Content at a given asset URL never changes, so cache hard.
pub const CACHE_CONTROL_VALUE: &str = "public, max-age=31536000, immutable";

#[derive(Deserialize)]
pub struct ProxyQuery {
    pub url: Option<String>,
}

/// `GET /api/proxy-image?url=` — fetch an allow-listed remote image and
/// return it verbatim with long-lived cache headers.
///
/// 400 without a `url`, 403 for a disallowed origin (no fetch is
/// attempted), upstream status on a non-2xx answer, 500 otherwise.
pub async fn proxy_image(
    State(state): State<AppState>,
    Query(params): Query<ProxyQuery>,
) -> Result<Response, ApiError> {
    let Some(url) = params.url.filter(|u| !u.is_empty()) else {
        return Err(ApiError::MissingUrlParam);
    };

    let _nav = state.loading.begin();
    let image = state.images.fetch(&url).await.map_err(|e| {
        tracing::warn!(error = %e, url = %url, "image proxy request failed");
        ApiError::from(e)
    })?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, image.content_type),
            (header::CACHE_CONTROL, CACHE_CONTROL_VALUE.to_string()),
        ],
        image.bytes,
    )
        .into_response())
}

#[cfg(test)]
#[path = "proxy_test.rs"]
mod tests;
