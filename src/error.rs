//! Routes-level error responses.
//!
//! DESIGN
//! ======
//! The external error surface is deliberately narrow: every relay failure
//! is a uniform 401 so backend internals do not leak to callers, and the
//! image proxy preserves upstream status codes. Handlers log the real
//! cause before converting into one of these variants.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::services::image::ImageError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The image proxy was called without a `url` parameter.
    #[error("URL parameter required")]
    MissingUrlParam,

    /// The requested image origin is not allow-listed.
    #[error("Invalid image source")]
    ForbiddenImageSource,

    /// The backend rejected the relayed call, for any reason.
    #[error("Invalid token")]
    InvalidToken,

    /// The image upstream answered non-2xx; its status is passed through.
    #[error("Image not found")]
    ImageUpstream { status: StatusCode },

    /// Transport or other unexpected failure while fetching an image.
    #[error("Failed to fetch image")]
    ImageFetch,
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingUrlParam => StatusCode::BAD_REQUEST,
            Self::ForbiddenImageSource => StatusCode::FORBIDDEN,
            Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::ImageUpstream { status } => *status,
            Self::ImageFetch => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

impl From<ImageError> for ApiError {
    fn from(e: ImageError) -> Self {
        match e {
            ImageError::DisallowedSource(_) => Self::ForbiddenImageSource,
            ImageError::UpstreamStatus { status } => Self::ImageUpstream {
                status: StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
            },
            ImageError::Request(_) | ImageError::HttpClientBuild(_) => Self::ImageFetch,
        }
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
