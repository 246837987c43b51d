//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the gateway's HTTP surface: four authenticated relay
//! routes forwarded to the Strapi backend, the same-origin image proxy,
//! and a liveness probe. Everything is `GET`; state is injected via the
//! `State` extractor.

pub mod auth;
pub mod proxy;
pub mod search;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

#[must_use]
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/auth/recommended", get(auth::recommended))
        .route("/api/auth/users", get(auth::users))
        .route("/api/search/courses", get(search::courses))
        .route("/api/search/users", get(search::users))
        .route("/api/proxy-image", get(proxy::proxy_image))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
