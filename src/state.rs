//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the two outbound clients and the navigation loading tracker.
//! Handlers are otherwise stateless; nothing here persists between
//! requests.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::loading::LoadingTracker;
use crate::services::image::{ImageError, ImageFetcher};
use crate::services::strapi::{StrapiClient, StrapiError};

#[derive(Debug, thiserror::Error)]
pub enum StateInitError {
    #[error(transparent)]
    Strapi(#[from] StrapiError),
    #[error(transparent)]
    Image(#[from] ImageError),
}

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum — all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub strapi: Arc<StrapiClient>,
    pub images: Arc<ImageFetcher>,
    pub loading: LoadingTracker,
}

impl AppState {
    /// Build both outbound clients from the typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if either HTTP client fails to build.
    pub fn from_config(config: &AppConfig) -> Result<Self, StateInitError> {
        let strapi = StrapiClient::new(&config.strapi_url, config.timeouts)?;
        let images = ImageFetcher::new(config.image_origins.clone(), config.timeouts)?;
        Ok(Self {
            strapi: Arc::new(strapi),
            images: Arc::new(images),
            loading: LoadingTracker::new(),
        })
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
