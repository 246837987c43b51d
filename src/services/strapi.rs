//! Strapi relay client.
//!
//! DESIGN
//! ======
//! Thin authenticated GET wrapper over the backend's read-only endpoints.
//! Payloads are passed through as raw JSON; this layer never interprets
//! them. Pure parsing in `parse_payload` for testability.

use std::time::Duration;

use serde_json::Value;

use crate::config::UpstreamTimeouts;

/// Fixed page size for the recommended-courses endpoint.
const RECOMMENDED_LIMIT: &str = "4";

// =============================================================================
// ERROR TYPE
// =============================================================================

/// Errors produced by backend relay calls.
///
/// Route handlers collapse all of these into a uniform external 401; the
/// variants exist so logs can tell a rejected token apart from a backend
/// outage.
#[derive(Debug, thiserror::Error)]
pub enum StrapiError {
    /// The HTTP request to the backend failed in transport.
    #[error("backend request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success HTTP status.
    #[error("backend returned status {status}")]
    Status { status: u16, body: String },

    /// The backend response body was not valid JSON.
    #[error("backend response parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct StrapiClient {
    http: reqwest::Client,
    base_url: String,
}

impl StrapiClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(base_url: &str, timeouts: UpstreamTimeouts) -> Result<Self, StrapiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| StrapiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_string() })
    }

    /// `GET /user/me/recommended` — top courses for the token's user.
    pub async fn recommended(&self, token: &str) -> Result<Value, StrapiError> {
        self.get_json("/user/me/recommended", &[("pagination[limit]", RECOMMENDED_LIMIT)], token)
            .await
    }

    /// `GET /users` — full user listing with tags populated.
    pub async fn users(&self, token: &str) -> Result<Value, StrapiError> {
        self.get_json("/users", &[("populate", "tags")], token).await
    }

    /// `GET /courses/search` — course search with tags and cover populated.
    pub async fn search_courses(&self, token: &str, q: &str) -> Result<Value, StrapiError> {
        self.get_json(
            "/courses/search",
            &[("populate", "tags"), ("populate", "cover"), ("q", q)],
            token,
        )
        .await
    }

    /// `GET /users/search` — user search with tags populated.
    pub async fn search_users(&self, token: &str, q: &str) -> Result<Value, StrapiError> {
        self.get_json("/users/search", &[("populate", "tags"), ("q", q)], token).await
    }

    /// One authenticated GET against the backend. The bearer token is
    /// forwarded verbatim; query values are URL-encoded by the client.
    async fn get_json(
        &self,
        path: &str,
        query: &[(&str, &str)],
        token: &str,
    ) -> Result<Value, StrapiError> {
        let response = self
            .http
            .get(format!("{}{path}", self.base_url))
            .query(query)
            .header(reqwest::header::AUTHORIZATION, format!("Bearer {token}"))
            .send()
            .await
            .map_err(|e| StrapiError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| StrapiError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(StrapiError::Status { status: status.as_u16(), body: text });
        }

        parse_payload(&text)
    }
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_payload(json: &str) -> Result<Value, StrapiError> {
    serde_json::from_str(json).map_err(|e| StrapiError::Parse(e.to_string()))
}

#[cfg(test)]
#[path = "strapi_test.rs"]
mod tests;
