//! Image origin allow-list and upstream fetch.
//!
//! DESIGN
//! ======
//! The proxy only fetches URLs whose scheme, host, and effective port
//! exactly match an allow-listed origin. Matching is done on the parsed
//! authority, never on a string prefix, so `http://host:1337evil.com/`
//! cannot slip past a `http://host:1337` entry.

use std::time::Duration;

use axum::body::Bytes;
use reqwest::Url;

use crate::config::UpstreamTimeouts;

/// Content type assumed when the upstream omits the header.
pub const FALLBACK_CONTENT_TYPE: &str = "image/jpeg";

// =============================================================================
// ORIGIN ALLOW-LIST
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
struct AllowedOrigin {
    scheme: String,
    host: String,
    port: Option<u16>,
}

impl AllowedOrigin {
    fn parse(raw: &str) -> Option<Self> {
        let url = Url::parse(raw).ok()?;
        let host = url.host_str()?.to_string();
        Some(Self {
            scheme: url.scheme().to_string(),
            host,
            port: url.port_or_known_default(),
        })
    }

    fn matches(&self, url: &Url) -> bool {
        url.scheme() == self.scheme
            && url.host_str() == Some(self.host.as_str())
            && url.port_or_known_default() == self.port
    }
}

/// The set of origins the proxy will fetch from.
#[derive(Debug, Clone, Default)]
pub struct OriginAllowList {
    origins: Vec<AllowedOrigin>,
}

impl OriginAllowList {
    /// Parse a list of absolute origin URLs.
    ///
    /// # Errors
    ///
    /// Returns the offending entry if one does not parse as an absolute URL
    /// with a host.
    pub fn parse<'a, I>(entries: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut origins = Vec::new();
        for entry in entries {
            let origin = AllowedOrigin::parse(entry).ok_or_else(|| entry.to_string())?;
            origins.push(origin);
        }
        Ok(Self { origins })
    }

    #[must_use]
    pub fn allows(&self, url: &Url) -> bool {
        self.origins.iter().any(|origin| origin.matches(url))
    }
}

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    /// The URL did not parse, or its origin is not allow-listed.
    #[error("image source not allowed: {0}")]
    DisallowedSource(String),

    /// The upstream answered with a non-success status.
    #[error("upstream returned status {status}")]
    UpstreamStatus { status: u16 },

    /// Transport failure while fetching the image.
    #[error("image fetch failed: {0}")]
    Request(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

// =============================================================================
// FETCHER
// =============================================================================

/// A fetched image body with its declared content type.
#[derive(Debug)]
pub struct FetchedImage {
    pub content_type: String,
    pub bytes: Bytes,
}

pub struct ImageFetcher {
    http: reqwest::Client,
    allowed: OriginAllowList,
}

impl ImageFetcher {
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(allowed: OriginAllowList, timeouts: UpstreamTimeouts) -> Result<Self, ImageError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| ImageError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, allowed })
    }

    /// Parse and allow-list check. No outbound request is made here.
    ///
    /// # Errors
    ///
    /// Returns `DisallowedSource` if the URL does not parse or its origin is
    /// not allow-listed.
    pub fn check_source(&self, raw_url: &str) -> Result<Url, ImageError> {
        let url =
            Url::parse(raw_url).map_err(|_| ImageError::DisallowedSource(raw_url.to_string()))?;
        if !self.allowed.allows(&url) {
            return Err(ImageError::DisallowedSource(raw_url.to_string()));
        }
        Ok(url)
    }

    /// Validate `raw_url` and fetch its full body.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails, the upstream answers non-2xx,
    /// or transport fails.
    pub async fn fetch(&self, raw_url: &str) -> Result<FetchedImage, ImageError> {
        let url = self.check_source(raw_url)?;

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ImageError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageError::UpstreamStatus { status: status.as_u16() });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(FALLBACK_CONTENT_TYPE)
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ImageError::Request(e.to_string()))?;

        Ok(FetchedImage { content_type, bytes })
    }
}

// =============================================================================
// PROXY URL HELPER
// =============================================================================

/// Map a CMS asset path (or an already-absolute URL) to the same-origin
/// proxy URL. Returns an empty string for an absent path so templates can
/// use the result directly in `src` attributes.
#[must_use]
pub fn proxy_image_url(cms_base: &str, path: Option<&str>) -> String {
    let Some(path) = path.filter(|p| !p.is_empty()) else {
        return String::new();
    };

    let absolute = if path.starts_with("http") {
        path.to_string()
    } else {
        format!("{}{path}", cms_base.trim_end_matches('/'))
    };

    format!("/api/proxy-image?url={}", urlencoding::encode(&absolute))
}

#[cfg(test)]
#[path = "image_test.rs"]
mod tests;
