//! Runtime configuration parsed from environment variables.

use crate::services::image::OriginAllowList;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_UPSTREAM_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_UPSTREAM_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Timeouts applied to every outbound HTTP client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpstreamTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Base URL of the Strapi backend, without a trailing slash.
    pub strapi_url: String,
    /// Origins the image proxy may fetch from.
    pub image_origins: OriginAllowList,
    pub timeouts: UpstreamTimeouts,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The backend base URL is mandatory; there is no sensible default host.
    #[error("STRAPI_URL not set")]
    MissingStrapiUrl,

    /// An allow-list entry did not parse as an absolute URL.
    #[error("invalid image origin: {0}")]
    InvalidImageOrigin(String),
}

impl AppConfig {
    /// Build typed config from environment variables.
    ///
    /// Required:
    /// - `STRAPI_URL`: backend base URL (trailing `/` trimmed)
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `IMAGE_ALLOWED_ORIGINS`: comma-separated absolute origins; defaults
    ///   to the origin of `STRAPI_URL`
    /// - `UPSTREAM_REQUEST_TIMEOUT_SECS`: default 30
    /// - `UPSTREAM_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if `STRAPI_URL` is missing or an allow-list entry is
    /// not an absolute URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let strapi_url = std::env::var("STRAPI_URL")
            .map_err(|_| ConfigError::MissingStrapiUrl)?
            .trim_end_matches('/')
            .to_string();

        let image_origins = match std::env::var("IMAGE_ALLOWED_ORIGINS") {
            Ok(raw) => parse_origin_list(&raw)?,
            Err(_) => OriginAllowList::parse([strapi_url.as_str()])
                .map_err(ConfigError::InvalidImageOrigin)?,
        };

        Ok(Self {
            port: env_parse("PORT", DEFAULT_PORT),
            strapi_url,
            image_origins,
            timeouts: UpstreamTimeouts {
                request_secs: env_parse(
                    "UPSTREAM_REQUEST_TIMEOUT_SECS",
                    DEFAULT_UPSTREAM_REQUEST_TIMEOUT_SECS,
                ),
                connect_secs: env_parse(
                    "UPSTREAM_CONNECT_TIMEOUT_SECS",
                    DEFAULT_UPSTREAM_CONNECT_TIMEOUT_SECS,
                ),
            },
        })
    }
}

fn parse_origin_list(raw: &str) -> Result<OriginAllowList, ConfigError> {
    let entries = raw.split(',').map(str::trim).filter(|s| !s.is_empty());
    OriginAllowList::parse(entries).map_err(ConfigError::InvalidImageOrigin)
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
