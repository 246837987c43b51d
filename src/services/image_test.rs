use super::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use axum::body::Body;
use axum::http::{StatusCode, header};
use axum::response::Response;
use axum::routing::get;

const TEST_TIMEOUTS: UpstreamTimeouts = UpstreamTimeouts { request_secs: 2, connect_secs: 1 };

async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock upstream");
    let addr = listener.local_addr().expect("mock upstream addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("mock upstream failed");
    });
    format!("http://{addr}")
}

fn fetcher_for(origins: &[&str]) -> ImageFetcher {
    let allowed = OriginAllowList::parse(origins.iter().copied()).expect("origins should parse");
    ImageFetcher::new(allowed, TEST_TIMEOUTS).expect("fetcher should build")
}

// =============================================================================
// ALLOW-LIST
// =============================================================================

#[test]
fn allows_exact_origin() {
    let list = OriginAllowList::parse(["http://54.38.138.75:1337"]).unwrap();
    let url = Url::parse("http://54.38.138.75:1337/uploads/pic.jpg").unwrap();
    assert!(list.allows(&url));
}

#[test]
fn rejects_other_host_port_and_scheme() {
    let list = OriginAllowList::parse(["http://54.38.138.75:1337"]).unwrap();

    let other_host = Url::parse("http://55.38.138.75:1337/pic.jpg").unwrap();
    let other_port = Url::parse("http://54.38.138.75:1338/pic.jpg").unwrap();
    let other_scheme = Url::parse("https://54.38.138.75:1337/pic.jpg").unwrap();
    assert!(!list.allows(&other_host));
    assert!(!list.allows(&other_port));
    assert!(!list.allows(&other_scheme));
}

#[test]
fn rejects_host_suffix_spoof() {
    // A prefix check would let this through; authority matching must not.
    let list = OriginAllowList::parse(["http://54.38.138.75:1337"]).unwrap();
    let spoof = Url::parse("http://54.38.138.75.evil.com:1337/pic.jpg").unwrap();
    assert!(!list.allows(&spoof));
}

#[test]
fn default_port_matches_explicit_port() {
    let list = OriginAllowList::parse(["http://cdn.test"]).unwrap();

    let implicit = Url::parse("http://cdn.test/a.png").unwrap();
    let explicit = Url::parse("http://cdn.test:80/a.png").unwrap();
    let https = Url::parse("https://cdn.test/a.png").unwrap();
    assert!(list.allows(&implicit));
    assert!(list.allows(&explicit));
    assert!(!list.allows(&https));
}

#[test]
fn parse_rejects_malformed_entry() {
    let err = OriginAllowList::parse(["http://ok.test", "not-a-url"]).unwrap_err();
    assert_eq!(err, "not-a-url");
}

// =============================================================================
// SOURCE CHECK
// =============================================================================

#[test]
fn check_source_rejects_port_spoof_literal() {
    // The classic bypass string for a prefix check. It is not even a valid
    // URL ("1337evil.com" is no port), so it dies at parsing.
    let fetcher = fetcher_for(&["http://54.38.138.75:1337"]);
    let err = fetcher.check_source("http://54.38.138.75:1337evil.com/pic.jpg").unwrap_err();
    assert!(matches!(err, ImageError::DisallowedSource(_)));
}

#[test]
fn check_source_rejects_relative_url() {
    let fetcher = fetcher_for(&["http://54.38.138.75:1337"]);
    let err = fetcher.check_source("/uploads/pic.jpg").unwrap_err();
    assert!(matches!(err, ImageError::DisallowedSource(_)));
}

#[test]
fn check_source_accepts_allowed_url() {
    let fetcher = fetcher_for(&["http://54.38.138.75:1337"]);
    let url = fetcher.check_source("http://54.38.138.75:1337/uploads/pic.jpg").unwrap();
    assert_eq!(url.path(), "/uploads/pic.jpg");
}

// =============================================================================
// FETCH
// =============================================================================

#[tokio::test]
async fn fetch_round_trips_body_and_content_type() {
    let png: &[u8] = b"\x89PNG\r\n\x1a\nfakedata";
    let router = Router::new().route(
        "/uploads/pic.png",
        get(move || async move { ([(header::CONTENT_TYPE, "image/png")], png) }),
    );
    let base = spawn_upstream(router).await;

    let fetcher = fetcher_for(&[base.as_str()]);
    let image = fetcher.fetch(&format!("{base}/uploads/pic.png")).await.unwrap();
    assert_eq!(image.content_type, "image/png");
    assert_eq!(&image.bytes[..], png);
}

#[tokio::test]
async fn fetch_defaults_content_type_to_jpeg() {
    let router = Router::new().route(
        "/raw",
        // Hand-built response so no content-type header is attached.
        get(|| async { Response::new(Body::from(&b"rawbytes"[..])) }),
    );
    let base = spawn_upstream(router).await;

    let fetcher = fetcher_for(&[base.as_str()]);
    let image = fetcher.fetch(&format!("{base}/raw")).await.unwrap();
    assert_eq!(image.content_type, FALLBACK_CONTENT_TYPE);
    assert_eq!(&image.bytes[..], b"rawbytes");
}

#[tokio::test]
async fn fetch_propagates_upstream_status() {
    let router = Router::new().route("/gone.jpg", get(|| async { StatusCode::NOT_FOUND }));
    let base = spawn_upstream(router).await;

    let fetcher = fetcher_for(&[base.as_str()]);
    let err = fetcher.fetch(&format!("{base}/gone.jpg")).await.unwrap_err();
    assert!(matches!(err, ImageError::UpstreamStatus { status: 404 }));
}

#[tokio::test]
async fn fetch_transport_failure_is_request_error() {
    let fetcher = fetcher_for(&["http://127.0.0.1:9"]);
    let err = fetcher.fetch("http://127.0.0.1:9/pic.jpg").await.unwrap_err();
    assert!(matches!(err, ImageError::Request(_)));
}

#[tokio::test]
async fn fetch_disallowed_source_makes_no_request() {
    let hits = Arc::new(AtomicUsize::new(0));
    let router = Router::new().route(
        "/pic.jpg",
        get({
            let hits = Arc::clone(&hits);
            move || {
                let hits = Arc::clone(&hits);
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    "hit"
                }
            }
        }),
    );
    let base = spawn_upstream(router).await;

    // The upstream is live but NOT allow-listed.
    let fetcher = fetcher_for(&["http://allowed-elsewhere.test:1337"]);
    let err = fetcher.fetch(&format!("{base}/pic.jpg")).await.unwrap_err();
    assert!(matches!(err, ImageError::DisallowedSource(_)));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

// =============================================================================
// PROXY URL HELPER
// =============================================================================

#[test]
fn proxy_url_empty_for_absent_path() {
    assert_eq!(proxy_image_url("http://backend.test:1337", None), "");
    assert_eq!(proxy_image_url("http://backend.test:1337", Some("")), "");
}

#[test]
fn proxy_url_prefixes_relative_paths() {
    let url = proxy_image_url("http://backend.test:1337", Some("/uploads/pic.jpg"));
    assert_eq!(url, "/api/proxy-image?url=http%3A%2F%2Fbackend.test%3A1337%2Fuploads%2Fpic.jpg");
}

#[test]
fn proxy_url_passes_absolute_urls_through() {
    let url = proxy_image_url("http://backend.test:1337", Some("http://cdn.test/a.png"));
    assert_eq!(url, "/api/proxy-image?url=http%3A%2F%2Fcdn.test%2Fa.png");
}

#[test]
fn proxy_url_tolerates_trailing_slash_on_base() {
    let url = proxy_image_url("http://backend.test:1337/", Some("/uploads/pic.jpg"));
    assert_eq!(url, "/api/proxy-image?url=http%3A%2F%2Fbackend.test%3A1337%2Fuploads%2Fpic.jpg");
}
