use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::routing::any;
use reqwest::{Client, redirect};

use audube::application::ports::ResolverError;
use audube::infrastructure::upstream::{MAX_REDIRECTS, PROBE_TIMEOUT, follow_redirects};

use crate::helpers::{closed_base_url, spawn_server};

fn no_redirect_client() -> Client {
    Client::builder()
        .redirect(redirect::Policy::none())
        .build()
        .unwrap()
}

async fn counting_loop_server() -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let router = Router::new()
        .route(
            "/loop",
            any(|State(hits): State<Arc<AtomicUsize>>| async move {
                hits.fetch_add(1, Ordering::SeqCst);
                (StatusCode::FOUND, [(header::LOCATION, "/loop")])
            }),
        )
        .with_state(Arc::clone(&hits));
    (spawn_server(router).await, hits)
}

#[tokio::test]
async fn given_url_that_always_redirects_when_following_then_fails_after_eleven_probes() {
    let (base_url, hits) = counting_loop_server().await;

    let result = follow_redirects(
        &no_redirect_client(),
        &format!("{}/loop", base_url),
        MAX_REDIRECTS,
        PROBE_TIMEOUT,
    )
    .await;

    assert!(matches!(result, Err(ResolverError::RedirectLoopExceeded(10))));
    assert_eq!(hits.load(Ordering::SeqCst), 11);
}

#[tokio::test]
async fn given_redirect_chain_when_following_then_returns_final_url() {
    let router = Router::new()
        .route(
            "/start",
            any(|| async { (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, "/hop")]) }),
        )
        .route(
            "/hop",
            any(|| async { (StatusCode::TEMPORARY_REDIRECT, [(header::LOCATION, "final.mp4")]) }),
        )
        .route("/final.mp4", any(|| async { StatusCode::OK }));
    let base_url = spawn_server(router).await;

    let resolved = follow_redirects(
        &no_redirect_client(),
        &format!("{}/start", base_url),
        MAX_REDIRECTS,
        PROBE_TIMEOUT,
    )
    .await
    .unwrap();

    assert_eq!(resolved, format!("{}/final.mp4", base_url));
}

#[tokio::test]
async fn given_direct_url_when_following_then_returns_it_unchanged() {
    let router = Router::new().route("/direct", any(|| async { StatusCode::OK }));
    let base_url = spawn_server(router).await;
    let url = format!("{}/direct", base_url);

    let resolved = follow_redirects(&no_redirect_client(), &url, MAX_REDIRECTS, PROBE_TIMEOUT)
        .await
        .unwrap();

    assert_eq!(resolved, url);
}

#[tokio::test]
async fn given_terminal_not_found_when_following_then_is_rejected() {
    let base_url = spawn_server(Router::new()).await;

    let result = follow_redirects(
        &no_redirect_client(),
        &format!("{}/missing", base_url),
        MAX_REDIRECTS,
        PROBE_TIMEOUT,
    )
    .await;

    assert!(matches!(result, Err(ResolverError::UpstreamRejected(ref m)) if m.contains("404")));
}

#[tokio::test]
async fn given_redirect_without_location_when_following_then_is_malformed() {
    let router = Router::new().route("/bare", any(|| async { StatusCode::FOUND }));
    let base_url = spawn_server(router).await;

    let result = follow_redirects(
        &no_redirect_client(),
        &format!("{}/bare", base_url),
        MAX_REDIRECTS,
        PROBE_TIMEOUT,
    )
    .await;

    assert!(matches!(result, Err(ResolverError::UpstreamMalformed(_))));
}

#[tokio::test]
async fn given_unreachable_host_when_following_then_is_unavailable() {
    let base_url = closed_base_url().await;

    let result = follow_redirects(
        &no_redirect_client(),
        &format!("{}/anything", base_url),
        MAX_REDIRECTS,
        Duration::from_millis(500),
    )
    .await;

    assert!(matches!(result, Err(ResolverError::UpstreamUnavailable(_))));
}
