//! Drives `HttpSource` and the fetcher against a local server that mimics the
//! GitHub REST API and the contributions API.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use ghsummary::error::FetchError;
use ghsummary::{ActivitySource, ActivitySummaryFetcher, HttpSource};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

#[derive(Clone, Default)]
struct Hits {
    repo_pages: Arc<AtomicUsize>,
}

async fn profile(Path(user): Path<String>) -> Response {
    match user.as_str() {
        "octocat" => Json(json!({
            "login": "octocat",
            "name": "The Octocat",
            "bio": null,
            "public_repos": 103,
            "followers": 20,
            "following": 3,
            "created_at": "2011-01-25T18:44:36Z"
        }))
        .into_response(),
        "garbage" => (StatusCode::OK, "<html>not json</html>").into_response(),
        _ => (StatusCode::NOT_FOUND, Json(json!({ "message": "Not Found" }))).into_response(),
    }
}

async fn repos(
    State(hits): State<Hits>,
    Path(user): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    hits.repo_pages.fetch_add(1, Ordering::SeqCst);

    assert_eq!(params.get("per_page").map(String::as_str), Some("100"));
    let page: usize = params
        .get("page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(0);

    match (user.as_str(), page) {
        ("octocat", 1) => {
            let entries: Vec<Value> = (0..100)
                .map(|i| {
                    json!({ "name": format!("repo-{i}"), "stargazers_count": 1, "forks_count": 0 })
                })
                .collect();
            Json(Value::Array(entries)).into_response()
        }
        ("octocat", 2) => Json(json!([
            { "stargazers_count": 5, "forks_count": 2 },
            { "stargazers_count": null, "forks_count": 1 },
            { "name": "bare" }
        ]))
        .into_response(),
        ("limited", _) => Json(json!({ "message": "API rate limit exceeded" })).into_response(),
        // Pagination must stop after the short second page.
        ("octocat", _) => StatusCode::IM_A_TEAPOT.into_response(),
        _ => (StatusCode::NOT_FOUND, Json(json!({ "message": "Not Found" }))).into_response(),
    }
}

async fn contributions(
    Path(user): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let last_year = params.get("y").map(String::as_str) == Some("last");

    match (user.as_str(), last_year) {
        ("octocat", false) => Json(json!({
            "total": { "2024": 400, "2025": 350, "2026": "120" },
            "contributions": []
        }))
        .into_response(),
        ("octocat", true) => Json(json!({
            "total": { "lastYear": 300 },
            "contributions": [
                { "date": "2026-10-15", "count": 7, "level": 3 },
                { "date": "2026-10-16", "count": 0, "level": 0 },
                { "date": "2026-10-17", "count": 1, "level": 1 },
                { "date": "2026-10-18", "count": 2, "level": 1 },
                { "date": "2026-10-19", "count": 0, "level": 0 }
            ]
        }))
        .into_response(),
        (_, false) => Json(json!({ "error": "no such user" })).into_response(),
        (_, true) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn serve() -> (SocketAddr, Hits) {
    let hits = Hits::default();
    let app = Router::new()
        .route("/users/:user", get(profile))
        .route("/users/:user/repos", get(repos))
        .route("/v4/:user", get(contributions))
        .with_state(hits.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, hits)
}

/// Answers one request with a body shorter than its Content-Length, then
/// closes the connection.
async fn serve_truncated_body() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = stream.read(&mut buf).await;
        stream
            .write_all(
                b"HTTP/1.1 200 OK\r\n\
                  Content-Type: application/json\r\n\
                  Content-Length: 200\r\n\
                  \r\n\
                  {\"login\": \"octo",
            )
            .await
            .unwrap();
        stream.shutdown().await.unwrap();
    });
    addr
}

fn source_for(addr: SocketAddr) -> HttpSource {
    let base = format!("http://{addr}");
    let http = reqwest::Client::builder()
        .user_agent("ghsummary-tests")
        .no_proxy()
        .build()
        .unwrap();
    HttpSource::with_client(http, &base, &base).unwrap()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

#[tokio::test]
async fn summarizes_an_existing_account() {
    let (addr, hits) = serve().await;
    let fetcher = ActivitySummaryFetcher::new(source_for(addr));

    let summary = fetcher.fetch("octocat", today()).await;

    let profile = summary.profile.as_ref().expect("profile should be available");
    assert_eq!(profile.login, "octocat");
    assert_eq!(profile.public_repos, 103);
    assert_eq!(profile.followers, 20);
    assert_eq!(profile.following, 3);
    assert_eq!(profile.created_on(), NaiveDate::from_ymd_opt(2011, 1, 25));

    assert_eq!(summary.total_stars, 105);
    assert_eq!(summary.total_forks, 3);
    assert_eq!(summary.total_contributions, 870);
    // Today is zero, yesterday and the day before are not; the 16th breaks it.
    assert_eq!(summary.current_streak, 2);
    assert_eq!(hits.repo_pages.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn unknown_account_falls_back_to_defaults() {
    let (addr, hits) = serve().await;
    let fetcher = ActivitySummaryFetcher::new(source_for(addr));

    let summary = fetcher.fetch("ghost", today()).await;

    assert!(summary.profile.is_none());
    assert_eq!(summary.total_stars, 0);
    assert_eq!(summary.total_forks, 0);
    assert_eq!(summary.total_contributions, 0);
    assert_eq!(summary.current_streak, 0);
    assert_eq!(hits.repo_pages.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn error_payload_in_listing_is_malformed() {
    let (addr, _) = serve().await;
    let source = source_for(addr);

    let err = source.repo_page("limited", 1).await.unwrap_err();
    match err {
        FetchError::Malformed { reason, .. } => {
            assert!(reason.contains("API rate limit exceeded"))
        }
        other => panic!("expected Malformed, got {other:?}"),
    }
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let (addr, _) = serve().await;
    let source = source_for(addr);

    let err = source.profile("ghost").await.unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 404, .. }));

    let err = source.recent_calendar("ghost").await.unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 500, .. }));
}

#[tokio::test]
async fn undecodable_body_is_malformed() {
    let (addr, _) = serve().await;
    let source = source_for(addr);

    let err = source.profile("garbage").await.unwrap_err();
    assert!(matches!(err, FetchError::Malformed { .. }));

    let err = source.yearly_totals("ghost").await.unwrap_err();
    assert!(matches!(err, FetchError::Malformed { .. }));
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let source = source_for(addr);
    let err = source.profile("octocat").await.unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)));

    let summary = ActivitySummaryFetcher::new(source)
        .fetch("octocat", today())
        .await;
    assert!(summary.profile.is_none());
    assert_eq!(summary.total_stars, 0);
}

#[tokio::test]
async fn body_cut_off_mid_stream_is_a_transport_error() {
    let addr = serve_truncated_body().await;
    let source = source_for(addr);

    let err = source.profile("octocat").await.unwrap_err();
    assert!(
        matches!(err, FetchError::Transport(_)),
        "expected Transport, got {err:?}"
    );
}
