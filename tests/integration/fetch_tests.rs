//! Response classification and retry policy tests

use crate::support::test_config;
use job_harvest::crawler::{
    fetch_detail_page, fetch_listing_page, Attempt, DetailFetch, FetchOutcome, Fetcher,
    ListingFetch, PolitenessDelay,
};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE: Attempt<'static> = Attempt::Listing { page: 1 };

fn fetcher_for(server: &MockServer) -> Fetcher {
    let config = test_config(server);
    Fetcher::new(&config.http, &config.retry).expect("Failed to build fetcher")
}

async fn mount_status(server: &MockServer, route: &str, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(template)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_success_returns_raw_body() {
    let server = MockServer::start().await;
    mount_status(
        &server,
        "/ok",
        ResponseTemplate::new(200).set_body_string("<html>ok</html>"),
    )
    .await;

    let fetcher = fetcher_for(&server);
    let outcome = fetcher.fetch(&format!("{}/ok", server.uri()), PAGE).await;
    assert_eq!(outcome, FetchOutcome::Success(b"<html>ok</html>".to_vec()));
}

#[tokio::test]
async fn test_rate_limit_reads_retry_after() {
    let server = MockServer::start().await;
    mount_status(
        &server,
        "/limited",
        ResponseTemplate::new(429).insert_header("Retry-After", "7"),
    )
    .await;

    let fetcher = fetcher_for(&server);
    let outcome = fetcher.fetch(&format!("{}/limited", server.uri()), PAGE).await;
    assert_eq!(outcome, FetchOutcome::RateLimited(Duration::from_secs(7)));
}

#[tokio::test]
async fn test_rate_limit_without_header_uses_default() {
    let server = MockServer::start().await;
    mount_status(&server, "/limited", ResponseTemplate::new(429)).await;

    let mut config = test_config(&server);
    config.retry.default_retry_after_secs = 5;
    let fetcher = Fetcher::new(&config.http, &config.retry).unwrap();

    let outcome = fetcher.fetch(&format!("{}/limited", server.uri()), PAGE).await;
    assert_eq!(outcome, FetchOutcome::RateLimited(Duration::from_secs(5)));
}

#[tokio::test]
async fn test_not_found() {
    let server = MockServer::start().await;
    mount_status(&server, "/gone", ResponseTemplate::new(404)).await;

    let fetcher = fetcher_for(&server);
    let outcome = fetcher.fetch(&format!("{}/gone", server.uri()), PAGE).await;
    assert_eq!(outcome, FetchOutcome::NotFound);
}

#[tokio::test]
async fn test_server_and_unexpected_statuses_are_retryable() {
    let server = MockServer::start().await;
    mount_status(&server, "/bad-gateway", ResponseTemplate::new(502)).await;
    mount_status(&server, "/forbidden", ResponseTemplate::new(403)).await;

    let fetcher = fetcher_for(&server);
    let bad_gateway = fetcher
        .fetch(&format!("{}/bad-gateway", server.uri()), PAGE)
        .await;
    let forbidden = fetcher
        .fetch(&format!("{}/forbidden", server.uri()), PAGE)
        .await;

    assert_eq!(bad_gateway, FetchOutcome::RetryableError("HTTP 502".into()));
    assert_eq!(forbidden, FetchOutcome::RetryableError("HTTP 403".into()));
}

#[tokio::test]
async fn test_timeout_is_retryable() {
    let server = MockServer::start().await;
    mount_status(
        &server,
        "/slow",
        ResponseTemplate::new(200).set_delay(Duration::from_millis(1000)),
    )
    .await;

    let fetcher = fetcher_for(&server);
    let outcome = fetcher.fetch(&format!("{}/slow", server.uri()), PAGE).await;
    assert!(matches!(outcome, FetchOutcome::RetryableError(_)));
}

#[tokio::test]
async fn test_unbuildable_request_is_fatal() {
    let server = MockServer::start().await;
    let fetcher = fetcher_for(&server);
    let outcome = fetcher.fetch("not a url", PAGE).await;
    assert!(matches!(outcome, FetchOutcome::Fatal(_)));
}

#[tokio::test]
async fn test_listing_retries_until_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(4)
        .expect(4)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(3)
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string("content"))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server);
    let fetcher = fetcher_for(&server);
    let delay = PolitenessDelay::from_config(&config.retry);

    let fetched =
        fetch_listing_page(&fetcher, &delay, &format!("{}/page", server.uri()), 1, None).await;
    assert_eq!(fetched, ListingFetch::Page(b"content".to_vec()));
}

#[tokio::test]
async fn test_listing_repeat_ends_pagination() {
    let server = MockServer::start().await;
    mount_status(
        &server,
        "/page",
        ResponseTemplate::new(200).set_body_string("same"),
    )
    .await;

    let config = test_config(&server);
    let fetcher = fetcher_for(&server);
    let delay = PolitenessDelay::from_config(&config.retry);
    let url = format!("{}/page", server.uri());

    let repeated =
        fetch_listing_page(&fetcher, &delay, &url, 2, Some(b"same".as_slice())).await;
    assert_eq!(repeated, ListingFetch::End);

    let changed =
        fetch_listing_page(&fetcher, &delay, &url, 2, Some(b"other".as_slice())).await;
    assert_eq!(changed, ListingFetch::Page(b"same".to_vec()));
}

#[tokio::test]
async fn test_detail_gives_up_after_retry_budget() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/job"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        // One initial attempt plus three retries
        .expect(4)
        .mount(&server)
        .await;

    let config = test_config(&server);
    let fetcher = fetcher_for(&server);
    let delay = PolitenessDelay::from_config(&config.retry);

    let fetched = fetch_detail_page(
        &fetcher,
        &delay,
        &config.retry,
        &format!("{}/job", server.uri()),
        "1",
    )
    .await;
    assert_eq!(fetched, DetailFetch::Exhausted);
}

#[tokio::test]
async fn test_detail_not_found_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/job"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server);
    let fetcher = fetcher_for(&server);
    let delay = PolitenessDelay::from_config(&config.retry);

    let fetched = fetch_detail_page(
        &fetcher,
        &delay,
        &config.retry,
        &format!("{}/job", server.uri()),
        "1",
    )
    .await;
    assert_eq!(fetched, DetailFetch::Missing);
}

#[tokio::test]
async fn test_detail_recovers_within_budget() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/job"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(3)
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/job"))
        .respond_with(ResponseTemplate::new(200).set_body_string("detail"))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server);
    let fetcher = fetcher_for(&server);
    let delay = PolitenessDelay::from_config(&config.retry);

    let fetched = fetch_detail_page(
        &fetcher,
        &delay,
        &config.retry,
        &format!("{}/job", server.uri()),
        "1",
    )
    .await;
    assert_eq!(fetched, DetailFetch::Page(b"detail".to_vec()));
}
