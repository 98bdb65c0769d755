//! End-to-end crawl tests against a mock job site

use crate::support::{detail_html, listing_html, test_config, LISTING_PATH};
use job_harvest::crawler::{run_crawl, Coordinator};
use job_harvest::record::{JobId, COMPANY_NAME, JOB_ID, JOB_NAME};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_listing(server: &MockServer, page: u32, body: String, expected: u64) {
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(expected)
        .mount(server)
        .await;
}

async fn mount_detail(server: &MockServer, id: &str, title: &str, company: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/en/job/{}/", id)))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_html(
            title,
            company,
            &[("Job Location", "Riyadh")],
        )))
        .mount(server)
        .await;
}

fn ids(values: &[&str]) -> Vec<JobId> {
    values.iter().map(|v| JobId::from(*v)).collect()
}

#[tokio::test]
async fn test_full_crawl_with_repeat_timeout_and_missing_job() {
    let server = MockServer::start().await;

    let page = listing_html(&["101", "102"]);
    mount_listing(&server, 1, page.clone(), 1).await;
    mount_listing(&server, 2, page, 1).await;
    mount_listing(&server, 3, listing_html(&["999"]), 0).await;

    // Two timeouts, then the page arrives within the retry budget
    Mock::given(method("GET"))
        .and(path("/en/job/101/"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(1000)))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    mount_detail(&server, "101", "Accountant", "Acme").await;

    Mock::given(method("GET"))
        .and(path("/en/job/102/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let result = run_crawl(&test_config(&server))
        .await
        .expect("Crawl should succeed");

    assert_eq!(result.discovered, 2);
    assert_eq!(result.records.len(), 1);
    let record = &result.records[0];
    assert_eq!(record.get(JOB_ID), Some("101"));
    assert_eq!(record.get(JOB_NAME), Some("Accountant"));
    assert_eq!(record.get(COMPANY_NAME), Some("Acme"));
    assert_eq!(record.get("Job Location"), Some("Riyadh"));

    assert_eq!(result.missing, ids(&["102"]));
    assert!(result.failed.is_empty());
    assert!(result.degraded.is_empty());
}

#[tokio::test]
async fn test_exhausted_job_is_requeued_once() {
    let server = MockServer::start().await;
    mount_listing(&server, 1, listing_html(&["7", "8"]), 1).await;

    Mock::given(method("GET"))
        .and(path("/en/job/7/"))
        .respond_with(ResponseTemplate::new(502))
        // Four attempts in the main pass, four in the requeue pass
        .expect(8)
        .mount(&server)
        .await;
    mount_detail(&server, "8", "Driver", "Fleet").await;

    let result = run_crawl(&test_config(&server)).await.unwrap();

    assert_eq!(result.records.len(), 1);
    assert_eq!(result.records[0].get(JOB_ID), Some("8"));
    assert_eq!(result.failed, ids(&["7"]));
    assert!(result.missing.is_empty());
}

#[tokio::test]
async fn test_requeue_success_is_appended_after_main_pass() {
    let server = MockServer::start().await;
    mount_listing(&server, 1, listing_html(&["1", "2"]), 1).await;

    // Job 1 exhausts its budget in the main pass, then recovers
    Mock::given(method("GET"))
        .and(path("/en/job/1/"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(4)
        .expect(4)
        .mount(&server)
        .await;
    mount_detail(&server, "1", "Nurse", "Clinic").await;
    mount_detail(&server, "2", "Chef", "Hotel").await;

    let result = run_crawl(&test_config(&server)).await.unwrap();

    let order: Vec<&str> = result
        .records
        .iter()
        .filter_map(|record| record.get(JOB_ID))
        .collect();
    assert_eq!(order, vec!["2", "1"]);
    assert!(result.failed.is_empty());
}

#[tokio::test]
async fn test_forbidden_detail_exhausts_budget() {
    let server = MockServer::start().await;
    mount_listing(&server, 1, listing_html(&["5"]), 1).await;

    Mock::given(method("GET"))
        .and(path("/en/job/5/"))
        .respond_with(ResponseTemplate::new(403))
        .expect(8)
        .mount(&server)
        .await;

    let result = run_crawl(&test_config(&server)).await.unwrap();
    assert!(result.records.is_empty());
    assert_eq!(result.failed, ids(&["5"]));
}

#[tokio::test]
async fn test_pagination_stops_on_empty_page() {
    let server = MockServer::start().await;
    mount_listing(&server, 1, listing_html(&["1"]), 1).await;
    mount_listing(&server, 2, listing_html(&[]), 1).await;
    mount_listing(&server, 3, listing_html(&["3"]), 0).await;

    let coordinator = Coordinator::new(&test_config(&server)).unwrap();
    assert_eq!(coordinator.discover_ids().await, ids(&["1"]));
}

#[tokio::test]
async fn test_pagination_collapses_duplicate_ids() {
    let server = MockServer::start().await;
    mount_listing(&server, 1, listing_html(&["10", "11"]), 1).await;
    mount_listing(&server, 2, listing_html(&["11", "12"]), 1).await;

    let coordinator = Coordinator::new(&test_config(&server)).unwrap();
    let mut discovered = coordinator.discover_ids().await;
    discovered.sort();
    assert_eq!(discovered, ids(&["10", "11", "12"]));
}

#[tokio::test]
async fn test_pagination_survives_errors_and_rate_limits() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    mount_listing(&server, 1, listing_html(&["42"]), 1).await;

    let coordinator = Coordinator::new(&test_config(&server)).unwrap();
    assert_eq!(coordinator.discover_ids().await, ids(&["42"]));
}

#[tokio::test]
async fn test_empty_site_yields_empty_result() {
    let server = MockServer::start().await;

    let result = run_crawl(&test_config(&server)).await.unwrap();
    assert_eq!(result.discovered, 0);
    assert!(result.records.is_empty());
}

#[tokio::test]
async fn test_concurrent_workers_keep_identifier_order() {
    let server = MockServer::start().await;
    mount_listing(&server, 1, listing_html(&["3", "1", "2"]), 1).await;

    for (id, delay_ms) in [("1", 60), ("2", 0), ("3", 30)] {
        Mock::given(method("GET"))
            .and(path(format!("/en/job/{}/", id)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(detail_html(&format!("Job {}", id), "Co", &[]))
                    .set_delay(Duration::from_millis(delay_ms)),
            )
            .mount(&server)
            .await;
    }

    let mut config = test_config(&server);
    config.crawler.detail_workers = 3;
    let result = run_crawl(&config).await.unwrap();

    let order: Vec<&str> = result
        .records
        .iter()
        .filter_map(|record| record.get(JOB_ID))
        .collect();
    assert_eq!(order, vec!["1", "2", "3"]);
}
