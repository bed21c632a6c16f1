use crate::{create_test_config, html, index_page, mount_detail, mount_page};
use proposal_audit::crawler::{audit, load_index, HttpFetcher, PageFetcher};
use proposal_audit::output::StatusReport;
use proposal_audit::{AuditError, IndexError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_full_audit_with_failures_and_mismatch() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        index_page(&[("PA", 1), ("SF", 2), ("SR", 3), ("I", 4), ("SA", 5)]),
    )
    .await;

    mount_detail(&mock_server, 1, "Active").await;
    mount_detail(&mock_server, 2, "Final").await;
    // Proposal 3 fails on the server side
    Mock::given(method("GET"))
        .and(path("/pep-0003/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    mount_detail(&mock_server, 4, "Draft").await;
    // Listed as accepted but the page still says draft
    mount_detail(&mock_server, 5, "Draft").await;

    let config = create_test_config(&base_url);
    let fetcher = HttpFetcher::from_config(&config.fetcher).expect("Failed to build fetcher");

    let outcome = audit(&config, &fetcher).await.expect("Audit failed");

    assert_eq!(outcome.total(), 4);
    assert_eq!(outcome.counts.get("Active"), 1);
    assert_eq!(outcome.counts.get("Final"), 1);
    assert_eq!(outcome.counts.get("Draft"), 2);

    assert_eq!(outcome.skipped.len(), 1);
    assert_eq!(outcome.skipped[0].record.sequence_number, 3);

    assert_eq!(outcome.mismatches.len(), 1);
    let mismatch = &outcome.mismatches[0];
    assert_eq!(mismatch.detail_url, format!("{}/pep-0005/", base_url));
    assert_eq!(mismatch.declared_status, "Draft");
    assert_eq!(mismatch.expected_list(), "Accepted, Active");

    let report = StatusReport::from_outcome(&outcome);
    assert_eq!(report.rows().last(), Some(&("Total".to_string(), 4)));
}

#[tokio::test]
async fn test_page_without_status_is_skipped() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", index_page(&[("SF", 1), ("SF", 2)])).await;
    mount_page(
        &mock_server,
        "/pep-0001/",
        "<html><body><p>Moved elsewhere</p></body></html>".to_string(),
    )
    .await;
    mount_detail(&mock_server, 2, "Final").await;

    let config = create_test_config(&mock_server.uri());
    let fetcher = HttpFetcher::from_config(&config.fetcher).unwrap();

    let outcome = audit(&config, &fetcher).await.unwrap();

    assert_eq!(outcome.total(), 1);
    assert_eq!(outcome.skipped.len(), 1);
    assert!(outcome.mismatches.is_empty());
}

#[tokio::test]
async fn test_non_html_detail_is_skipped() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", index_page(&[("SF", 1)])).await;
    Mock::given(method("GET"))
        .and(path("/pep-0001/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let fetcher = HttpFetcher::from_config(&config.fetcher).unwrap();

    let outcome = audit(&config, &fetcher).await.unwrap();

    assert_eq!(outcome.total(), 0);
    assert_eq!(outcome.skipped.len(), 1);
}

#[tokio::test]
async fn test_missing_index_container_aborts() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        "<html><body><table><tr><td>SF</td><td>1</td></tr></table></body></html>".to_string(),
    )
    .await;

    let config = create_test_config(&mock_server.uri());
    let fetcher = HttpFetcher::from_config(&config.fetcher).unwrap();

    let result = audit(&config, &fetcher).await;

    assert!(matches!(
        result,
        Err(AuditError::Index(IndexError::MissingContainer { .. }))
    ));
}

#[tokio::test]
async fn test_unreachable_index_aborts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let fetcher = HttpFetcher::from_config(&config.fetcher).unwrap();

    let result = load_index(&config, &fetcher).await;

    assert!(matches!(result, Err(AuditError::IndexFetch { .. })));
}

#[tokio::test]
async fn test_unknown_category_key_aborts() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", index_page(&[("SF", 1), ("SX", 2)])).await;
    mount_detail(&mock_server, 1, "Final").await;
    mount_detail(&mock_server, 2, "Final").await;

    let config = create_test_config(&mock_server.uri());
    let fetcher = HttpFetcher::from_config(&config.fetcher).unwrap();

    let result = audit(&config, &fetcher).await;

    assert!(matches!(
        result,
        Err(AuditError::UnknownCategoryKey { ref key, .. }) if key == "X"
    ));
}

#[tokio::test]
async fn test_transient_error_is_retried() {
    let mock_server = MockServer::start().await;

    // First request fails, the retry succeeds
    Mock::given(method("GET"))
        .and(path("/pep-0001/"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pep-0001/"))
        .respond_with(html(crate::detail_page("Final")))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri());
    config.fetcher.max_retries = 1;
    let fetcher = HttpFetcher::from_config(&config.fetcher).unwrap();

    let body = fetcher
        .fetch(&format!("{}/pep-0001/", mock_server.uri()))
        .await
        .expect("Retry should have succeeded");

    assert!(body.contains("Final"));
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pep-0001/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri());
    config.fetcher.max_retries = 3;
    let fetcher = HttpFetcher::from_config(&config.fetcher).unwrap();

    let result = fetcher
        .fetch(&format!("{}/pep-0001/", mock_server.uri()))
        .await;

    assert!(result.is_err());
}
