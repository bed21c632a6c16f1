use crate::{create_test_config, detail_page, html, index_page};
use proposal_audit::cache::{ttl_from_hours, CachedFetcher, PageCache, SqliteCache};
use proposal_audit::crawler::{audit, HttpFetcher, PageFetcher};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_second_run_is_served_from_cache() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let cache_path = temp_dir.path().join("cache.sqlite");

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(index_page(&[("SF", 1), ("SA", 2)])))
        .expect(1)
        .mount(&mock_server)
        .await;
    for (number, status) in [(1, "Final"), (2, "Accepted")] {
        Mock::given(method("GET"))
            .and(path(format!("/pep-{:04}/", number)))
            .respond_with(html(detail_page(status)))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let config = create_test_config(&mock_server.uri());

    let first = {
        let http = HttpFetcher::from_config(&config.fetcher).unwrap();
        let cache = SqliteCache::new(&cache_path).unwrap();
        let fetcher = CachedFetcher::new(http, cache, ttl_from_hours(24));
        audit(&config, &fetcher).await.unwrap()
    };

    // Fresh cache handle on the same file, as a new process would open it
    let second = {
        let http = HttpFetcher::from_config(&config.fetcher).unwrap();
        let cache = SqliteCache::new(&cache_path).unwrap();
        let fetcher = CachedFetcher::new(http, cache, ttl_from_hours(24));
        audit(&config, &fetcher).await.unwrap()
    };

    assert_eq!(first.counts, second.counts);
    assert_eq!(second.total(), 2);
    assert!(second.mismatches.is_empty());
}

#[tokio::test]
async fn test_failed_page_is_not_cached() {
    let mock_server = MockServer::start().await;
    let url = format!("{}/pep-0001/", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/pep-0001/"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pep-0001/"))
        .respond_with(html(detail_page("Final")))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let http = HttpFetcher::from_config(&config.fetcher).unwrap();
    let fetcher = CachedFetcher::new(http, SqliteCache::new_in_memory().unwrap(), None);

    assert!(fetcher.fetch(&url).await.is_err());
    let body = fetcher.fetch(&url).await.unwrap();
    assert!(body.contains("Final"));
}

#[tokio::test]
async fn test_clear_forces_refetch() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let cache_path = temp_dir.path().join("cache.sqlite");
    let url = format!("{}/pep-0001/", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/pep-0001/"))
        .respond_with(html(detail_page("Final")))
        .expect(2)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let http = HttpFetcher::from_config(&config.fetcher).unwrap();
    let fetcher = CachedFetcher::new(http, SqliteCache::new(&cache_path).unwrap(), None);

    fetcher.fetch(&url).await.unwrap();
    fetcher.fetch(&url).await.unwrap();
    assert_eq!(fetcher.clear().unwrap(), 1);
    fetcher.fetch(&url).await.unwrap();

    let reopened = SqliteCache::new(&cache_path).unwrap();
    assert_eq!(reopened.entry_count().unwrap(), 1);
}
