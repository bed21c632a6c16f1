//! Integration tests for the audit pipeline
//!
//! These tests use wiremock to serve an index page and proposal pages and
//! run the full index -> detail -> reconcile cycle end-to-end.

mod audit_tests;
mod cache_tests;

use proposal_audit::config::{Config, FetcherConfig, SiteConfig};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
pub fn create_test_config(base_url: &str) -> Config {
    Config {
        site: SiteConfig {
            index_url: format!("{}/", base_url),
            ..SiteConfig::default()
        },
        fetcher: FetcherConfig {
            max_retries: 0,
            retry_delay_ms: 10,
            timeout_secs: 5,
            ..FetcherConfig::default()
        },
        ..Config::default()
    }
}

/// Index page with one table row per `(type/status code, number)` entry
pub fn index_page(entries: &[(&str, u32)]) -> String {
    let rows: String = entries
        .iter()
        .map(|(code, number)| {
            format!(
                r#"<tr><td><abbr>{code}</abbr></td>
                   <td class="num"><a class="pep reference internal" href="pep-{number:04}/">{number}</a></td>
                   <td>Proposal {number}</td></tr>"#
            )
        })
        .collect();

    format!(
        r#"<html><head><title>Index</title></head><body>
        <section id="numerical-index"><table>
          <thead><tr><th>Type</th><th>PEP</th><th>Title</th></tr></thead>
          <tbody>{rows}</tbody>
        </table></section>
        </body></html>"#
    )
}

/// Detail page declaring `status`
pub fn detail_page(status: &str) -> String {
    format!(
        r#"<html><body><dl class="rfc2822 field-list simple">
        <dt class="field-odd">Author<span class="colon">:</span></dt>
        <dd class="field-odd">A. Person</dd>
        <dt class="field-even">Status<span class="colon">:</span></dt>
        <dd class="field-even"><abbr title="Proposal status">{status}</abbr></dd>
        <dt class="field-odd">Type<span class="colon">:</span></dt>
        <dd class="field-odd">Standards Track</dd>
        </dl></body></html>"#
    )
}

pub fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

/// Mounts a GET mock serving `body` as HTML at `route`
pub async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
}

/// Mounts the detail page of proposal `number` declaring `status`
pub async fn mount_detail(server: &MockServer, number: u32, status: &str) {
    mount_page(server, &format!("/pep-{:04}/", number), detail_page(status)).await;
}
