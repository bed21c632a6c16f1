use crate::config::expected::ExpectedStatusTable;
use serde::Deserialize;

/// Main configuration structure for Proposal-Audit
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub detail: DetailConfig,
    pub fetcher: FetcherConfig,
    pub cache: CacheConfig,
    pub output: OutputConfig,
    #[serde(rename = "expected-status")]
    pub expected_status: ExpectedStatusTable,
}

/// Where the index lives and how its cells are recognized
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Index page URL; detail hrefs are joined against it
    #[serde(rename = "index-url")]
    pub index_url: String,

    /// CSS selector of the element that wraps the index tables
    #[serde(rename = "index-container")]
    pub index_container: String,

    /// Regex a key cell's trimmed text must match
    #[serde(rename = "key-pattern")]
    pub key_pattern: String,

    /// Regex the following cell's trimmed text must match
    #[serde(rename = "number-pattern")]
    pub number_pattern: String,

    /// Number of leading characters (the proposal type letter) dropped from
    /// the key cell to obtain the category key
    #[serde(rename = "key-prefix-len")]
    pub key_prefix_len: usize,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            index_url: "https://peps.python.org/".to_string(),
            index_container: "section#numerical-index".to_string(),
            key_pattern: r"^\S{0,2}$".to_string(),
            number_pattern: r"^\d+$".to_string(),
            key_prefix_len: 1,
        }
    }
}

/// Detail page field lookup
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DetailConfig {
    /// CSS selector matching field-label elements
    #[serde(rename = "label-selector")]
    pub label_selector: String,

    /// Label text of the status field
    #[serde(rename = "status-label")]
    pub status_label: String,
}

impl Default for DetailConfig {
    fn default() -> Self {
        Self {
            label_selector: "dt.field-even, dt.field-odd".to_string(),
            status_label: "Status:".to_string(),
        }
    }
}

/// HTTP client behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// Extra attempts for 5xx responses and timeouts
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    #[serde(rename = "retry-delay-ms")]
    pub retry_delay_ms: u64,

    /// Pause between two detail page fetches (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("proposal-audit/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
            connect_timeout_secs: 10,
            max_retries: 2,
            retry_delay_ms: 1000,
            request_delay_ms: 0,
        }
    }
}

/// Response cache configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,

    /// Path to the SQLite cache file
    pub path: String,

    /// Entries older than this are refetched; 0 keeps entries forever
    #[serde(rename = "ttl-hours")]
    pub ttl_hours: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "proposal_cache.sqlite".to_string(),
            ttl_hours: 24,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory that receives CSV result files
    #[serde(rename = "results-dir")]
    pub results_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_dir: "results".to_string(),
        }
    }
}
