use serde::Deserialize;
use std::time::Duration;

/// Browser identity sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

/// Main configuration structure for Job-Harvest
///
/// Every section falls back to its defaults, so an empty file (or no file
/// at all) yields the reference setup.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub http: HttpConfig,
    pub retry: RetryConfig,
    pub crawler: CrawlerConfig,
    pub output: OutputConfig,
    pub translation: TranslationConfig,
}

/// Source site layout
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Scheme and host of the site, e.g. `https://www.bayt.com`
    #[serde(rename = "site-url")]
    pub site_url: String,

    /// Path of the paginated listing index
    #[serde(rename = "listing-path")]
    pub listing_path: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_url: "https://www.bayt.com".to_string(),
            listing_path: "/en/saudi-arabia/jobs/".to_string(),
        }
    }
}

/// HTTP identity and timeout
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Per-request timeout (milliseconds)
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_ms: 30_000,
        }
    }
}

/// How the jittered politeness delay is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DelayMode {
    /// A fresh value in `[min, max)` for every sleep
    PerSleep,
    /// One value drawn at startup and reused for the whole run
    PerRun,
}

/// Retry and backoff parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retry budget for one detail page fetch
    #[serde(rename = "detail-retries")]
    pub detail_retries: u32,

    /// Starting backoff factor, doubled on each detail retry
    #[serde(rename = "backoff-factor")]
    pub backoff_factor: u32,

    /// Lower bound of the jittered delay (milliseconds, inclusive)
    #[serde(rename = "delay-min-ms")]
    pub delay_min_ms: u64,

    /// Upper bound of the jittered delay (milliseconds, exclusive)
    #[serde(rename = "delay-max-ms")]
    pub delay_max_ms: u64,

    /// Wait applied on HTTP 429 when `Retry-After` is absent or unparseable
    #[serde(rename = "default-retry-after-secs")]
    pub default_retry_after_secs: u64,

    #[serde(rename = "delay-mode")]
    pub delay_mode: DelayMode,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            detail_retries: 3,
            backoff_factor: 2,
            delay_min_ms: 1_000,
            delay_max_ms: 2_000,
            default_retry_after_secs: 5,
            delay_mode: DelayMode::PerSleep,
        }
    }
}

/// Crawl scheduling
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Number of detail pages fetched concurrently
    #[serde(rename = "detail-workers")]
    pub detail_workers: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self { detail_workers: 1 }
    }
}

/// Output locations
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: String,

    #[serde(rename = "file-name")]
    pub file_name: String,

    #[serde(rename = "translated-file-name")]
    pub translated_file_name: String,

    /// Error-only diagnostic log, created inside `directory`
    #[serde(rename = "log-file-name")]
    pub log_file_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "_Output01".to_string(),
            file_name: "Bayt_Saudi_Arabia_Job_Data.csv".to_string(),
            translated_file_name: "Bayt_Saudi_Arabia_Translated_Job_Data.csv".to_string(),
            log_file_name: "harvest.log".to_string(),
        }
    }
}

/// Machine translation of non-ASCII text columns
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    pub enabled: bool,

    #[serde(rename = "target-language")]
    pub target_language: String,

    pub endpoint: String,

    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            target_language: "en".to_string(),
            endpoint: "https://translate.google.com/m".to_string(),
            timeout_ms: 10_000,
        }
    }
}
