use std::time::Duration;

use serde::{Deserialize, Serialize};

pub mod loader;
pub mod validator;

pub use loader::load_client_config;

pub const DEFAULT_CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart/{ticker}";
pub const DEFAULT_DOWNLOAD_URL: &str =
    "https://query1.finance.yahoo.com/v7/finance/download/{ticker}";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:86.0) Gecko/20100101 Firefox/86.0";

/// Default cap on simultaneous requests issued by a batch call.
pub const DEFAULT_BATCH_CONCURRENCY: usize = 8;
/// Default number of items a poller may queue per channel before backpressure applies.
pub const DEFAULT_POLL_BUFFER: usize = 16;

/// What a poller does when a consumer falls behind and the channel buffer is full.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backpressure {
    /// Discard the item that does not fit and keep polling.
    #[default]
    DropNewest,
    /// Wait for buffer space; a stop request still interrupts the wait.
    Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Chart endpoint, `{ticker}` is substituted per request.
    pub chart_url_template: String,
    /// CSV download endpoint, `{ticker}` is substituted per request.
    pub download_url_template: String,
    pub user_agent: String,
    /// `None` leaves the transport default in place.
    pub request_timeout: Option<Duration>,
    pub batch_concurrency: usize,
    pub poll_buffer: usize,
    pub backpressure: Backpressure,
}

impl ClientConfig {
    pub fn builtin() -> Self {
        Self {
            chart_url_template: DEFAULT_CHART_URL.to_string(),
            download_url_template: DEFAULT_DOWNLOAD_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: None,
            batch_concurrency: DEFAULT_BATCH_CONCURRENCY,
            poll_buffer: DEFAULT_POLL_BUFFER,
            backpressure: Backpressure::default(),
        }
    }

    /// Point both endpoints at `base_url`, keeping the provider's path layout.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        self.chart_url_template = format!("{base}/v8/finance/chart/{{ticker}}");
        self.download_url_template = format!("{base}/v7/finance/download/{{ticker}}");
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::builtin()
    }
}
