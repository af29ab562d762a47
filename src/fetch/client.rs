use std::sync::Arc;

use log::{debug, warn};
use reqwest::{header::USER_AGENT, Client};

use crate::config::{validator, ClientConfig};
use crate::error::{Context, QuoteError};
use crate::quote::{self, CsvQuote, Interval, Period, Quote, RawQuoteDocument, TimeRange};
use crate::utils::{format_epoch_local, normalize_ticker};

use super::request::{prepare_request, Endpoint};
use super::FetchResult;

/// Single-ticker access to the provider's chart and download endpoints.
///
/// Each call issues exactly one GET, with no retry. Cloning is cheap and clones share
/// the underlying connection pool.
#[derive(Debug, Clone)]
pub struct QuoteClient {
    config: Arc<ClientConfig>,
    client: Client,
}

impl QuoteClient {
    pub fn new(config: ClientConfig) -> FetchResult<Self> {
        validator::validate_client_config(&config)?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .context("failed to construct quote HTTP client")?;

        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Raw chart JSON for `ticker` over `period`.
    pub async fn fetch_json_text(
        &self,
        ticker: &str,
        interval: Interval,
        period: Period,
    ) -> FetchResult<String> {
        self.fetch_json_text_in(ticker, interval, period.resolve()?)
            .await
    }

    pub async fn fetch_document(
        &self,
        ticker: &str,
        interval: Interval,
        period: Period,
    ) -> FetchResult<RawQuoteDocument> {
        self.fetch_document_in(ticker, interval, period.resolve()?)
            .await
    }

    pub async fn fetch_quote(
        &self,
        ticker: &str,
        interval: Interval,
        period: Period,
    ) -> FetchResult<Quote> {
        self.fetch_quote_in(ticker, interval, period.resolve()?)
            .await
    }

    /// Raw download CSV for `ticker` over `period`.
    pub async fn fetch_csv_text(
        &self,
        ticker: &str,
        interval: Interval,
        period: Period,
    ) -> FetchResult<String> {
        self.fetch_csv_text_in(ticker, interval, period.resolve()?)
            .await
    }

    pub async fn fetch_csv(
        &self,
        ticker: &str,
        interval: Interval,
        period: Period,
    ) -> FetchResult<Vec<CsvQuote>> {
        self.fetch_csv_in(ticker, interval, period.resolve()?).await
    }

    pub async fn fetch_json_text_in(
        &self,
        ticker: &str,
        interval: Interval,
        range: TimeRange,
    ) -> FetchResult<String> {
        self.get(Endpoint::Chart, ticker, interval, range).await
    }

    pub async fn fetch_document_in(
        &self,
        ticker: &str,
        interval: Interval,
        range: TimeRange,
    ) -> FetchResult<RawQuoteDocument> {
        let body = self.fetch_json_text_in(ticker, interval, range).await?;
        quote::parse_document(&body)
    }

    pub async fn fetch_quote_in(
        &self,
        ticker: &str,
        interval: Interval,
        range: TimeRange,
    ) -> FetchResult<Quote> {
        let ticker = normalize_ticker(ticker)?;
        let document = self.fetch_document_in(&ticker, interval, range).await?;
        quote::project(&document, &ticker, range, interval)
    }

    pub async fn fetch_csv_text_in(
        &self,
        ticker: &str,
        interval: Interval,
        range: TimeRange,
    ) -> FetchResult<String> {
        self.get(Endpoint::Download, ticker, interval, range).await
    }

    pub async fn fetch_csv_in(
        &self,
        ticker: &str,
        interval: Interval,
        range: TimeRange,
    ) -> FetchResult<Vec<CsvQuote>> {
        let body = self.fetch_csv_text_in(ticker, interval, range).await?;
        quote::parse_csv(&body)
    }

    async fn get(
        &self,
        endpoint: Endpoint,
        ticker: &str,
        interval: Interval,
        range: TimeRange,
    ) -> FetchResult<String> {
        let request = prepare_request(&self.config, endpoint, ticker, interval, range)?;
        debug!(
            "GET {} interval={} from {} to {}",
            request.url,
            interval,
            format_epoch_local(range.start),
            format_epoch_local(range.end)
        );

        let response = self
            .client
            .get(&request.url)
            .query(&request.query)
            .header(USER_AGENT, self.config.user_agent.as_str())
            .send()
            .await
            .map_err(|err| {
                warn!("request for {} failed: {}", ticker, err);
                QuoteError::Network(err)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("request for {} returned status {}", ticker, status);
            return Err(QuoteError::Http {
                status,
                url: request.url,
            });
        }

        Ok(response.text().await?)
    }
}
