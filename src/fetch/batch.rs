//! Concurrent multi-ticker fetches.
//!
//! Every batch call resolves its period once, fans the tickers out through a
//! `buffer_unordered` stream capped at [`ClientConfig::batch_concurrency`], and writes
//! each completion into the slot matching its input position. The returned
//! [`BatchResult`] therefore has one entry per input ticker, in input order,
//! regardless of which request finished first.
//!
//! [`ClientConfig::batch_concurrency`]: crate::config::ClientConfig::batch_concurrency

use std::future::Future;

use futures::stream::{self, StreamExt};
use log::{debug, warn};

use crate::error::QuoteError;
use crate::quote::{CsvQuote, Interval, Period, Quote, RawQuoteDocument};

use super::client::QuoteClient;
use super::{ensure_concurrency_limit, FetchResult};

/// Outcome for one input ticker.
#[derive(Debug)]
pub struct BatchEntry<T> {
    pub ticker: String,
    pub outcome: FetchResult<T>,
}

impl<T> BatchEntry<T> {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Per-ticker outcomes of a batch call, in the order the tickers were given.
#[derive(Debug)]
pub struct BatchResult<T> {
    entries: Vec<BatchEntry<T>>,
}

impl<T> BatchResult<T> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[BatchEntry<T>] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BatchEntry<T>> {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> Option<&BatchEntry<T>> {
        self.entries.get(index)
    }

    pub fn all_succeeded(&self) -> bool {
        self.entries.iter().all(BatchEntry::is_ok)
    }

    pub fn failure_count(&self) -> usize {
        self.entries.iter().filter(|entry| !entry.is_ok()).count()
    }

    /// Failed tickers with their errors, in input order.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &QuoteError)> + '_ {
        self.entries.iter().filter_map(|entry| match &entry.outcome {
            Ok(_) => None,
            Err(err) => Some((entry.ticker.as_str(), err)),
        })
    }

    /// Successful values only, in input order; failed tickers are omitted.
    pub fn successes(self) -> Vec<T> {
        self.entries
            .into_iter()
            .filter_map(|entry| entry.outcome.ok())
            .collect()
    }

    pub fn into_entries(self) -> Vec<BatchEntry<T>> {
        self.entries
    }
}

impl<T> IntoIterator for BatchResult<T> {
    type Item = BatchEntry<T>;
    type IntoIter = std::vec::IntoIter<BatchEntry<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl QuoteClient {
    pub async fn fetch_json_text_batch<S: AsRef<str>>(
        &self,
        tickers: &[S],
        interval: Interval,
        period: Period,
    ) -> FetchResult<BatchResult<String>> {
        let range = period.resolve()?;
        Ok(self
            .fan_out(tickers, |ticker| async move {
                self.fetch_json_text_in(&ticker, interval, range).await
            })
            .await)
    }

    pub async fn fetch_document_batch<S: AsRef<str>>(
        &self,
        tickers: &[S],
        interval: Interval,
        period: Period,
    ) -> FetchResult<BatchResult<RawQuoteDocument>> {
        let range = period.resolve()?;
        Ok(self
            .fan_out(tickers, |ticker| async move {
                self.fetch_document_in(&ticker, interval, range).await
            })
            .await)
    }

    pub async fn fetch_quote_batch<S: AsRef<str>>(
        &self,
        tickers: &[S],
        interval: Interval,
        period: Period,
    ) -> FetchResult<BatchResult<Quote>> {
        let range = period.resolve()?;
        Ok(self
            .fan_out(tickers, |ticker| async move {
                self.fetch_quote_in(&ticker, interval, range).await
            })
            .await)
    }

    pub async fn fetch_csv_text_batch<S: AsRef<str>>(
        &self,
        tickers: &[S],
        interval: Interval,
        period: Period,
    ) -> FetchResult<BatchResult<String>> {
        let range = period.resolve()?;
        Ok(self
            .fan_out(tickers, |ticker| async move {
                self.fetch_csv_text_in(&ticker, interval, range).await
            })
            .await)
    }

    pub async fn fetch_csv_batch<S: AsRef<str>>(
        &self,
        tickers: &[S],
        interval: Interval,
        period: Period,
    ) -> FetchResult<BatchResult<Vec<CsvQuote>>> {
        let range = period.resolve()?;
        Ok(self
            .fan_out(tickers, |ticker| async move {
                self.fetch_csv_in(&ticker, interval, range).await
            })
            .await)
    }

    async fn fan_out<S, T, F, Fut>(&self, tickers: &[S], fetch: F) -> BatchResult<T>
    where
        S: AsRef<str>,
        F: Fn(String) -> Fut,
        Fut: Future<Output = FetchResult<T>>,
    {
        let limit = ensure_concurrency_limit(self.config().batch_concurrency);
        debug!("fetching {} tickers, at most {} at a time", tickers.len(), limit);

        let mut slots: Vec<Option<FetchResult<T>>> = tickers.iter().map(|_| None).collect();

        let mut completions = stream::iter(tickers.iter().enumerate())
            .map(|(index, ticker)| {
                let pending = fetch(ticker.as_ref().to_string());
                async move { (index, pending.await) }
            })
            .buffer_unordered(limit);

        while let Some((index, outcome)) = completions.next().await {
            slots[index] = Some(outcome);
        }

        let entries = tickers
            .iter()
            .zip(slots)
            .map(|(ticker, slot)| {
                let ticker = ticker.as_ref().to_string();
                let outcome = slot.unwrap_or_else(|| {
                    Err(QuoteError::message(format!(
                        "no outcome recorded for {}",
                        ticker
                    )))
                });
                if let Err(err) = &outcome {
                    warn!("batch fetch for {} failed: {}", ticker, err);
                }
                BatchEntry { ticker, outcome }
            })
            .collect();

        BatchResult { entries }
    }
}
