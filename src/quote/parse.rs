use log::debug;

use crate::error::{QuoteError, Result};

use super::document::{QuoteIndicator, RawQuoteDocument};
use super::{Interval, PriceSample, Quote, TimeRange};

/// Decode a chart response body, surfacing a provider-reported error payload as an error.
pub fn parse_document(body: &str) -> Result<RawQuoteDocument> {
    let document: RawQuoteDocument = serde_json::from_str(body)?;

    if let Some(error) = &document.chart.error {
        return Err(QuoteError::Provider {
            code: error.code.clone(),
            description: error.description.clone(),
        });
    }

    Ok(document)
}

/// Project the first chart result into a [`Quote`].
///
/// Every OHLCV array must have exactly as many entries as `timestamp`. Rows holding a
/// null price or volume are skipped; the provider emits those for intervals in which
/// nothing traded.
pub fn project(
    document: &RawQuoteDocument,
    ticker: &str,
    range: TimeRange,
    requested: Interval,
) -> Result<Quote> {
    let result = document
        .first_result()
        .ok_or_else(|| QuoteError::EmptyResult {
            ticker: ticker.to_string(),
        })?;

    let expected = result.timestamp.len();
    let empty = QuoteIndicator::default();
    let series = result.indicators.quote.first().unwrap_or(&empty);
    check_alignment(series, expected)?;

    let mut samples = Vec::with_capacity(expected);
    let mut skipped = 0usize;
    for index in 0..expected {
        let row = (
            series.open[index],
            series.high[index],
            series.low[index],
            series.close[index],
            series.volume[index],
        );
        match row {
            (Some(open), Some(high), Some(low), Some(close), Some(volume)) => {
                samples.push(PriceSample {
                    timestamp: result.timestamp[index],
                    open,
                    high,
                    low,
                    close,
                    volume,
                })
            }
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!("{}: skipped {} rows with missing values", ticker, skipped);
    }

    let interval = result
        .meta
        .data_granularity
        .as_deref()
        .and_then(|granularity| granularity.parse().ok())
        .unwrap_or(requested);

    Ok(Quote {
        ticker: ticker.to_string(),
        range,
        interval,
        samples,
    })
}

fn check_alignment(series: &QuoteIndicator, expected: usize) -> Result<()> {
    let lengths = [
        ("open", series.open.len()),
        ("high", series.high.len()),
        ("low", series.low.len()),
        ("close", series.close.len()),
        ("volume", series.volume.len()),
    ];

    match lengths.iter().find(|(_, found)| *found != expected) {
        Some(&(field, found)) => Err(QuoteError::ArrayAlignment {
            field,
            expected,
            found,
        }),
        None => Ok(()),
    }
}
