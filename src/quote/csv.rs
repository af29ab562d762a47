use std::io::Cursor;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One row of the provider's download CSV (`Date,Open,High,Low,Close,Adj Close,Volume`).
///
/// The provider writes `null` into cells it has no value for; those decode as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvQuote {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Open", deserialize_with = "csv::invalid_option")]
    pub open: Option<f64>,
    #[serde(rename = "High", deserialize_with = "csv::invalid_option")]
    pub high: Option<f64>,
    #[serde(rename = "Low", deserialize_with = "csv::invalid_option")]
    pub low: Option<f64>,
    #[serde(rename = "Close", deserialize_with = "csv::invalid_option")]
    pub close: Option<f64>,
    #[serde(rename = "Adj Close", deserialize_with = "csv::invalid_option")]
    pub adj_close: Option<f64>,
    #[serde(rename = "Volume", deserialize_with = "csv::invalid_option")]
    pub volume: Option<u64>,
}

/// Decode a download CSV body into typed rows, in file order.
pub fn parse_csv(body: &str) -> Result<Vec<CsvQuote>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(Cursor::new(body.as_bytes()));

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}
