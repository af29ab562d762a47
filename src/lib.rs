pub mod config;
pub mod error;
pub mod fetch;
pub mod quote;
pub mod utils;

pub use config::{Backpressure, ClientConfig};
pub use error::{ErrorKind, QuoteError, Result};
pub use fetch::{poll, spawn_poller, BatchEntry, BatchResult, PollRequest, PollerHandle, QuoteClient};
pub use quote::{CsvQuote, Interval, Period, PriceSample, Quote, RawQuoteDocument, TimeRange};
