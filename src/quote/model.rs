use serde::{Deserialize, Serialize};

use super::{Interval, TimeRange};

/// One OHLCV observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    /// Epoch seconds of the interval this row covers.
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Resolved price history for one ticker, samples ordered oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub ticker: String,
    pub range: TimeRange,
    pub interval: Interval,
    pub samples: Vec<PriceSample>,
}

impl Quote {
    /// Most recent sample, if the provider returned any.
    pub fn latest(&self) -> Option<&PriceSample> {
        self.samples.last()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
