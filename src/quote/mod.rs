pub mod csv;
pub mod document;
pub mod interval;
pub mod model;
pub mod parse;
pub mod period;

pub use self::csv::{parse_csv, CsvQuote};
pub use document::RawQuoteDocument;
pub use interval::Interval;
pub use model::{PriceSample, Quote};
pub use parse::{parse_document, project};
pub use period::{Period, TimeRange};
