use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use stock_quotes::{Interval, Period};

#[derive(Parser)]
#[command(name = "stock-quotes")]
#[command(about = "Fetch historical price data from Yahoo Finance")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// JSON client configuration; builtin defaults when omitted
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Args, Clone, Copy)]
pub struct Window {
    /// Sampling granularity (1m, 5m, 1h, 1d, 1wk, 1mo, ...)
    #[arg(short, long, default_value = "1d")]
    pub interval: Interval,

    /// Look-back period (1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd)
    #[arg(short, long, default_value = "1mo")]
    pub period: Period,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch one ticker and print its samples as JSON
    Quote {
        ticker: String,

        #[command(flatten)]
        window: Window,

        /// Print the provider's JSON body untouched
        #[arg(long)]
        raw: bool,
    },

    /// Fetch several tickers concurrently
    Batch {
        #[arg(required = true)]
        tickers: Vec<String>,

        #[command(flatten)]
        window: Window,
    },

    /// Fetch the CSV download for several tickers
    Csv {
        #[arg(required = true)]
        tickers: Vec<String>,

        #[command(flatten)]
        window: Window,

        /// Print the provider's CSV body untouched
        #[arg(long)]
        raw: bool,
    },

    /// Poll one ticker and print each latest sample until Ctrl-C
    Watch {
        ticker: String,

        #[command(flatten)]
        window: Window,

        /// Seconds between fetches
        #[arg(short, long, default_value_t = 60)]
        every: u64,

        /// Stop after this many samples
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
}
