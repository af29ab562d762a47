mod cli;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::warn;
use serde_json::json;

use cli::{Cli, Commands};
use stock_quotes::config::load_client_config;
use stock_quotes::utils::current_human_timestamp;
use stock_quotes::{spawn_poller, BatchResult, ClientConfig, PollRequest, QuoteClient};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_client_config(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => ClientConfig::builtin(),
    };
    let client = QuoteClient::new(config).context("Failed to create quote client")?;

    match cli.command {
        Commands::Quote {
            ticker,
            window,
            raw,
        } => {
            if raw {
                let body = client
                    .fetch_json_text(&ticker, window.interval, window.period)
                    .await
                    .with_context(|| format!("Failed to fetch {}", ticker))?;
                println!("{}", body);
            } else {
                let quote = client
                    .fetch_quote(&ticker, window.interval, window.period)
                    .await
                    .with_context(|| format!("Failed to fetch {}", ticker))?;
                println!("{}", serde_json::to_string_pretty(&quote)?);
            }
        }
        Commands::Batch { tickers, window } => {
            let batch = client
                .fetch_quote_batch(&tickers, window.interval, window.period)
                .await
                .context("Failed to resolve batch period")?;
            print_batch(batch)?;
        }
        Commands::Csv {
            tickers,
            window,
            raw,
        } => {
            if raw {
                let batch = client
                    .fetch_csv_text_batch(&tickers, window.interval, window.period)
                    .await
                    .context("Failed to resolve batch period")?;
                for entry in batch {
                    match entry.outcome {
                        Ok(body) => println!("# {}\n{}", entry.ticker, body.trim_end()),
                        Err(err) => eprintln!("# {}: {}", entry.ticker, err),
                    }
                }
            } else {
                let batch = client
                    .fetch_csv_batch(&tickers, window.interval, window.period)
                    .await
                    .context("Failed to resolve batch period")?;
                print_batch(batch)?;
            }
        }
        Commands::Watch {
            ticker,
            window,
            every,
            count,
        } => {
            watch(client, ticker, window, every, count).await?;
        }
    }

    Ok(())
}

fn print_batch<T: serde::Serialize>(batch: BatchResult<T>) -> Result<()> {
    let failures = batch.failure_count();
    let entries: Vec<_> = batch
        .into_iter()
        .map(|entry| match entry.outcome {
            Ok(value) => json!({ "ticker": entry.ticker, "ok": true, "data": value }),
            Err(err) => json!({
                "ticker": entry.ticker,
                "ok": false,
                "kind": format!("{:?}", err.kind()),
                "error": err.to_string(),
            }),
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&entries)?);
    if failures > 0 {
        warn!("{} of {} tickers failed", failures, entries.len());
    }
    Ok(())
}

async fn watch(
    client: QuoteClient,
    ticker: String,
    window: cli::Window,
    every: u64,
    count: Option<usize>,
) -> Result<()> {
    let request = PollRequest {
        ticker,
        interval: window.interval,
        period: window.period,
        every: Duration::from_secs(every.max(1)),
    };
    let label = request.ticker.clone();
    let mut handle = spawn_poller(client, request);
    let mut received = 0usize;

    loop {
        tokio::select! {
            sample = handle.samples.recv() => match sample {
                Some(sample) => {
                    println!(
                        "{} {} {}",
                        current_human_timestamp(),
                        label,
                        serde_json::to_string(&sample)?
                    );
                    received += 1;
                    if count.is_some_and(|limit| received >= limit) {
                        break;
                    }
                }
                None => break,
            },
            Some(err) = handle.errors.recv() => {
                eprintln!("{} {} error: {}", current_human_timestamp(), label, err);
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for Ctrl-C")?;
                break;
            }
        }
    }

    handle.shutdown().await.context("Poller task failed")?;
    Ok(())
}
