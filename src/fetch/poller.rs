//! Continuous single-ticker polling.
//!
//! The loop fetches the ticker, publishes the most recent sample (or the error), then
//! waits for the configured interval. Stop requests are observed between fetches and
//! during the wait, never in the middle of a request. Once stop is observed nothing
//! further is published. Dropping the stop sender counts as a stop request.

use std::time::Duration;

use log::{debug, warn};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

use crate::config::Backpressure;
use crate::error::{QuoteError, Result};
use crate::quote::{Interval, Period, PriceSample};

use super::client::QuoteClient;

/// What to poll and how often.
#[derive(Debug, Clone, PartialEq)]
pub struct PollRequest {
    pub ticker: String,
    pub interval: Interval,
    pub period: Period,
    pub every: Duration,
}

enum Delivery {
    Sent,
    Dropped,
    Closed,
    Stopped,
}

/// Run the poll loop until `stop` is raised, its sender is dropped, or either receiver
/// is dropped.
///
/// Channels are borrowed, so the caller decides when they close.
pub async fn poll(
    client: &QuoteClient,
    request: &PollRequest,
    samples: &mpsc::Sender<PriceSample>,
    errors: &mpsc::Sender<QuoteError>,
    backpressure: Backpressure,
    stop: &mut watch::Receiver<bool>,
) {
    debug!("polling {} every {:?}", request.ticker, request.every);

    loop {
        if stop_observed(stop) {
            break;
        }

        let fetched = client
            .fetch_quote(&request.ticker, request.interval, request.period)
            .await;
        let next_at = Instant::now() + request.every;

        if stop_observed(stop) {
            break;
        }

        match fetched {
            Err(err) => match deliver(errors, err, backpressure, stop).await {
                Delivery::Dropped => {
                    warn!("error buffer for {} is full, dropping newest", request.ticker)
                }
                Delivery::Closed => {
                    debug!("error receiver for {} dropped", request.ticker);
                    break;
                }
                Delivery::Stopped => break,
                Delivery::Sent => {}
            },
            Ok(quote) => match quote.latest().copied() {
                None => debug!("{} returned no samples", request.ticker),
                Some(latest) => match deliver(samples, latest, backpressure, stop).await {
                    Delivery::Sent => {}
                    Delivery::Dropped => {
                        warn!("sample buffer for {} is full, dropping newest", request.ticker)
                    }
                    Delivery::Closed => {
                        debug!("sample receiver for {} dropped", request.ticker);
                        break;
                    }
                    Delivery::Stopped => break,
                },
            },
        }

        if wait_until(next_at, stop).await {
            break;
        }
    }

    debug!("stopped polling {}", request.ticker);
}

/// Spawn [`poll`] on the tokio runtime with fresh bounded channels.
///
/// Buffer size and backpressure policy come from the client's configuration.
pub fn spawn_poller(client: QuoteClient, request: PollRequest) -> PollerHandle {
    // `QuoteClient::new` has already rejected a zero buffer.
    let capacity = client.config().poll_buffer;
    let backpressure = client.config().backpressure;

    let (sample_tx, sample_rx) = mpsc::channel(capacity);
    let (error_tx, error_rx) = mpsc::channel(capacity);
    let (stop_tx, mut stop_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        poll(
            &client,
            &request,
            &sample_tx,
            &error_tx,
            backpressure,
            &mut stop_rx,
        )
        .await;
    });

    PollerHandle {
        samples: sample_rx,
        errors: error_rx,
        stop: stop_tx,
        task: Some(task),
    }
}

/// Receivers and stop control for a spawned poller.
///
/// Both channels close once the poll task has finished.
pub struct PollerHandle {
    pub samples: mpsc::Receiver<PriceSample>,
    pub errors: mpsc::Receiver<QuoteError>,
    stop: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    /// Ask the poller to stop at its next check; does not wait.
    pub fn stop(&self) {
        self.stop.send_replace(true);
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Stop the poller and wait for its task to end.
    pub async fn shutdown(&mut self) -> Result<()> {
        self.stop();
        if let Some(task) = self.task.take() {
            task.await?;
        }
        Ok(())
    }
}

async fn deliver<T>(
    tx: &mpsc::Sender<T>,
    value: T,
    backpressure: Backpressure,
    stop: &mut watch::Receiver<bool>,
) -> Delivery {
    match backpressure {
        Backpressure::DropNewest => match tx.try_send(value) {
            Ok(()) => Delivery::Sent,
            Err(mpsc::error::TrySendError::Full(_)) => Delivery::Dropped,
            Err(mpsc::error::TrySendError::Closed(_)) => Delivery::Closed,
        },
        Backpressure::Block => tokio::select! {
            sent = tx.send(value) => match sent {
                Ok(()) => Delivery::Sent,
                Err(_) => Delivery::Closed,
            },
            _ = stop_requested(stop) => Delivery::Stopped,
        },
    }
}

/// Sleep until `deadline`; returns `true` if stop was requested first.
async fn wait_until(deadline: Instant, stop: &mut watch::Receiver<bool>) -> bool {
    tokio::select! {
        _ = sleep_until(deadline) => false,
        _ = stop_requested(stop) => true,
    }
}

fn stop_observed(stop: &mut watch::Receiver<bool>) -> bool {
    *stop.borrow_and_update() || stop.has_changed().is_err()
}

/// Resolves once stop is raised or the sender is gone.
async fn stop_requested(stop: &mut watch::Receiver<bool>) {
    while !*stop.borrow_and_update() {
        if stop.changed().await.is_err() {
            return;
        }
    }
}
