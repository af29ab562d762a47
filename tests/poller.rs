mod common;

use std::time::Duration;

use common::{chart_body, client_for, client_with, mount_chart, ok_body};
use stock_quotes::{
    poll, spawn_poller, Backpressure, ClientConfig, ErrorKind, Interval, Period, PollRequest,
    QuoteClient,
};
use tokio::sync::{mpsc, watch};
use tokio::time::{timeout, Instant};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WAIT: Duration = Duration::from_secs(5);

fn request(ticker: &str, every: Duration) -> PollRequest {
    PollRequest {
        ticker: ticker.to_string(),
        interval: Interval::OneMinute,
        period: Period::OneDay,
        every,
    }
}

async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or_default()
}

#[tokio::test]
async fn publishes_latest_sample() {
    let server = MockServer::start().await;
    mount_chart(&server, "AAPL", ok_body(chart_body("AAPL", &[180.0, 182.5]))).await;

    let mut handle = spawn_poller(client_for(&server), request("AAPL", Duration::from_secs(60)));
    let sample = timeout(WAIT, handle.samples.recv())
        .await
        .expect("sample within timeout")
        .expect("channel open");

    assert_eq!(sample.close, 182.5);
    assert_eq!(sample.volume, 2_000);

    handle.shutdown().await.expect("clean shutdown");
    assert!(handle.is_finished());
}

#[tokio::test]
async fn immediate_stop_publishes_nothing() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::method("GET"))
        .respond_with(ok_body(chart_body("AAPL", &[1.0])))
        .expect(0..=1)
        .mount(&server)
        .await;

    let mut handle = spawn_poller(client_for(&server), request("AAPL", Duration::from_millis(10)));
    handle.stop();
    handle.shutdown().await.expect("clean shutdown");

    assert!(handle.samples.recv().await.is_none());
    assert!(handle.errors.recv().await.is_none());
}

#[tokio::test]
async fn errors_are_forwarded_and_polling_continues() {
    let server = MockServer::start().await;
    mount_chart(&server, "MSFT", ResponseTemplate::new(503)).await;

    let mut handle = spawn_poller(client_for(&server), request("MSFT", Duration::from_millis(20)));
    for _ in 0..3 {
        let err = timeout(WAIT, handle.errors.recv())
            .await
            .expect("error within timeout")
            .expect("channel open");
        assert_eq!(err.kind(), ErrorKind::Http);
    }

    handle.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn consecutive_samples_respect_the_interval() {
    let server = MockServer::start().await;
    mount_chart(&server, "GOOG", ok_body(chart_body("GOOG", &[140.0]))).await;

    let every = Duration::from_millis(200);
    let mut handle = spawn_poller(client_for(&server), request("GOOG", every));

    timeout(WAIT, handle.samples.recv())
        .await
        .expect("first sample")
        .expect("channel open");
    let first = Instant::now();
    timeout(WAIT, handle.samples.recv())
        .await
        .expect("second sample")
        .expect("channel open");

    let gap = first.elapsed();
    assert!(
        gap + Duration::from_millis(20) >= every,
        "samples only {gap:?} apart"
    );

    handle.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn drop_newest_keeps_polling_with_a_full_buffer() {
    let server = MockServer::start().await;
    mount_chart(&server, "AAPL", ok_body(chart_body("AAPL", &[10.0]))).await;

    let client = client_with(&server, |config| {
        config.poll_buffer = 1;
        config.backpressure = Backpressure::DropNewest;
    });
    let mut handle = spawn_poller(client, request("AAPL", Duration::from_millis(20)));

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(request_count(&server).await > 2, "poller stalled on a full buffer");

    // Only the first sample fit; later ones were dropped.
    assert!(handle.samples.try_recv().is_ok());
    assert!(handle.samples.try_recv().is_err());

    timeout(WAIT, handle.samples.recv())
        .await
        .expect("polling resumes once there is room")
        .expect("channel open");

    handle.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn blocked_delivery_still_honours_stop() {
    let server = MockServer::start().await;
    mount_chart(&server, "AAPL", ok_body(chart_body("AAPL", &[10.0]))).await;

    let client = client_with(&server, |config| {
        config.poll_buffer = 1;
        config.backpressure = Backpressure::Block;
    });
    let mut handle = spawn_poller(client, request("AAPL", Duration::from_millis(10)));

    tokio::time::sleep(Duration::from_millis(200)).await;
    let fetched = request_count(&server).await;
    assert!(fetched <= 3, "blocked poller kept fetching: {fetched}");

    timeout(WAIT, handle.shutdown())
        .await
        .expect("shutdown is not stuck behind a full buffer")
        .expect("clean shutdown");
}

#[tokio::test]
async fn dropped_sample_receiver_ends_the_loop() {
    let server = MockServer::start().await;
    mount_chart(&server, "AAPL", ok_body(chart_body("AAPL", &[10.0]))).await;

    let client = client_for(&server);
    let (sample_tx, sample_rx) = mpsc::channel(4);
    let (error_tx, _error_rx) = mpsc::channel(4);
    let (_stop_tx, mut stop_rx) = watch::channel(false);
    drop(sample_rx);

    timeout(
        WAIT,
        poll(
            &client,
            &request("AAPL", Duration::from_millis(10)),
            &sample_tx,
            &error_tx,
            Backpressure::DropNewest,
            &mut stop_rx,
        ),
    )
    .await
    .expect("poll returns once nobody listens");

    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn stop_during_fetch_suppresses_publishing() {
    let server = MockServer::start().await;
    mount_chart(
        &server,
        "AAPL",
        ok_body(chart_body("AAPL", &[10.0])).set_delay(Duration::from_millis(300)),
    )
    .await;

    let mut handle = spawn_poller(client_for(&server), request("AAPL", Duration::from_millis(10)));
    tokio::time::sleep(Duration::from_millis(100)).await;
    handle.stop();

    let sample = timeout(WAIT, handle.samples.recv())
        .await
        .expect("channel closes once the task ends");
    assert!(sample.is_none(), "sample published after stop");
    assert!(handle.errors.recv().await.is_none());
    assert_eq!(request_count(&server).await, 1);

    handle.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn dropping_the_handle_stops_a_failing_poller() {
    let server = MockServer::start().await;
    mount_chart(&server, "MSFT", ResponseTemplate::new(503)).await;

    let mut handle = spawn_poller(client_for(&server), request("MSFT", Duration::from_millis(20)));
    timeout(WAIT, handle.errors.recv())
        .await
        .expect("error within timeout")
        .expect("channel open");
    drop(handle);

    tokio::time::sleep(Duration::from_millis(100)).await;
    let settled = request_count(&server).await;
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert_eq!(request_count(&server).await, settled, "poller outlived its handle");
}

#[tokio::test]
async fn dropped_stop_sender_ends_the_loop() {
    let server = MockServer::start().await;
    mount_chart(&server, "AAPL", ResponseTemplate::new(503)).await;

    let client = client_for(&server);
    let (sample_tx, _sample_rx) = mpsc::channel(4);
    let (error_tx, _error_rx) = mpsc::channel(16);
    let (stop_tx, mut stop_rx) = watch::channel(false);
    drop(stop_tx);

    timeout(
        WAIT,
        poll(
            &client,
            &request("AAPL", Duration::from_millis(10)),
            &sample_tx,
            &error_tx,
            Backpressure::DropNewest,
            &mut stop_rx,
        ),
    )
    .await
    .expect("poll returns once stop can no longer be raised");

    assert!(request_count(&server).await <= 1);
}

#[tokio::test]
async fn dropped_error_receiver_ends_the_loop() {
    let server = MockServer::start().await;
    mount_chart(&server, "MSFT", ResponseTemplate::new(503)).await;

    let client = client_for(&server);
    let (sample_tx, _sample_rx) = mpsc::channel(4);
    let (error_tx, error_rx) = mpsc::channel(4);
    let (_stop_tx, mut stop_rx) = watch::channel(false);
    drop(error_rx);

    timeout(
        WAIT,
        poll(
            &client,
            &request("MSFT", Duration::from_millis(10)),
            &sample_tx,
            &error_tx,
            Backpressure::DropNewest,
            &mut stop_rx,
        ),
    )
    .await
    .expect("poll returns once nobody listens for errors");

    assert_eq!(request_count(&server).await, 1);
}

#[test]
fn zero_poll_buffer_is_rejected_up_front() {
    let config = ClientConfig {
        poll_buffer: 0,
        ..ClientConfig::builtin()
    };

    let err = QuoteClient::new(config).expect_err("zero buffer should fail");
    assert_eq!(err.kind(), ErrorKind::Config);
}
