use std::time::Duration;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::http::header::AUTHORIZATION;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

use crate::entities::{CollectedEvent, ConnectionParams, Credentials};
use crate::error::CollectorError;
use crate::use_cases::ports::{Collector, Transport};

/// How long a cycle listens for events before disconnecting.
pub const DEFAULT_OBSERVATION_WINDOW: Duration = Duration::from_millis(1000);

/// Capacity of the channel between the connection task and the cycle.
const SIGNAL_CHANNEL_CAPACITY: usize = 256;

/// Backoff applied before reconnecting after a clean server-side disconnect.
///
/// The delay doubles on each successive reconnect within a cycle. A failed
/// connection attempt is never retried; it surfaces as a connection error
/// instead.
#[derive(Debug, Clone)]
pub struct ReconnectPolicy {
    /// Delay before the first reconnection attempt.
    pub initial_delay: Duration,
    /// Cap on the doubling backoff delay.
    pub max_delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_millis(10_000),
        }
    }
}

impl ReconnectPolicy {
    fn next_delay(&self, current: Duration) -> Duration {
        (current * 2).min(self.max_delay)
    }
}

/// Tungstenite-based websocket transport.
///
/// Runs each cycle as: spawn a connection task, listen on its signal channel
/// for the length of the observation window, then shut the task down and
/// join it before returning. The cycle is armed before the handshake
/// completes, so events arriving right after connect are not missed.
#[derive(Clone)]
pub struct Tungstenite {
    observation_window: Duration,
    reconnect: ReconnectPolicy,
}

impl Tungstenite {
    pub fn new() -> Self {
        Self {
            observation_window: DEFAULT_OBSERVATION_WINDOW,
            reconnect: ReconnectPolicy::default(),
        }
    }

    /// Override the observation window (default 1s)
    pub fn with_observation_window(mut self, window: Duration) -> Self {
        self.observation_window = window;
        self
    }

    /// Override the reconnect policy
    pub fn with_reconnect_policy(mut self, policy: ReconnectPolicy) -> Self {
        self.reconnect = policy;
        self
    }
}

impl Default for Tungstenite {
    fn default() -> Self {
        Self::new()
    }
}

/// Signal from the connection task to the listening cycle.
enum CycleSignal {
    Event(CollectedEvent),
    ConnectionError(String),
}

/// Outcome of one connection's read loop.
enum ReadOutcome {
    ServerClosed,
    Failed,
    Shutdown,
}

#[async_trait]
impl Transport for Tungstenite {
    async fn run<C, F>(
        &self,
        params: &ConnectionParams,
        credentials: &Credentials,
        collector: C,
        on_ready: Option<F>,
    ) -> Result<C::Output, CollectorError>
    where
        C: Collector + 'static,
        F: FnOnce() + Send + 'static,
    {
        let (signal_tx, mut signal_rx) = mpsc::channel(SIGNAL_CHANNEL_CAPACITY);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(run_connection(
            params.websocket_url.clone(),
            params.event_name.clone(),
            credentials.clone(),
            self.reconnect.clone(),
            signal_tx,
            shutdown_rx,
        ));

        // The connection attempt is issued and the cycle is listening.
        if let Some(callback) = on_ready {
            callback();
        }

        let window = tokio::time::sleep(self.observation_window);
        tokio::pin!(window);

        let mut failure = None;
        loop {
            tokio::select! {
                () = &mut window => break,
                signal = signal_rx.recv() => match signal {
                    Some(CycleSignal::Event(event)) => collector.collect(event),
                    Some(CycleSignal::ConnectionError(message)) => {
                        failure = Some(CollectorError::connection(message));
                        break;
                    }
                    None => {
                        // The task is gone without reporting an error;
                        // nothing more can arrive, wait out the window.
                        window.as_mut().await;
                        break;
                    }
                },
            }
        }

        // Teardown runs on every exit path. Signalling and closing are safe
        // when the connection is already gone. Dropping the receiver unblocks
        // a task stuck sending into a full channel.
        let _ = shutdown_tx.send(true);
        drop(signal_rx);
        if let Err(e) = handle.await {
            warn!(error = %e, "connection task did not shut down cleanly");
        }

        match failure {
            Some(error) => Err(error),
            None => Ok(collector.into_output()),
        }
    }
}

/// Builds the upgrade request, attaching the token as a Bearer authorization
/// header when one is configured.
fn build_request(url: &str, credentials: &Credentials) -> Result<Request, String> {
    let mut request = url.into_client_request().map_err(|e| e.to_string())?;
    if !credentials.is_anonymous() {
        let value = HeaderValue::from_str(&format!("Bearer {}", credentials.auth_token))
            .map_err(|e| e.to_string())?;
        request.headers_mut().insert(AUTHORIZATION, value);
    }
    Ok(request)
}

/// Connection task: connect, subscribe, forward matching events until told to
/// shut down. Reconnects with capped backoff after a clean server close; any
/// transport error is reported once and ends the task.
async fn run_connection(
    url: String,
    event_name: String,
    credentials: Credentials,
    policy: ReconnectPolicy,
    signal_tx: mpsc::Sender<CycleSignal>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut delay = policy.initial_delay;

    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        let request = match build_request(&url, &credentials) {
            Ok(request) => request,
            Err(message) => {
                let _ = signal_tx.send(CycleSignal::ConnectionError(message)).await;
                break;
            }
        };

        debug!(url = %url, "connecting");
        let stream = tokio::select! {
            connected = tokio_tungstenite::connect_async(request) => match connected {
                Ok((stream, _response)) => {
                    debug!(url = %url, "connection established");
                    stream
                }
                Err(e) => {
                    warn!(url = %url, error = %e, "connection failed");
                    let _ = signal_tx
                        .send(CycleSignal::ConnectionError(e.to_string()))
                        .await;
                    break;
                }
            },
            _ = shutdown_rx.changed() => break,
        };

        let (mut write, mut read) = stream.split();

        let subscribe =
            serde_json::json!({"type": "subscribe", "event": event_name}).to_string();
        if let Err(e) = write.send(Message::Text(subscribe)).await {
            warn!(url = %url, error = %e, "failed to send subscribe frame");
            let _ = signal_tx
                .send(CycleSignal::ConnectionError(e.to_string()))
                .await;
            break;
        }

        let outcome = loop {
            tokio::select! {
                message = read.next() => match message {
                    Some(Ok(Message::Text(text))) => {
                        if forward_frame(text.as_bytes(), &event_name, &signal_tx)
                            .await
                            .is_err()
                        {
                            break ReadOutcome::Shutdown;
                        }
                    }
                    Some(Ok(Message::Binary(data))) => {
                        if forward_frame(&data, &event_name, &signal_tx).await.is_err() {
                            break ReadOutcome::Shutdown;
                        }
                    }
                    Some(Ok(Message::Ping(payload))) => {
                        let _ = write.send(Message::Pong(payload)).await;
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        debug!(url = %url, "server closed the connection");
                        break ReadOutcome::ServerClosed;
                    }
                    Some(Ok(_)) => {} // Pong, Frame
                    Some(Err(e)) => {
                        warn!(url = %url, error = %e, "read error");
                        let _ = signal_tx
                            .send(CycleSignal::ConnectionError(e.to_string()))
                            .await;
                        break ReadOutcome::Failed;
                    }
                },
                _ = shutdown_rx.changed() => {
                    // Close politely; the socket may already be gone.
                    let _ = write.send(Message::Close(None)).await;
                    break ReadOutcome::Shutdown;
                }
            }
        };

        match outcome {
            ReadOutcome::ServerClosed => {
                debug!(delay_ms = delay.as_millis() as u64, "reconnecting after disconnect");
                tokio::select! {
                    () = tokio::time::sleep(delay) => {}
                    _ = shutdown_rx.changed() => break,
                }
                delay = policy.next_delay(delay);
            }
            ReadOutcome::Failed | ReadOutcome::Shutdown => break,
        }
    }
}

/// Parses an incoming frame and forwards it when the event name matches the
/// subscription. Unparseable or mismatched frames are skipped.
///
/// Returns `Err` when the cycle has stopped listening (channel closed).
async fn forward_frame(
    payload: &[u8],
    event_name: &str,
    signal_tx: &mpsc::Sender<CycleSignal>,
) -> Result<(), ()> {
    match serde_json::from_slice::<CollectedEvent>(payload) {
        Ok(event) if event.event == event_name => signal_tx
            .send(CycleSignal::Event(event))
            .await
            .map_err(|_| ()),
        Ok(event) => {
            debug!(event = %event.event, "ignoring event for other subscription");
            Ok(())
        }
        Err(e) => {
            debug!(error = %e, "ignoring unparseable frame");
            Ok(())
        }
    }
}
