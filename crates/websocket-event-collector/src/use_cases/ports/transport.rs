use async_trait::async_trait;

use super::Collector;
use crate::entities::{ConnectionParams, Credentials};
use crate::error::CollectorError;

/// Trait for transport implementations that run one full cycle:
/// connect, listen for the configured event, disconnect.
#[async_trait]
pub trait Transport: Send + Sync + Clone {
    /// Run one cycle against `params.websocket_url`, collecting every
    /// `params.event_name` event that arrives during the observation window.
    ///
    /// The connection is fully torn down before this returns, on every exit
    /// path. On a connection failure the collector is dropped and the error
    /// is returned instead; events collected before the failure are not
    /// surfaced.
    ///
    /// If `on_ready` is provided, it is called once the connection attempt
    /// has been issued (not once the handshake completes — the cycle is
    /// already listening by then).
    async fn run<C, F>(
        &self,
        params: &ConnectionParams,
        credentials: &Credentials,
        collector: C,
        on_ready: Option<F>,
    ) -> Result<C::Output, CollectorError>
    where
        C: Collector + 'static,
        F: FnOnce() + Send + 'static;
}
