//! Websocket Event Collector
//!
//! Collects named events arriving over a websocket connection, one bounded
//! cycle per input item in a batch. Each cycle connects to the configured
//! endpoint, authenticates, subscribes to one event name, accumulates every
//! matching event for the length of the observation window, then disconnects
//! and hands the events back as ordered output records. Per-item failures can
//! either abort the batch or become error records paired with their item.
//!
//! # Example
//!
//! ```rust,no_run
//! use websocket_event_collector::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), BatchFailure> {
//!     // One cycle per item; both items listen on the same feed.
//!     let records = BatchBuilder::new()
//!         .transport(Tungstenite::new())
//!         .resolver(ConnectionParams::new("ws://localhost:9001/feed", "tick"))
//!         .credentials(Credentials::new("my-token"))
//!         .items(vec![json!({"id": 1}), json!({"id": 2})])
//!         .tolerant()
//!         .build()
//!         .execute()
//!         .await?;
//!
//!     // Each record is either {"event", "data"} or {"error", "pairedItem"}.
//!     for record in &records {
//!         println!("{}", serde_json::to_string(record).unwrap());
//!     }
//!
//!     Ok(())
//! }
//! ```

mod adapters;
pub mod entities;
pub mod error;
pub mod use_cases;

pub use error::{BatchFailure, CollectorError};

#[cfg(feature = "tungstenite")]
pub use adapters::gateways::{ReconnectPolicy, Tungstenite, DEFAULT_OBSERVATION_WINDOW};

/// Default collector implementation that collects events into a Vec
pub struct DefaultCollector {
    events: std::sync::Mutex<Vec<entities::CollectedEvent>>,
}

impl DefaultCollector {
    pub fn new() -> Self {
        Self {
            events: std::sync::Mutex::new(Vec::new()),
        }
    }
}

impl Default for DefaultCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl use_cases::ports::Collector for DefaultCollector {
    type Output = Vec<entities::CollectedEvent>;

    fn collect(&self, event: entities::CollectedEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    fn into_output(self) -> Self::Output {
        self.events.into_inner().unwrap_or_default()
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::entities::{
        CollectedEvent, ConnectionParams, Credentials, FailureMode, OutputRecord,
    };
    pub use crate::error::{BatchFailure, CollectorError};
    pub use crate::use_cases::ports::{Collector, FnResolver, ParameterResolver, Transport};
    pub use crate::use_cases::BatchBuilder;
    pub use crate::DefaultCollector;

    #[cfg(feature = "tungstenite")]
    pub use crate::{ReconnectPolicy, Tungstenite};

    pub use serde_json::json;
}
