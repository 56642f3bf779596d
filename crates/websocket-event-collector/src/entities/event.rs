use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One event received during a cycle's observation window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectedEvent {
    /// Name of the event, as carried by the wire frame.
    pub event: String,
    /// Arbitrary structured payload.
    #[serde(default)]
    pub data: Value,
}

impl CollectedEvent {
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }
}
