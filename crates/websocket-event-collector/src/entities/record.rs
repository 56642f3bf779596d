use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::CollectedEvent;

/// One record of the batch output sequence.
///
/// Serializes to exactly `{"event": …, "data": …}` for collected events and
/// `{"error": …, "pairedItem": …}` for isolated per-item failures, the shapes
/// the consuming host expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutputRecord {
    /// A successfully collected event.
    Event { event: String, data: Value },
    /// A per-item failure, kept in the sequence in tolerant mode.
    Error {
        error: String,
        #[serde(rename = "pairedItem")]
        paired_item: usize,
    },
}

impl OutputRecord {
    /// Build an error record attributed to the item at `paired_item`.
    pub fn error(message: impl Into<String>, paired_item: usize) -> Self {
        OutputRecord::Error {
            error: message.into(),
            paired_item,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, OutputRecord::Error { .. })
    }
}

impl From<CollectedEvent> for OutputRecord {
    fn from(event: CollectedEvent) -> Self {
        OutputRecord::Event {
            event: event.event,
            data: event.data,
        }
    }
}
