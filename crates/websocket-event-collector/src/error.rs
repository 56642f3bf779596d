use thiserror::Error;

use crate::entities::OutputRecord;

/// Fixed description attached to transport-level failures.
pub const CONNECTION_ERROR_DESCRIPTION: &str = "WebSocket connection error";

/// Errors that can occur while running a cycle or resolving its inputs.
///
/// The kind set is closed on purpose: batch processing branches on the
/// variant, never on message contents.
#[derive(Error, Debug)]
pub enum CollectorError {
    /// Transport or auth failure while connecting or listening.
    #[error("{description}: {message}")]
    Connection {
        /// The transport's own error message.
        message: String,
        /// Always [`CONNECTION_ERROR_DESCRIPTION`].
        description: String,
    },

    /// Any other failure during an item's cycle, attributed to the item.
    #[error("{message} (item {item_index})")]
    Operation { message: String, item_index: usize },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CollectorError {
    /// Build a `Connection` error from a transport error message.
    pub fn connection(message: impl Into<String>) -> Self {
        CollectorError::Connection {
            message: message.into(),
            description: CONNECTION_ERROR_DESCRIPTION.to_string(),
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, CollectorError::Connection { .. })
    }

    /// The raw message, without the item/description framing. This is what
    /// tolerant mode puts into error records.
    pub fn raw_message(&self) -> &str {
        match self {
            CollectorError::Connection { message, .. } => message,
            CollectorError::Operation { message, .. } => message,
            CollectorError::Configuration(message) => message,
        }
    }
}

/// A fatal-mode batch abort.
///
/// Carries the records produced by items before the failing one, so the
/// caller still receives the execution's partial result.
#[derive(Error, Debug)]
#[error("batch aborted at item {item_index}: {error}")]
pub struct BatchFailure {
    /// Index of the item whose cycle failed.
    pub item_index: usize,
    /// The failure that aborted the batch.
    pub error: CollectorError,
    /// Output records from items processed before `item_index`.
    pub partial: Vec<OutputRecord>,
}
