#[cfg(feature = "tungstenite")]
mod tungstenite;

#[cfg(feature = "tungstenite")]
pub use tungstenite::{ReconnectPolicy, Tungstenite, DEFAULT_OBSERVATION_WINDOW};
