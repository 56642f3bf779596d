mod client;

pub use client::{ReconnectPolicy, Tungstenite, DEFAULT_OBSERVATION_WINDOW};
