/// Connection parameters for one item's cycle: where to connect and which
/// event to listen for.
///
/// Both fields default to the empty string, matching the host's parameter
/// form defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConnectionParams {
    /// URL of the websocket server to connect to, e.g. `ws://example.com/feed`.
    pub websocket_url: String,
    /// Name of the event to listen for.
    pub event_name: String,
}

impl ConnectionParams {
    pub fn new(websocket_url: impl Into<String>, event_name: impl Into<String>) -> Self {
        Self {
            websocket_url: websocket_url.into(),
            event_name: event_name.into(),
        }
    }

    pub fn with_websocket_url(mut self, url: impl Into<String>) -> Self {
        self.websocket_url = url.into();
        self
    }

    pub fn with_event_name(mut self, name: impl Into<String>) -> Self {
        self.event_name = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_new() {
        let params = ConnectionParams::new("ws://localhost:9001/feed", "tick");
        assert_eq!(params.websocket_url, "ws://localhost:9001/feed");
        assert_eq!(params.event_name, "tick");
    }

    #[test]
    fn test_params_default_is_empty() {
        let params = ConnectionParams::default();
        assert_eq!(params.websocket_url, "");
        assert_eq!(params.event_name, "");
    }

    #[test]
    fn test_params_builder_methods() {
        let params = ConnectionParams::default()
            .with_websocket_url("wss://example.com")
            .with_event_name("ping");
        assert_eq!(params.websocket_url, "wss://example.com");
        assert_eq!(params.event_name, "ping");
    }
}
