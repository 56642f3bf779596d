/// Credentials shared read-only by every cycle in a batch.
///
/// When the token is non-empty it is sent as a `Bearer` authorization header
/// on the websocket upgrade request, so authentication happens inside the
/// handshake.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Credentials {
    /// Authentication token. Default empty (no authorization header sent).
    pub auth_token: String,
}

impl Credentials {
    pub fn new(auth_token: impl Into<String>) -> Self {
        Self {
            auth_token: auth_token.into(),
        }
    }

    /// Returns true when no token is configured.
    pub fn is_anonymous(&self) -> bool {
        self.auth_token.is_empty()
    }
}

// The token is a secret; keep it out of logs and debug output.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field(
                "auth_token",
                if self.is_anonymous() {
                    &"<empty>"
                } else {
                    &"<redacted>"
                },
            )
            .finish()
    }
}
