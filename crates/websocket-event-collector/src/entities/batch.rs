use serde_json::Value;

use super::{Credentials, FailureMode};

/// An assembled batch: a transport, the host-supplied input items, shared
/// credentials, a parameter resolver and the failure mode.
///
/// Items are opaque to the collector; only their count and positions matter.
pub struct Batch<T, R> {
    pub(crate) transport: T,
    pub(crate) resolver: R,
    pub(crate) credentials: Credentials,
    pub(crate) items: Vec<Value>,
    pub(crate) failure_mode: FailureMode,
}
