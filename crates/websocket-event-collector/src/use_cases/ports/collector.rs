use crate::entities::CollectedEvent;

/// Trait for accumulating events during one cycle's observation window.
///
/// A fresh collector is handed to every cycle and owned by it exclusively;
/// when the cycle fails the collector is dropped, so partially collected
/// events never leak into the output. The `Output` type is what a successful
/// cycle returns, letting users define their own collection strategy.
pub trait Collector: Send + Sync {
    /// The type returned when the cycle completes
    type Output: Send;

    /// Called for each matching event, in arrival order
    fn collect(&self, event: CollectedEvent);

    /// Consume the collector and return the final output
    fn into_output(self) -> Self::Output;
}
