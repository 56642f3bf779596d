use serde_json::Value;

use crate::entities::{Batch, CollectedEvent, Credentials, FailureMode, OutputRecord};
use crate::error::{BatchFailure, CollectorError};
use crate::use_cases::ports::{ParameterResolver, Transport};
use crate::DefaultCollector;

/// Builder for assembling batches with a fluent API
///
/// # Example
///
/// ```rust,no_run
/// use websocket_event_collector::prelude::*;
///
/// #[tokio::main]
/// async fn main() -> Result<(), BatchFailure> {
///     let records = BatchBuilder::new()
///         .transport(Tungstenite::new())
///         .resolver(ConnectionParams::new("ws://localhost:9001/feed", "tick"))
///         .credentials(Credentials::new("my-token"))
///         .items(vec![json!({"id": 1}), json!({"id": 2})])
///         .tolerant()
///         .build()
///         .execute()
///         .await?;
///
///     for record in &records {
///         println!("{}", serde_json::to_string(record).unwrap());
///     }
///     Ok(())
/// }
/// ```
pub struct BatchBuilder<T, R> {
    transport: Option<T>,
    resolver: Option<R>,
    credentials: Credentials,
    items: Vec<Value>,
    failure_mode: FailureMode,
}

impl BatchBuilder<(), ()> {
    /// Create a new batch builder
    pub fn new() -> Self {
        Self {
            transport: None,
            resolver: None,
            credentials: Credentials::default(),
            items: Vec::new(),
            failure_mode: FailureMode::default(),
        }
    }
}

impl Default for BatchBuilder<(), ()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, R> BatchBuilder<T, R> {
    /// Set the transport implementation to use
    pub fn transport<NewT: Transport>(self, transport: NewT) -> BatchBuilder<NewT, R> {
        BatchBuilder {
            transport: Some(transport),
            resolver: self.resolver,
            credentials: self.credentials,
            items: self.items,
            failure_mode: self.failure_mode,
        }
    }

    /// Set the parameter resolver. A single [`ConnectionParams`] value works
    /// here too and applies to every item.
    ///
    /// [`ConnectionParams`]: crate::entities::ConnectionParams
    pub fn resolver<NewR: ParameterResolver>(self, resolver: NewR) -> BatchBuilder<T, NewR> {
        BatchBuilder {
            transport: self.transport,
            resolver: Some(resolver),
            credentials: self.credentials,
            items: self.items,
            failure_mode: self.failure_mode,
        }
    }

    /// Set the credentials shared by every cycle in the batch
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Add an input item to the batch
    pub fn item(mut self, item: Value) -> Self {
        self.items.push(item);
        self
    }

    /// Add multiple input items to the batch
    pub fn items(mut self, items: impl IntoIterator<Item = Value>) -> Self {
        self.items.extend(items);
        self
    }

    /// Set the failure mode
    pub fn failure_mode(mut self, mode: FailureMode) -> Self {
        self.failure_mode = mode;
        self
    }

    /// Shorthand for `failure_mode(FailureMode::Tolerant)`
    pub fn tolerant(self) -> Self {
        self.failure_mode(FailureMode::Tolerant)
    }
}

impl<T: Transport + 'static, R: ParameterResolver + 'static> BatchBuilder<T, R> {
    /// Build the batch
    pub fn build(self) -> Batch<T, R> {
        Batch {
            transport: self.transport.expect("Transport must be set before building"),
            resolver: self.resolver.expect("Resolver must be set before building"),
            credentials: self.credentials,
            items: self.items,
            failure_mode: self.failure_mode,
        }
    }

    /// Execute the batch directly from the builder
    pub async fn execute(self) -> Result<Vec<OutputRecord>, BatchFailure> {
        self.build().execute().await
    }
}

impl<T: Transport + 'static, R: ParameterResolver + 'static> Batch<T, R> {
    /// Execute the batch.
    ///
    /// Items are processed strictly in order, one cycle at a time; cycle
    /// `i + 1` does not start before cycle `i` has fully torn down. In
    /// tolerant mode a failing item contributes one error record and
    /// processing continues; otherwise the batch aborts with a
    /// [`BatchFailure`] that still carries the records from earlier items.
    pub async fn execute(self) -> Result<Vec<OutputRecord>, BatchFailure> {
        let mut records: Vec<OutputRecord> = Vec::new();

        for item_index in 0..self.items.len() {
            match self.run_item(item_index).await {
                Ok(events) => records.extend(events.into_iter().map(OutputRecord::from)),
                Err(error) => {
                    let error = attribute(error, item_index);
                    if self.failure_mode.is_tolerant() {
                        records.push(OutputRecord::error(error.raw_message(), item_index));
                    } else {
                        return Err(BatchFailure {
                            item_index,
                            error,
                            partial: records,
                        });
                    }
                }
            }
        }

        Ok(records)
    }

    /// One item's cycle: resolve parameters, then connect/listen/collect with
    /// a fresh accumulator owned by this cycle alone.
    async fn run_item(&self, item_index: usize) -> Result<Vec<CollectedEvent>, CollectorError> {
        let params = self.resolver.resolve(item_index)?;
        self.transport
            .run(&params, &self.credentials, DefaultCollector::new(), None::<fn()>)
            .await
    }
}

/// Classify a cycle failure before it reaches the tolerant/fatal branch.
///
/// A `Connection` error is already classified and passes through untouched;
/// anything else is wrapped as an operation error attributed to the item.
fn attribute(error: CollectorError, item_index: usize) -> CollectorError {
    match error {
        error @ CollectorError::Connection { .. } => error,
        CollectorError::Operation { message, .. } => CollectorError::Operation {
            message,
            item_index,
        },
        other => CollectorError::Operation {
            message: format!("Execution error: {other}"),
            item_index,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ConnectionParams;
    use crate::use_cases::ports::Collector;
    use async_trait::async_trait;
    use serde_json::json;

    /// Transport that scripts its behavior off the endpoint URL.
    #[derive(Clone)]
    struct ScriptedTransport;

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn run<C, F>(
            &self,
            params: &ConnectionParams,
            _credentials: &Credentials,
            collector: C,
            on_ready: Option<F>,
        ) -> Result<C::Output, CollectorError>
        where
            C: Collector + 'static,
            F: FnOnce() + Send + 'static,
        {
            if let Some(callback) = on_ready {
                callback();
            }
            match params.websocket_url.as_str() {
                "mock://refused" => Err(CollectorError::connection("connection refused")),
                "mock://broken" => Err(CollectorError::Configuration("broken handler".into())),
                _ => {
                    let name = params.event_name.clone();
                    collector.collect(CollectedEvent::new(name.clone(), json!({"n": 1})));
                    collector.collect(CollectedEvent::new(name, json!({"n": 2})));
                    Ok(collector.into_output())
                }
            }
        }
    }

    fn params(url: &str) -> ConnectionParams {
        ConnectionParams::new(url, "tick")
    }

    #[test]
    fn test_batch_builder() {
        let _builder = BatchBuilder::new();
    }

    #[test]
    fn test_batch_builder_with_items() {
        let builder = BatchBuilder::new()
            .item(json!({"id": 1}))
            .items(vec![json!({"id": 2}), json!({"id": 3})]);
        assert_eq!(builder.items.len(), 3);
    }

    #[tokio::test]
    async fn test_empty_batch_produces_no_records() {
        let records = BatchBuilder::new()
            .transport(ScriptedTransport)
            .resolver(params("mock://ok"))
            .build()
            .execute()
            .await
            .unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_events_are_appended_in_item_then_arrival_order() {
        let records = BatchBuilder::new()
            .transport(ScriptedTransport)
            .resolver(params("mock://ok"))
            .items(vec![json!(0), json!(1)])
            .build()
            .execute()
            .await
            .unwrap();

        assert_eq!(records.len(), 4);
        let data: Vec<_> = records
            .iter()
            .map(|r| match r {
                OutputRecord::Event { data, .. } => data["n"].as_i64().unwrap(),
                OutputRecord::Error { .. } => panic!("unexpected error record"),
            })
            .collect();
        assert_eq!(data, vec![1, 2, 1, 2]);
    }

    #[tokio::test]
    async fn test_tolerant_mode_isolates_failing_items() {
        let records = BatchBuilder::new()
            .transport(ScriptedTransport)
            .resolver(vec![
                params("mock://ok"),
                params("mock://refused"),
                params("mock://ok"),
            ])
            .items(vec![json!(0), json!(1), json!(2)])
            .tolerant()
            .build()
            .execute()
            .await
            .unwrap();

        assert_eq!(records.len(), 5);
        assert_eq!(
            records[2],
            OutputRecord::error("connection refused", 1)
        );
        assert!(!records[3].is_error());
    }

    #[tokio::test]
    async fn test_fatal_mode_aborts_with_partial_records() {
        let failure = BatchBuilder::new()
            .transport(ScriptedTransport)
            .resolver(vec![params("mock://ok"), params("mock://refused")])
            .items(vec![json!(0), json!(1)])
            .build()
            .execute()
            .await
            .unwrap_err();

        assert_eq!(failure.item_index, 1);
        assert_eq!(failure.partial.len(), 2);
        assert!(failure.error.is_connection());
    }

    #[tokio::test]
    async fn test_connection_error_is_not_rewrapped() {
        let failure = BatchBuilder::new()
            .transport(ScriptedTransport)
            .resolver(params("mock://refused"))
            .item(json!(0))
            .build()
            .execute()
            .await
            .unwrap_err();

        match failure.error {
            CollectorError::Connection { message, .. } => {
                assert_eq!(message, "connection refused");
            }
            other => panic!("expected Connection error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_other_failures_become_operation_errors() {
        let failure = BatchBuilder::new()
            .transport(ScriptedTransport)
            .resolver(vec![params("mock://ok"), params("mock://broken")])
            .items(vec![json!(0), json!(1)])
            .build()
            .execute()
            .await
            .unwrap_err();

        match failure.error {
            CollectorError::Operation {
                message,
                item_index,
            } => {
                assert!(message.starts_with("Execution error:"));
                assert_eq!(item_index, 1);
            }
            other => panic!("expected Operation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_resolver_failure_is_attributed_to_the_item() {
        let records = BatchBuilder::new()
            .transport(ScriptedTransport)
            .resolver(vec![params("mock://ok")])
            .items(vec![json!(0), json!(1)])
            .tolerant()
            .build()
            .execute()
            .await
            .unwrap();

        // Item 0 succeeds with two events, item 1 has no parameters.
        assert_eq!(records.len(), 3);
        match &records[2] {
            OutputRecord::Error { error, paired_item } => {
                assert!(error.contains("no parameters for item 1"));
                assert_eq!(*paired_item, 1);
            }
            other => panic!("expected error record, got {other:?}"),
        }
    }
}
