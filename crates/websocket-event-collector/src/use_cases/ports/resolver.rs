use crate::entities::ConnectionParams;
use crate::error::CollectorError;

/// Trait for the host-side parameter lookup: given an item's position in the
/// batch, produce the connection parameters for its cycle.
pub trait ParameterResolver: Send + Sync {
    fn resolve(&self, item_index: usize) -> Result<ConnectionParams, CollectorError>;
}

/// Every item uses the same parameters.
impl ParameterResolver for ConnectionParams {
    fn resolve(&self, _item_index: usize) -> Result<ConnectionParams, CollectorError> {
        Ok(self.clone())
    }
}

/// Per-index parameters; resolving past the end is a configuration error.
impl ParameterResolver for Vec<ConnectionParams> {
    fn resolve(&self, item_index: usize) -> Result<ConnectionParams, CollectorError> {
        self.get(item_index).cloned().ok_or_else(|| {
            CollectorError::Configuration(format!("no parameters for item {item_index}"))
        })
    }
}

/// Adapter turning a closure into a resolver.
pub struct FnResolver<F>(F);

impl<F> FnResolver<F>
where
    F: Fn(usize) -> Result<ConnectionParams, CollectorError> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> ParameterResolver for FnResolver<F>
where
    F: Fn(usize) -> Result<ConnectionParams, CollectorError> + Send + Sync,
{
    fn resolve(&self, item_index: usize) -> Result<ConnectionParams, CollectorError> {
        (self.0)(item_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_params_resolve_for_any_index() {
        let params = ConnectionParams::new("ws://localhost:1234", "tick");
        assert_eq!(params.resolve(0).unwrap(), params);
        assert_eq!(params.resolve(41).unwrap(), params);
    }

    #[test]
    fn test_vec_resolves_by_index() {
        let resolver = vec![
            ConnectionParams::new("ws://a", "one"),
            ConnectionParams::new("ws://b", "two"),
        ];
        assert_eq!(resolver.resolve(1).unwrap().event_name, "two");
    }

    #[test]
    fn test_vec_out_of_range_is_configuration_error() {
        let resolver = vec![ConnectionParams::new("ws://a", "one")];
        let error = resolver.resolve(1).unwrap_err();
        assert!(matches!(error, CollectorError::Configuration(_)));
    }

    #[test]
    fn test_closure_resolver() {
        let resolver = FnResolver::new(|index: usize| {
            Ok(ConnectionParams::new("ws://c", format!("event-{index}")))
        });
        assert_eq!(resolver.resolve(2).unwrap().event_name, "event-2");
    }
}
