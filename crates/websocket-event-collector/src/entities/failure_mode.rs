/// How a per-item failure affects the rest of the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    /// Abort the batch at the first failing item. Records already produced by
    /// earlier items are still handed back as the partial result.
    #[default]
    Fatal,
    /// Convert each failing item into an error record and keep going.
    Tolerant,
}

impl FailureMode {
    pub fn is_tolerant(self) -> bool {
        matches!(self, FailureMode::Tolerant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_fatal() {
        assert_eq!(FailureMode::default(), FailureMode::Fatal);
        assert!(!FailureMode::default().is_tolerant());
    }
}
