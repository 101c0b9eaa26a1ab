//! Registry configuration.

/// What a registry does with an entry after running it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Retention {
    /// Remove the entry once it has been run. Running the same id again
    /// fails with [`LazyError::UnknownCall`](crate::LazyError::UnknownCall).
    #[default]
    Drain,
    /// Keep the entry. Running it again returns the memoized value without
    /// re-invoking the callable.
    Retain,
}

impl Retention {
    /// Whether entries leave the pending set when run.
    #[must_use]
    pub const fn removes_on_run(self) -> bool {
        matches!(self, Self::Drain)
    }
}

/// Configuration for a [`LazyEvaluate`](crate::LazyEvaluate) registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegistryConfig {
    /// Policy applied to entries after `run` / `run_all`.
    pub retention: Retention,
}

impl RegistryConfig {
    /// Default configuration (drain on run).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the retention policy.
    #[must_use]
    pub fn with_retention(mut self, retention: Retention) -> Self {
        self.retention = retention;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_drains() {
        let config = RegistryConfig::default();
        assert_eq!(config.retention, Retention::Drain);
        assert!(config.retention.removes_on_run());
    }

    #[test]
    fn retain_keeps_entries() {
        let config = RegistryConfig::new().with_retention(Retention::Retain);
        assert!(!config.retention.removes_on_run());
    }
}
