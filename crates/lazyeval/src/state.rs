#![forbid(unsafe_code)]

//! Call identifiers and the executor state enumeration.

use std::fmt;

/// Unique identifier for a deferred call registered with a
/// [`LazyEvaluate`](crate::LazyEvaluate).
///
/// Ids come from a per-registry counter and are never reused by the registry
/// that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CallId(pub u64);

impl CallId {
    /// Create a call ID from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Evaluation state of an [`Executor`](crate::Executor).
///
/// Transitions only ever move away from `NotEvaluated`:
///
/// ```text
/// NotEvaluated --get--> Evaluated --get--> Evaluated
///      |                    |
///      +--------set---------+--set--> Modified --get/set--> Modified
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExecutorState {
    /// The unit of work has not run and no value has been supplied.
    #[default]
    NotEvaluated,
    /// The unit of work ran once and its result is cached.
    Evaluated,
    /// The cached value was overwritten by the caller.
    Modified,
}

impl ExecutorState {
    /// Literal name used when rendering executors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotEvaluated => "NOT_EVALUATED",
            Self::Evaluated => "EVALUATED",
            Self::Modified => "MODIFIED",
        }
    }

    /// Whether an executor in this state holds a value.
    #[must_use]
    pub const fn has_value(self) -> bool {
        !matches!(self, Self::NotEvaluated)
    }
}

impl fmt::Display for ExecutorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_names_are_literal() {
        assert_eq!(ExecutorState::NotEvaluated.to_string(), "NOT_EVALUATED");
        assert_eq!(ExecutorState::Evaluated.to_string(), "EVALUATED");
        assert_eq!(ExecutorState::Modified.to_string(), "MODIFIED");
    }

    #[test]
    fn only_not_evaluated_lacks_value() {
        assert!(!ExecutorState::NotEvaluated.has_value());
        assert!(ExecutorState::Evaluated.has_value());
        assert!(ExecutorState::Modified.has_value());
    }

    #[test]
    fn default_state_is_not_evaluated() {
        assert_eq!(ExecutorState::default(), ExecutorState::NotEvaluated);
    }

    #[test]
    fn call_id_orders_by_raw_value() {
        let a = CallId::new(3);
        let b = CallId::new(7);
        assert!(a < b);
        assert_eq!(b.raw(), 7);
        assert_eq!(a.to_string(), "3");
    }
}
