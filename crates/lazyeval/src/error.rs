use std::convert::Infallible;

use thiserror::Error;

use crate::state::CallId;

pub type Result<T, E = LazyError> = std::result::Result<T, E>;

/// Errors surfaced by [`LazyEvaluate`](crate::LazyEvaluate).
///
/// `E` is the error type of the wrapped callable; it is [`Infallible`] for
/// registries built with [`LazyEvaluate::new`](crate::LazyEvaluate::new).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LazyError<E = Infallible> {
    /// The id was never issued, or its entry was already run or discarded.
    #[error("unknown call id {0}")]
    UnknownCall(CallId),

    /// The wrapped callable failed. The entry stays pending.
    #[error("evaluation of call {id} failed")]
    Evaluation {
        id: CallId,
        #[source]
        source: E,
    },
}

impl<E> LazyError<E> {
    /// The call this error refers to.
    #[must_use]
    pub fn call_id(&self) -> CallId {
        match self {
            Self::UnknownCall(id) | Self::Evaluation { id, .. } => *id,
        }
    }

    #[must_use]
    pub fn is_unknown_call(&self) -> bool {
        matches!(self, Self::UnknownCall(_))
    }
}
