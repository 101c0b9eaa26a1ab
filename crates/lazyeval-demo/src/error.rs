use lazyeval::LazyError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DemoError>;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("deferred call error: {0}")]
    Lazy(#[from] LazyError),

    #[error("invalid log filter {filter:?}: {message}")]
    LogFilter { filter: String, message: String },
}

impl DemoError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::LogFilter { .. } => 2,
            _ => 1,
        }
    }
}
