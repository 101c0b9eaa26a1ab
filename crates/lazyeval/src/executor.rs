#![forbid(unsafe_code)]

//! A single deferred, memoized computation.
//!
//! # Design
//!
//! [`Executor<T, E>`] owns a zero-argument unit of work and a tagged slot:
//! `Unevaluated(work)`, `Evaluated(value)` or `Modified(value)`. The first
//! call to [`get()`](Executor::get) runs the work, caches the value and drops
//! the closure, so anything it captured is released as soon as a value exists.
//!
//! # Invariants
//!
//! 1. The unit of work succeeds at most once per executor; once a value exists
//!    it is never called again.
//! 2. State never returns to `NOT_EVALUATED`.
//! 3. `set()` always leaves the executor `MODIFIED`, even when no evaluation
//!    ever happened.
//! 4. The eval hook fires exactly once, right after the first successful
//!    evaluation, and never because of `set()`.
//! 5. Rendering (`Display` / `Debug`) never evaluates.
//!
//! # Failure Modes
//!
//! - **Unit of work fails**: the error is returned unchanged, nothing is
//!   cached, no hook fires and the state stays `NOT_EVALUATED`. The next
//!   `try_get()` retries.
//! - **Unit of work panics**: the panic unwinds through `get()`; the slot is
//!   untouched, so a caught panic also leaves the executor retryable.

use std::borrow::Cow;
use std::convert::Infallible;
use std::fmt;

use crate::hooks::{Hooks, Transition};
use crate::state::{CallId, ExecutorState};

/// Display name of executors created without one.
pub const ANONYMOUS: &str = "<anonymous>";

type Work<T, E> = Box<dyn FnMut() -> Result<T, E>>;

enum Slot<T, E> {
    Unevaluated(Work<T, E>),
    Evaluated(T),
    Modified(T),
}

impl<T, E> Slot<T, E> {
    fn state(&self) -> ExecutorState {
        match self {
            Self::Unevaluated(_) => ExecutorState::NotEvaluated,
            Self::Evaluated(_) => ExecutorState::Evaluated,
            Self::Modified(_) => ExecutorState::Modified,
        }
    }

    fn value(&self) -> Option<&T> {
        match self {
            Self::Unevaluated(_) => None,
            Self::Evaluated(value) | Self::Modified(value) => Some(value),
        }
    }

    fn into_value(self) -> Option<T> {
        match self {
            Self::Unevaluated(_) => None,
            Self::Evaluated(value) | Self::Modified(value) => Some(value),
        }
    }
}

/// One deferred call whose result is computed on first access and cached.
///
/// `E` is the error type of the unit of work. Executors built with
/// [`Executor::new`] are infallible and expose [`get()`](Executor::get);
/// fallible ones built with [`Executor::try_new`] expose
/// [`try_get()`](Executor::try_get).
///
/// ```
/// use lazyeval::{Executor, ExecutorState};
///
/// let mut answer = Executor::new(|| 6 * 7).with_name("answer");
/// assert_eq!(answer.state(), ExecutorState::NotEvaluated);
/// assert_eq!(*answer.get(), 42);
/// assert_eq!(answer.state(), ExecutorState::Evaluated);
///
/// answer.set(7);
/// assert_eq!(*answer.get(), 7);
/// assert_eq!(answer.to_string(), "Executor for answer, current state = MODIFIED");
/// ```
pub struct Executor<T, E = Infallible> {
    slot: Slot<T, E>,
    eval_hook: Option<Box<dyn FnOnce()>>,
    hooks: Hooks,
    name: Cow<'static, str>,
    id: Option<CallId>,
}

impl<T: 'static> Executor<T> {
    /// Defer an infallible unit of work.
    pub fn new(mut work: impl FnMut() -> T + 'static) -> Self {
        Self::from_work(Box::new(move || Ok(work())))
    }
}

impl<T> Executor<T> {
    /// Get the value, running the unit of work on first access.
    pub fn get(&mut self) -> &T {
        match self.try_get() {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Consume the executor and return its value, evaluating if needed.
    pub fn into_value(self) -> T {
        match self.try_into_value() {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }
}

impl<T: 'static, E: 'static> Executor<T, E> {
    /// Defer a fallible unit of work.
    pub fn try_new(work: impl FnMut() -> Result<T, E> + 'static) -> Self {
        Self::from_work(Box::new(work))
    }
}

impl<T, E> Executor<T, E> {
    fn from_work(work: Work<T, E>) -> Self {
        Self {
            slot: Slot::Unevaluated(work),
            eval_hook: None,
            hooks: Hooks::default(),
            name: Cow::Borrowed(ANONYMOUS),
            id: None,
        }
    }

    /// Set a hook to run once, right after the first successful evaluation.
    #[must_use]
    pub fn with_eval_hook(mut self, hook: impl FnOnce() + 'static) -> Self {
        self.eval_hook = Some(Box::new(hook));
        self
    }

    /// Attach transition hooks.
    #[must_use]
    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the id shown when rendering and passed to hooks.
    #[must_use]
    pub fn with_id(mut self, id: CallId) -> Self {
        self.id = Some(id);
        self
    }

    /// Get the value, running the unit of work on first access.
    ///
    /// # Errors
    ///
    /// Returns the unit of work's error unchanged. The executor stays
    /// `NOT_EVALUATED` and the next call retries.
    pub fn try_get(&mut self) -> Result<&T, E> {
        if let Slot::Unevaluated(work) = &mut self.slot {
            match work() {
                Ok(value) => {
                    self.slot = Slot::Evaluated(value);
                    self.finish_eval();
                }
                Err(err) => {
                    tracing::debug!(
                        message = "lazyeval.executor.eval_failed",
                        name = %self.name,
                        id = ?self.id
                    );
                    return Err(err);
                }
            }
        }
        Ok(self
            .slot
            .value()
            .expect("slot holds a value after evaluation"))
    }

    /// Consume the executor and return its value, evaluating if needed.
    ///
    /// # Errors
    ///
    /// Returns the unit of work's error; the executor is dropped with it.
    pub fn try_into_value(mut self) -> Result<T, E> {
        self.try_get()?;
        Ok(self
            .slot
            .into_value()
            .expect("slot holds a value after evaluation"))
    }

    /// Consume the executor and return its value only if one already exists.
    #[must_use]
    pub fn into_cached(self) -> Option<T> {
        self.slot.into_value()
    }

    /// Overwrite the value, bypassing the unit of work.
    ///
    /// Legal from any state; always leaves the executor `MODIFIED`. The unit of
    /// work and the eval hook are dropped without running.
    pub fn set(&mut self, value: T) {
        let from = self.state();
        self.slot = Slot::Modified(value);
        self.eval_hook = None;
        tracing::trace!(
            message = "lazyeval.executor.modify",
            name = %self.name,
            id = ?self.id,
            from = from.as_str()
        );
        self.hooks
            .fire_modify(&self.transition(from, ExecutorState::Modified));
    }

    /// The cached value, without evaluating.
    #[must_use]
    pub fn peek(&self) -> Option<&T> {
        self.slot.value()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ExecutorState {
        self.slot.state()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn id(&self) -> Option<CallId> {
        self.id
    }

    pub(crate) fn announce(&self) {
        let state = self.state();
        self.hooks.fire_register(&self.transition(state, state));
    }

    fn finish_eval(&mut self) {
        tracing::debug!(
            message = "lazyeval.executor.eval",
            name = %self.name,
            id = ?self.id
        );
        if let Some(hook) = self.eval_hook.take() {
            hook();
        }
        self.hooks.fire_eval(
            &self.transition(ExecutorState::NotEvaluated, ExecutorState::Evaluated),
        );
    }

    fn transition(&self, from: ExecutorState, to: ExecutorState) -> Transition<'_> {
        Transition {
            id: self.id,
            name: &self.name,
            from,
            to,
        }
    }
}

impl<T, E> fmt::Display for Executor<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Executor for {}", self.name)?;
        if let Some(id) = self.id {
            write!(f, " @ {id}")?;
        }
        write!(f, ", current state = {}", self.state())
    }
}

impl<T: fmt::Debug, E> fmt::Debug for Executor<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executor")
            .field("name", &self.name)
            .field("id", &self.id)
            .field("state", &self.state())
            .field("cached", &self.peek())
            .field("eval_hook", &self.eval_hook.is_some())
            .field("hooks", &self.hooks)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
