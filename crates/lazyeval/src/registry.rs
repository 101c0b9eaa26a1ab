#![forbid(unsafe_code)]

//! Deferred-call registry.
//!
//! [`LazyEvaluate`] wraps a callable. Each [`invoke()`](LazyEvaluate::invoke)
//! builds an [`Executor`] bound to that argument set, stores it under a fresh
//! [`CallId`] and returns the id without calling anything. Pending calls are
//! later run one at a time by id or all at once.
//!
//! Rust has no variadic functions, so a multi-argument callable takes its
//! arguments as one tuple: `LazyEvaluate::new(|(a, b): (f64, f64)| a / b)`.
//!
//! # Invariants
//!
//! 1. `invoke()` never calls the wrapped callable.
//! 2. Every id returned by `invoke()` names exactly one executor while it is
//!    pending. Ids are never reused.
//! 3. Under [`Retention::Drain`] an entry leaves the pending set once it has
//!    been run; running it again is an [`LazyError::UnknownCall`].
//! 4. A failed evaluation leaves its entry pending.
//! 5. `run_all()` evaluates in ascending id order, which is registration order.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::rc::Rc;

use ahash::AHashMap;

use crate::config::{Retention, RegistryConfig};
use crate::error::{LazyError, Result};
use crate::executor::{ANONYMOUS, Executor};
use crate::hooks::Hooks;
use crate::state::CallId;

type Callable<A, T, E> = Rc<dyn Fn(A) -> std::result::Result<T, E>>;

/// Wraps a callable so that calls are registered instead of run.
///
/// ```
/// use lazyeval::LazyEvaluate;
///
/// let mut fdiv = LazyEvaluate::named("fdiv", |(a, b): (f64, f64)| a / b);
/// let id = fdiv.invoke((3.0, 5.0));
/// assert_eq!(fdiv.len(), 1);
/// assert_eq!(fdiv.run(id), Ok(0.6));
/// assert!(fdiv.is_empty());
/// ```
pub struct LazyEvaluate<A, T, E = Infallible> {
    func: Callable<A, T, E>,
    name: Cow<'static, str>,
    pending: AHashMap<CallId, Executor<T, E>>,
    next_id: u64,
    hooks: Hooks,
    config: RegistryConfig,
}

impl<A: Clone + 'static, T: 'static> LazyEvaluate<A, T> {
    /// Wrap an infallible callable.
    pub fn new(func: impl Fn(A) -> T + 'static) -> Self {
        Self::try_new(move |args| Ok(func(args)))
    }

    /// Wrap an infallible callable under a display name.
    pub fn named(name: impl Into<Cow<'static, str>>, func: impl Fn(A) -> T + 'static) -> Self {
        Self::new(func).with_name(name)
    }
}

impl<A, T: Clone> LazyEvaluate<A, T> {
    /// Run one pending call and return its value.
    ///
    /// # Errors
    ///
    /// [`LazyError::UnknownCall`] if `id` is not pending.
    pub fn run(&mut self, id: CallId) -> Result<T> {
        self.try_run(id)
    }

    /// Run every pending call, returning the values keyed by id.
    ///
    /// An empty registry is a no-op.
    pub fn run_all(&mut self) -> BTreeMap<CallId, T> {
        if let Err((_, never)) = self.evaluate_all() {
            match never {}
        }
        self.settle_all()
    }
}

impl<A: Clone + 'static, T: 'static, E: 'static> LazyEvaluate<A, T, E> {
    /// Wrap a fallible callable.
    pub fn try_new(func: impl Fn(A) -> std::result::Result<T, E> + 'static) -> Self {
        Self {
            func: Rc::new(func),
            name: Cow::Borrowed(ANONYMOUS),
            pending: AHashMap::new(),
            next_id: 0,
            hooks: Hooks::default(),
            config: RegistryConfig::default(),
        }
    }

    /// Register a call with `args` and return its id. The callable is not
    /// invoked.
    pub fn invoke(&mut self, args: A) -> CallId {
        let id = CallId::new(self.next_id);
        self.next_id += 1;

        let func = Rc::clone(&self.func);
        let executor = Executor::try_new(move || func(args.clone()))
            .with_name(self.name.clone())
            .with_id(id)
            .with_hooks(self.hooks.clone());
        executor.announce();
        self.pending.insert(id, executor);

        tracing::trace!(
            message = "lazyeval.registry.invoke",
            name = %self.name,
            id = id.raw(),
            pending = self.pending.len()
        );
        id
    }
}

impl<A, T, E> LazyEvaluate<A, T, E> {
    /// Set the name given to every executor created from now on.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the hooks copied onto every executor created from now on.
    #[must_use]
    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: RegistryConfig) -> Self {
        self.config = config;
        self
    }

    /// Run one pending call and return its value.
    ///
    /// # Errors
    ///
    /// - [`LazyError::UnknownCall`] if `id` is not pending.
    /// - [`LazyError::Evaluation`] if the callable fails; the entry stays
    ///   pending and can be run again.
    pub fn try_run(&mut self, id: CallId) -> Result<T, LazyError<E>>
    where
        T: Clone,
    {
        let executor = self
            .pending
            .get_mut(&id)
            .ok_or(LazyError::UnknownCall(id))?;
        if let Err(source) = executor.try_get() {
            return Err(LazyError::Evaluation { id, source });
        }

        tracing::debug!(
            message = "lazyeval.registry.run",
            name = %self.name,
            id = id.raw(),
            retention = ?self.config.retention
        );
        self.settle(id).ok_or(LazyError::UnknownCall(id))
    }

    /// Run every pending call, returning the values keyed by id.
    ///
    /// # Errors
    ///
    /// Stops at the first failing call and returns [`LazyError::Evaluation`].
    /// Nothing is removed in that case; calls evaluated before the failure
    /// keep their memoized value and are not re-invoked by a later run.
    pub fn try_run_all(&mut self) -> Result<BTreeMap<CallId, T>, LazyError<E>>
    where
        T: Clone,
    {
        self.evaluate_all()
            .map_err(|(id, source)| LazyError::Evaluation { id, source })?;
        Ok(self.settle_all())
    }

    /// Remove a pending call without running it.
    ///
    /// # Errors
    ///
    /// [`LazyError::UnknownCall`] if `id` is not pending.
    pub fn discard(&mut self, id: CallId) -> Result<(), LazyError<E>> {
        match self.pending.remove(&id) {
            Some(_) => {
                tracing::debug!(
                    message = "lazyeval.registry.discard",
                    name = %self.name,
                    id = id.raw()
                );
                Ok(())
            }
            None => Err(LazyError::UnknownCall(id)),
        }
    }

    /// The pending executor for `id`.
    #[must_use]
    pub fn pending(&self, id: CallId) -> Option<&Executor<T, E>> {
        self.pending.get(&id)
    }

    /// Mutable access to a pending executor, e.g. to [`set`](Executor::set)
    /// its value before it runs.
    pub fn pending_mut(&mut self, id: CallId) -> Option<&mut Executor<T, E>> {
        self.pending.get_mut(&id)
    }

    /// Pending ids in registration order.
    #[must_use]
    pub fn pending_ids(&self) -> Vec<CallId> {
        let mut ids: Vec<CallId> = self.pending.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn config(&self) -> RegistryConfig {
        self.config
    }

    fn evaluate_all(&mut self) -> std::result::Result<(), (CallId, E)> {
        let ids = self.pending_ids();
        let span = tracing::debug_span!(
            "lazyeval.run_all",
            name = %self.name,
            pending = ids.len(),
            ran = tracing::field::Empty
        );
        let _guard = span.enter();

        let mut ran = 0usize;
        for id in ids {
            if let Some(executor) = self.pending.get_mut(&id) {
                executor.try_get().map_err(|source| (id, source))?;
                ran += 1;
            }
        }
        span.record("ran", ran);
        Ok(())
    }

    /// Takes (drain) or clones (retain) the value of an evaluated entry.
    fn settle(&mut self, id: CallId) -> Option<T>
    where
        T: Clone,
    {
        match self.config.retention {
            Retention::Drain => self.pending.remove(&id).and_then(Executor::into_cached),
            Retention::Retain => self.pending.get(&id).and_then(Executor::peek).cloned(),
        }
    }

    fn settle_all(&mut self) -> BTreeMap<CallId, T>
    where
        T: Clone,
    {
        match self.config.retention {
            Retention::Drain => self
                .pending
                .drain()
                .filter_map(|(id, executor)| executor.into_cached().map(|value| (id, value)))
                .collect(),
            Retention::Retain => self
                .pending
                .iter()
                .filter_map(|(id, executor)| executor.peek().map(|value| (*id, value.clone())))
                .collect(),
        }
    }
}

impl<A, T, E> fmt::Debug for LazyEvaluate<A, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyEvaluate")
            .field("name", &self.name)
            .field("pending", &self.pending.len())
            .field("next_id", &self.next_id)
            .field("hooks", &self.hooks)
            .field("config", &self.config)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
