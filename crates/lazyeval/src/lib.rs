#![forbid(unsafe_code)]

//! Deferred, memoized function calls.
//!
//! This crate provides two building blocks:
//!
//! - [`Executor`]: one deferred call to a zero-argument unit of work. The work
//!   runs on the first [`get()`](Executor::get), its result is cached, and the
//!   value can be overwritten with [`set()`](Executor::set).
//! - [`LazyEvaluate`]: wraps a callable so that each
//!   [`invoke()`](LazyEvaluate::invoke) registers an executor under a fresh
//!   [`CallId`] instead of running. Pending calls are run by id with
//!   [`run()`](LazyEvaluate::run) or together with
//!   [`run_all()`](LazyEvaluate::run_all).
//!
//! # Architecture
//!
//! Everything is single-threaded. Executors box their work as
//! `dyn FnMut` and registries share the wrapped callable through `Rc`, so
//! neither type is `Send`.
//!
//! State is a tagged slot (`Unevaluated(work) | Evaluated(value) |
//! Modified(value)`), which makes "evaluated without a value" unrepresentable.
//!
//! # Example
//!
//! ```
//! use lazyeval::LazyEvaluate;
//!
//! let mut fdiv = LazyEvaluate::named("fdiv", |(a, b): (f64, f64)| a / b);
//! fdiv.invoke((4.0, 5.0));
//! fdiv.invoke((54.0, 5.0));
//!
//! let results = fdiv.run_all();
//! assert_eq!(results.values().copied().collect::<Vec<_>>(), vec![0.8, 10.8]);
//! assert!(fdiv.run_all().is_empty());
//! ```

pub mod config;
pub mod error;
pub mod executor;
pub mod hooks;
pub mod registry;
pub mod state;

pub use config::{RegistryConfig, Retention};
pub use error::{LazyError, Result};
pub use executor::Executor;
pub use hooks::{Hooks, Transition};
pub use registry::LazyEvaluate;
pub use state::{CallId, ExecutorState};
