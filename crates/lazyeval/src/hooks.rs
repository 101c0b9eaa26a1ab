#![forbid(unsafe_code)]

//! Transition hooks attached to executors.
//!
//! A [`Hooks`] set holds three callback lists:
//!
//! - `on_register`: fired by [`LazyEvaluate::invoke`](crate::LazyEvaluate::invoke)
//!   after the new executor is stored.
//! - `on_eval`: fired after the first successful evaluation
//!   (`NOT_EVALUATED -> EVALUATED`).
//! - `on_modify`: fired after every overwrite. The [`Transition::from`] field
//!   tells the three overwrite transitions apart.
//!
//! Callbacks are `Rc`-shared, so cloning a `Hooks` set (as the registry does
//! for every executor it creates) is cheap.

use std::fmt;
use std::rc::Rc;

use crate::state::{CallId, ExecutorState};

/// A state change observed by a hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition<'a> {
    /// Id of the executor, if it has one.
    pub id: Option<CallId>,
    /// Display name of the executor.
    pub name: &'a str,
    /// State before the change.
    pub from: ExecutorState,
    /// State after the change.
    pub to: ExecutorState,
}

type HookFn = Rc<dyn Fn(&Transition<'_>)>;

/// Callback lists fired on executor state transitions.
#[derive(Clone, Default)]
pub struct Hooks {
    on_register: Vec<HookFn>,
    on_eval: Vec<HookFn>,
    on_modify: Vec<HookFn>,
}

impl Hooks {
    /// An empty hook set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a callback fired when a registry stores a new executor.
    #[must_use]
    pub fn on_register(mut self, hook: impl Fn(&Transition<'_>) + 'static) -> Self {
        self.on_register.push(Rc::new(hook));
        self
    }

    /// Add a callback fired after the first successful evaluation.
    #[must_use]
    pub fn on_eval(mut self, hook: impl Fn(&Transition<'_>) + 'static) -> Self {
        self.on_eval.push(Rc::new(hook));
        self
    }

    /// Add a callback fired after every overwrite.
    #[must_use]
    pub fn on_modify(mut self, hook: impl Fn(&Transition<'_>) + 'static) -> Self {
        self.on_modify.push(Rc::new(hook));
        self
    }

    /// Whether no callbacks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.on_register.is_empty() && self.on_eval.is_empty() && self.on_modify.is_empty()
    }

    pub(crate) fn fire_register(&self, transition: &Transition<'_>) {
        fire(&self.on_register, transition);
    }

    pub(crate) fn fire_eval(&self, transition: &Transition<'_>) {
        fire(&self.on_eval, transition);
    }

    pub(crate) fn fire_modify(&self, transition: &Transition<'_>) {
        fire(&self.on_modify, transition);
    }
}

fn fire(hooks: &[HookFn], transition: &Transition<'_>) {
    for hook in hooks {
        hook(transition);
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("on_register", &self.on_register.len())
            .field("on_eval", &self.on_eval.len())
            .field("on_modify", &self.on_modify.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn transition(from: ExecutorState, to: ExecutorState) -> Transition<'static> {
        Transition {
            id: Some(CallId::new(1)),
            name: "probe",
            from,
            to,
        }
    }

    #[test]
    fn hooks_fire_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let first = Rc::clone(&log);
        let second = Rc::clone(&log);
        let hooks = Hooks::new()
            .on_eval(move |_| first.borrow_mut().push("first"))
            .on_eval(move |_| second.borrow_mut().push("second"));

        hooks.fire_eval(&transition(
            ExecutorState::NotEvaluated,
            ExecutorState::Evaluated,
        ));
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn lists_are_independent() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let on_modify = Rc::clone(&log);
        let hooks = Hooks::new().on_modify(move |t| on_modify.borrow_mut().push(t.from));

        hooks.fire_register(&transition(
            ExecutorState::NotEvaluated,
            ExecutorState::NotEvaluated,
        ));
        hooks.fire_eval(&transition(
            ExecutorState::NotEvaluated,
            ExecutorState::Evaluated,
        ));
        assert!(log.borrow().is_empty());

        hooks.fire_modify(&transition(
            ExecutorState::Evaluated,
            ExecutorState::Modified,
        ));
        assert_eq!(*log.borrow(), vec![ExecutorState::Evaluated]);
    }

    #[test]
    fn clone_shares_callbacks() {
        let count = Rc::new(std::cell::Cell::new(0u32));
        let counter = Rc::clone(&count);
        let hooks = Hooks::new().on_register(move |_| counter.set(counter.get() + 1));
        let copy = hooks.clone();

        let t = transition(ExecutorState::NotEvaluated, ExecutorState::NotEvaluated);
        hooks.fire_register(&t);
        copy.fire_register(&t);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn empty_and_debug() {
        assert!(Hooks::new().is_empty());
        let hooks = Hooks::new().on_eval(|_| {});
        assert!(!hooks.is_empty());
        let dbg = format!("{hooks:?}");
        assert!(dbg.contains("on_eval: 1"));
    }
}
