//! End-to-end walkthroughs of the two usage patterns:
//!
//! 1. A wrapped division function whose calls are batched, run together,
//!    then run one by one.
//! 2. A hand-built executor with an eval marker whose value is later
//!    overwritten with a different kind of value.
//!
//! Both registries here use the default drain policy: an entry is removed
//! once it has been run, so ids cannot be replayed. The retain policy is
//! covered at the end.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use lazyeval::{
    CallId, Executor, ExecutorState, LazyError, LazyEvaluate, RegistryConfig, Retention,
};

/// Division that records every performed division as a printed line.
fn logging_div(log: &Rc<RefCell<Vec<String>>>) -> LazyEvaluate<(f64, f64), f64> {
    let log = Rc::clone(log);
    LazyEvaluate::named("fdiv", move |(a, b): (f64, f64)| {
        let val = a / b;
        log.borrow_mut().push(format!("{a}/{b}={val}"));
        val
    })
}

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Int(i64),
    Text(String),
}

#[test]
fn batched_divisions() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut fdiv = logging_div(&log);

    let first = fdiv.invoke((4.0, 5.0));
    let second = fdiv.invoke((54.0, 5.0));
    let third = fdiv.invoke((43.0, 5.0));
    assert!(log.borrow().is_empty(), "no division before running");

    let results = fdiv.run_all();
    assert_eq!(log.borrow().len(), 3);
    assert_eq!(results[&first], 0.8);
    assert_eq!(results[&second], 10.8);
    assert_eq!(results[&third], 8.6);
    assert_eq!(*log.borrow(), vec!["4/5=0.8", "54/5=10.8", "43/5=8.6"]);
    assert!(fdiv.is_empty());

    let call_id = fdiv.invoke((3.0, 5.0));
    assert_eq!(log.borrow().len(), 3);
    assert_eq!(fdiv.run(call_id), Ok(0.6));
    assert_eq!(log.borrow().len(), 4);
    assert_eq!(log.borrow()[3], "3/5=0.6");

    assert!(fdiv.run_all().is_empty());
    assert_eq!(log.borrow().len(), 4, "final run_all performs no division");
}

#[test]
fn stale_and_foreign_ids_fail() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut fdiv = logging_div(&log);

    let id = fdiv.invoke((1.0, 2.0));
    assert_eq!(fdiv.run(id), Ok(0.5));
    assert_eq!(fdiv.run(id), Err(LazyError::UnknownCall(id)));

    let foreign = CallId::new(1_000);
    let err = fdiv.run(foreign).unwrap_err();
    assert_eq!(err.to_string(), "unknown call id 1000");
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn hand_built_executor() {
    let markers = Rc::new(Cell::new(0u32));
    let marker = Rc::clone(&markers);
    let mut exec = Executor::new(|| Value::Int(5))
        .with_eval_hook(move || marker.set(marker.get() + 1));

    assert_eq!(exec.state(), ExecutorState::NotEvaluated);
    assert_eq!(
        exec.to_string(),
        "Executor for <anonymous>, current state = NOT_EVALUATED"
    );

    assert_eq!(*exec.get(), Value::Int(5));
    assert_eq!(markers.get(), 1);
    assert_eq!(exec.state(), ExecutorState::Evaluated);

    assert_eq!(*exec.get(), Value::Int(5));
    assert_eq!(markers.get(), 1);

    exec.set(Value::Text("hello".to_string()));
    assert_eq!(exec.state(), ExecutorState::Modified);
    assert_eq!(*exec.get(), Value::Text("hello".to_string()));
    assert_eq!(
        exec.to_string(),
        "Executor for <anonymous>, current state = MODIFIED"
    );
    assert_eq!(markers.get(), 1);
}

#[test]
fn retained_entries_replay() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut fdiv =
        logging_div(&log).with_config(RegistryConfig::new().with_retention(Retention::Retain));

    let a = fdiv.invoke((5.0, 5.0));
    let b = fdiv.invoke((5.0, 2.0));
    let first_pass = fdiv.run_all();
    let second_pass = fdiv.run_all();

    assert_eq!(first_pass, second_pass);
    assert_eq!(first_pass[&a], 1.0);
    assert_eq!(first_pass[&b], 2.5);
    assert_eq!(fdiv.len(), 2);
    assert_eq!(log.borrow().len(), 2);
    assert_eq!(fdiv.run(b), Ok(2.5));
    assert_eq!(log.borrow().len(), 2);
}
