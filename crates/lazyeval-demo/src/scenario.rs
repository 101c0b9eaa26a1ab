//! The two walkthroughs printed by the demo.
//!
//! Output is collected into a [`Transcript`] instead of going straight to
//! stdout, because the wrapped division prints from inside deferred closures
//! that cannot borrow the caller's writer.

use std::cell::RefCell;
use std::fmt;
use std::io::{self, Write};
use std::rc::Rc;

use lazyeval::{Executor, LazyEvaluate, RegistryConfig};

use crate::error::Result;

/// Shared, append-only list of output lines.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    lines: Rc<RefCell<Vec<String>>>,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, line: impl Into<String>) {
        self.lines.borrow_mut().push(line.into());
    }

    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    pub fn write_to(&self, out: &mut impl Write) -> io::Result<()> {
        for line in self.lines.borrow().iter() {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }
}

/// Value type for the hand-built executor, which starts out holding a number
/// and is later overwritten with text.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Text(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Batch three divisions, run them together, then add and run one more by id.
///
/// # Errors
///
/// Propagates [`LazyError`](lazyeval::LazyError) from running by id.
pub fn registry_walkthrough(config: RegistryConfig) -> Result<Transcript> {
    let transcript = Transcript::new();
    let printer = transcript.clone();
    let mut fdiv = LazyEvaluate::named("fdiv", move |(a, b): (f64, f64)| {
        let val = a / b;
        printer.push(format!("{a}/{b}={val}"));
        val
    })
    .with_config(config);

    transcript.push("Defining calls");
    fdiv.invoke((4.0, 5.0));
    fdiv.invoke((54.0, 5.0));
    fdiv.invoke((43.0, 5.0));

    transcript.push("Executing calls");
    let _ = fdiv.run_all();

    transcript.push("Adding more calls");
    let call_id = fdiv.invoke((3.0, 5.0));
    transcript.push(format!("Executing call_id {call_id}"));
    fdiv.run(call_id)?;

    let replayed = fdiv.run_all();
    transcript.push(format!("Final run_all returned {} values", replayed.len()));
    Ok(transcript)
}

/// Build an executor by hand, evaluate it twice, then overwrite it.
#[must_use]
pub fn executor_walkthrough() -> Transcript {
    let transcript = Transcript::new();
    let marker = transcript.clone();
    let mut exec =
        Executor::new(|| Value::Int(5)).with_eval_hook(move || marker.push("Function evaluated"));

    transcript.push(exec.to_string());
    let value = exec.get().to_string();
    transcript.push(value);
    transcript.push(exec.to_string());
    exec.set(Value::Text("hello".to_string()));
    let value = exec.get().to_string();
    transcript.push(value);
    transcript.push(exec.to_string());
    transcript
}
