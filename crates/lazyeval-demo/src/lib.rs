#![forbid(unsafe_code)]

//! Walkthrough binary for `lazyeval`.

pub mod cli;
pub mod error;
pub mod scenario;

pub use cli::{run, run_from_env};
