use std::io::{self, Write};

use clap::Parser;
use lazyeval::{RegistryConfig, Retention};
use tracing_subscriber::EnvFilter;

use crate::error::{DemoError, Result};
use crate::scenario::{executor_walkthrough, registry_walkthrough};

/// Filter used when neither `--log-level` nor `RUST_LOG` is set.
const DEFAULT_FILTER: &str = "warn";

#[derive(Debug, Parser)]
#[command(
    name = "lazyeval-demo",
    about = "Deferred division calls and a hand-built executor, step by step",
    version
)]
pub struct Cli {
    /// Keep calls in the registry after running them (replayable ids).
    #[arg(long)]
    pub retain: bool,

    /// Skip the hand-built executor part.
    #[arg(long = "skip-executor")]
    pub skip_executor: bool,

    /// Tracing filter directive, e.g. `lazyeval=debug`. Overrides RUST_LOG.
    #[arg(long = "log-level")]
    pub log_level: Option<String>,
}

impl Cli {
    #[must_use]
    pub fn registry_config(&self) -> RegistryConfig {
        let retention = if self.retain {
            Retention::Retain
        } else {
            Retention::Drain
        };
        RegistryConfig::new().with_retention(retention)
    }
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    init_tracing(cli.log_level.as_deref())?;
    tracing::debug!(
        message = "lazyeval_demo.start",
        retain = cli.retain,
        skip_executor = cli.skip_executor
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    registry_walkthrough(cli.registry_config())?.write_to(&mut out)?;
    if !cli.skip_executor {
        executor_walkthrough().write_to(&mut out)?;
    }
    out.flush()?;
    Ok(())
}

fn build_filter(directive: Option<&str>) -> Result<EnvFilter> {
    match directive {
        Some(directive) => EnvFilter::try_new(directive).map_err(|err| DemoError::LogFilter {
            filter: directive.to_string(),
            message: err.to_string(),
        }),
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))),
    }
}

fn init_tracing(directive: Option<&str>) -> Result<()> {
    let filter = build_filter(directive)?;
    // A subscriber installed earlier (e.g. by a test harness) wins.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .try_init();
    Ok(())
}
